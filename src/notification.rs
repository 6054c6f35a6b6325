use crate::config::Settings;
use crate::model::{MailerCredentials, Pairing};
use crate::template::{EmailTemplate, MessageContext};
use chrono::{Datelike, Local};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("cannot reach mail relay {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },
    #[error("mail relay rejected the login: {0}")]
    Auth(String),
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("send failed: {0}")]
    Send(String),
    #[error("mail session is not open")]
    NotConnected,
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("could not open mail session")]
    Session(#[source] MailError),
    #[error("sending to {recipient} failed, batch aborted after {sent} message(s)")]
    Aborted {
        recipient: String,
        sent: usize,
        #[source]
        source: MailError,
    },
}

/// Transport d'envoi : une session, plusieurs messages.
pub trait MailTransport {
    /// Connexion + authentification.
    fn open(&mut self, credentials: &MailerCredentials) -> Result<(), MailError>;
    /// Envoie un message brut déjà rendu.
    fn send(&mut self, from: &str, to: &str, message: &str) -> Result<(), MailError>;
    /// Ferme la session ; doit tolérer une session jamais ouverte.
    fn close(&mut self);
}

/// Comportement face à l'échec d'un envoi individuel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Le premier échec interrompt le reste du lot.
    #[default]
    Abort,
    /// On journalise, on continue, et on résume à la fin.
    Continue,
}

/// Message prêt à partir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub santa: String,
    pub to: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub santa: String,
    pub to: String,
    pub error: MailError,
}

/// Bilan d'une campagne d'envoi.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: Vec<String>,
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Ferme la session à la sortie, quelle qu'elle soit.
struct Session<'t, T: MailTransport + ?Sized> {
    transport: &'t mut T,
}

impl<'t, T: MailTransport + ?Sized> Drop for Session<'t, T> {
    fn drop(&mut self) {
        info!("closing mail session");
        self.transport.close();
    }
}

#[derive(Debug, Clone)]
pub struct Notifier {
    credentials: MailerCredentials,
    signoff_name: String,
    template: EmailTemplate,
    year: i32,
    policy: FailurePolicy,
}

impl Notifier {
    pub fn new(settings: &Settings, template: EmailTemplate) -> Self {
        Self {
            credentials: settings.credentials.clone(),
            signoff_name: settings.signoff_name.clone(),
            template,
            year: Local::now().year(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Rend tous les messages sans rien envoyer.
    pub fn prepare(&self, pairing: &Pairing) -> Vec<OutgoingMessage> {
        pairing
            .iter()
            .map(|a| {
                let body = self.template.render(&MessageContext {
                    to_email: &a.santa.email,
                    year: self.year,
                    santa: &a.santa.name,
                    giftee: &a.giftee,
                    signoff_name: &self.signoff_name,
                });
                OutgoingMessage {
                    santa: a.santa.name.clone(),
                    to: a.santa.email.clone(),
                    body,
                }
            })
            .collect()
    }

    /// Ouvre une session, envoie un message par père Noël, puis ferme la
    /// session (y compris en cas d'erreur).
    pub fn notify_all<T: MailTransport + ?Sized>(
        &self,
        transport: &mut T,
        pairing: &Pairing,
    ) -> Result<DeliveryReport, NotifyError> {
        let messages = self.prepare(pairing);

        let mut session = Session { transport };
        info!(account = %self.credentials.email, "logging into mail account");
        session
            .transport
            .open(&self.credentials)
            .map_err(NotifyError::Session)?;

        let mut report = DeliveryReport::default();
        for msg in messages {
            info!(santa = %msg.santa, "sending santa email");
            match session.transport.send(&self.credentials.email, &msg.to, &msg.body) {
                Ok(()) => report.sent.push(msg.to),
                Err(error) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(NotifyError::Aborted {
                            recipient: msg.to,
                            sent: report.sent.len(),
                            source: error,
                        });
                    }
                    FailurePolicy::Continue => {
                        warn!(santa = %msg.santa, to = %msg.to, %error, "santa email failed");
                        report.failed.push(DeliveryFailure {
                            santa: msg.santa,
                            to: msg.to,
                            error,
                        });
                    }
                },
            }
        }

        info!(
            sent = report.sent.len(),
            failed = report.failed.len(),
            "all santa emails processed"
        );
        Ok(report)
    }
}
