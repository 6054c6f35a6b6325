use crate::config::SmtpSettings;
use crate::model::MailerCredentials;
use crate::notification::{MailError, MailTransport};
use lettre::address::Envelope;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, SmtpTransport, Transport};
use tracing::debug;

/// Transport SMTP réel : STARTTLS + authentification via lettre.
pub struct SmtpMailer {
    settings: SmtpSettings,
    transport: Option<SmtpTransport>,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self {
            settings,
            transport: None,
        }
    }

    fn connect_error(&self, reason: impl ToString) -> MailError {
        MailError::Connect {
            host: self.settings.host.clone(),
            port: self.settings.port,
            reason: reason.to_string(),
        }
    }
}

impl MailTransport for SmtpMailer {
    fn open(&mut self, credentials: &MailerCredentials) -> Result<(), MailError> {
        let transport = SmtpTransport::starttls_relay(&self.settings.host)
            .map_err(|e| self.connect_error(e))?
            .port(self.settings.port)
            .timeout(Some(self.settings.timeout))
            .credentials(Credentials::new(
                credentials.email.clone(),
                credentials.token.clone(),
            ))
            .build();

        // ouvre la connexion et s'authentifie tout de suite, avant le premier envoi
        match transport.test_connection() {
            Ok(true) => {}
            Ok(false) => return Err(self.connect_error("relay did not answer NOOP")),
            Err(e) if e.is_permanent() => return Err(MailError::Auth(e.to_string())),
            Err(e) => return Err(self.connect_error(e)),
        }
        debug!(host = %self.settings.host, port = self.settings.port, "smtp session ready");
        self.transport = Some(transport);
        Ok(())
    }

    fn send(&mut self, from: &str, to: &str, message: &str) -> Result<(), MailError> {
        let transport = self.transport.as_ref().ok_or(MailError::NotConnected)?;
        let from: Address = from
            .parse()
            .map_err(|_| MailError::InvalidAddress(from.to_string()))?;
        let rcpt: Address = to
            .parse()
            .map_err(|_| MailError::InvalidAddress(to.to_string()))?;
        let envelope =
            Envelope::new(Some(from), vec![rcpt]).map_err(|e| MailError::Send(e.to_string()))?;

        transport
            .send_raw(&envelope, to_crlf(message).as_bytes())
            .map_err(|e| MailError::Send(e.to_string()))?;
        Ok(())
    }

    fn close(&mut self) {
        if self.transport.take().is_some() {
            debug!("smtp session closed");
        }
    }
}

/// SMTP exige des fins de ligne CRLF.
fn to_crlf(message: &str) -> String {
    message.replace("\r\n", "\n").replace('\n', "\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_endings_are_normalised() {
        assert_eq!(to_crlf("a\nb\r\nc"), "a\r\nb\r\nc");
    }

    #[test]
    fn send_before_open_is_rejected() {
        let mut mailer = SmtpMailer::new(SmtpSettings::default());
        let err = mailer.send("a@x.org", "b@x.org", "hi").unwrap_err();
        assert_eq!(err, MailError::NotConnected);
    }
}
