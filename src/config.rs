use crate::model::MailerCredentials;
use anyhow::{bail, Context};
use lettre::Address;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Noms des variables d'environnement lues au démarrage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKeys {
    pub mailer_email: String,
    pub mailer_token: String,
    pub signoff_name: String,
}

impl Default for EnvKeys {
    fn default() -> Self {
        Self {
            mailer_email: "SANTA_MAILER_ACCOUNT_EMAIL".into(),
            mailer_token: "SANTA_MAILER_ACCOUNT_TOKEN".into(),
            signoff_name: "SANTA_EMAIL_SIGNOFF_NAME".into(),
        }
    }
}

/// Relais SMTP de soumission (STARTTLS puis authentification).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_SMTP_HOST.into(),
            port: DEFAULT_SMTP_PORT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Réglages du compte expéditeur, chargés une fois puis en lecture seule.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: MailerCredentials,
    pub signoff_name: String,
}

impl Settings {
    /// Lit les réglages depuis l'environnement du processus (après `.env` éventuel).
    pub fn from_env(keys: &EnvKeys) -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "loaded .env file");
        }
        Self::from_lookup(keys, |key| std::env::var(key).ok())
    }

    /// Lit les réglages via une fonction de recherche arbitraire.
    pub fn from_lookup<F>(keys: &EnvKeys, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("loading mailer settings from env");
        let required = |key: &str| -> anyhow::Result<String> {
            match lookup(key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                Some(_) => bail!("environment variable {key} is empty"),
                None => bail!("missing environment variable {key}"),
            }
        };

        let email = required(&keys.mailer_email)?;
        email
            .parse::<Address>()
            .with_context(|| format!("{} is not a valid email address", keys.mailer_email))?;
        let token = required(&keys.mailer_token)?;
        let signoff_name = required(&keys.signoff_name)?;

        Ok(Self {
            credentials: MailerCredentials::new(email, token),
            signoff_name,
        })
    }
}
