#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use secret_santa::{
    config::{EnvKeys, Settings, SmtpSettings, DEFAULT_SMTP_HOST, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECS},
    io::{self, ParticipantFormat, RowLayout},
    matcher::{MatchOptions, Matcher},
    notification::{FailurePolicy, Notifier},
    smtp::SmtpMailer,
    template::EmailTemplate,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Tire au sort les pères Noël et prévient chacun par email.
///
/// Sans option : lit `santas.txt` et `email_template.txt` dans le dossier courant.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (filtre via RUST_LOG, `info` par défaut)
    #[arg(long)]
    log: bool,

    /// Fichier des participants
    #[arg(long, default_value = "santas.txt")]
    santas: PathBuf,

    /// Gabarit de l'email
    #[arg(long, default_value = "email_template.txt")]
    template: PathBuf,

    /// Séparateur de colonnes du fichier des participants
    #[arg(long, default_value_t = ' ')]
    delimiter: char,

    /// Pas d'en-tête : email puis nom sur chaque ligne
    #[arg(long)]
    positional: bool,

    /// Graine du tirage (tirage reproductible)
    #[arg(long)]
    seed: Option<u64>,

    /// Relance le tirage complet au lieu d'échanger en cas d'impasse
    #[arg(long)]
    no_swap: bool,

    /// Nombre maximal de tirages complets
    #[arg(long, default_value_t = 8)]
    max_attempts: u32,

    #[arg(long, default_value = DEFAULT_SMTP_HOST)]
    smtp_host: String,

    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    smtp_port: u16,

    /// Délai max (secondes) pour connexion, login et envoi
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Variable d'environnement de l'adresse expéditrice
    #[arg(long, default_value = "SANTA_MAILER_ACCOUNT_EMAIL")]
    email_var: String,

    /// Variable d'environnement du mot de passe / token
    #[arg(long, default_value = "SANTA_MAILER_ACCOUNT_TOKEN")]
    token_var: String,

    /// Variable d'environnement du nom de signature
    #[arg(long, default_value = "SANTA_EMAIL_SIGNOFF_NAME")]
    signoff_var: String,

    /// Continue après l'échec d'un envoi et résume à la fin
    #[arg(long)]
    keep_going: bool,

    /// Tire et rend les messages sans rien envoyer
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = Subscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    // tout ce qui peut échouer localement passe avant le réseau
    let template = EmailTemplate::load(&cli.template)?;
    let keys = EnvKeys {
        mailer_email: cli.email_var,
        mailer_token: cli.token_var,
        signoff_name: cli.signoff_var,
    };
    let settings = Settings::from_env(&keys)?;

    let layout = if cli.positional {
        RowLayout::Positional
    } else {
        RowLayout::Header
    };
    let format = ParticipantFormat::default()
        .with_delimiter(cli.delimiter)?
        .with_layout(layout);
    let santas = io::import_participants(&cli.santas, format)?;

    let matcher = Matcher::new(MatchOptions {
        max_attempts: cli.max_attempts,
        swap_on_dead_end: !cli.no_swap,
    });
    let pairing = match cli.seed {
        Some(seed) => matcher.generate(&santas, &mut StdRng::seed_from_u64(seed)),
        None => matcher.generate(&santas, &mut rand::rng()),
    }
    .context("matching santas")?;
    pairing
        .validate(&santas)
        .map_err(anyhow::Error::msg)
        .context("pairing self-check")?;

    let policy = if cli.keep_going {
        FailurePolicy::Continue
    } else {
        FailurePolicy::Abort
    };
    let notifier = Notifier::new(&settings, template).with_policy(policy);

    if cli.dry_run {
        for msg in notifier.prepare(&pairing) {
            println!("would email {} <{}>", msg.santa, msg.to);
        }
        return Ok(());
    }

    let mut mailer = SmtpMailer::new(SmtpSettings {
        host: cli.smtp_host,
        port: cli.smtp_port,
        timeout: Duration::from_secs(cli.timeout_secs),
    });
    let report = notifier
        .notify_all(&mut mailer, &pairing)
        .context("emailing santas")?;

    println!("Sent {} santa email(s)", report.sent.len());
    if !report.is_complete() {
        eprintln!("{} santa email(s) failed:", report.failed.len());
        for f in &report.failed {
            eprintln!("  {} <{}>: {}", f.santa, f.to, f.error);
        }
        // Code 2 = envoi partiel
        std::process::exit(2);
    }
    Ok(())
}
