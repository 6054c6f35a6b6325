#![forbid(unsafe_code)]
//! Secret Santa — tirage au sort local et envoi des affectations par email.
//!
//! - Lecture des participants (fichier délimité, avec ou sans en-tête).
//! - Tirage "mélange puis premier nom qui n'est pas soi", borné, sans boucle infinie.
//! - Rendu d'un gabarit texte et envoi SMTP (STARTTLS + login), une session par campagne.

pub mod config;
pub mod io;
pub mod matcher;
pub mod model;
pub mod notification;
pub mod smtp;
pub mod template;

pub use config::{EnvKeys, Settings, SmtpSettings};
pub use io::{import_participants, read_participants, ParticipantFormat, RowLayout};
pub use matcher::{generate_pairing, MatchError, MatchOptions, Matcher};
pub use model::{Assignment, MailerCredentials, Pairing, Participant};
pub use notification::{
    DeliveryFailure, DeliveryReport, FailurePolicy, MailError, MailTransport, Notifier,
    NotifyError, OutgoingMessage,
};
pub use smtp::SmtpMailer;
pub use template::{EmailTemplate, MessageContext, Placeholder, TemplateError};
