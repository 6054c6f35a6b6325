mod assignment;
mod pool;
mod types;

pub use types::{MatchError, MatchOptions};

use crate::model::{Pairing, Participant};
use rand::Rng;

/// Matcher : tire au sort un destinataire pour chaque père Noël.
#[derive(Debug, Default, Clone, Copy)]
pub struct Matcher {
    opts: MatchOptions,
}

impl Matcher {
    pub fn new(opts: MatchOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> MatchOptions {
        self.opts
    }

    /// Mélange les noms puis, pour chaque père Noël dans l'ordre fourni,
    /// prend le premier nom de la réserve qui n'est pas le sien.
    ///
    /// Le résultat garantit seulement l'absence d'auto-attribution : les
    /// paires réciproques (A → B, B → A) restent possibles.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        participants: &[Participant],
        rng: &mut R,
    ) -> Result<Pairing, MatchError> {
        assignment::generate(participants, self.opts, rng)
    }
}

/// Raccourci avec les options par défaut.
pub fn generate_pairing<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<Pairing, MatchError> {
    Matcher::default().generate(participants, rng)
}
