use thiserror::Error;

/// Options du tirage
#[derive(Debug, Clone, Copy)]
pub struct MatchOptions {
    /// Nombre maximal de tirages complets avant d'abandonner.
    pub max_attempts: u32,
    /// Résout une impasse (il ne reste que soi-même) par échange avec le
    /// premier père Noël déjà servi au lieu de relancer le tirage.
    pub swap_on_dead_end: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            swap_on_dead_end: true,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("insufficient participants: need at least 2, got {0}")]
    InsufficientParticipants(usize),
    #[error("duplicate participant name: {0}")]
    DuplicateName(String),
    #[error("no valid giftee left after {attempts} attempt(s)")]
    DeadEnd { attempts: u32 },
}
