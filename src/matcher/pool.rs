use rand::seq::SliceRandom;
use rand::Rng;

/// Réserve de destinataires encore disponibles.
///
/// Sa taille est toujours égale au nombre de pères Noël non servis.
#[derive(Debug, Clone)]
pub(super) struct GifteePool {
    names: Vec<String>,
}

impl GifteePool {
    pub(super) fn shuffled<R: Rng + ?Sized>(names: Vec<String>, rng: &mut R) -> Self {
        let mut names = names;
        names.shuffle(rng);
        Self { names }
    }

    pub(super) fn len(&self) -> usize {
        self.names.len()
    }

    /// Retire et renvoie le premier nom différent de `santa`.
    ///
    /// Le parcours est borné par la taille courante de la réserve ; `None`
    /// signale une impasse.
    pub(super) fn take_first_other(&mut self, santa: &str) -> Option<String> {
        let idx = (0..self.names.len()).find(|&i| self.names[i] != santa)?;
        Some(self.names.remove(idx))
    }

    /// Vide la réserve (utilisé quand l'impasse est résolue par échange).
    pub(super) fn take_last(&mut self) -> Option<String> {
        self.names.pop()
    }
}
