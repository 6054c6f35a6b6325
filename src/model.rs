use serde::Deserialize;
use std::fmt;

/// Participant au tirage : adresse de livraison + nom (clé d'appariement).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Participant {
    pub email: String,
    pub name: String,
}

impl Participant {
    pub fn new<E: Into<String>, N: Into<String>>(email: E, name: N) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
        }
    }
}

/// Identifiants du compte expéditeur.
#[derive(Clone, PartialEq, Eq)]
pub struct MailerCredentials {
    pub email: String,
    pub token: String,
}

impl MailerCredentials {
    pub fn new<E: Into<String>, T: Into<String>>(email: E, token: T) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }
}

// le token ne doit jamais finir dans les logs
impl fmt::Debug for MailerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerCredentials")
            .field("email", &self.email)
            .field("token", &"***")
            .finish()
    }
}

/// Un père Noël et le nom de la personne qu'il doit gâter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub santa: Participant,
    pub giftee: String,
}

/// Résultat complet d'un tirage, dans l'ordre des pères Noël.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    assignments: Vec<Assignment>,
}

impl Pairing {
    pub fn new(assignments: Vec<Assignment>) -> Self {
        Self { assignments }
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn giftee_of<'a>(&'a self, santa_name: &str) -> Option<&'a str> {
        self.assignments
            .iter()
            .find(|a| a.santa.name == santa_name)
            .map(|a| a.giftee.as_str())
    }

    /// Vérifie qu'aucun participant ne s'offre de cadeau et que chacun
    /// apparaît exactement une fois comme père Noël et une fois comme destinataire.
    pub fn validate(&self, participants: &[Participant]) -> Result<(), String> {
        if self.assignments.len() != participants.len() {
            return Err(format!(
                "pairing has {} assignments for {} participants",
                self.assignments.len(),
                participants.len()
            ));
        }
        if let Some(a) = self.assignments.iter().find(|a| a.santa.name == a.giftee) {
            return Err(format!("{} is assigned to themself", a.santa.name));
        }
        for p in participants {
            let as_santa = self
                .assignments
                .iter()
                .filter(|a| a.santa.name == p.name)
                .count();
            if as_santa != 1 {
                return Err(format!("{} appears {as_santa} time(s) as santa", p.name));
            }
            let as_giftee = self.assignments.iter().filter(|a| a.giftee == p.name).count();
            if as_giftee != 1 {
                return Err(format!("{} appears {as_giftee} time(s) as giftee", p.name));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Pairing {
    type Item = &'a Assignment;
    type IntoIter = std::slice::Iter<'a, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.iter()
    }
}
