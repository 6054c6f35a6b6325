use super::pool::GifteePool;
use super::{MatchError, MatchOptions};
use crate::model::{Assignment, Pairing, Participant};
use rand::Rng;
use std::collections::HashSet;
use tracing::{debug, warn};

pub(super) fn generate<R: Rng + ?Sized>(
    participants: &[Participant],
    opts: MatchOptions,
    rng: &mut R,
) -> Result<Pairing, MatchError> {
    check_participants(participants)?;

    let attempts = opts.max_attempts.max(1);
    for attempt in 1..=attempts {
        if let Some(assignments) = assign_once(participants, opts, rng) {
            debug!(attempt, santas = assignments.len(), "pairing generated");
            return Ok(Pairing::new(assignments));
        }
        warn!(attempt, "dead end while drawing giftees, reshuffling");
    }

    Err(MatchError::DeadEnd { attempts })
}

fn check_participants(participants: &[Participant]) -> Result<(), MatchError> {
    if participants.len() < 2 {
        return Err(MatchError::InsufficientParticipants(participants.len()));
    }
    let mut seen = HashSet::with_capacity(participants.len());
    for p in participants {
        if !seen.insert(p.name.as_str()) {
            return Err(MatchError::DuplicateName(p.name.clone()));
        }
    }
    Ok(())
}

/// Un tirage complet ; `None` si une impasse n'a pas pu être résolue.
fn assign_once<R: Rng + ?Sized>(
    participants: &[Participant],
    opts: MatchOptions,
    rng: &mut R,
) -> Option<Vec<Assignment>> {
    let names = participants.iter().map(|p| p.name.clone()).collect();
    let mut pool = GifteePool::shuffled(names, rng);
    let mut out: Vec<Assignment> = Vec::with_capacity(participants.len());

    for santa in participants {
        let giftee = match pool.take_first_other(&santa.name) {
            Some(name) => name,
            // seul reste le nom du père Noël courant : on l'échange avec le
            // destinataire du premier père Noël servi
            None if opts.swap_on_dead_end && !out.is_empty() => {
                let own = pool.take_last()?;
                debug!(santa = %santa.name, "dead end resolved by swap");
                std::mem::replace(&mut out[0].giftee, own)
            }
            None => return None,
        };
        out.push(Assignment {
            santa: santa.clone(),
            giftee,
        });
    }

    debug_assert_eq!(pool.len(), 0);
    Some(out)
}
