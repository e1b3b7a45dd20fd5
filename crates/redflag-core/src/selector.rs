use std::collections::HashSet;

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use redflag_types::Behavior;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of asking for something the voter has not judged yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Selection {
    Next(Behavior),
    /// Every approved behavior in the pool has been judged this session.
    Exhausted,
}

/// Pick one behavior from `pool` whose id is not in `exclude`.
pub fn select_unseen<R: Rng + ?Sized>(pool: Vec<Behavior>, exclude: &HashSet<Uuid>, rng: &mut R) -> Selection {
    let candidates: Vec<Behavior> = pool.into_iter().filter(|b| !exclude.contains(&b.id)).collect();

    match candidates.choose(rng) {
        Some(picked) => Selection::Next(picked.clone()),
        None => Selection::Exhausted,
    }
}

/// Shuffle an oversampled pool and keep `count` of it.
pub fn sample<R: Rng + ?Sized>(mut pool: Vec<Behavior>, count: usize, rng: &mut R) -> Vec<Behavior> {
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
