//! Identifier generation for tournaments, teams, players and matches.

use rand::Rng;
use uuid::{Builder, Uuid};

/// Draw a fresh random (version 4) UUID from the given random source.
///
/// Every entity id in the crate goes through here, so a seeded rng gives
/// reproducible ids in tests.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}
