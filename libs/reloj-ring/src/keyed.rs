//! Payload contracts for ring entries

use std::fmt::Debug;

/// A payload that carries an identity key.
///
/// The ring never interprets the key beyond equality. Uniqueness is the
/// caller's contract: with duplicates, lookups hit the first match walking
/// forward from `head`.
pub trait Keyed {
    type Key: PartialEq + Debug;

    fn key(&self) -> &Self::Key;
}

/// A payload that can absorb a partial update in place.
///
/// Implementations must leave the key untouched so a node keeps its identity
/// across updates.
pub trait Merge: Keyed {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}
