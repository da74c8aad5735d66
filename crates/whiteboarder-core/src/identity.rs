//! Random per-session display names.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

const ADJECTIVES: &[&str] = &[
    "Brave", "Calm", "Clever", "Cosmic", "Curious", "Dizzy", "Eager", "Fancy", "Fuzzy", "Gentle",
    "Happy", "Jolly", "Lucky", "Mellow", "Nimble", "Quiet", "Rapid", "Silly", "Sleepy", "Swift",
];

const ANIMALS: &[&str] = &[
    "Badger", "Beaver", "Falcon", "Ferret", "Gecko", "Heron", "Koala", "Lemur", "Lynx", "Marmot",
    "Otter", "Panda", "Puffin", "Quokka", "Raccoon", "Salmon", "Tapir", "Walrus", "Weasel", "Yak",
];

/// Upper bound (exclusive) of the numeric suffix.
const SUFFIX_LIMIT: u32 = 1000;

/// Display name of the local editor. Not persisted and not stable across
/// sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    /// Generate a fresh name from the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a name from the given RNG: adjective, animal, number.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Anonymous");
        let animal = ANIMALS.choose(rng).copied().unwrap_or("Doodler");
        let number = rng.random_range(0..SUFFIX_LIMIT);
        Self(format!("{adjective}{animal}{number}"))
    }

    /// Use a fixed name.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
