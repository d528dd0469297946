use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Alphabet for generated poll ids (lowercase base-36).
const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of a generated poll id.
pub const GENERATED_ID_LEN: usize = 9;

/// Opaque identifier of a poll.
///
/// Generated ids are short random base-36 tokens. They are unique enough for a
/// single local store but carry no cryptographic guarantee; the repository
/// still rejects a colliding id on insert.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PollId(String);

impl PollId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate an id from the given random source.
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let token = (0..GENERATED_ID_LEN)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    /// Parse an id supplied from outside (CLI argument, stored key).
    ///
    /// Any non-empty string without whitespace is accepted, so ids written by
    /// older clients keep working.
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(TypeError::InvalidId(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PollId({})", self.0)
    }
}

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PollId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PollId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PollId> for String {
    fn from(id: PollId) -> Self {
        id.0
    }
}

impl AsRef<str> for PollId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
