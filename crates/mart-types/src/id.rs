use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Prefix carried by every generated id.
pub const ID_PREFIX: &str = "prod";

/// Length of the random suffix of a generated id.
pub const SUFFIX_LEN: usize = 7;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Identifier of a product record.
///
/// Generated ids have the shape `prod_<unix millis>_<7 base-36 chars>`.
/// Uniqueness is probabilistic: nothing checks the collection before a new
/// id is used, so two ids minted in the same millisecond collide only if
/// their suffixes also match.
///
/// Ids read back from storage are accepted verbatim, whatever their shape.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Mint a fresh id from the current time and a random suffix.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        Self::from_parts(millis, &random_suffix(&mut rand::thread_rng()))
    }

    fn from_parts(millis: u128, suffix: &str) -> Self {
        Self(format!("{ID_PREFIX}_{millis}_{suffix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether this id has the `prod_<digits>_<alnum>` shape of a generated id.
    pub fn is_generated(&self) -> bool {
        let Some(rest) = self.0.strip_prefix(ID_PREFIX).and_then(|r| r.strip_prefix('_')) else {
            return false;
        };
        let Some((millis, suffix)) = rest.split_once('_') else {
            return false;
        };
        !millis.is_empty()
            && millis.bytes().all(|b| b.is_ascii_digit())
            && !suffix.is_empty()
            && suffix.bytes().all(|b| b.is_ascii_alphanumeric())
    }
}

fn random_suffix<R: Rng>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

impl From<String> for ProductId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}
