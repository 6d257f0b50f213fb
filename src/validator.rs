//! Input validation
//!
//! Format predicates that gate user input before any request is sent to the
//! query API, plus the invalid-field marker used by input forms.
//!
//! The predicates are total: they never panic and never return an error,
//! a string that does not match simply yields `false`.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};

/// How long a rejected field stays marked invalid
pub const INVALID_MARKER_WINDOW: Duration = Duration::from_millis(2000);

const ADDRESS_LEN: usize = 34;
const SCRIPT_HASH_LEN: usize = 42;
const TX_ID_LEN: usize = 66;
const MAX_HEIGHT_DIGITS: usize = 8;

/// Base58 alphabet: no `0`, `O`, `I` or `l`
static BASE58: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]*$").expect("valid base58 pattern"));

static HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Fa-f0-9]*$").expect("valid hex pattern"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*$").expect("valid digit pattern"));

/// NEO N3 address: 34 base58 characters starting with `N`
pub fn is_address(s: &str) -> bool {
    s.len() == ADDRESS_LEN && s.starts_with('N') && BASE58.is_match(s)
}

/// Contract script hash: `0x` followed by 40 hex digits
pub fn is_script_hash(s: &str) -> bool {
    s.len() == SCRIPT_HASH_LEN && has_hex_body(s)
}

/// Transaction or block hash: `0x` followed by 64 hex digits
pub fn is_tx_id(s: &str) -> bool {
    s.len() == TX_ID_LEN && has_hex_body(s)
}

/// Block height: at most 8 decimal digits
pub fn is_height(s: &str) -> bool {
    s.len() <= MAX_HEIGHT_DIGITS && DIGITS.is_match(s)
}

fn has_hex_body(s: &str) -> bool {
    s.strip_prefix("0x").is_some_and(|body| HEX.is_match(body))
}

/// A free-form lookup value after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Height(u64),
    Hash(String),
    Address(String),
}

impl QueryInput {
    /// Classify a raw user string, rejecting anything no predicate accepts
    pub fn classify(raw: &str) -> Result<Self> {
        let value = raw.trim();

        if is_tx_id(value) {
            Ok(QueryInput::Hash(value.to_string()))
        } else if is_address(value) {
            Ok(QueryInput::Address(value.to_string()))
        } else if !value.is_empty() && is_height(value) {
            let height = value
                .parse::<u64>()
                .map_err(|_| Error::invalid_input("height", value))?;
            Ok(QueryInput::Height(height))
        } else {
            Err(Error::invalid_input("query", value))
        }
    }
}

/// Invalid marker for a single input field
///
/// Once marked, the field reports invalid for [`INVALID_MARKER_WINDOW`] and
/// then clears itself.
#[derive(Debug, Clone, Default)]
pub struct FieldMarker {
    invalid_until: Option<Instant>,
}

impl FieldMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_invalid(&mut self, now: Instant) {
        self.invalid_until = Some(now + INVALID_MARKER_WINDOW);
    }

    pub fn is_invalid(&mut self, now: Instant) -> bool {
        match self.invalid_until {
            Some(until) if now < until => true,
            Some(_) => {
                self.invalid_until = None;
                false
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.invalid_until = None;
    }

    /// Mark the field, hold the marker for the whole window, then clear it
    pub async fn flash(&mut self) {
        self.mark_invalid(Instant::now());
        tokio::time::sleep(INVALID_MARKER_WINDOW).await;
        self.clear();
    }
}
