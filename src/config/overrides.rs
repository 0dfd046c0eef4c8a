//! External override sources.
//!
//! Overrides arrive as string key/value pairs from the environment or the
//! command line; the resolver coerces and applies the recognized ones.

use std::collections::BTreeMap;

use super::resolver::ValidationError;

/// Environment variable prefix for override keys.
///
/// `TOPUP_MAX_AMOUNT=20000` becomes the override `max_amount = "20000"`.
pub const ENV_PREFIX: &str = "TOPUP_";

/// Override keys the resolver recognizes; everything else is ignored.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "currency",
    "commission_rate",
    "commission_percent",
    "usdt_rate",
    "payment_details",
    "min_amount",
    "max_amount",
    "login_min_length",
    "login_max_length",
    "ui_title",
    "ui_subtitle",
    "ui_submit_text",
    "ui_cancel_text",
];

/// String overrides keyed by normalized (lowercase) name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideMap {
    entries: BTreeMap<String, String>,
}

impl OverrideMap {
    /// Creates an empty override map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `TOPUP_*` overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    /// Collects `TOPUP_*` overrides from an explicit variable list.
    ///
    /// The prefix is stripped and the remainder lowercased, so
    /// `TOPUP_MAX_AMOUNT` yields the key `max_amount`.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let entries = vars
            .into_iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(ENV_PREFIX)
                    .map(|key| (key.to_lowercase(), value))
            })
            .collect();

        Self { entries }
    }

    /// Sets an override, normalizing the key to lowercase.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(key.as_ref().to_lowercase(), value.into());
    }

    /// Parses and inserts a `KEY=VALUE` pair (the CLI `--set` form).
    ///
    /// # Errors
    ///
    /// Returns an error if the pair has no `=` or an empty key.
    pub fn insert_pair(&mut self, pair: &str) -> Result<(), ValidationError> {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(ValidationError::MalformedOverride {
                pair: pair.to_owned(),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ValidationError::MalformedOverride {
                pair: pair.to_owned(),
            });
        }

        self.set(key, value);
        Ok(())
    }

    /// Looks up an override by its normalized key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Iterates over all entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the number of overrides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the map holds no overrides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
