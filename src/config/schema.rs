//! Configuration data model: the immutable resolved snapshot and the
//! pre-validation draft shape.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::resolver::ValidationError;

/// Commission charged on top of the base amount.
///
/// Exactly one representation exists per resolved configuration; the enum
/// makes the other one unrepresentable after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Commission {
    /// Fractional rate in `0.0..=1.0`.
    Rate(f64),
    /// Percentage in `0.0..=100.0`.
    Percent(f64),
}

impl Commission {
    /// Returns the commission as a fraction regardless of representation.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        match *self {
            Self::Rate(rate) => rate,
            Self::Percent(percent) => percent / 100.0,
        }
    }

    /// Returns the commission as a percentage regardless of representation.
    #[must_use]
    pub fn percent(&self) -> f64 {
        match *self {
            Self::Rate(rate) => rate * 100.0,
            Self::Percent(percent) => percent,
        }
    }
}

/// Text shown by the WebApp form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStrings {
    /// Form heading.
    pub title: String,

    /// Secondary line under the heading.
    pub subtitle: String,

    /// Label of the submit button.
    pub submit_button_text: String,

    /// Label of the cancel button.
    pub cancel_button_text: String,
}

/// Bounds the form layer enforces on user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Smallest accepted top-up amount.
    pub min_amount: f64,

    /// Largest accepted top-up amount.
    pub max_amount: f64,

    /// Minimum login length, if the variant collects a login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_min_length: Option<usize>,

    /// Maximum login length, if the variant collects a login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_max_length: Option<usize>,
}

impl ValidationRules {
    /// Checks whether an amount falls within the configured bounds.
    #[must_use]
    pub fn amount_in_range(&self, amount: f64) -> bool {
        amount >= self.min_amount && amount <= self.max_amount
    }

    /// Checks a login against the configured length bounds.
    ///
    /// Absent bounds do not constrain the login.
    #[must_use]
    pub fn login_length_ok(&self, login: &str) -> bool {
        let length = login.chars().count();

        if let Some(min) = self.login_min_length {
            if length < min {
                return false;
            }
        }

        if let Some(max) = self.login_max_length {
            if length > max {
                return false;
            }
        }

        true
    }
}

/// Fully resolved, invariant-satisfying configuration snapshot.
///
/// Constructed once by [`resolve`](super::resolve) and never mutated
/// afterwards; clone it freely to share across consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Display currency, e.g. `"UAH"`. Absent for rate-based variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Commission applied to every top-up.
    pub commission: Commission,

    /// RUB per 1 USDT, present only in crypto-funding variants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdt_rate: Option<f64>,

    /// Payment details shown to the user; absent when details are sent
    /// after the request is confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payment_details: Option<String>,

    /// Form text.
    pub ui: UiStrings,

    /// Input bounds for the form layer.
    pub validation: ValidationRules,
}

impl Configuration {
    /// Returns the gross amount after adding the commission, rounded to
    /// two decimal places.
    #[must_use]
    pub fn total_with_commission(&self, amount: f64) -> f64 {
        round2(amount * (1.0 + self.commission.fraction()))
    }

    /// Converts an amount to USDT by the configured rate, rounded to two
    /// decimal places. `None` when the variant carries no rate.
    #[must_use]
    pub fn usdt_equivalent(&self, amount: f64) -> Option<f64> {
        self.usdt_rate.map(|rate| round2(amount / rate))
    }

    /// Serializes the snapshot as pretty-printed JSON for the WebApp.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ValidationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON snapshot to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json_to(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

/// Rounds to two decimal places, halves away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pre-resolution configuration shape.
///
/// Carries both commission representations as options so that the both-set
/// and neither-set misconfigurations are representable and rejected during
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigDraft {
    /// Display currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Commission as a fraction in `0.0..=1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_rate: Option<f64>,

    /// Commission as a percentage in `0.0..=100.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_percent: Option<f64>,

    /// RUB per 1 USDT.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdt_rate: Option<f64>,

    /// Payment details shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payment_details: Option<String>,

    /// Form text.
    pub ui: UiStrings,

    /// Input bounds for the form layer.
    pub validation: ValidationRules,
}

impl ConfigDraft {
    /// Loads a draft from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path)?;
        let draft: Self = serde_json::from_str(&content)?;
        Ok(draft)
    }

    /// Saves the draft to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ValidationError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    #[test]
    fn test_commission_fraction() {
        assert_eq!(Commission::Rate(0.15).fraction(), 0.15);
        assert_eq!(Commission::Percent(15.0).fraction(), 0.15);
    }

    #[test]
    fn test_commission_percent() {
        assert_eq!(Commission::Rate(0.15).percent(), 15.0);
        assert_eq!(Commission::Percent(15.0).percent(), 15.0);
    }

    #[test]
    fn test_total_with_commission() {
        let config = resolved_crypto();
        // 1000 RUB + 15% = 1150.00
        assert_eq!(config.total_with_commission(1000.0), 1150.0);
    }

    #[test]
    fn test_usdt_equivalent_rounds_to_cents() {
        let config = resolved_crypto();
        // 1150 / 95.0 = 12.105... -> 12.11
        assert_eq!(config.usdt_equivalent(1150.0), Some(12.11));
    }

    #[test]
    fn test_usdt_equivalent_absent_without_rate() {
        let config = resolved_fiat();
        assert_eq!(config.usdt_equivalent(1000.0), None);
    }

    #[test]
    fn test_amount_in_range_bounds_inclusive() {
        let rules = ValidationRules {
            min_amount: 1.0,
            max_amount: 10_000.0,
            login_min_length: None,
            login_max_length: None,
        };
        assert!(rules.amount_in_range(1.0));
        assert!(rules.amount_in_range(10_000.0));
        assert!(!rules.amount_in_range(0.5));
        assert!(!rules.amount_in_range(10_000.5));
    }

    #[test]
    fn test_login_length_counts_chars() {
        let rules = ValidationRules {
            min_amount: 1.0,
            max_amount: 10_000.0,
            login_min_length: Some(3),
            login_max_length: Some(5),
        };
        // Cyrillic letters must count as one character each, not one byte
        assert!(rules.login_length_ok("приве"));
        assert!(!rules.login_length_ok("ab"));
        assert!(!rules.login_length_ok("abcdef"));
    }

    #[test]
    fn test_login_length_unbounded_without_limits() {
        let rules = ValidationRules {
            min_amount: 1.0,
            max_amount: 10_000.0,
            login_min_length: None,
            login_max_length: None,
        };
        assert!(rules.login_length_ok(""));
        assert!(rules.login_length_ok(&"x".repeat(500)));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = resolved_fiat().to_json_pretty().unwrap();
        assert!(json.contains("\"minAmount\""));
        assert!(json.contains("\"submitButtonText\""));
        assert!(json.contains("\"commission\""));
        // Absent options must not appear in the WebApp payload
        assert!(!json.contains("usdtRate"));
    }

    #[test]
    fn test_draft_json_round_trip() {
        let draft = Variant::FiatCard.draft();
        let json = serde_json::to_string(&draft).unwrap();
        let back: ConfigDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(draft, back);
    }

    fn resolved_fiat() -> Configuration {
        crate::config::resolve(Variant::FiatCard.draft(), &crate::config::OverrideMap::new())
            .unwrap()
    }

    fn resolved_crypto() -> Configuration {
        crate::config::resolve(Variant::CryptoRate.draft(), &crate::config::OverrideMap::new())
            .unwrap()
    }
}
