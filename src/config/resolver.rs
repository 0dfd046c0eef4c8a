//! Configuration resolution: apply overrides, validate, snapshot.
//!
//! Resolution is a single pass with one success and one failure outcome;
//! no partially resolved configuration ever escapes.

use thiserror::Error;

use super::overrides::OverrideMap;
use super::schema::{Commission, ConfigDraft, Configuration};

/// Errors produced while resolving or loading a configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Both commissionRate and commissionPercent are set; exactly one is allowed")]
    CommissionConflict,

    #[error("Neither commissionRate nor commissionPercent is set; exactly one is required")]
    CommissionMissing,

    #[error("Commission rate {rate} is outside 0.0..=1.0")]
    RateOutOfRange { rate: f64 },

    #[error("Commission percent {percent} is outside 0.0..=100.0")]
    PercentOutOfRange { percent: f64 },

    #[error("USDT rate must be positive, got {rate}")]
    NonPositiveUsdtRate { rate: f64 },

    #[error("UI string '{field}' must not be empty")]
    EmptyUiString { field: &'static str },

    #[error("Currency must not be empty when present")]
    EmptyCurrency,

    #[error("Amount bounds are invalid: minAmount {min} must be positive and not exceed maxAmount {max}")]
    InvalidAmountBounds { min: f64, max: f64 },

    #[error("Login length bounds are invalid: min {min:?}, max {max:?}")]
    InvalidLoginBounds {
        min: Option<usize>,
        max: Option<usize>,
    },

    #[error("Override '{key}' has an unparsable value: '{value}'")]
    InvalidOverride { key: String, value: String },

    #[error("Override must be formatted as KEY=VALUE: '{pair}'")]
    MalformedOverride { pair: String },

    #[error("Unknown variant '{name}' (expected fiat-card, fiat-deferred or crypto-rate)")]
    UnknownVariant { name: String },

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolves a draft and its overrides into a validated snapshot.
///
/// Recognized override keys replace the draft's values; unrecognized keys
/// are ignored. The function is pure: the same inputs always produce the
/// same snapshot.
///
/// # Errors
///
/// Returns a [`ValidationError`] when an override value fails to parse or
/// the merged draft violates an invariant.
pub fn resolve(
    draft: ConfigDraft,
    overrides: &OverrideMap,
) -> Result<Configuration, ValidationError> {
    let draft = apply_overrides(draft, overrides)?;
    let commission = validate(&draft)?;

    Ok(Configuration {
        currency: draft.currency,
        commission,
        usdt_rate: draft.usdt_rate,
        default_payment_details: draft.default_payment_details,
        ui: draft.ui,
        validation: draft.validation,
    })
}

fn apply_overrides(
    mut draft: ConfigDraft,
    overrides: &OverrideMap,
) -> Result<ConfigDraft, ValidationError> {
    for (key, value) in overrides.iter() {
        match key {
            "currency" => draft.currency = Some(value.to_owned()),
            "commission_rate" => draft.commission_rate = Some(parse_f64(key, value)?),
            "commission_percent" => draft.commission_percent = Some(parse_f64(key, value)?),
            "usdt_rate" => draft.usdt_rate = Some(parse_f64(key, value)?),
            "payment_details" => draft.default_payment_details = Some(value.to_owned()),
            "min_amount" => draft.validation.min_amount = parse_f64(key, value)?,
            "max_amount" => draft.validation.max_amount = parse_f64(key, value)?,
            "login_min_length" => {
                draft.validation.login_min_length = Some(parse_usize(key, value)?);
            }
            "login_max_length" => {
                draft.validation.login_max_length = Some(parse_usize(key, value)?);
            }
            "ui_title" => draft.ui.title = value.to_owned(),
            "ui_subtitle" => draft.ui.subtitle = value.to_owned(),
            "ui_submit_text" => draft.ui.submit_button_text = value.to_owned(),
            "ui_cancel_text" => draft.ui.cancel_button_text = value.to_owned(),
            // Unrecognized keys are ignored
            _ => {}
        }
    }

    Ok(draft)
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ValidationError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| ValidationError::InvalidOverride {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ValidationError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidOverride {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}

/// Checks every invariant and collapses the commission representation.
fn validate(draft: &ConfigDraft) -> Result<Commission, ValidationError> {
    let commission = match (draft.commission_rate, draft.commission_percent) {
        (Some(_), Some(_)) => return Err(ValidationError::CommissionConflict),
        (None, None) => return Err(ValidationError::CommissionMissing),
        (Some(rate), None) => {
            if !(0.0..=1.0).contains(&rate) {
                return Err(ValidationError::RateOutOfRange { rate });
            }
            Commission::Rate(rate)
        }
        (None, Some(percent)) => {
            if !(0.0..=100.0).contains(&percent) {
                return Err(ValidationError::PercentOutOfRange { percent });
            }
            Commission::Percent(percent)
        }
    };

    if let Some(rate) = draft.usdt_rate {
        if rate <= 0.0 {
            return Err(ValidationError::NonPositiveUsdtRate { rate });
        }
    }

    if let Some(currency) = &draft.currency {
        if currency.trim().is_empty() {
            return Err(ValidationError::EmptyCurrency);
        }
    }

    for (field, text) in [
        ("title", &draft.ui.title),
        ("subtitle", &draft.ui.subtitle),
        ("submitButtonText", &draft.ui.submit_button_text),
        ("cancelButtonText", &draft.ui.cancel_button_text),
    ] {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyUiString { field });
        }
    }

    let rules = &draft.validation;
    if !(rules.min_amount > 0.0 && rules.min_amount <= rules.max_amount) {
        return Err(ValidationError::InvalidAmountBounds {
            min: rules.min_amount,
            max: rules.max_amount,
        });
    }

    let login_bounds_valid = match (rules.login_min_length, rules.login_max_length) {
        (Some(min), Some(max)) => min > 0 && min <= max,
        (Some(min), None) => min > 0,
        (None, Some(max)) => max > 0,
        (None, None) => true,
    };
    if !login_bounds_valid {
        return Err(ValidationError::InvalidLoginBounds {
            min: rules.login_min_length,
            max: rules.login_max_length,
        });
    }

    Ok(commission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Variant;

    fn no_overrides() -> OverrideMap {
        OverrideMap::new()
    }

    fn one_override(key: &str, value: &str) -> OverrideMap {
        let mut map = OverrideMap::new();
        map.set(key, value);
        map
    }

    #[test]
    fn test_fiat_card_defaults() {
        let config = resolve(Variant::FiatCard.draft(), &no_overrides()).unwrap();
        assert_eq!(config.currency.as_deref(), Some("UAH"));
        assert_eq!(config.commission, Commission::Rate(0.15));
        assert_eq!(config.validation.min_amount, 1.0);
        assert_eq!(config.validation.max_amount, 10_000.0);
    }

    #[test]
    fn test_fiat_deferred_defaults() {
        let config = resolve(Variant::FiatDeferred.draft(), &no_overrides()).unwrap();
        assert_eq!(
            config.default_payment_details.as_deref(),
            Some("Реквізити будуть надіслані після підтвердження заявки")
        );
        assert_eq!(config.validation.min_amount, 100.0);
        assert_eq!(config.validation.max_amount, 50_000.0);
    }

    #[test]
    fn test_crypto_rate_defaults() {
        let config = resolve(Variant::CryptoRate.draft(), &no_overrides()).unwrap();
        assert_eq!(config.usdt_rate, Some(95.0));
        assert_eq!(config.commission, Commission::Percent(15.0));
        assert_eq!(config.validation.max_amount, 1_000_000.0);
        assert_eq!(config.currency, None);
    }

    #[test]
    fn test_max_amount_override_leaves_rest_unchanged() {
        let base = resolve(Variant::FiatCard.draft(), &no_overrides()).unwrap();
        let config = resolve(
            Variant::FiatCard.draft(),
            &one_override("max_amount", "20000"),
        )
        .unwrap();

        assert_eq!(config.validation.max_amount, 20_000.0);

        let mut expected = base;
        expected.validation.max_amount = 20_000.0;
        assert_eq!(config, expected);
    }

    #[test]
    fn test_both_commission_fields_fail() {
        let mut draft = Variant::FiatCard.draft();
        draft.commission_percent = Some(15.0);

        assert!(matches!(
            resolve(draft, &no_overrides()),
            Err(ValidationError::CommissionConflict)
        ));
    }

    #[test]
    fn test_missing_commission_fails() {
        let mut draft = Variant::FiatCard.draft();
        draft.commission_rate = None;

        assert!(matches!(
            resolve(draft, &no_overrides()),
            Err(ValidationError::CommissionMissing)
        ));
    }

    #[test]
    fn test_exactly_one_commission_representation() {
        for variant in Variant::all() {
            let config = resolve(variant.draft(), &no_overrides()).unwrap();
            match config.commission {
                Commission::Rate(rate) => assert!((0.0..=1.0).contains(&rate)),
                Commission::Percent(percent) => assert!((0.0..=100.0).contains(&percent)),
            }
        }
    }

    #[test]
    fn test_idempotent_resolution() {
        let overrides = one_override("usdt_rate", "97.5");
        let first = resolve(Variant::CryptoRate.draft(), &overrides).unwrap();
        let second = resolve(Variant::CryptoRate.draft(), &overrides).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_override_takes_precedence() {
        let config = resolve(Variant::FiatCard.draft(), &one_override("currency", "EUR")).unwrap();
        assert_eq!(config.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let mut overrides = OverrideMap::new();
        overrides.set("color_scheme", "dark");
        overrides.set("bot_token", "secret");

        let base = resolve(Variant::FiatCard.draft(), &no_overrides()).unwrap();
        let config = resolve(Variant::FiatCard.draft(), &overrides).unwrap();
        assert_eq!(config, base);
    }

    #[test]
    fn test_unparsable_numeric_override_fails() {
        let result = resolve(
            Variant::FiatCard.draft(),
            &one_override("max_amount", "a lot"),
        );
        assert!(matches!(
            result,
            Err(ValidationError::InvalidOverride { key, .. }) if key == "max_amount"
        ));
    }

    #[test]
    fn test_non_finite_override_fails() {
        let result = resolve(Variant::FiatCard.draft(), &one_override("max_amount", "inf"));
        assert!(matches!(
            result,
            Err(ValidationError::InvalidOverride { .. })
        ));
    }

    #[test]
    fn test_min_above_max_fails() {
        let result = resolve(
            Variant::FiatCard.draft(),
            &one_override("min_amount", "50000"),
        );
        assert!(matches!(
            result,
            Err(ValidationError::InvalidAmountBounds { .. })
        ));
    }

    #[test]
    fn test_zero_min_amount_fails() {
        let result = resolve(Variant::FiatCard.draft(), &one_override("min_amount", "0"));
        assert!(matches!(
            result,
            Err(ValidationError::InvalidAmountBounds { .. })
        ));
    }

    #[test]
    fn test_empty_ui_string_fails() {
        let result = resolve(Variant::FiatCard.draft(), &one_override("ui_title", "  "));
        assert!(matches!(
            result,
            Err(ValidationError::EmptyUiString { field: "title" })
        ));
    }

    #[test]
    fn test_empty_currency_override_fails() {
        let result = resolve(Variant::FiatCard.draft(), &one_override("currency", ""));
        assert!(matches!(result, Err(ValidationError::EmptyCurrency)));
    }

    #[test]
    fn test_zero_usdt_rate_fails() {
        let result = resolve(Variant::CryptoRate.draft(), &one_override("usdt_rate", "0"));
        assert!(matches!(
            result,
            Err(ValidationError::NonPositiveUsdtRate { .. })
        ));
    }

    #[test]
    fn test_commission_rate_out_of_range_fails() {
        let result = resolve(
            Variant::FiatCard.draft(),
            &one_override("commission_rate", "1.5"),
        );
        assert!(matches!(
            result,
            Err(ValidationError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_commission_percent_override_on_crypto() {
        let config = resolve(
            Variant::CryptoRate.draft(),
            &one_override("commission_percent", "20"),
        )
        .unwrap();
        assert_eq!(config.commission, Commission::Percent(20.0));
    }

    #[test]
    fn test_cross_representation_override_conflicts() {
        // fiat-card carries a rate; adding a percent leaves both set
        let result = resolve(
            Variant::FiatCard.draft(),
            &one_override("commission_percent", "20"),
        );
        assert!(matches!(result, Err(ValidationError::CommissionConflict)));
    }

    #[test]
    fn test_login_bounds_inverted_fails() {
        let mut overrides = OverrideMap::new();
        overrides.set("login_min_length", "60");

        let result = resolve(Variant::FiatCard.draft(), &overrides);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidLoginBounds { .. })
        ));
    }

    #[test]
    fn test_zero_login_bound_fails() {
        let result = resolve(
            Variant::CryptoRate.draft(),
            &one_override("login_max_length", "0"),
        );
        assert!(matches!(
            result,
            Err(ValidationError::InvalidLoginBounds { .. })
        ));
    }

    #[test]
    fn test_single_sided_login_bound_allowed() {
        let config = resolve(
            Variant::CryptoRate.draft(),
            &one_override("login_max_length", "64"),
        )
        .unwrap();
        assert_eq!(config.validation.login_min_length, None);
        assert_eq!(config.validation.login_max_length, Some(64));
    }

    #[test]
    fn test_ui_overrides_applied() {
        let mut overrides = OverrideMap::new();
        overrides.set("ui_title", "Поповнення");
        overrides.set("ui_submit_text", "Далі");

        let config = resolve(Variant::FiatCard.draft(), &overrides).unwrap();
        assert_eq!(config.ui.title, "Поповнення");
        assert_eq!(config.ui.submit_button_text, "Далі");
        // Untouched strings keep their variant values
        assert_eq!(config.ui.cancel_button_text, "❌ Скасувати");
    }

    #[test]
    fn test_env_style_overrides_end_to_end() {
        let overrides = OverrideMap::from_vars([
            ("TOPUP_USDT_RATE".to_owned(), "101.25".to_owned()),
            ("TOPUP_PAYMENT_DETAILS".to_owned(), "TRC20: TXyz".to_owned()),
            ("HOME".to_owned(), "/root".to_owned()),
        ]);

        let config = resolve(Variant::CryptoRate.draft(), &overrides).unwrap();
        assert_eq!(config.usdt_rate, Some(101.25));
        assert_eq!(config.default_payment_details.as_deref(), Some("TRC20: TXyz"));
    }
}
