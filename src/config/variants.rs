//! Built-in deployment variants.
//!
//! Each variant is one of the mutually-exclusive base profiles the form is
//! deployed with; a deployment picks one and adjusts it through overrides.

use std::fmt;
use std::str::FromStr;

use super::resolver::ValidationError;
use super::schema::{ConfigDraft, UiStrings, ValidationRules};

/// One of the known deployment profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// UAH card payments with the card details shown up front.
    FiatCard,

    /// UAH card payments with the details sent after confirmation.
    FiatDeferred,

    /// USDT-funded top-ups quoted through a RUB exchange rate.
    CryptoRate,
}

impl Variant {
    /// Returns all built-in variants.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::FiatCard, Self::FiatDeferred, Self::CryptoRate]
    }

    /// Returns the canonical variant name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FiatCard => "fiat-card",
            Self::FiatDeferred => "fiat-deferred",
            Self::CryptoRate => "crypto-rate",
        }
    }

    /// Builds the base draft for this variant.
    #[must_use]
    pub fn draft(&self) -> ConfigDraft {
        match self {
            Self::FiatCard => fiat_card(),
            Self::FiatDeferred => fiat_deferred(),
            Self::CryptoRate => crypto_rate(),
        }
    }
}

impl FromStr for Variant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fiat-card" | "fiat_card" | "card" => Ok(Self::FiatCard),
            "fiat-deferred" | "fiat_deferred" | "deferred" => Ok(Self::FiatDeferred),
            "crypto-rate" | "crypto_rate" | "crypto" => Ok(Self::CryptoRate),
            _ => Err(ValidationError::UnknownVariant { name: s.to_owned() }),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn ukrainian_ui() -> UiStrings {
    UiStrings {
        title: "🎮 Поповнення Steam".to_owned(),
        subtitle: "Заповніть форму для оформлення поповнення".to_owned(),
        submit_button_text: "✅ Підтвердити".to_owned(),
        cancel_button_text: "❌ Скасувати".to_owned(),
    }
}

fn fiat_card() -> ConfigDraft {
    ConfigDraft {
        currency: Some("UAH".to_owned()),
        commission_rate: Some(0.15),
        commission_percent: None,
        usdt_rate: None,
        default_payment_details: Some(
            "Номер карти: 4441 1144 1111 1111\nОтримувач: Іван Іванов\nБанк: ПриватБанк"
                .to_owned(),
        ),
        ui: ukrainian_ui(),
        validation: ValidationRules {
            min_amount: 1.0,
            max_amount: 10_000.0,
            login_min_length: Some(3),
            login_max_length: Some(50),
        },
    }
}

fn fiat_deferred() -> ConfigDraft {
    ConfigDraft {
        default_payment_details: Some(
            "Реквізити будуть надіслані після підтвердження заявки".to_owned(),
        ),
        validation: ValidationRules {
            min_amount: 100.0,
            max_amount: 50_000.0,
            login_min_length: Some(3),
            login_max_length: Some(50),
        },
        ..fiat_card()
    }
}

fn crypto_rate() -> ConfigDraft {
    ConfigDraft {
        currency: None,
        commission_rate: None,
        commission_percent: Some(15.0),
        usdt_rate: Some(95.0),
        // Details are sent to the user after the request is confirmed
        default_payment_details: None,
        ui: UiStrings {
            title: "💎 Пополнение Steam".to_owned(),
            subtitle: "Укажи сумму - мы конвертируем в USDT".to_owned(),
            submit_button_text: "✅ Подтвердить".to_owned(),
            cancel_button_text: "❌ Отмена".to_owned(),
        },
        validation: ValidationRules {
            min_amount: 100.0,
            max_amount: 1_000_000.0,
            login_min_length: None,
            login_max_length: None,
        },
    }
}
