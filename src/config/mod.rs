//! Configuration module for the top-up WebApp.
//!
//! Handles variant selection, override application and validation of the
//! form configuration consumed by the Telegram WebApp.

mod overrides;
mod resolver;
mod schema;
mod variants;

pub use overrides::{ENV_PREFIX, OverrideMap, RECOGNIZED_KEYS};
pub use resolver::{ValidationError, resolve};
pub use schema::{Commission, ConfigDraft, Configuration, UiStrings, ValidationRules};
pub use variants::Variant;

/// Variant used when a deployment does not pick one explicitly.
pub const DEFAULT_VARIANT: Variant = Variant::FiatCard;
