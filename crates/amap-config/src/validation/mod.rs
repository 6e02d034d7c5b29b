//! Settings validation.
//!
//! Each section has its own validator; `validate` runs them all and joins
//! every problem into a single `ConfigError`.

mod events;
mod helpers;
mod timing;


use crate::schema::BridgeSettings;
use amap_common::ConfigError;

/// Run all validations, collecting all errors.
pub fn validate(settings: &BridgeSettings) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    timing::validate_timing(&mut errors, settings);
    timing::validate_measure(&mut errors, settings);
    events::validate_tracking(&mut errors, settings);
    events::validate_lifecycle(&mut errors, settings);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
