use super::helpers::validate_range;
use crate::schema::BridgeSettings;

pub(super) fn validate_timing(errors: &mut Vec<String>, settings: &BridgeSettings) {
    let t = &settings.timing;
    validate_range(errors, "timing.native_settle_ms", t.native_settle_ms, 0, 5000);
    validate_range(errors, "timing.orientation_settle_ms", t.orientation_settle_ms, 0, 5000);
    validate_range(errors, "timing.lifecycle_settle_ms", t.lifecycle_settle_ms, 0, 5000);
}

pub(super) fn validate_measure(errors: &mut Vec<String>, settings: &BridgeSettings) {
    let m = &settings.measure;
    validate_range(errors, "measure.interval_ms", m.interval_ms, 1, 5000);
    validate_range(errors, "measure.max_attempts", u64::from(m.max_attempts), 1, 600);
}
