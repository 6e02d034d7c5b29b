use super::helpers::{validate_names, validate_non_blank};
use crate::schema::BridgeSettings;

pub(super) fn validate_tracking(errors: &mut Vec<String>, settings: &BridgeSettings) {
    let t = &settings.tracking;
    if t.scroll_events.is_empty() {
        errors.push("tracking.scroll_events must name at least one event".into());
    }
    validate_names(errors, "tracking.scroll_events", &t.scroll_events);
    validate_non_blank(errors, "tracking.scroll_container_tag", &t.scroll_container_tag);
    validate_non_blank(
        errors,
        "tracking.orientation_fallback_event",
        &t.orientation_fallback_event,
    );
}

pub(super) fn validate_lifecycle(errors: &mut Vec<String>, settings: &BridgeSettings) {
    let l = &settings.lifecycle;
    validate_non_blank(errors, "lifecycle.container_selector", &l.container_selector);
    validate_names(errors, "lifecycle.enter_events", &l.enter_events);
}
