/// Default settings file with every key commented out at its default.
pub fn default_settings_toml() -> &'static str {
    r##"# AMap bridge settings
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[timing]
# native_settle_ms = 200        # 0-5000, wait before the native create call
# orientation_settle_ms = 500   # 0-5000, wait after rotation before re-measuring
# lifecycle_settle_ms = 100     # 0-5000, wait after a page enter event

[measure]
# interval_ms = 100             # 1-5000
# max_attempts = 30             # 1-600, first read included

[tracking]
# scroll_events = ["ionScroll", "scroll", "resize"]
# scroll_container_tag = "ion-content"
# orientation_fallback_event = "orientationchange"

[lifecycle]
# container_selector = ".ion-page"
# enter_events = ["ionViewWillEnter", "ionViewDidEnter"]

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
}
