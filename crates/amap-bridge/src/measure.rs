//! Element measurement with retry.
//!
//! An element inserted into the page may not have been laid out by the time
//! the map is created. Measurement polls until layout assigns a width or the
//! attempt budget runs out.

use amap_common::Rect;
use amap_config::MeasureConfig;
use tracing::{debug, warn};

use crate::host::HostElement;

/// Outcome of [`measure_bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Last rectangle read.
    pub rect: Rect,
    /// Reads performed, the first one included.
    pub attempts: u32,
    /// The budget ran out while the width was still zero.
    pub timed_out: bool,
}

/// Read the element's bounds, retrying while its width is zero.
///
/// Never fails: on exhaustion a warning is logged and the last (zero-width)
/// read is returned.
pub async fn measure_bounds(element: &dyn HostElement, config: &MeasureConfig) -> Measurement {
    let max_attempts = config.max_attempts.max(1);
    let mut rect = element.bounding_rect();
    let mut attempts = 1;

    while !rect.has_width() && attempts < max_attempts {
        tokio::time::sleep(config.interval()).await;
        rect = element.bounding_rect();
        attempts += 1;
    }

    let timed_out = !rect.has_width();
    if timed_out {
        warn!(attempts, "map size could not be determined, using last measured bounds");
    } else if attempts > 1 {
        debug!(attempts, width = rect.width, height = rect.height, "element laid out");
    }

    Measurement {
        rect,
        attempts,
        timed_out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeElement;
    use std::time::Duration;

    fn config() -> MeasureConfig {
        MeasureConfig::default()
    }

    #[tokio::test(start_paused = true)]
    async fn laid_out_element_is_read_once() {
        let element = FakeElement::new("div");
        element.set_rect(Rect::new(0.0, 10.0, 320.0, 240.0));

        let m = measure_bounds(element.as_ref(), &config()).await;
        assert_eq!(m.rect, Rect::new(0.0, 10.0, 320.0, 240.0));
        assert_eq!(m.attempts, 1);
        assert!(!m.timed_out);
        assert_eq!(element.reads(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_nonzero_read() {
        let element = FakeElement::new("div");
        let zero = Rect::default();
        element.script_rects([zero, zero, zero, zero, Rect::new(0.0, 0.0, 100.0, 50.0)]);

        let start = tokio::time::Instant::now();
        let m = measure_bounds(element.as_ref(), &config()).await;
        assert_eq!(m.rect.width, 100.0);
        assert_eq!(m.attempts, 5);
        assert!(!m.timed_out);
        assert_eq!(element.reads(), 5);
        assert_eq!(start.elapsed(), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_budget() {
        let element = FakeElement::new("div");
        element.set_rect(Rect::new(5.0, 5.0, 0.0, 80.0));

        let start = tokio::time::Instant::now();
        let m = measure_bounds(element.as_ref(), &config()).await;
        assert_eq!(m.attempts, 30);
        assert!(m.timed_out);
        assert_eq!(m.rect.width, 0.0);
        assert_eq!(element.reads(), 30);
        assert_eq!(start.elapsed(), Duration::from_millis(2900));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_height_alone_does_not_retry() {
        let element = FakeElement::new("div");
        element.set_rect(Rect::new(0.0, 0.0, 100.0, 0.0));

        let m = measure_bounds(element.as_ref(), &config()).await;
        assert_eq!(m.attempts, 1);
        assert!(!m.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_budget_is_honored() {
        let element = FakeElement::new("div");
        let config = MeasureConfig {
            interval_ms: 10,
            max_attempts: 3,
        };

        let m = measure_bounds(element.as_ref(), &config).await;
        assert_eq!(m.attempts, 3);
        assert!(m.timed_out);
        assert_eq!(element.reads(), 3);
    }
}
