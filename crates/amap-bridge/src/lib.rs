//! Bridge between hybrid application code and the native AMap plugin.
//!
//! [`AMapPlugin`] creates [`AMap`] instances, each laid out beneath a page
//! element. While an instance lives, its element's bounds are forwarded to
//! the native view and native events are routed back to the instance they
//! name.
//!
//! The native side and the page are reached through the
//! [`NativeTransport`] and [`HostPage`] traits; the `testing` feature
//! provides in-memory implementations of both.

pub mod focus;
pub mod host;
mod map;
pub mod measure;
mod plugin;
pub mod router;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tracker;
pub mod transport;

pub use host::{Callback, HostElement, HostPage, ListenerHandle};
pub use map::AMap;
pub use measure::{measure_bounds, Measurement};
pub use plugin::{AMapPlugin, CreateOptions};
pub use router::{map_listener, on_ready, EventRouter, MapListener, ReadyCallback};
pub use tracker::{ResizeTracker, TrackerContext, ViewportChange, ViewportTracker};
pub use transport::{methods, NativeTransport};
