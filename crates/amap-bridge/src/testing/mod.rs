//! In-memory stand-ins for the native plugin and the hosting page.
//!
//! Enabled with the `testing` feature. Callbacks registered on the fakes run
//! synchronously on whichever task triggers them, outside any internal lock.

mod page;
mod transport;

pub use page::{FakeElement, FakePage};
pub use transport::{RecordedCall, RecordingTransport};
