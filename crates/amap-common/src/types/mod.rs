mod color;
mod geo;
mod map;
mod platform;

pub use color::*;
pub use geo::*;
pub use map::*;
pub use platform::*;
