//! Platform Abstraction Layer
//!
//! Each platform has its own implementation behind cfg attributes.

pub mod window_enumerator;

pub use window_enumerator::{enumerate_windows, AvailableWindow};
