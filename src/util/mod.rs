//! Shared utility helpers.

pub mod error;
pub mod math;

pub use error::{DetectError, DetectResult};
pub use math::{to_polar, PolarPoint};
