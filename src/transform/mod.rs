//! Table transforms.

pub mod scale;

pub use scale::{factor, scale, ScaleOutcome};
