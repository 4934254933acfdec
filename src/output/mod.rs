//! Output formatters for operation results.
//!
//! This module renders an [`Outcome`](crate::ops::Outcome) for the caller:
//! - JSON for automation and scripting
//! - Plain (optionally coloured) text for people
//!
//! # Example
//!
//! ```
//! use datadupe::error::ExitCode;
//! use datadupe::ops::Outcome;
//! use datadupe::output::{JsonOutput, TextOutput};
//!
//! let outcome = Outcome::NoDuplicates;
//! println!("{}", TextOutput::new(&outcome, false).render());
//! println!("{}", JsonOutput::new(&outcome, ExitCode::NoDuplicates).to_json().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::JsonOutput;
pub use text::TextOutput;
