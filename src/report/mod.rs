//! Dashboard rendering.
//!
//! This module renders session views as text, Markdown or JSON.

pub mod generator;

pub use generator::*;
