//! Adoption curve explorer - Rogers' diffusion of innovations as an
//! animated S-curve with adopter segments.

pub mod animation;
pub mod catalog;
pub mod chart;
pub mod cli;
pub mod color;
pub mod curve;
pub mod error;
pub mod explorer;
pub mod panels;
pub mod params;
pub mod rendering;
pub mod segments;

pub use error::{Error, Result};
