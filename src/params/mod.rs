//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (months, percent, milliseconds, pixels)
//! - Documented ranges and meanings
//! - Clamping setters so out-of-range input never reaches the model

mod adoption;
mod animation;
mod render;

// Re-export all types
pub use adoption::{AdoptionParams, SliderRange, SpeedLabel, SATURATION_RANGE, SPEED_RANGE};
pub use animation::AnimationConfig;
pub use render::{RecordingConfig, RenderConfig};
