//! Adoption model parameters exposed as sliders.

use std::fmt;

/// Integer slider range with a fixed step, anchored at `min`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

/// Adoption speed slider (dimensionless, 50 = reference speed)
pub const SPEED_RANGE: SliderRange = SliderRange {
    min: 10,
    max: 100,
    step: 1,
};

/// Market saturation slider (percent of the population)
pub const SATURATION_RANGE: SliderRange = SliderRange {
    min: 40,
    max: 100,
    step: 5,
};

impl SliderRange {
    /// Clamp to the range and round to the nearest step.
    pub fn snap(&self, value: f64) -> u32 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min as f64, self.max as f64);
        let steps = ((clamped - self.min as f64) / self.step as f64).round() as u32;
        (self.min + steps * self.step).min(self.max)
    }

    /// Move `current` by a number of steps, staying inside the range
    pub fn nudge(&self, current: u32, steps: i32) -> u32 {
        let target = current as f64 + steps as f64 * self.step as f64;
        self.snap(target)
    }

    /// Position of `value` along the track, 0.0 at `min` and 1.0 at `max`
    pub fn fraction(&self, value: u32) -> f64 {
        let span = (self.max - self.min) as f64;
        ((value.clamp(self.min, self.max) - self.min) as f64 / span).clamp(0.0, 1.0)
    }

    /// Inverse of [`SliderRange::fraction`], snapped to the step grid
    pub fn value_at_fraction(&self, fraction: f64) -> u32 {
        let span = (self.max - self.min) as f64;
        self.snap(self.min as f64 + fraction.clamp(0.0, 1.0) * span)
    }
}

/// Qualitative label shown next to the speed slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedLabel {
    Slow,
    Moderate,
    Fast,
}

impl fmt::Display for SpeedLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SpeedLabel::Slow => "Slow",
            SpeedLabel::Moderate => "Moderate",
            SpeedLabel::Fast => "Fast",
        };
        f.write_str(label)
    }
}

/// User-adjustable curve parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdoptionParams {
    /// Adoption speed, 10..=100 in steps of 1.
    /// 50 centres the S-curve on month 60; 100 centres it on month 30.
    speed: u32,

    /// Asymptotic adoption ceiling (percent), 40..=100 in steps of 5
    saturation: u32,
}

impl Default for AdoptionParams {
    fn default() -> Self {
        Self {
            speed: 50,
            saturation: 85,
        }
    }
}

impl AdoptionParams {
    /// Build parameters from raw values, clamping and snapping both
    pub fn new(speed: f64, saturation: f64) -> Self {
        Self {
            speed: SPEED_RANGE.snap(speed),
            saturation: SATURATION_RANGE.snap(saturation),
        }
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn saturation(&self) -> u32 {
        self.saturation
    }

    /// Set speed; returns true if the stored value changed
    pub fn set_speed(&mut self, speed: f64) -> bool {
        let snapped = SPEED_RANGE.snap(speed);
        let changed = snapped != self.speed;
        self.speed = snapped;
        changed
    }

    /// Set saturation; returns true if the stored value changed
    pub fn set_saturation(&mut self, saturation: f64) -> bool {
        let snapped = SATURATION_RANGE.snap(saturation);
        let changed = snapped != self.saturation;
        self.saturation = snapped;
        changed
    }

    /// Speed multiplier relative to the reference speed of 50
    pub fn speed_factor(&self) -> f64 {
        self.speed as f64 / 50.0
    }

    pub fn speed_label(&self) -> SpeedLabel {
        match self.speed {
            s if s < 40 => SpeedLabel::Slow,
            s if s < 70 => SpeedLabel::Moderate,
            _ => SpeedLabel::Fast,
        }
    }

    /// Rough months until the curve approaches saturation, as quoted in the
    /// scenario line of the parameter panel
    pub fn approximate_months_to_saturation(&self) -> u32 {
        (120.0 / self.speed_factor()).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_initial_sliders() {
        let params = AdoptionParams::default();
        assert_eq!(params.speed(), 50);
        assert_eq!(params.saturation(), 85);
        assert_eq!(params.speed_label(), SpeedLabel::Moderate);
        assert_eq!(params.approximate_months_to_saturation(), 120);
    }

    #[test]
    fn test_setters_clamp_and_snap() {
        let mut params = AdoptionParams::default();

        assert!(params.set_speed(250.0));
        assert_eq!(params.speed(), 100);
        params.set_speed(-3.0);
        assert_eq!(params.speed(), 10);
        params.set_speed(f64::NAN);
        assert_eq!(params.speed(), 10);

        params.set_saturation(87.0);
        assert_eq!(params.saturation(), 85);
        params.set_saturation(88.0);
        assert_eq!(params.saturation(), 90);
        params.set_saturation(12.0);
        assert_eq!(params.saturation(), 40);
        assert!(!params.set_saturation(40.0));
    }

    #[test]
    fn test_speed_label_thresholds() {
        let label = |speed| AdoptionParams::new(speed, 85.0).speed_label();
        assert_eq!(label(10.0), SpeedLabel::Slow);
        assert_eq!(label(39.0), SpeedLabel::Slow);
        assert_eq!(label(40.0), SpeedLabel::Moderate);
        assert_eq!(label(69.0), SpeedLabel::Moderate);
        assert_eq!(label(70.0), SpeedLabel::Fast);
        assert_eq!(label(100.0).to_string(), "Fast");
    }

    #[test]
    fn test_months_to_saturation_scales_inversely_with_speed() {
        assert_eq!(AdoptionParams::new(100.0, 85.0).approximate_months_to_saturation(), 60);
        assert_eq!(AdoptionParams::new(10.0, 85.0).approximate_months_to_saturation(), 600);
        assert_eq!(AdoptionParams::new(70.0, 85.0).approximate_months_to_saturation(), 86);
    }

    #[test]
    fn test_slider_fraction_round_trip_on_grid() {
        assert_eq!(SATURATION_RANGE.fraction(40), 0.0);
        assert_eq!(SATURATION_RANGE.fraction(100), 1.0);
        assert_eq!(SATURATION_RANGE.value_at_fraction(0.5), 70);
        assert_eq!(SATURATION_RANGE.value_at_fraction(1.7), 100);
        assert_eq!(SPEED_RANGE.nudge(100, 1), 100);
        assert_eq!(SATURATION_RANGE.nudge(85, -1), 80);
    }
}
