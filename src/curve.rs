//! Logistic adoption curve with a progress-gated reveal.
//!
//! The curve itself is static for a given parameter set; animation only
//! truncates how many monthly samples are visible.

use crate::params::AdoptionParams;

/// Length of the modelled time window (months)
pub const TOTAL_MONTHS: u32 = 120;

/// A single monthly sample of the adoption curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub month: u32,
    /// Cumulative adoption (percent of population)
    pub adoption: f64,
}

/// Month at which the logistic reaches half of saturation
pub fn midpoint_month(params: &AdoptionParams) -> f64 {
    TOTAL_MONTHS as f64 / (2.0 * params.speed_factor())
}

/// Months per unit of the logistic argument; smaller means a sharper S
pub fn transition_scale(params: &AdoptionParams) -> f64 {
    TOTAL_MONTHS as f64 / (6.0 * params.speed_factor())
}

/// Adoption percentage at `month` (not gated by progress)
pub fn adoption_at(month: f64, params: &AdoptionParams) -> f64 {
    let x = (month - midpoint_month(params)) / transition_scale(params);
    params.saturation() as f64 / (1.0 + (-x).exp())
}

/// Last month revealed at the given animation progress (percent)
pub fn visible_month_limit(progress: f64) -> f64 {
    progress * TOTAL_MONTHS as f64 / 100.0
}

/// Lazily evaluated, restartable sequence of visible curve points
#[derive(Debug, Clone)]
pub struct CurveIter {
    params: AdoptionParams,
    limit: f64,
    next_month: u32,
}

impl Iterator for CurveIter {
    type Item = CurvePoint;

    fn next(&mut self) -> Option<CurvePoint> {
        let month = self.next_month;
        if month > TOTAL_MONTHS || month as f64 > self.limit {
            return None;
        }
        self.next_month += 1;
        Some(CurvePoint {
            month,
            adoption: adoption_at(month as f64, &self.params),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let last = self.limit.floor().min(TOTAL_MONTHS as f64);
        let remaining = if last < self.next_month as f64 {
            0
        } else {
            (last as u32 - self.next_month + 1) as usize
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CurveIter {}

/// Visible points for the given parameters and progress (percent)
pub fn points(params: &AdoptionParams, progress: f64) -> CurveIter {
    CurveIter {
        params: *params,
        limit: visible_month_limit(progress),
        next_month: 0,
    }
}

/// Collected form of [`points`]
pub fn generate(params: &AdoptionParams, progress: f64) -> Vec<CurvePoint> {
    points(params, progress).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_progress_yields_every_month() {
        let curve = generate(&AdoptionParams::default(), 100.0);
        assert_eq!(curve.len(), 121);
        assert_eq!(curve.first().map(|p| p.month), Some(0));
        assert_eq!(curve.last().map(|p| p.month), Some(120));
    }

    #[test]
    fn test_progress_truncates_reveal() {
        let params = AdoptionParams::default();
        assert_eq!(generate(&params, 0.0).len(), 1); // month 0 only
        assert_eq!(generate(&params, 50.0).len(), 61);
        // 0.5 % of 120 months = 0.6, still only month 0
        assert_eq!(generate(&params, 0.5).len(), 1);
        assert_eq!(generate(&params, 1.0).len(), 2);
        assert_eq!(points(&params, 33.0).len(), generate(&params, 33.0).len());
    }

    #[test]
    fn test_monotonic_and_bounded() {
        for speed in [10.0, 25.0, 50.0, 73.0, 100.0] {
            for saturation in [40.0, 65.0, 85.0, 100.0] {
                let params = AdoptionParams::new(speed, saturation);
                let curve = generate(&params, 100.0);
                for pair in curve.windows(2) {
                    assert!(
                        pair[1].adoption >= pair[0].adoption,
                        "curve decreased at month {} (speed {}, saturation {})",
                        pair[1].month,
                        speed,
                        saturation
                    );
                }
                for point in &curve {
                    assert!(point.adoption >= 0.0);
                    assert!(point.adoption <= saturation);
                }
            }
        }
    }

    #[test]
    fn test_default_midpoint_near_month_60() {
        let params = AdoptionParams::new(50.0, 85.0);
        assert_eq!(midpoint_month(&params), 60.0);
        assert!((adoption_at(60.0, &params) - 42.5).abs() < 1e-9);

        let curve = generate(&params, 100.0);
        let first_half = curve.iter().find(|p| p.adoption >= 42.5).map(|p| p.month);
        assert_eq!(first_half, Some(60));
    }

    #[test]
    fn test_doubling_speed_halves_transition_window() {
        let base = AdoptionParams::new(50.0, 85.0);
        let fast = AdoptionParams::new(100.0, 85.0);
        assert!((transition_scale(&fast) * 2.0 - transition_scale(&base)).abs() < 1e-9);
        assert_eq!(midpoint_month(&fast), 30.0);
    }

    #[test]
    fn test_iterator_is_restartable() {
        let iter = points(&AdoptionParams::default(), 40.0);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }
}
