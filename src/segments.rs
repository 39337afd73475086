//! Maps adopter segments onto the months where the curve crosses them.

use crate::catalog::Segment;
use crate::curve::{CurvePoint, TOTAL_MONTHS};

/// Month range covered by one segment on the current curve
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentBoundary<'a> {
    pub segment: &'a Segment,
    pub start_month: u32,
    pub end_month: u32,
    /// Cumulative share where the segment starts (percent)
    pub start_percent: f64,
    /// Cumulative share where it ends, clamped to saturation (percent)
    pub end_percent: f64,
}

/// First visible month whose adoption reaches `percent`
fn first_month_reaching(points: &[CurvePoint], percent: f64) -> Option<u32> {
    points
        .iter()
        .find(|p| p.adoption >= percent)
        .map(|p| p.month)
}

/// Walk cumulative shares against the curve, in segment order.
///
/// A threshold the visible curve never reaches falls back to month 0 for a
/// start and month 120 for an end. Segment ends are clamped to `saturation`,
/// shares are not rescaled.
///
/// A threshold crossed at month 0 is a real crossing and maps to month 0, not
/// to the fallback. With the default parameters the curve already starts at
/// about 4 %, so the Innovators band (0 to 2.5 %) is empty rather than
/// spanning the whole plot.
pub fn map_boundaries<'a>(
    segments: &'a [Segment],
    points: &[CurvePoint],
    saturation: f64,
) -> Vec<SegmentBoundary<'a>> {
    let mut cumulative = 0.0;

    segments
        .iter()
        .map(|segment| {
            let start_percent = cumulative;
            cumulative += segment.percent;
            let end_percent = cumulative.min(saturation);

            SegmentBoundary {
                segment,
                start_month: first_month_reaching(points, start_percent).unwrap_or(0),
                end_month: first_month_reaching(points, end_percent).unwrap_or(TOTAL_MONTHS),
                start_percent,
                end_percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SEGMENTS;
    use crate::curve::generate;
    use crate::params::AdoptionParams;

    #[test]
    fn test_boundaries_follow_segment_order() {
        let params = AdoptionParams::new(50.0, 100.0);
        let curve = generate(&params, 100.0);
        let boundaries = map_boundaries(&SEGMENTS, &curve, 100.0);

        assert_eq!(boundaries.len(), 5);
        let names: Vec<_> = boundaries.iter().map(|b| b.segment.name).collect();
        assert_eq!(
            names,
            ["Innovators", "Early Adopters", "Early Majority", "Late Majority", "Laggards"]
        );

        assert_eq!(boundaries[0].start_percent, 0.0);
        assert_eq!(boundaries[1].start_percent, 2.5);
        assert_eq!(boundaries[2].start_percent, 16.0);
        assert_eq!(boundaries[3].start_percent, 50.0);
        assert_eq!(boundaries[4].start_percent, 84.0);
        assert_eq!(boundaries[4].end_percent, 100.0);

        // Crossing months move forward with cumulative share
        for pair in boundaries.windows(2) {
            assert!(pair[1].start_month >= pair[0].start_month);
        }
        // 50 % of a 100 % curve is crossed exactly at the midpoint
        assert_eq!(boundaries[3].start_month, 60);
    }

    #[test]
    fn test_unreachable_end_falls_back_to_120() {
        // A logistic never reaches its own asymptote
        let params = AdoptionParams::new(50.0, 100.0);
        let curve = generate(&params, 100.0);
        let boundaries = map_boundaries(&SEGMENTS, &curve, 100.0);
        assert_eq!(boundaries[4].end_month, 120);
    }

    #[test]
    fn test_low_saturation_clamps_ends_and_keeps_shares() {
        let params = AdoptionParams::new(50.0, 40.0);
        let curve = generate(&params, 100.0);
        let boundaries = map_boundaries(&SEGMENTS, &curve, 40.0);

        assert_eq!(boundaries[2].end_percent, 40.0);
        assert_eq!(boundaries[3].end_percent, 40.0);
        assert_eq!(boundaries[4].end_percent, 40.0);

        // Late Majority starts at 50 %, above the ceiling: start falls back to 0
        assert_eq!(boundaries[3].start_month, 0);
        assert_eq!(boundaries[4].start_month, 0);
        assert_eq!(boundaries[4].end_month, 120);
    }

    #[test]
    fn test_partial_reveal_uses_fallbacks() {
        let params = AdoptionParams::default();
        let curve = generate(&params, 25.0); // months 0..=30, peaks near 15.5 %
        let boundaries = map_boundaries(&SEGMENTS, &curve, 85.0);

        // Month 0 already sits above 2.5 %, so the Innovators band is empty
        assert_eq!(boundaries[0].start_month, 0);
        assert_eq!(boundaries[0].end_month, 0);
        // 16 % is not revealed yet
        assert_eq!(boundaries[1].end_month, 120);
        assert_eq!(boundaries[2].start_month, 0);

        let curve = generate(&params, 100.0);
        let boundaries = map_boundaries(&SEGMENTS, &curve, 85.0);
        assert_eq!(boundaries[1].end_month, 31);
        assert_eq!(boundaries[2].start_month, 31);
    }

    #[test]
    fn test_empty_curve_gives_full_width_bands() {
        let boundaries = map_boundaries(&SEGMENTS, &[], 85.0);
        for boundary in &boundaries {
            assert_eq!(boundary.start_month, 0);
            assert_eq!(boundary.end_month, 120);
        }
    }

    #[test]
    fn test_threshold_crossed_at_month_zero_stays_zero() {
        let params = AdoptionParams::default();
        let points = generate(&params, 100.0);
        assert!(points[0].adoption >= SEGMENTS[0].percent);

        let boundaries = map_boundaries(&SEGMENTS, &points, params.saturation() as f64);
        let innovators = &boundaries[0];
        assert_eq!((innovators.start_month, innovators.end_month), (0, 0));
        assert_eq!(boundaries[1].start_month, 0);
    }
}
