//! Explorer state: parameters, animation and hover, with the derived view.

use std::time::Instant;

use log::info;

use crate::animation::{AnimationDriver, ControlLabel};
use crate::catalog::{Segment, SEGMENTS};
use crate::curve::{self, CurvePoint};
use crate::params::{AdoptionParams, AnimationConfig, SATURATION_RANGE, SPEED_RANGE};
use crate::segments::{map_boundaries, SegmentBoundary};

/// Everything derived from the explorer state for one render pass
#[derive(Debug, Clone)]
pub struct ExplorerView<'a> {
    pub params: AdoptionParams,
    pub progress: f64,
    pub control_label: ControlLabel,
    pub hovered: Option<usize>,
    pub points: Vec<CurvePoint>,
    pub boundaries: Vec<SegmentBoundary<'a>>,
}

impl ExplorerView<'_> {
    /// Rightmost visible point, where the marker is drawn
    pub fn endpoint(&self) -> Option<&CurvePoint> {
        self.points.last()
    }

    pub fn progress_percent(&self) -> u32 {
        (self.progress + 0.5).floor() as u32
    }

    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered == Some(index)
    }
}

/// Owned state of one explorer instance
#[derive(Debug, Clone)]
pub struct Explorer {
    params: AdoptionParams,
    driver: AnimationDriver,
    hovered: Option<usize>,
    segments: &'static [Segment],
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(AdoptionParams::default(), AnimationConfig::default())
    }
}

impl Explorer {
    pub fn new(params: AdoptionParams, animation: AnimationConfig) -> Self {
        Self {
            params,
            driver: AnimationDriver::new(animation),
            hovered: None,
            segments: &SEGMENTS,
        }
    }

    pub fn params(&self) -> &AdoptionParams {
        &self.params
    }

    pub fn driver(&self) -> &AnimationDriver {
        &self.driver
    }

    pub fn segments(&self) -> &'static [Segment] {
        self.segments
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn hovered_segment(&self) -> Option<&'static Segment> {
        self.hovered.and_then(|i| self.segments.get(i))
    }

    /// Returns true if the speed changed
    pub fn set_speed(&mut self, speed: f64) -> bool {
        let changed = self.params.set_speed(speed);
        if changed {
            info!(
                "Adoption speed: {} ({})",
                self.params.speed(),
                self.params.speed_label()
            );
        }
        changed
    }

    /// Returns true if the saturation changed
    pub fn set_saturation(&mut self, saturation: f64) -> bool {
        let changed = self.params.set_saturation(saturation);
        if changed {
            info!("Market saturation: {}%", self.params.saturation());
        }
        changed
    }

    /// Keyboard-style adjustment by whole slider steps
    pub fn nudge_speed(&mut self, steps: i32) -> bool {
        let target = SPEED_RANGE.nudge(self.params.speed(), steps);
        self.set_speed(target as f64)
    }

    pub fn nudge_saturation(&mut self, steps: i32) -> bool {
        let target = SATURATION_RANGE.nudge(self.params.saturation(), steps);
        self.set_saturation(target as f64)
    }

    /// Set or clear the hovered segment. Out-of-range indices clear it.
    /// Returns true if the hover changed.
    pub fn hover(&mut self, index: Option<usize>) -> bool {
        let index = index.filter(|&i| i < self.segments.len());
        let changed = index != self.hovered;
        self.hovered = index;
        changed
    }

    pub fn play_pause(&mut self, now: Instant) {
        self.driver.play_pause(now);
    }

    pub fn reset(&mut self) {
        self.driver.reset();
    }

    pub fn seek(&mut self, progress: f64) {
        self.driver.seek(progress);
    }

    pub fn driver_mut(&mut self) -> &mut AnimationDriver {
        &mut self.driver
    }

    /// Recompute curve and boundaries from scratch
    pub fn view(&self) -> ExplorerView<'static> {
        let progress = self.driver.progress();
        let points = curve::generate(&self.params, progress);
        let boundaries = map_boundaries(self.segments, &points, self.params.saturation() as f64);

        ExplorerView {
            params: self.params,
            progress,
            control_label: self.driver.control_label(),
            hovered: self.hovered,
            points,
            boundaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PlaybackState;

    #[test]
    fn test_initial_view() {
        let explorer = Explorer::default();
        let view = explorer.view();

        assert_eq!(view.progress, 0.0);
        assert_eq!(view.control_label, ControlLabel::Play);
        assert_eq!(view.points.len(), 1);
        assert_eq!(view.boundaries.len(), 5);
        assert_eq!(view.endpoint().map(|p| p.month), Some(0));
        assert!(view.hovered.is_none());
    }

    #[test]
    fn test_view_tracks_animation() {
        let now = Instant::now();
        let mut explorer = Explorer::default();
        explorer.play_pause(now);
        for _ in 0..100 {
            explorer.driver_mut().tick();
        }

        let view = explorer.view();
        assert_eq!(view.progress, 50.0);
        assert_eq!(view.control_label, ControlLabel::Pause);
        assert_eq!(view.endpoint().map(|p| p.month), Some(60));
        assert_eq!(view.progress_percent(), 50);
    }

    #[test]
    fn test_parameter_changes_keep_animation_state() {
        let now = Instant::now();
        let mut explorer = Explorer::default();
        explorer.play_pause(now);
        explorer.driver_mut().tick();

        assert!(explorer.set_speed(100.0));
        assert!(explorer.nudge_saturation(1));
        assert_eq!(explorer.params().saturation(), 90);
        assert!(!explorer.nudge_speed(5));
        assert_eq!(explorer.driver().state(), PlaybackState::Running);
        assert_eq!(explorer.driver().progress(), 0.5);
    }

    #[test]
    fn test_hover_rejects_unknown_segment() {
        let mut explorer = Explorer::default();
        assert!(explorer.hover(Some(2)));
        assert_eq!(explorer.hovered_segment().map(|s| s.name), Some("Early Majority"));
        assert!(!explorer.hover(Some(2)));
        assert!(explorer.hover(Some(9)));
        assert!(explorer.hovered().is_none());
    }

    #[test]
    fn test_shares_independent_of_saturation() {
        let mut explorer = Explorer::default();
        for saturation in [40.0, 55.0, 70.0, 85.0, 100.0] {
            explorer.set_saturation(saturation);
            let total: f64 = explorer.view().boundaries.iter().map(|b| b.segment.percent).sum();
            assert!((total - 100.0).abs() < 1e-9);
        }
    }
}
