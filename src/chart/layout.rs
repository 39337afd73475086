//! Scene coordinate system and fixed layout of every element.
//!
//! Scene units follow the chart's 800-wide view box: the plot keeps the
//! classic 60..760 × 40..360 frame with 3 units per adoption percent.

use glam::Vec2;

use crate::curve::TOTAL_MONTHS;
use crate::params::{SliderRange, SATURATION_RANGE, SPEED_RANGE};

pub const SCENE_WIDTH: f32 = 800.0;
pub const SCENE_HEIGHT: f32 = 940.0;

/// Axis-aligned rectangle in scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        (self.x..=self.right()).contains(&point.x) && (self.y..=self.bottom()).contains(&point.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Plot frame mapping (month, adoption %) into scene units
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub units_per_percent: f32,
}

pub const PLOT: PlotArea = PlotArea {
    left: 60.0,
    right: 760.0,
    top: 40.0,
    bottom: 360.0,
    units_per_percent: 3.0,
};

impl PlotArea {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn month_to_x(&self, month: f64) -> f32 {
        self.left + (month / TOTAL_MONTHS as f64) as f32 * self.width()
    }

    pub fn adoption_to_y(&self, percent: f64) -> f32 {
        self.bottom - percent as f32 * self.units_per_percent
    }

    pub fn point(&self, month: f64, percent: f64) -> Vec2 {
        Vec2::new(self.month_to_x(month), self.adoption_to_y(percent))
    }

    /// Full-height column covering `start..end` months
    pub fn band(&self, start_month: u32, end_month: u32) -> Bounds {
        let x1 = self.month_to_x(start_month as f64);
        let x2 = self.month_to_x(end_month as f64);
        Bounds::new(x1, self.top, x2 - x1, self.bottom - self.top)
    }
}

/// Gridline levels (percent)
pub const GRID_PERCENTS: [u32; 5] = [0, 25, 50, 75, 100];

/// Month tick positions
pub const MONTH_TICKS: [u32; 6] = [0, 24, 48, 72, 96, 120];

/// White card behind the chart, controls and legend
pub const CHART_CARD: Bounds = Bounds::new(10.0, 10.0, 780.0, 600.0);

pub const PLAY_BUTTON: Bounds = Bounds::new(60.0, 430.0, 100.0, 36.0);
pub const RESET_BUTTON: Bounds = Bounds::new(170.0, 430.0, 100.0, 36.0);
pub const PROGRESS_TEXT: Vec2 = Vec2::new(290.0, 453.0);
pub const PROGRESS_BAR: Bounds = Bounds::new(400.0, 444.0, 360.0, 8.0);

const LEGEND_TOP: f32 = 490.0;
const LEGEND_CARD_WIDTH: f32 = 132.0;
const LEGEND_CARD_HEIGHT: f32 = 110.0;
const LEGEND_GAP: f32 = 10.0;

/// Legend card for the segment at `index`
pub fn legend_card(index: usize) -> Bounds {
    let x = PLOT.left + index as f32 * (LEGEND_CARD_WIDTH + LEGEND_GAP);
    Bounds::new(x, LEGEND_TOP, LEGEND_CARD_WIDTH, LEGEND_CARD_HEIGHT)
}

pub const PARAMETER_PANEL: Bounds = Bounds::new(60.0, 620.0, 340.0, 300.0);
pub const DETERMINANT_PANEL: Bounds = Bounds::new(420.0, 620.0, 340.0, 300.0);

/// Horizontal slider track with its value range
#[derive(Debug, Clone, Copy)]
pub struct SliderTrack {
    pub x0: f32,
    pub x1: f32,
    pub y: f32,
    pub range: SliderRange,
}

pub const SPEED_SLIDER: SliderTrack = SliderTrack {
    x0: 80.0,
    x1: 380.0,
    y: 700.0,
    range: SPEED_RANGE,
};

pub const SATURATION_SLIDER: SliderTrack = SliderTrack {
    x0: 80.0,
    x1: 380.0,
    y: 776.0,
    range: SATURATION_RANGE,
};

impl SliderTrack {
    /// Clickable area around the track (taller than the drawn line)
    pub fn hit_bounds(&self) -> Bounds {
        Bounds::new(self.x0 - 8.0, self.y - 10.0, self.x1 - self.x0 + 16.0, 20.0)
    }

    pub fn x_for(&self, value: u32) -> f32 {
        self.x0 + self.range.fraction(value) as f32 * (self.x1 - self.x0)
    }

    /// Snapped slider value under a scene x coordinate
    pub fn value_at(&self, x: f32) -> u32 {
        let fraction = (x - self.x0) / (self.x1 - self.x0);
        self.range.value_at_fraction(fraction as f64)
    }
}

/// Letterboxed mapping between window pixels and scene units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub window: Vec2,
    pub scale: f32,
    pub offset: Vec2,
}

impl Viewport {
    /// Fit the whole scene into the window, preserving aspect ratio
    pub fn fit(window_width: u32, window_height: u32) -> Self {
        let window = Vec2::new(window_width.max(1) as f32, window_height.max(1) as f32);
        let scale = (window.x / SCENE_WIDTH).min(window.y / SCENE_HEIGHT);
        let content = Vec2::new(SCENE_WIDTH, SCENE_HEIGHT) * scale;
        let offset = (window - content) / 2.0;
        Self {
            window,
            scale,
            offset,
        }
    }

    /// Window pixel position to scene coordinates; None outside the scene
    pub fn to_scene(&self, pixel: Vec2) -> Option<Vec2> {
        let scene = self.unproject(pixel);
        let inside = (0.0..=SCENE_WIDTH).contains(&scene.x)
            && (0.0..=SCENE_HEIGHT).contains(&scene.y);
        inside.then_some(scene)
    }

    /// Scene position of a pixel, even in the letterbox margins (slider drags)
    pub fn unproject(&self, pixel: Vec2) -> Vec2 {
        (pixel - self.offset) / self.scale
    }

    /// Scale and offset taking scene units to clip space (y up)
    pub fn clip_transform(&self) -> ([f32; 2], [f32; 2]) {
        let scale = [
            2.0 * self.scale / self.window.x,
            -2.0 * self.scale / self.window.y,
        ];
        let offset = [
            2.0 * self.offset.x / self.window.x - 1.0,
            1.0 - 2.0 * self.offset.y / self.window.y,
        ];
        (scale, offset)
    }
}
