//! Pure scene builder: explorer view in, drawing primitives and hit regions out.

use glam::Vec2;

use crate::catalog::{Segment, DETERMINANTS};
use crate::color::Rgb;
use crate::explorer::ExplorerView;
use crate::panels;

use super::layout::{
    legend_card, Bounds, SliderTrack, CHART_CARD, DETERMINANT_PANEL, GRID_PERCENTS, MONTH_TICKS,
    PARAMETER_PANEL, PLAY_BUTTON, PLOT, PROGRESS_BAR, PROGRESS_TEXT, RESET_BUTTON,
    SATURATION_SLIDER, SCENE_HEIGHT, SCENE_WIDTH, SPEED_SLIDER,
};

// Palette (slate scale plus accents)
const GRID: Rgb = Rgb(0xe5e7eb);
const AXIS: Rgb = Rgb(0x64748b);
const TICK_TEXT: Rgb = Rgb(0x64748b);
const TITLE_TEXT: Rgb = Rgb(0x334155);
const HEADING_TEXT: Rgb = Rgb(0x1e293b);
const BODY_TEXT: Rgb = Rgb(0x475569);
const CURVE: Rgb = Rgb(0x1e293b);
const MARKER: Rgb = Rgb(0x3b82f6);
const PRIMARY_BUTTON: Rgb = Rgb(0x2563eb);
const SECONDARY_BUTTON: Rgb = Rgb(0xe2e8f0);
const PANEL_ROW: Rgb = Rgb(0xf8fafc);
const INSIGHT_FILL: Rgb = Rgb(0xeff6ff);
const INSIGHT_BORDER: Rgb = Rgb(0xbfdbfe);
const INSIGHT_TEXT: Rgb = Rgb(0x1e3a8a);

const BAND_OPACITY: f32 = 0.05;
const BAND_OPACITY_HOVERED: f32 = 0.15;
const CURVE_WIDTH: f32 = 3.0;
const MARKER_RADIUS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgb,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: Vec2,
    pub text: String,
    pub size: f32,
    pub anchor: TextAnchor,
    pub color: Rgb,
    pub bold: bool,
    /// Clockwise rotation around `position` (degrees)
    pub rotation_deg: f32,
}

impl Label {
    fn new(position: Vec2, text: impl Into<String>, size: f32, color: Rgb) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            anchor: TextAnchor::Start,
            color,
            bold: false,
            rotation_deg: 0.0,
        }
    }

    fn anchored(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn rotated(mut self, degrees: f32) -> Self {
        self.rotation_deg = degrees;
        self
    }
}

/// Drawing primitive in scene units
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        bounds: Bounds,
        fill: Rgb,
        opacity: f32,
        corner_radius: f32,
        stroke: Option<Stroke>,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    /// Open path with round caps and joins
    Polyline { points: Vec<Vec2>, stroke: Stroke },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Rgb,
        opacity: f32,
    },
    Text(Label),
}

/// What a pointer over a region interacts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Segment band or legend card, by segment index
    Segment(usize),
    PlayPause,
    Reset,
    SpeedSlider,
    SaturationSlider,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub bounds: Bounds,
    pub target: HitTarget,
}

/// Complete frame description, back to front
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    pub shapes: Vec<Shape>,
    pub hit_regions: Vec<HitRegion>,
}

impl Scene {
    /// Topmost region under `point`
    pub fn hit_test(&self, point: Vec2) -> Option<HitTarget> {
        self.hit_regions
            .iter()
            .rev()
            .find(|region| region.bounds.contains(point))
            .map(|region| region.target)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Text(label) => Some(label),
            _ => None,
        })
    }

    fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    fn text(&mut self, label: Label) {
        self.shapes.push(Shape::Text(label));
    }

    fn fill_rect(&mut self, bounds: Bounds, fill: Rgb) {
        self.push(Shape::Rect {
            bounds,
            fill,
            opacity: 1.0,
            corner_radius: 0.0,
            stroke: None,
        });
    }

    fn card(&mut self, bounds: Bounds, fill: Rgb, border: Option<Stroke>) {
        self.push(Shape::Rect {
            bounds,
            fill,
            opacity: 1.0,
            corner_radius: 8.0,
            stroke: border,
        });
    }

    fn hit(&mut self, bounds: Bounds, target: HitTarget) {
        self.hit_regions.push(HitRegion { bounds, target });
    }
}

/// Build the full scene for one render pass
pub fn build_scene(view: &ExplorerView) -> Scene {
    let mut scene = Scene {
        width: SCENE_WIDTH,
        height: SCENE_HEIGHT,
        ..Default::default()
    };

    scene.card(CHART_CARD, Rgb::WHITE, None);
    plot_grid(&mut scene);
    segment_bands(&mut scene, view);
    adoption_curve(&mut scene, view);
    axes(&mut scene);
    controls(&mut scene, view);
    legend(&mut scene, view);
    parameter_panel(&mut scene, view);
    determinant_panel(&mut scene);

    scene
}

fn plot_grid(scene: &mut Scene) {
    for percent in GRID_PERCENTS {
        let y = PLOT.adoption_to_y(percent as f64);
        scene.push(Shape::Line {
            from: Vec2::new(PLOT.left, y),
            to: Vec2::new(PLOT.right, y),
            stroke: Stroke {
                color: GRID,
                width: 1.0,
            },
        });
        scene.text(
            Label::new(Vec2::new(45.0, y + 5.0), format!("{}%", percent), 12.0, TICK_TEXT)
                .anchored(TextAnchor::End),
        );
    }

    for month in MONTH_TICKS {
        scene.text(
            Label::new(
                Vec2::new(PLOT.month_to_x(month as f64), 385.0),
                format!("{}mo", month),
                12.0,
                TICK_TEXT,
            )
            .anchored(TextAnchor::Middle),
        );
    }
}

fn segment_bands(scene: &mut Scene, view: &ExplorerView) {
    for (index, boundary) in view.boundaries.iter().enumerate() {
        let bounds = PLOT.band(boundary.start_month, boundary.end_month);
        let hovered = view.is_hovered(index);

        if !bounds.is_empty() {
            scene.push(Shape::Rect {
                bounds,
                fill: boundary.segment.color,
                opacity: if hovered {
                    BAND_OPACITY_HOVERED
                } else {
                    BAND_OPACITY
                },
                corner_radius: 0.0,
                stroke: None,
            });
            scene.hit(bounds, HitTarget::Segment(index));
        }

        if hovered {
            scene.text(
                Label::new(
                    Vec2::new(bounds.x + bounds.width / 2.0, 30.0),
                    boundary.segment.name,
                    14.0,
                    boundary.segment.color,
                )
                .anchored(TextAnchor::Middle)
                .bold(),
            );
        }
    }
}

fn adoption_curve(scene: &mut Scene, view: &ExplorerView) {
    let points: Vec<Vec2> = view
        .points
        .iter()
        .map(|p| PLOT.point(p.month as f64, p.adoption))
        .collect();

    if let Some(&last) = points.last() {
        scene.push(Shape::Polyline {
            points,
            stroke: Stroke {
                color: CURVE,
                width: CURVE_WIDTH,
            },
        });
        scene.push(Shape::Circle {
            center: last,
            radius: MARKER_RADIUS,
            fill: MARKER,
            opacity: 1.0,
        });
    }
}

fn axes(scene: &mut Scene) {
    let axis = Stroke {
        color: AXIS,
        width: 2.0,
    };
    scene.push(Shape::Line {
        from: Vec2::new(PLOT.left, PLOT.top),
        to: Vec2::new(PLOT.left, PLOT.bottom),
        stroke: axis,
    });
    scene.push(Shape::Line {
        from: Vec2::new(PLOT.left, PLOT.bottom),
        to: Vec2::new(PLOT.right, PLOT.bottom),
        stroke: axis,
    });

    scene.text(
        Label::new(Vec2::new(400.0, 410.0), "Time (months)", 14.0, TITLE_TEXT)
            .anchored(TextAnchor::Middle),
    );
    scene.text(
        Label::new(Vec2::new(20.0, 200.0), "Market Adoption (%)", 14.0, TITLE_TEXT)
            .anchored(TextAnchor::Middle)
            .rotated(-90.0),
    );
}

fn button(
    scene: &mut Scene,
    bounds: Bounds,
    fill: Rgb,
    text: &str,
    text_color: Rgb,
    target: HitTarget,
) {
    scene.card(bounds, fill, None);
    let center = bounds.center();
    scene.text(
        Label::new(Vec2::new(center.x, center.y + 5.0), text, 14.0, text_color)
            .anchored(TextAnchor::Middle)
            .bold(),
    );
    scene.hit(bounds, target);
}

fn controls(scene: &mut Scene, view: &ExplorerView) {
    button(
        scene,
        PLAY_BUTTON,
        PRIMARY_BUTTON,
        view.control_label.as_str(),
        Rgb::WHITE,
        HitTarget::PlayPause,
    );
    button(
        scene,
        RESET_BUTTON,
        SECONDARY_BUTTON,
        "Reset",
        TITLE_TEXT,
        HitTarget::Reset,
    );

    scene.text(Label::new(
        PROGRESS_TEXT,
        format!("Progress: {}%", view.progress_percent()),
        13.0,
        BODY_TEXT,
    ));

    scene.fill_rect(PROGRESS_BAR, SECONDARY_BUTTON);
    let filled = PROGRESS_BAR.width * (view.progress / 100.0).clamp(0.0, 1.0) as f32;
    if filled > 0.0 {
        scene.fill_rect(
            Bounds::new(PROGRESS_BAR.x, PROGRESS_BAR.y, filled, PROGRESS_BAR.height),
            PRIMARY_BUTTON,
        );
    }
}

fn legend(scene: &mut Scene, view: &ExplorerView) {
    for (index, boundary) in view.boundaries.iter().enumerate() {
        let segment: &Segment = boundary.segment;
        let bounds = legend_card(index);
        let hovered = view.is_hovered(index);

        let (fill, border) = if hovered {
            (segment.color.tint(0.06), segment.color)
        } else {
            (Rgb::WHITE, GRID)
        };
        scene.card(
            bounds,
            fill,
            Some(Stroke {
                color: border,
                width: 2.0,
            }),
        );
        scene.push(Shape::Circle {
            center: Vec2::new(bounds.x + 16.0, bounds.y + 18.0),
            radius: 5.0,
            fill: segment.color,
            opacity: 1.0,
        });
        scene.text(
            Label::new(
                Vec2::new(bounds.x + 28.0, bounds.y + 22.0),
                segment.name,
                11.0,
                TITLE_TEXT,
            )
            .bold(),
        );
        scene.text(Label::new(
            Vec2::new(bounds.x + 10.0, bounds.y + 42.0),
            format!("{}%", segment.percent),
            11.0,
            TICK_TEXT,
        ));
        for (line_no, line) in panels::wrap(segment.description, 24).iter().enumerate() {
            scene.text(Label::new(
                Vec2::new(bounds.x + 10.0, bounds.y + 62.0 + line_no as f32 * 14.0),
                line.as_str(),
                10.0,
                BODY_TEXT,
            ));
        }
        scene.hit(bounds, HitTarget::Segment(index));
    }
}

fn slider(scene: &mut Scene, track: &SliderTrack, value: u32, target: HitTarget) {
    let knob_x = track.x_for(value);
    scene.fill_rect(
        Bounds::new(track.x0, track.y - 3.0, track.x1 - track.x0, 6.0),
        SECONDARY_BUTTON,
    );
    scene.fill_rect(
        Bounds::new(track.x0, track.y - 3.0, knob_x - track.x0, 6.0),
        PRIMARY_BUTTON,
    );
    scene.push(Shape::Circle {
        center: Vec2::new(knob_x, track.y),
        radius: 8.0,
        fill: PRIMARY_BUTTON,
        opacity: 1.0,
    });
    scene.hit(track.hit_bounds(), target);
}

fn parameter_panel(scene: &mut Scene, view: &ExplorerView) {
    let panel = PARAMETER_PANEL;
    let left = panel.x + 20.0;
    let right = panel.right() - 20.0;
    scene.card(panel, Rgb::WHITE, None);

    scene.text(
        Label::new(
            Vec2::new(left, panel.y + 28.0),
            panels::PARAMETER_HEADING,
            16.0,
            HEADING_TEXT,
        )
        .bold(),
    );

    let speed_label = view.params.speed_label().to_string();
    let saturation_label = format!("{}%", view.params.saturation());
    let rows = [
        (
            &SPEED_SLIDER,
            panels::SPEED_LABEL,
            speed_label,
            panels::SPEED_HELP,
            view.params.speed(),
            HitTarget::SpeedSlider,
        ),
        (
            &SATURATION_SLIDER,
            panels::SATURATION_LABEL,
            saturation_label,
            panels::SATURATION_HELP,
            view.params.saturation(),
            HitTarget::SaturationSlider,
        ),
    ];

    for (track, name, value_label, help, value, target) in rows {
        scene.text(
            Label::new(Vec2::new(left, track.y - 20.0), name, 13.0, TITLE_TEXT).bold(),
        );
        scene.text(
            Label::new(Vec2::new(right, track.y - 20.0), value_label, 13.0, BODY_TEXT)
                .anchored(TextAnchor::End),
        );
        slider(scene, track, value, target);
        scene.text(Label::new(Vec2::new(left, track.y + 22.0), help, 10.0, TICK_TEXT));
    }

    let divider_y = SATURATION_SLIDER.y + 39.0;
    scene.push(Shape::Line {
        from: Vec2::new(left, divider_y),
        to: Vec2::new(right, divider_y),
        stroke: Stroke {
            color: GRID,
            width: 1.0,
        },
    });

    let scenario = panels::scenario_line(&view.params);
    for (line_no, line) in panels::wrap(&scenario, 48).iter().enumerate() {
        scene.text(Label::new(
            Vec2::new(left, divider_y + 23.0 + line_no as f32 * 18.0),
            line.as_str(),
            12.0,
            BODY_TEXT,
        ));
    }
}

fn determinant_panel(scene: &mut Scene) {
    let panel = DETERMINANT_PANEL;
    let left = panel.x + 20.0;
    let inner_width = panel.width - 40.0;
    scene.card(panel, Rgb::WHITE, None);

    scene.text(
        Label::new(
            Vec2::new(left, panel.y + 28.0),
            panels::DETERMINANT_HEADING,
            16.0,
            HEADING_TEXT,
        )
        .bold(),
    );
    scene.text(Label::new(
        Vec2::new(left, panel.y + 46.0),
        panels::DETERMINANT_SUBHEADING,
        10.0,
        BODY_TEXT,
    ));

    for (row, determinant) in DETERMINANTS.iter().enumerate() {
        let top = panel.y + 56.0 + row as f32 * 34.0;
        scene.card(
            Bounds::new(left, top, inner_width, 30.0),
            PANEL_ROW,
            Some(Stroke {
                color: GRID,
                width: 1.0,
            }),
        );
        let badge = Vec2::new(left + 15.0, top + 15.0);
        scene.push(Shape::Circle {
            center: badge,
            radius: 9.0,
            fill: determinant.impact.color(),
            opacity: 1.0,
        });
        scene.text(
            Label::new(
                Vec2::new(badge.x, badge.y + 4.0),
                determinant.impact.symbol(),
                11.0,
                Rgb::WHITE,
            )
            .anchored(TextAnchor::Middle)
            .bold(),
        );
        scene.text(
            Label::new(
                Vec2::new(left + 32.0, top + 13.0),
                determinant.name,
                12.0,
                HEADING_TEXT,
            )
            .bold(),
        );
        scene.text(Label::new(
            Vec2::new(left + 32.0, top + 25.0),
            determinant.description,
            10.0,
            BODY_TEXT,
        ));
    }

    let insight = Bounds::new(left, panel.y + 230.0, inner_width, 56.0);
    scene.card(
        insight,
        INSIGHT_FILL,
        Some(Stroke {
            color: INSIGHT_BORDER,
            width: 1.0,
        }),
    );
    for (line_no, line) in panels::wrap(panels::KEY_INSIGHT, 58).iter().enumerate() {
        scene.text(Label::new(
            Vec2::new(insight.x + 10.0, insight.y + 17.0 + line_no as f32 * 13.0),
            line.as_str(),
            9.5,
            INSIGHT_TEXT,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::Explorer;
    use std::time::Instant;

    fn count_shapes(scene: &Scene, predicate: impl Fn(&Shape) -> bool) -> usize {
        scene.shapes.iter().filter(|s| predicate(s)).count()
    }

    #[test]
    fn test_initial_scene_has_marker_and_gridlines() {
        let explorer = Explorer::default();
        let scene = build_scene(&explorer.view());

        let markers = count_shapes(&scene, |s| {
            matches!(s, Shape::Circle { radius, .. } if *radius == MARKER_RADIUS)
        });
        assert_eq!(markers, 1);

        let gridlines = count_shapes(&scene, |s| {
            matches!(s, Shape::Line { stroke, .. } if stroke.color == GRID && stroke.width == 1.0)
        });
        // Five gridlines plus the divider in the parameter panel
        assert_eq!(gridlines, 6);

        let tick_labels: Vec<_> = scene
            .labels()
            .filter(|l| l.text.ends_with("mo"))
            .map(|l| l.text.clone())
            .collect();
        assert_eq!(tick_labels, ["0mo", "24mo", "48mo", "72mo", "96mo", "120mo"]);
    }

    #[test]
    fn test_curve_ends_at_marker() {
        let mut explorer = Explorer::default();
        explorer.seek(50.0);
        let scene = build_scene(&explorer.view());

        let polyline = scene.shapes.iter().find_map(|s| match s {
            Shape::Polyline { points, .. } => Some(points.clone()),
            _ => None,
        });
        let points = polyline.expect("curve drawn");
        assert_eq!(points.len(), 61);
        assert_eq!(points.last().map(|p| p.x), Some(410.0));

        let marker = scene.shapes.iter().find_map(|s| match s {
            Shape::Circle { center, radius, .. } if *radius == MARKER_RADIUS => Some(*center),
            _ => None,
        });
        assert_eq!(marker, points.last().copied());
    }

    #[test]
    fn test_hover_raises_band_opacity_and_labels_it() {
        let mut explorer = Explorer::default();
        explorer.seek(100.0);
        explorer.hover(Some(3));
        let scene = build_scene(&explorer.view());

        let band_opacities: Vec<f32> = scene
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { bounds, opacity, .. } if bounds.y == PLOT.top && *opacity < 1.0 => {
                    Some(*opacity)
                }
                _ => None,
            })
            .collect();
        assert!(band_opacities.contains(&BAND_OPACITY_HOVERED));
        assert_eq!(
            band_opacities.iter().filter(|&&o| o == BAND_OPACITY_HOVERED).count(),
            1
        );

        assert!(scene.labels().any(|l| l.text == "Late Majority" && l.position.y == 30.0));
    }

    #[test]
    fn test_control_label_follows_driver() {
        let mut explorer = Explorer::default();
        let label_of = |explorer: &Explorer| {
            let scene = build_scene(&explorer.view());
            let label = scene
                .labels()
                .find(|l| ["Play", "Pause", "Replay"].contains(&l.text.as_str()))
                .map(|l| l.text.clone());
            label
        };

        assert_eq!(label_of(&explorer).as_deref(), Some("Play"));
        explorer.play_pause(Instant::now());
        assert_eq!(label_of(&explorer).as_deref(), Some("Pause"));
        explorer.reset();
        explorer.seek(100.0);
        assert_eq!(label_of(&explorer).as_deref(), Some("Replay"));
    }

    #[test]
    fn test_hit_test_targets() {
        let mut explorer = Explorer::default();
        explorer.seek(100.0);
        let scene = build_scene(&explorer.view());

        assert_eq!(scene.hit_test(PLAY_BUTTON.center()), Some(HitTarget::PlayPause));
        assert_eq!(scene.hit_test(RESET_BUTTON.center()), Some(HitTarget::Reset));
        assert_eq!(scene.hit_test(legend_card(2).center()), Some(HitTarget::Segment(2)));
        assert_eq!(
            scene.hit_test(Vec2::new(SPEED_SLIDER.x0 + 10.0, SPEED_SLIDER.y)),
            Some(HitTarget::SpeedSlider)
        );
        assert_eq!(
            scene.hit_test(Vec2::new(SATURATION_SLIDER.x1, SATURATION_SLIDER.y + 5.0)),
            Some(HitTarget::SaturationSlider)
        );
        assert_eq!(scene.hit_test(Vec2::new(5.0, 5.0)), None);

        // At saturation 85 the Laggards start (84 %) is never reached, so their
        // band falls back to the full window and sits on top of the others
        let inside_plot = Vec2::new(PLOT.month_to_x(55.0), 200.0);
        assert_eq!(scene.hit_test(inside_plot), Some(HitTarget::Segment(4)));

        explorer.set_saturation(100.0);
        let scene = build_scene(&explorer.view());
        // Early Majority spans months 27..60 on a 100 % curve
        assert_eq!(scene.hit_test(inside_plot), Some(HitTarget::Segment(2)));
    }
}
