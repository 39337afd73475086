//! Text runs for the GPU backend.
//!
//! Glyph rasterization cannot rotate, so a rotated label becomes a column of
//! upright characters centred on the label's anchor.

use glam::Vec2;

use crate::color::Rgb;

use super::layout::Viewport;
use super::scene::{Label, Scene, TextAnchor};

/// Line advance for stacked characters, relative to font size
const STACK_LINE_HEIGHT: f32 = 1.1;

/// One line of text at a baseline anchor, in scene units
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Baseline anchor point
    pub position: Vec2,
    pub size: f32,
    pub anchor: TextAnchor,
    pub color: Rgb,
    pub bold: bool,
}

impl TextRun {
    fn from_label(label: &Label) -> Self {
        Self {
            text: label.text.clone(),
            position: label.position,
            size: label.size,
            anchor: label.anchor,
            color: label.color,
            bold: label.bold,
        }
    }

    /// Top-left window pixel of a shaped run.
    ///
    /// `width` and `ascent` are the shaped line width and baseline offset in
    /// scene units.
    pub fn placement(&self, width: f32, ascent: f32, viewport: &Viewport) -> Vec2 {
        let dx = match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => width / 2.0,
            TextAnchor::End => width,
        };
        let top_left = Vec2::new(self.position.x - dx, self.position.y - ascent);
        viewport.offset + top_left * viewport.scale
    }
}

fn stacked(label: &Label) -> impl Iterator<Item = TextRun> + '_ {
    let advance = label.size * STACK_LINE_HEIGHT;
    let count = label.text.chars().count() as f32;
    // Centre the column on the anchor, first baseline one size below its top
    let top = label.position.y - count * advance / 2.0;

    label
        .text
        .chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .map(move |(i, c)| TextRun {
            text: c.to_string(),
            position: Vec2::new(label.position.x, top + i as f32 * advance + label.size),
            anchor: TextAnchor::Middle,
            ..TextRun::from_label(label)
        })
}

/// Every label of the scene as upright runs, in paint order
pub fn text_runs(scene: &Scene) -> Vec<TextRun> {
    let mut runs = Vec::new();
    for label in scene.labels() {
        if label.text.trim().is_empty() {
            continue;
        }
        if label.rotation_deg == 0.0 {
            runs.push(TextRun::from_label(label));
        } else {
            runs.extend(stacked(label));
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::scene::build_scene;
    use crate::explorer::Explorer;

    #[test]
    fn test_every_upright_label_becomes_a_run() {
        let scene = build_scene(&Explorer::default().view());
        let runs = text_runs(&scene);

        let upright: Vec<&Label> = scene.labels().filter(|l| l.rotation_deg == 0.0).collect();
        for label in &upright {
            assert!(
                runs.iter().any(|r| r.text == label.text && r.position == label.position),
                "missing run for {:?}",
                label.text
            );
        }

        for text in ["0mo", "100%", "Play", "Reset", "Progress: 0%", "Complexity"] {
            assert!(runs.iter().any(|r| r.text == text), "missing {}", text);
        }
    }

    #[test]
    fn test_rotated_label_is_stacked_around_anchor() {
        let scene = build_scene(&Explorer::default().view());
        let runs = text_runs(&scene);

        // "Market Adoption (%)" minus its two spaces
        let column: Vec<&TextRun> = runs.iter().filter(|r| r.position.x == 20.0).collect();
        assert_eq!(column.len(), 17);
        assert!(column.iter().all(|r| r.text.chars().count() == 1));
        assert!(column.iter().all(|r| r.anchor == TextAnchor::Middle));
        assert_eq!(column.first().map(|r| r.text.as_str()), Some("M"));

        let ys: Vec<f32> = column.iter().map(|r| r.position.y).collect();
        assert!(ys.windows(2).all(|w| w[1] > w[0]));
        // Column stays centred on the axis title anchor (y = 200)
        let (first, last) = (ys[0], ys[ys.len() - 1]);
        assert!(first > 40.0 && last < 360.0);
    }

    #[test]
    fn test_placement_respects_anchor_and_viewport() {
        let run = TextRun {
            text: "Reset".into(),
            position: Vec2::new(100.0, 50.0),
            size: 14.0,
            anchor: TextAnchor::Middle,
            color: Rgb::WHITE,
            bold: true,
        };

        let identity = Viewport::fit(800, 940);
        assert_eq!(run.placement(40.0, 11.0, &identity), Vec2::new(80.0, 39.0));

        // Scene doubled and pillarboxed by 100 px
        let doubled = Viewport::fit(1800, 1880);
        assert_eq!(doubled.scale, 2.0);
        assert_eq!(run.placement(40.0, 11.0, &doubled), Vec2::new(260.0, 78.0));

        let end = TextRun {
            anchor: TextAnchor::End,
            ..run
        };
        assert_eq!(end.placement(40.0, 11.0, &identity), Vec2::new(60.0, 39.0));
    }
}
