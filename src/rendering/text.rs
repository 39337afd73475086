//! Glyph rendering of scene text runs with glyphon.

use glyphon::{
    Attrs, Buffer, Cache, Color, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache,
    TextArea, TextAtlas, TextBounds, TextRenderer, Weight,
};
use log::{debug, warn};

use crate::chart::{TextRun, Viewport};
use crate::error::Result;

/// Line height relative to font size
const LINE_HEIGHT: f32 = 1.2;

/// A shaped run with its measured extent (scene units)
struct ShapedRun {
    run: TextRun,
    buffer: Buffer,
    width: f32,
    ascent: f32,
}

/// Text atlas, renderer and the shaped runs of the current scene
pub(super) struct TextPipeline {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: glyphon::Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    runs: Vec<ShapedRun>,
}

impl TextPipeline {
    pub(super) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Self {
        let font_system = FontSystem::new();
        if font_system.db().faces().next().is_none() {
            warn!("No system fonts found, labels will not be drawn");
        } else {
            debug!("Loaded {} font faces", font_system.db().len());
        }

        let cache = Cache::new(device);
        let viewport = glyphon::Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer =
            TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache: SwashCache::new(),
            viewport,
            atlas,
            renderer,
            runs: Vec::new(),
        }
    }

    /// Shape the runs of a new scene
    pub(super) fn set_runs(&mut self, runs: &[TextRun]) {
        let font_system = &mut self.font_system;
        self.runs = runs
            .iter()
            .map(|run| {
                let mut buffer =
                    Buffer::new(font_system, Metrics::new(run.size, run.size * LINE_HEIGHT));
                buffer.set_size(font_system, None, None);
                let weight = if run.bold {
                    Weight::SEMIBOLD
                } else {
                    Weight::NORMAL
                };
                let attrs = Attrs::new().family(Family::SansSerif).weight(weight);
                buffer.set_text(font_system, &run.text, attrs, Shaping::Advanced);
                buffer.shape_until_scroll(font_system, false);

                let (width, ascent) = buffer
                    .layout_runs()
                    .next()
                    .map(|line| (line.line_w, line.line_y))
                    .unwrap_or((0.0, run.size));

                ShapedRun {
                    run: run.clone(),
                    buffer,
                    width,
                    ascent,
                }
            })
            .collect();
    }

    /// Upload glyphs for the current runs placed through `viewport`
    pub(super) fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        viewport: &Viewport,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.viewport.update(queue, Resolution { width, height });

        let bounds = TextBounds {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        let areas = self.runs.iter().map(|shaped| {
            let top_left = shaped
                .run
                .placement(shaped.width, shaped.ascent, viewport);
            let [r, g, b] = shaped.run.color.channels();
            TextArea {
                buffer: &shaped.buffer,
                left: top_left.x,
                top: top_left.y,
                scale: viewport.scale,
                bounds,
                default_color: Color::rgb(r, g, b),
                custom_glyphs: &[],
            }
        });

        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        )?;
        Ok(())
    }

    pub(super) fn render(&self, pass: &mut wgpu::RenderPass<'_>) -> Result<()> {
        self.renderer.render(&self.atlas, &self.viewport, pass)?;
        Ok(())
    }

    /// Drop glyphs no longer in use
    pub(super) fn trim(&mut self) {
        self.atlas.trim();
    }
}
