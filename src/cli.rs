//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use log::warn;

use crate::error::{Error, Result};
use crate::explorer::Explorer;
use crate::params::{AdoptionParams, AnimationConfig, RecordingConfig, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "adoption-curve")]
#[command(about = "Interactive diffusion of innovations S-curve", long_about = None)]
pub struct Args {
    /// Adoption speed (10-100, 50 = midpoint at month 60)
    #[arg(long, value_name = "N", default_value_t = 50.0)]
    pub speed: f64,

    /// Market saturation ceiling (40-100 percent, step 5)
    #[arg(long, value_name = "PERCENT", default_value_t = 85.0)]
    pub saturation: f64,

    /// Initial animation progress (0-100 percent)
    #[arg(long, value_name = "PERCENT", default_value_t = 0.0)]
    pub progress: f64,

    /// Start the animation immediately
    #[arg(long)]
    pub autoplay: bool,

    /// Record the animation to PNG frames (duration in seconds)
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Write the scene as SVG and exit
    #[arg(long, value_name = "PATH")]
    pub export_svg: Option<PathBuf>,

    /// Render the scene offscreen to a PNG and exit
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Print a text report of the current state and exit
    #[arg(long)]
    pub describe: bool,

    /// Window (or snapshot) width in pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Window (or snapshot) height in pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,
}

impl Args {
    /// Explorer with parameters and progress from the command line
    pub fn build_explorer(&self) -> Explorer {
        let params = AdoptionParams::new(self.speed, self.saturation);
        let mut explorer = Explorer::new(params, AnimationConfig::default());
        explorer.seek(self.progress);
        explorer
    }

    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        if let Some(width) = self.width {
            config.window_width = width.max(1);
        }
        if let Some(height) = self.height {
            config.window_height = height.max(1);
        }
        config
    }

    /// Any flag that produces output and exits without opening a window
    pub fn is_one_shot(&self) -> bool {
        self.describe || self.export_svg.is_some() || self.snapshot.is_some()
    }

    /// Whether the animation should be running once the window opens
    pub fn starts_running(&self) -> bool {
        self.autoplay || self.record.is_some()
    }

    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Result<Option<RecordingConfig>> {
        let Some(duration) = self.record else {
            return Ok(None);
        };
        if self.is_one_shot() {
            warn!("--record is ignored together with one-shot output flags");
            return Ok(None);
        }

        let config = RecordingConfig::new(duration);
        let frames_dir = config.frames_dir();
        std::fs::create_dir_all(&frames_dir).map_err(|e| Error::io(&frames_dir, e))?;

        Ok(Some(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_open_the_window() {
        let args = Args::try_parse_from(["adoption-curve"]).unwrap();
        assert!(!args.is_one_shot());
        assert!(!args.starts_running());

        let explorer = args.build_explorer();
        assert_eq!(explorer.params(), &AdoptionParams::default());
        assert_eq!(explorer.driver().progress(), 0.0);

        let config = args.render_config();
        assert_eq!((config.window_width, config.window_height), (1200, 1000));
    }

    #[test]
    fn test_parameters_are_clamped_and_snapped() {
        let args = Args::try_parse_from([
            "adoption-curve",
            "--speed",
            "250",
            "--saturation",
            "62",
            "--progress",
            "140",
        ])
        .unwrap();
        let explorer = args.build_explorer();
        assert_eq!(explorer.params().speed(), 100);
        assert_eq!(explorer.params().saturation(), 60);
        assert_eq!(explorer.driver().progress(), 100.0);
    }

    #[test]
    fn test_one_shot_flags() {
        let args = Args::try_parse_from([
            "adoption-curve",
            "--describe",
            "--export-svg",
            "chart.svg",
            "--width",
            "800",
            "--height",
            "0",
        ])
        .unwrap();
        assert!(args.is_one_shot());
        assert_eq!(args.export_svg, Some(PathBuf::from("chart.svg")));
        let config = args.render_config();
        assert_eq!((config.window_width, config.window_height), (800, 1));
    }

    #[test]
    fn test_record_is_ignored_for_one_shot_runs() {
        let args =
            Args::try_parse_from(["adoption-curve", "--record", "2", "--describe"]).unwrap();
        assert!(args.starts_running());
        assert!(args.recording_config().unwrap().is_none());
    }
}
