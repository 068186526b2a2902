use std::path::{Path, PathBuf};

use crate::error::{DiagramError, Result};

pub const DEFAULT_TITLE: &str = "Radiation Diagram";
pub const DEFAULT_DPI: u32 = 600;
pub const DEFAULT_SIZE_IN: f64 = 10.0;
pub const DEFAULT_EXTENSION: &str = "png";

/// Largest raster edge accepted, in pixels.
const MAX_EDGE_PX: f64 = 20_000.0;

/// Most explicit radial ticks accepted.
pub const MAX_RADIAL_TICKS: u64 = 1000;

/// Explicit radial tick layout: `min, min + step, ...` below 0 dB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRange {
    pub min: i32,
    pub step: i32,
}

impl TickRange {
    /// Number of ticks strictly below zero. `step` must be positive.
    pub fn count(&self) -> u64 {
        if self.min >= 0 || self.step <= 0 {
            return 0;
        }
        let span = -i64::from(self.min) as u64;
        let step = self.step as u64;
        span.div_ceil(step)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputMode {
    /// Open an interactive window.
    Show,
    /// Write a raster image.
    Save(PathBuf),
}

/// Everything one run needs besides the input data.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub title: String,
    pub ticks: Option<TickRange>,
    pub output: OutputMode,
    pub dpi: u32,
    /// Edge length of the square image, inches.
    pub size_in: f64,
}

/// Raw option values as collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    pub title: Option<String>,
    pub range_min: Option<i32>,
    pub range_step: Option<i32>,
    pub output: Option<PathBuf>,
    pub show: bool,
    pub dpi: Option<u32>,
    pub size_in: Option<f64>,
}

impl PlotConfig {
    /// Validate `opts` and fill in defaults. `cwd` receives the default output.
    pub fn resolve(input: &Path, opts: PlotOptions, cwd: &Path) -> Result<Self> {
        let ticks = match (opts.range_min, opts.range_step) {
            (Some(min), Some(step)) => {
                if step <= 0 {
                    return Err(DiagramError::InvalidConfig(format!(
                        "range step must be positive, got {step}"
                    )));
                }
                let rings = TickRange { min, step }.count();
                if rings > MAX_RADIAL_TICKS {
                    return Err(DiagramError::InvalidConfig(format!(
                        "range {min}..0 in steps of {step} gives {rings} rings, more than {MAX_RADIAL_TICKS}"
                    )));
                }
                Some(TickRange { min, step })
            }
            (None, None) => None,
            _ => {
                log::warn!("both --range-min and --range-step are needed for explicit ticks; using automatic ticks");
                None
            }
        };

        let dpi = opts.dpi.unwrap_or(DEFAULT_DPI);
        let size_in = opts.size_in.unwrap_or(DEFAULT_SIZE_IN);
        if dpi == 0 || !(size_in > 0.0) {
            return Err(DiagramError::InvalidConfig(format!(
                "image size must be positive (got {size_in} in at {dpi} dpi)"
            )));
        }
        if size_in * f64::from(dpi) > MAX_EDGE_PX {
            return Err(DiagramError::InvalidConfig(format!(
                "{size_in} in at {dpi} dpi exceeds {MAX_EDGE_PX} px"
            )));
        }
        let min_edge = crate::export::min_edge_px(dpi);
        if (size_in * f64::from(dpi)).round() < f64::from(min_edge) {
            return Err(DiagramError::InvalidConfig(format!(
                "{size_in} in at {dpi} dpi is below the {min_edge} px needed for title and margins"
            )));
        }

        let output = if opts.show {
            OutputMode::Show
        } else {
            OutputMode::Save(
                opts.output
                    .unwrap_or_else(|| default_output_path(input, cwd)),
            )
        };

        Ok(PlotConfig {
            title: opts.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            ticks,
            output,
            dpi,
            size_in,
        })
    }

    /// Square raster edge in pixels.
    pub fn pixel_size(&self) -> u32 {
        (self.size_in * f64::from(self.dpi)).round() as u32
    }
}

/// `<cwd>/<input file name with a .png extension>`.
pub fn default_output_path(input: &Path, cwd: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("radiation_diagram"));
    cwd.join(name.with_extension(DEFAULT_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = PlotConfig::resolve(
            Path::new("data/pattern.csv"),
            PlotOptions::default(),
            Path::new("/work"),
        )
        .unwrap();
        assert_eq!(cfg.title, DEFAULT_TITLE);
        assert_eq!(cfg.ticks, None);
        assert_eq!(cfg.output, OutputMode::Save(PathBuf::from("/work/pattern.png")));
        assert_eq!(cfg.pixel_size(), 6000);
    }

    #[test]
    fn default_output_without_extension() {
        assert_eq!(
            default_output_path(Path::new("pattern"), Path::new("/w")),
            PathBuf::from("/w/pattern.png")
        );
        assert_eq!(
            default_output_path(Path::new("a.b.txt"), Path::new("/w")),
            PathBuf::from("/w/a.b.png")
        );
    }

    #[test]
    fn show_ignores_output() {
        let opts = PlotOptions {
            show: true,
            output: Some(PathBuf::from("x.png")),
            ..Default::default()
        };
        let cfg = PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")).unwrap();
        assert_eq!(cfg.output, OutputMode::Show);
    }

    #[test]
    fn ticks_need_both_values() {
        let opts = PlotOptions {
            range_min: Some(-40),
            ..Default::default()
        };
        let cfg = PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")).unwrap();
        assert_eq!(cfg.ticks, None);

        let opts = PlotOptions {
            range_min: Some(-40),
            range_step: Some(10),
            ..Default::default()
        };
        let cfg = PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")).unwrap();
        assert_eq!(cfg.ticks, Some(TickRange { min: -40, step: 10 }));
    }

    #[test]
    fn tick_count_matches_arange() {
        assert_eq!(TickRange { min: -30, step: 10 }.count(), 3);
        assert_eq!(TickRange { min: -25, step: 10 }.count(), 3);
        assert_eq!(TickRange { min: 5, step: 10 }.count(), 0);
    }

    #[test]
    fn rejects_too_many_rings() {
        let opts = PlotOptions {
            range_min: Some(-5_000_000),
            range_step: Some(1),
            ..Default::default()
        };
        assert!(matches!(
            PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")),
            Err(DiagramError::InvalidConfig(_))
        ));

        let opts = PlotOptions {
            range_min: Some(-1000),
            range_step: Some(1),
            ..Default::default()
        };
        assert!(PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")).is_ok());
    }

    #[test]
    fn rejects_image_too_small_for_layout() {
        let opts = PlotOptions {
            size_in: Some(0.1),
            ..Default::default()
        };
        assert!(matches!(
            PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")),
            Err(DiagramError::InvalidConfig(_))
        ));

        let opts = PlotOptions {
            size_in: Some(2.0),
            dpi: Some(72),
            ..Default::default()
        };
        assert!(PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")).is_ok());
    }

    #[test]
    fn rejects_bad_step_and_size() {
        let opts = PlotOptions {
            range_min: Some(-40),
            range_step: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")),
            Err(DiagramError::InvalidConfig(_))
        ));

        let opts = PlotOptions {
            dpi: Some(5000),
            size_in: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            PlotConfig::resolve(Path::new("p.txt"), opts, Path::new("/")),
            Err(DiagramError::InvalidConfig(_))
        ));
    }
}
