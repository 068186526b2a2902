mod app;
mod color;
mod config;
mod data;
mod error;
mod export;
mod figure;
mod state;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};

use config::{OutputMode, PlotConfig, PlotOptions};
use data::loader;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot for Radiation Diagram.", long_about = None)]
struct Cli {
    /// Input file: CSV blocks, each introduced by a '#' metadata line
    #[arg(value_hint = ValueHint::FilePath)]
    filename: PathBuf,

    /// Graph title
    #[arg(short, long, default_value = config::DEFAULT_TITLE)]
    title: String,

    /// Min graph Y ticks
    #[arg(short = 'm', long, visible_alias = "range_min", allow_negative_numbers = true)]
    range_min: Option<i32>,

    /// Graph Y ticks step
    #[arg(short = 's', long, visible_alias = "range_step")]
    range_step: Option<i32>,

    /// Output file name [default: <input name>.png in the current directory]
    #[arg(short, long, visible_alias = "output_filename", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Shows the graph instead of autosave
    #[arg(long, action = ArgAction::SetTrue)]
    show: bool,

    /// Image resolution
    #[arg(long, default_value_t = config::DEFAULT_DPI)]
    dpi: u32,

    /// Image edge length in inches
    #[arg(long, default_value_t = config::DEFAULT_SIZE_IN)]
    size: f64,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn plot_options(&self) -> PlotOptions {
        PlotOptions {
            title: Some(self.title.clone()),
            range_min: self.range_min,
            range_step: self.range_step,
            output: self.output.clone(),
            show: self.show,
            dpi: Some(self.dpi),
            size_in: Some(self.size),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("resolving current directory")?;
    run_in(cli, &cwd)
}

/// Full pipeline; a default output path lands in `cwd`.
fn run_in(cli: &Cli, cwd: &Path) -> Result<()> {
    let config = PlotConfig::resolve(&cli.filename, cli.plot_options(), cwd)?;

    let datasets = loader::load_file(&cli.filename)?;
    log::info!(
        "loaded {} dataset(s) from {}",
        datasets.len(),
        cli.filename.display()
    );
    let traces = loader::load_traces(&datasets)?;
    for trace in &traces {
        log::debug!("trace {trace}");
    }

    let figure = figure::build(&traces, &config.title, config.ticks)?;
    if figure.is_empty() {
        log::warn!("no '#' marker lines in input; the plot will be empty");
    }

    match &config.output {
        OutputMode::Show => app::show(figure),
        OutputMode::Save(path) => export::save(&figure, path, config.pixel_size(), config.dpi),
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;
    use crate::error::DiagramError;

    fn cli_for(path: &Path) -> Cli {
        Cli::try_parse_from([
            OsStr::new("radig"),
            path.as_os_str(),
            OsStr::new("--dpi"),
            OsStr::new("50"),
            OsStr::new("--size"),
            OsStr::new("4"),
        ])
        .unwrap()
    }

    #[test]
    fn parses_aliases_and_negative_min() {
        let cli = Cli::try_parse_from([
            "radig",
            "in.txt",
            "--range_min",
            "-40",
            "-s",
            "10",
            "--output_filename",
            "out.bmp",
        ])
        .unwrap();
        assert_eq!(cli.range_min, Some(-40));
        assert_eq!(cli.range_step, Some(10));
        assert_eq!(cli.output, Some(PathBuf::from("out.bmp")));
        assert_eq!(cli.title, config::DEFAULT_TITLE);
    }

    #[test]
    fn saves_default_output_next_to_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pattern.txt");
        std::fs::write(
            &input,
            "# title: \"A\", color: red\nangles,dbm\n0,-3\n90,-9\n180,-20\n\
             # title: B, bold: 2\nangles,dbm\n0,-6\n270,-12\n",
        )
        .unwrap();

        run_in(&cli_for(&input), dir.path()).unwrap();

        let out = dir.path().join("pattern.png");
        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (200, 200));
    }

    #[test]
    fn malformed_metadata_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.txt");
        std::fs::write(&input, "#title X, color: red\nangles,dbm\n0,-1\n").unwrap();

        let err = run_in(&cli_for(&input), dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::MalformedMetadata { .. })
        ));
        assert!(!dir.path().join("bad.png").exists());
    }

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_in(&cli_for(&dir.path().join("nope.txt")), dir.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiagramError>(),
            Some(DiagramError::FileNotFound { .. })
        ));
    }
}
