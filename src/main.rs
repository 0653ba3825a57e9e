//! zoomify-replay: run a recorded input script through a headless viewer.
//!
//! Prints every exported polygon on its own line and can save the final
//! overlay as PNG.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use zoomify::config::AppConfig;
use zoomify::raster::{SkiaRenderer, parse_hex_color};
use zoomify::script::{ReplayError, ReplayScript, run_script};

/// Command line arguments.
#[derive(Debug, PartialEq, Parser)]
#[command(name = "zoomify-replay")]
#[command(about = "Replay a recorded input script through a headless viewer")]
struct Args {
    /// Script file to replay
    #[arg(value_name = "FILE")]
    script: PathBuf,

    /// Config file; defaults to the platform config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Save the final overlay as PNG
    #[arg(long, value_name = "FILE")]
    png: Option<PathBuf>,

    /// Write the effective configuration to this file
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,
}

fn run(args: &Args, config: &AppConfig) -> Result<(), ReplayError> {
    let settings = &config.viewer;
    let script = ReplayScript::load(&args.script)?;

    let surface = script.surface_size(settings)?;
    let mut renderer = SkiaRenderer::new(surface.width.round() as u32, surface.height.round() as u32)?;
    match parse_hex_color(&config.preferences.background) {
        Some(background) => renderer = renderer.with_background(background),
        None => log::warn!(
            "Invalid background '{}', keeping transparent",
            config.preferences.background
        ),
    }

    let outcome = run_script(&script, renderer, settings)?;
    for export in &outcome.exports {
        println!("{}", export);
    }
    log::info!(
        "Replay finished: {} polygons drawn, {} exports",
        outcome.drawn,
        outcome.exports.len()
    );

    if let Some(png) = &args.png {
        outcome.renderer.save_png(png)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match AppConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {:?}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load_from_default_path().unwrap_or_default(),
    };

    // RUST_LOG overrides the configured level
    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    if let Some(path) = &args.save_config {
        if let Err(e) = config.save(path) {
            eprintln!("Failed to save config {:?}: {}", path, e);
            return ExitCode::FAILURE;
        }
    }

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Replay failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("zoomify-replay").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse(&["run.json", "--png", "out.png"]).unwrap(),
            Args {
                script: PathBuf::from("run.json"),
                config: None,
                png: Some(PathBuf::from("out.png")),
                save_config: None,
            }
        );
        assert_eq!(
            parse(&["--config", "c.json", "run.json"]).unwrap().config,
            Some(PathBuf::from("c.json"))
        );
        assert_eq!(
            parse(&["run.json", "--save-config", "out.json"]).unwrap().save_config,
            Some(PathBuf::from("out.json"))
        );
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["run.json", "--png"]).is_err());
        assert!(parse(&["run.json", "--verbose"]).is_err());
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
