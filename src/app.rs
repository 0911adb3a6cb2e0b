//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments into a `PipelineConfig`
//! - picks the render sink
//! - runs the pipeline and writes the optional export

use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::domain::{PipelineConfig, RenderTarget};
use crate::error::AppError;
use crate::plot::{AsciiSink, RenderSink, SvgSink};
use crate::tui::TerminalSink;

pub mod pipeline;

const ASCII_WIDTH: usize = 100;
const ASCII_HEIGHT: usize = 25;

/// Entry point for the `forecast` binary.
pub fn run() -> Result<(), AppError> {
    // Values in `.env` become environment variables, which clap reads as fallbacks.
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.to_config()?;
    tracing::debug!(?config, "configuration resolved");

    let mut sink = sink_for(&config);
    let run = pipeline::run_pipeline(&config, sink.as_mut(), &mut io::stdout())?;

    if let Some(path) = &config.export {
        crate::io::export::write_series_csv(path, &run.monthly, &run.forecast)?;
        tracing::info!(path = %path.display(), "series exported");
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the checkpoint text.
fn init_tracing() {
    // `try_init` so a second call (tests, embedding) is a no-op instead of a panic.
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

fn sink_for(config: &PipelineConfig) -> Box<dyn RenderSink> {
    match config.render {
        RenderTarget::Terminal => Box::new(TerminalSink::new()),
        RenderTarget::Svg => Box::new(SvgSink::new(config.out_dir.clone())),
        RenderTarget::Ascii => Box::new(AsciiSink::new(io::stdout(), ASCII_WIDTH, ASCII_HEIGHT)),
    }
}
