use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;
use watermarker::{BatchReport, BatchRunner, Cli, Color, WatermarkApplier, WatermarkConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    ExitCode::from(execute(cli))
}

/// Runs a batch and maps the result to the process status: 0 when the batch
/// ran (even with per-file failures), 1 on a startup error.
fn execute(cli: Cli) -> u8 {
    match run(cli) {
        Ok(report) => {
            print_summary(&report);
            0
        }
        Err(e) => {
            log::error!("{:#}", e);
            1
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<BatchReport> {
    BatchRunner::validate_input_dir(&cli.input_dir)?;

    let color = Color::parse(&cli.color)
        .context("Invalid color format. Please use R,G,B (e.g., '255,0,0')")?;

    let config = WatermarkConfig {
        font_size: cli.font_size,
        color,
        anchor: cli.position.into(),
        font_path: cli.font,
        optimize_png: cli.optimize,
    };

    let applier = WatermarkApplier::with_system_font(config)?;
    let runner = BatchRunner::new(applier).with_progress(true);

    Ok(runner.run(&cli.input_dir)?)
}

fn print_summary(report: &BatchReport) {
    let processed = report.success_count() + report.failure_count();
    if processed == 0 {
        return;
    }

    println!(
        "Watermarked {} of {} images into: {}",
        report.success_count(),
        processed,
        report.output_dir.display()
    );

    for (name, reason) in report.failures() {
        println!("  failed: {} ({})", name, reason);
    }
}
