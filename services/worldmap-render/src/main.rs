//! Worldmap render tool.
//!
//! Loads a panel configuration and one or more data files, replays each
//! file as a refresh against a recording map surface, and prints the
//! resulting draw commands as JSON lines on stdout.

mod input;

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use marker_engine::{render_legend_html, DrawCommand, RefreshSummary, RenderPlan, WorldMap};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use worldmap_common::PanelConfig;

use input::{load_observations, InputFormat};

#[derive(Parser, Debug)]
#[command(name = "worldmap-render")]
#[command(about = "Replay worldmap refreshes and print the draw commands")]
struct Args {
    /// Panel configuration file (.json, .yaml or .yml)
    #[arg(short, long, env = "WORLDMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Data file; pass several to replay several refreshes in order
    #[arg(short, long = "data", required = true)]
    data: Vec<PathBuf>,

    /// Shape of the data files
    #[arg(long, value_enum, default_value = "points")]
    format: InputFormat,

    /// Create the legend after the first refresh
    #[arg(long)]
    legend: bool,

    /// Print the legend HTML instead of draw commands for it
    #[arg(long)]
    legend_html: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// One line of output.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Output<'a> {
    View {
        commands: Vec<DrawCommand>,
    },
    Refresh {
        index: usize,
        file: String,
        summary: &'a RefreshSummary,
        commands: Vec<DrawCommand>,
    },
    Legend {
        commands: Vec<DrawCommand>,
    },
    LegendHtml {
        html: String,
    },
    Teardown {
        commands: Vec<DrawCommand>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    let config = match &args.config {
        Some(path) => PanelConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PanelConfig::default(),
    };
    config.validate().context("Invalid panel configuration")?;
    info!(
        thresholds = ?config.style.thresholds,
        log_scale = config.log_scale,
        files = args.data.len(),
        "Loaded configuration"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut map = WorldMap::new(RenderPlan::new());
    map.create_map(&config)?;
    emit(
        &mut out,
        &Output::View {
            commands: drain(&mut map),
        },
    )?;

    for (index, path) in args.data.iter().enumerate() {
        let observations = load_observations(path, args.format, &config)?;
        let summary = map
            .refresh(&observations, &config)
            .with_context(|| format!("Refresh {} ({}) failed", index, path.display()))?;
        info!(
            index,
            path = ?summary.path,
            rendered = summary.rendered,
            skipped = summary.skipped,
            "Refresh complete"
        );
        if summary.skipped > 0 {
            warn!(index, skipped = summary.skipped, "Some observations were not drawn");
        }

        emit(
            &mut out,
            &Output::Refresh {
                index,
                file: path.display().to_string(),
                summary: &summary,
                commands: drain(&mut map),
            },
        )?;

        if index == 0 && (args.legend || args.legend_html) && config.show_legend {
            map.create_legend(&config);
            let commands = drain(&mut map);
            if args.legend_html {
                emit(
                    &mut out,
                    &Output::LegendHtml {
                        html: render_legend_html(map.legend_rows()),
                    },
                )?;
            } else {
                emit(&mut out, &Output::Legend { commands })?;
            }
        }
    }

    let mut plan = map.remove();
    emit(
        &mut out,
        &Output::Teardown {
            commands: plan.drain_commands(),
        },
    )?;
    out.flush()?;

    Ok(())
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the draw commands
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn drain(map: &mut WorldMap<RenderPlan>) -> Vec<DrawCommand> {
    map.surface_mut().drain_commands()
}

fn emit(out: &mut impl Write, output: &Output<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, output)?;
    writeln!(out)?;
    Ok(())
}
