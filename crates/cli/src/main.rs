mod render;
mod settings;
mod station;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use batch_label_core::{LabelConfig, PrintJob, render_label};
use batch_label_preview::Previewer;
use batch_label_print_client::TcpConnector;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_config, print_preview, print_report};
use crate::settings::Settings;
use crate::station::Station;

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "batch-label",
    version,
    about = "Print SKU/batch labels on a ZPL network printer"
)]
struct Cli {
    /// Output mode: "pretty" for plain text, "json" for machine-readable
    /// JSON. Defaults to "pretty" when stdout is a TTY, "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct LabelArgs {
    /// Product SKU (letters, digits and '-').
    #[arg(long)]
    sku: String,
    /// Batch identifier.
    #[arg(long)]
    batch: String,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the ZPL document for one label to stdout.
    Markup {
        #[command(flatten)]
        label: LabelArgs,
    },

    /// Render a PNG preview of the label.
    Preview {
        #[command(flatten)]
        label: LabelArgs,
        /// Write the PNG here instead of printing a data URL.
        #[arg(long, short)]
        out: Option<String>,
    },

    /// Send the label to the printer.
    Print {
        #[command(flatten)]
        label: LabelArgs,
        /// Number of copies (1-999).
        #[arg(long, short = 'n', default_value_t = 1)]
        copies: u32,
    },

    /// Show the effective label configuration as JSON.
    Config,
}

// ── Main ────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads the environment.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let config = cli.settings.label_config()?;

    match cli.cmd {
        Cmd::Markup { label } => cmd_markup(&config, &label)?,
        Cmd::Preview { label, out } => {
            let station = station(config, &cli.settings)?;
            cmd_preview(&station, &label, out.as_deref(), format).await?;
        }
        Cmd::Print { label, copies } => {
            let station = station(config, &cli.settings)?;
            cmd_print(&station, &label, copies, format).await?;
        }
        Cmd::Config => print_config(&config)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

type CliStation = Station<TcpConnector, Previewer>;

/// Only the commands that preview or print need the printer and previewer.
fn station(config: LabelConfig, settings: &Settings) -> Result<CliStation> {
    let previewer = Previewer::from_config(&settings.preview_config())
        .context("failed to set up label preview")?;
    Ok(Station::new(config, settings.connector(), previewer))
}

fn job(label: &LabelArgs, copies: u32) -> Result<PrintJob> {
    PrintJob::new(label.sku.as_str(), label.batch.as_str(), copies).context("invalid print job")
}

fn cmd_markup(config: &LabelConfig, label: &LabelArgs) -> Result<()> {
    let rendered = render_label(config, &job(label, 1)?)?;
    println!("{}", rendered.markup);
    Ok(())
}

async fn cmd_preview(
    station: &CliStation,
    label: &LabelArgs,
    out: Option<&str>,
    format: Format,
) -> Result<()> {
    let Some(image) = station.preview(&job(label, 1)?).await else {
        eprintln!("no preview available");
        process::exit(1);
    };
    if let Some(path) = out {
        fs::write(path, &image.bytes).with_context(|| format!("failed to write {path}"))?;
    }
    print_preview(&image, out, format);
    Ok(())
}

async fn cmd_print(
    station: &CliStation,
    label: &LabelArgs,
    copies: u32,
    format: Format,
) -> Result<()> {
    let report = station.print(&job(label, copies)?).await;
    print_report(&report, format);
    if !report.is_success() {
        process::exit(1);
    }
    Ok(())
}
