mod app;
mod chart;
mod cli;
mod color;
mod dashboard;
mod data;
mod server;
mod state;
mod ui;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use eframe::egui;

use app::DashboardApp;
use cli::{Cli, Command};
use dashboard::Dashboard;

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let command = cli.command();
    let path = match (cli.data, &command) {
        (Some(path), _) => path,
        (None, Command::View) => pick_data_file().context("no dataset selected")?,
        (None, Command::Serve { .. }) => bail!("a dataset path is required to serve the dashboard"),
    };

    let dataset = data::loader::load_file(&path)?;
    log::info!("Loaded {} records from {}", dataset.len(), path.display());
    let dashboard = Arc::new(Dashboard::build(dataset));

    match command {
        Command::Serve { bind } => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?
            .block_on(server::serve(dashboard, bind)),
        Command::View => run_viewer(dashboard),
    }
}

fn pick_data_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open tweet dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

fn run_viewer(dashboard: Arc<Dashboard>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        dashboard::layout::DASHBOARD_TITLE,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(dashboard)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
