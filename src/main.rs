mod common;
mod config;
mod network;
mod storage;
mod tail;
mod ui;

use std::error::Error;

use clap::{Parser, Subcommand};
use common::{ApiCommand, ApiEvent, ThreadId};
use dotenvy::dotenv;
use network::{ApiClient, ApiWorker};
use storage::Session;
use tokio::sync::mpsc;
use ui::{MarketApp, View};

#[derive(Parser)]
#[command(
    name = "gamegear_client",
    version,
    about = "Desktop client for the GameGear rental marketplace"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// API base URL; overrides API_BASE_URL and the config file
    #[arg(long, value_name = "URL")]
    api_base_url: Option<String>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone)]
enum Mode {
    /// Follow one chat thread in the terminal (no UI)
    Tail {
        /// Rental request id of the thread
        request_id: ThreadId,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    let env_base_url = std::env::var(config::BASE_URL_ENV).ok();
    let base_url =
        app_config.resolve_base_url(cli.api_base_url.as_deref(), env_base_url.as_deref())?;

    storage::ensure_data_dir(&app_config.data_dir)?;
    let session = Session::open(app_config.session_db_path())?;
    let client = ApiClient::new(base_url.clone(), session.clone())?;
    log::info!("Using API at {base_url}");

    // 1. Tạo các kênh giao tiếp (Channels)
    // UI -> API worker
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // API worker -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    // 2. Khởi chạy API worker (chạy ngầm)
    tokio::spawn(ApiWorker::new(client, event_tx, cmd_rx).run());

    match cli.mode {
        Some(Mode::Tail { request_id }) => {
            tail::run(request_id, cmd_tx, event_rx).await?;
            Ok(())
        }
        None => {
            let initial_view = if session.is_authenticated()? {
                View::Devices
            } else {
                View::Login
            };
            run_window(cmd_tx, event_rx, initial_view)?;
            Ok(())
        }
    }
}

fn run_window(
    cmd_tx: mpsc::Sender<ApiCommand>,
    event_rx: mpsc::Receiver<ApiEvent>,
    initial_view: View,
) -> Result<(), eframe::Error> {
    // 3. Khởi chạy UI (chạy trên main thread)
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "GameGear",
        options,
        Box::new(move |cc| {
            log::info!("Client started on {initial_view:?}");
            Ok(Box::new(MarketApp::new(cc, cmd_tx, event_rx, initial_view)))
        }),
    )
}
