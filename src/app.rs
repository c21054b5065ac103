use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::core::{
    config::{ConfigManager, Settings},
    coordinator::{Coordinator, CoordinatorOutput, DashboardCommand},
    feed::store::{AlertStore, NotificationStore},
    mock,
};

/// How often the session loop polls the simulator and checks for changes
const TICK_INTERVAL: Duration = Duration::from_millis(250);

fn initialize_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("city_watch=info"));
    let layer = fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr);

    if let Err(e) = tracing_subscriber::registry().with(env_filter).with(layer).try_init() {
        eprintln!("Logging already initialized: {}", e);
    }
}

fn config_dir() -> PathBuf {
    env::var_os("CITY_WATCH_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Run a dashboard session: frames go to stdout as JSON lines, commands
/// (`dismiss 3`, `read-all`, `map environment`, ...) are read from stdin.
pub fn run() {
    initialize_logging();

    let config_manager = ConfigManager::new(config_dir());
    let settings = config_manager.load();
    log::info!("Loaded settings from {:?}", config_manager.path());

    // UI events are handled one at a time on a single thread
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start runtime: {}", e);
            return;
        }
    };

    runtime.block_on(run_session(settings));
}

fn emit(output: CoordinatorOutput) {
    for line in output.logs {
        log::info!("{}", line);
    }
    if let Some(frame) = output.frame {
        match serde_json::to_string(&frame) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("Failed to serialize frame: {}", e),
        }
    }
}

async fn run_session(settings: Settings) {
    let now = Utc::now();

    // Stores live for the whole session and are handed to their consumers
    let alerts = AlertStore::new().into_shared();
    let notifications = NotificationStore::new().into_shared();

    if settings.seed_mock_data {
        if let Err(e) = mock::seed_alerts(&mut alerts.borrow_mut(), now) {
            log::error!("Failed to seed alerts: {}", e);
        }
        if let Err(e) = mock::seed_notifications(&mut notifications.borrow_mut(), now) {
            log::error!("Failed to seed notifications: {}", e);
        }
    }

    let mut coordinator = Coordinator::new(
        Rc::clone(&alerts),
        Rc::clone(&notifications),
        mock::telemetry(),
        &settings,
    );
    log::info!(
        "Dashboard session started: {} alerts, {} unread notifications, map view {}",
        alerts.borrow().len(),
        notifications.borrow().unread_count(),
        settings.map_view
    );

    let mut commands = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut ticker = tokio::time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            line = commands.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<DashboardCommand>() {
                    Ok(command) => {
                        if !coordinator.handle(command) {
                            log::debug!("Command {:?} changed nothing", command);
                        }
                    }
                    Err(e) => log::warn!("{}", e),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    log::warn!("Stopped reading commands: {}", e);
                    stdin_open = false;
                }
            },
            // Store changes made by commands render right away
            alive = coordinator.changed() => {
                if alive {
                    emit(CoordinatorOutput {
                        frame: Some(coordinator.render(Utc::now())),
                        logs: Vec::new(),
                    });
                }
            },
            _ = ticker.tick() => {
                emit(coordinator.tick(Utc::now()));

                if coordinator.simulation_finished() {
                    log::info!("Reached {} simulated events, ending session", coordinator.events_emitted());
                    break;
                }
                if !settings.simulation.enabled && !stdin_open {
                    break;
                }
            }
        }
    }
}
