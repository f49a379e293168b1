mod config;
mod driver;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use config::SimConfig;
use driver::SimDriver;
use tokio::io::AsyncBufReadExt;
use tracing::info;

const CONFIG_PATH: &str = "arena.toml";

#[tokio::main]
async fn main() {
    let config = if Path::new(CONFIG_PATH).exists() {
        match SimConfig::load(CONFIG_PATH) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load {CONFIG_PATH}: {e}");
                std::process::exit(1);
            }
        }
    } else {
        SimConfig::default()
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("arena-rs sim v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Arena: radius {} around ({}, {})",
        config.arena.radius, config.arena.center_x, config.arena.center_z
    );
    info!(
        "Spawner: {} every {}s, cap {}",
        config.spawner.enemy_type, config.spawner.spawn_interval, config.spawner.max_enemies
    );
    info!("Type `help` for console commands");

    let mut driver = SimDriver::new(&config);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    // Handle Ctrl+C
    let shutdown_tx_ctrlc = shutdown_tx.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Shutdown signal received");
        let _ = shutdown_tx_ctrlc.send(true);
    });

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut tick_interval = tokio::time::interval(Duration::from_millis(50));
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                driver.game_tick();
            }
            Some(line) = console_rx.recv() => {
                if line == "quit" || line == "exit" {
                    let _ = shutdown_tx.send(true);
                } else {
                    let response = driver.handle_console_command(&line);
                    if !response.is_empty() {
                        println!("{response}");
                    }
                }
            }
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    info!("Simulation stopped.");
}
