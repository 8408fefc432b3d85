//! SmartPOS terminal bootstrap entry point.
//!
//! Brings the (simulated) driver layer online, runs the permission gate, and
//! prints the resulting status snapshot for the UI shell as JSON.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()                    -- TOML settings + CLI overrides
//!  └─ spawn_blocking(initialize)       -- DeviceSessionManager (may sleep 1 s)
//!  └─ PermissionGate::ensure_granted() -- prompts for missing capabilities
//!       └─ SimulatedPermissionApi::answer_prompts() -> PermissionGate::deliver()
//!  └─ get_terminal_status()            -- JSON snapshot on stdout
//! ```
//!
//! # Usage
//!
//! ```text
//! pos-terminal [OPTIONS]
//!
//! Options:
//!   --config <PATH>         Config file [env: POS_CONFIG]
//!   --init-failures <N>     Simulated driver init failures [env: POS_INIT_FAILURES]
//! ```
//!
//! Both a driver that stays offline and denied permissions leave the process
//! running in degraded mode; the exit code is 0 either way.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pos_core::PermissionSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pos_terminal::application::device_session::DeviceSessionManager;
use pos_terminal::application::permission_gate::PermissionGate;
use pos_terminal::infrastructure::{
    clock::ThreadSleepDelay,
    driver::ScriptedDriver,
    permissions::SimulatedPermissionApi,
    storage::config::{load_config, load_config_from, AppConfig},
    ui_bridge::{
        get_terminal_status, record_driver_status, record_permission_status, PermissionStatus,
        TerminalAppState,
    },
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// SmartPOS terminal bootstrap.
#[derive(Debug, Parser)]
#[command(
    name = "pos-terminal",
    about = "Brings a SmartPOS terminal's driver layer online and checks OS permissions",
    version
)]
struct Cli {
    /// Path to the TOML config file.  Defaults to the platform config dir.
    #[arg(long, env = "POS_CONFIG")]
    config: Option<PathBuf>,

    /// Overrides `simulator.init_failures` from the config file.
    #[arg(long, env = "POS_INIT_FAILURES")]
    init_failures: Option<u32>,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => load_config().context("failed to load config")?,
        };
        if let Some(failures) = self.init_failures {
            config.simulator.init_failures = failures;
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;

    // RUST_LOG wins; otherwise use the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.terminal.log_level)),
        )
        .init();

    let app_state = TerminalAppState::new(config.terminal.name.clone());
    info!(
        terminal = %config.terminal.name,
        session = %app_state.session_id,
        "SmartPOS terminal starting"
    );

    // ── Driver session ────────────────────────────────────────────────────────
    // initialize() may block for the power-up delay, so keep it off the
    // async worker threads.
    let driver = ScriptedDriver::failing_first(config.simulator.init_failures);
    let power_up_delay = config.driver.power_up_delay();
    let status = tokio::task::spawn_blocking(move || {
        let mut manager = DeviceSessionManager::new(driver, Arc::new(ThreadSleepDelay))
            .with_power_up_delay(power_up_delay);
        manager.initialize()
    })
    .await
    .context("driver session task panicked")?;
    record_driver_status(Arc::clone(&app_state), status).await;

    // ── Permission gate ───────────────────────────────────────────────────────
    let permission_api = Arc::new(SimulatedPermissionApi::new(
        config.simulator.granted.iter().copied(),
        config.simulator.denied.iter().copied(),
    ));
    let gate = PermissionGate::new(permission_api.clone(), app_state.notices.clone());

    let pending = gate.ensure_granted(&PermissionSet::required());
    let permission_status = match pending {
        None => PermissionStatus::Granted,
        Some(pending) => {
            record_permission_status(Arc::clone(&app_state), PermissionStatus::Pending).await;

            // The simulated user answers the dialog; route each answer back.
            for prompt in permission_api.answer_prompts() {
                if let Err(e) = gate.deliver(prompt.request_id, &prompt.capabilities, &prompt.grants)
                {
                    warn!("dropping permission result: {e}");
                }
            }
            // Unanswered requests resolve to None once the gate is gone.
            drop(gate);

            match pending.outcome().await {
                Some(outcome) if outcome.all_granted => PermissionStatus::Granted,
                Some(outcome) => {
                    info!(denied = ?outcome.denied, "running without some permissions");
                    PermissionStatus::Denied
                }
                None => PermissionStatus::Unknown,
            }
        }
    };
    record_permission_status(Arc::clone(&app_state), permission_status).await;

    // ── Report to the UI shell ────────────────────────────────────────────────
    let snapshot = get_terminal_status(Arc::clone(&app_state)).await;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to encode status")?;
    println!("{json}");

    info!("SmartPOS terminal bootstrap finished");
    Ok(())
}
