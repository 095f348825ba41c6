use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use taploop::config::{self as cfg, KeySpec};
use taploop::engine::{Engine, EngineStatus, EnigoSink, LogReporter, StatusReporter, StepSequence};
use taploop::hotkeys::{self, HotkeyRouter, StdinKeySource};

/// Taploop CLI
#[derive(Debug, Parser)]
#[command(
    name = taploop::PKG_NAME,
    version = taploop::PKG_VERSION,
    about = "A hotkey-driven multi-step input automator built on Enigo"
)]
struct Args {
    /// Path to the JSON session config (timing + hotkeys)
    #[arg(short = 'c', long = "config", default_value = "config.json")]
    config: PathBuf,

    /// Path to the JSON step list
    #[arg(short = 's', long = "steps", default_value = "steps.json")]
    steps: PathBuf,

    /// Enable dry-run mode (log steps instead of injecting input)
    #[arg(long = "dry-run")]
    dry_run: bool,

    /// Set log level (e.g., trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long = "log-level")]
    log_level: Option<String>,

    /// Print the JSON Schemas for the config and step files and exit
    #[arg(long = "print-schema")]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    taploop::init_tracing(args.log_level.as_deref());
    info!(
        version = taploop::PKG_VERSION,
        config = %args.config.display(),
        steps = %args.steps.display(),
        dry_run = args.dry_run,
        "Starting Taploop"
    );

    if args.print_schema {
        let schemas = serde_json::json!({
            "config": cfg::config_schema(),
            "steps": cfg::steps_schema(),
        });
        println!("{}", serde_json::to_string_pretty(&schemas)?);
        return Ok(());
    }

    // Missing files on first launch are normal; start from defaults.
    let config = if args.config.exists() {
        cfg::load_config_from_path_async(&args.config).await?
    } else {
        warn!(path = %args.config.display(), "No config file; using defaults");
        cfg::Config::default()
    };
    let steps = if args.steps.exists() {
        cfg::load_steps_from_path_async(&args.steps).await?
    } else {
        warn!(path = %args.steps.display(), "No steps file; starting with an empty sequence");
        StepSequence::new()
    };

    let reporter = Arc::new(LogReporter::new());
    let engine = Engine::new(
        steps,
        config.timing.clone(),
        Box::new(EnigoSink::new(args.dry_run)),
        reporter.clone(),
    );
    let router = HotkeyRouter::new(engine.clone(), config.hotkeys.clone())?;
    info!(
        start = %config.hotkeys.start_key,
        stop = %config.hotkeys.stop_key,
        steps = engine.sequence().len(),
        "Hotkeys armed (type the key and press enter)"
    );
    reporter.on_status(EngineStatus::Ready);

    // Channel for key-down events produced by the source
    let (tx, mut rx) = mpsc::channel::<KeySpec>(256);
    let _handle = hotkeys::spawn_key_source(&StdinKeySource::new(), tx);

    // Main loop: route key events or exit on Ctrl+C
    tokio::select! {
        _ = async {
            while let Some(key) = rx.recv().await {
                router.on_key_down(key);
            }
        } => {
            info!("Key source ended");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    engine.stop();

    // Persist the session the way it was left.
    let steps = engine.sequence().clone();
    let timing = engine.timing().clone();
    let config = cfg::Config {
        timing,
        hotkeys: router.binding().clone(),
    };
    if let Err(err) = cfg::save_config_to_path_async(&args.config, &config).await {
        warn!(error = %err, "Failed to save config");
    }
    if let Err(err) = cfg::save_steps_to_path_async(&args.steps, &steps).await {
        warn!(error = %err, "Failed to save steps");
    }

    info!("Taploop exited");
    Ok(())
}
