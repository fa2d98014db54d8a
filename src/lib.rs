// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod organize;
pub mod watch;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::CliArgs;
use crate::config::{load_or_init, parse_duration, validate_dump_directory};
use crate::engine::{Debouncer, Runtime, RuntimeEvent};
use crate::fs::{FileSystem, RealFileSystem};
use crate::organize::{OrganizeOutcome, Organizer};
use crate::watch::spawn_watcher;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (creating a template on first run)
/// - a pre-scan of files already sitting in the dump directory
/// - the file watcher and the debouncer
/// - Ctrl-C / SIGTERM handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config_path();
    let mut cfg = load_or_init(&config_path)?;

    if let Some(ref s) = args.debounce {
        let window = parse_duration(s).map_err(|e| anyhow!("invalid --debounce: {e}"))?;
        if window.is_zero() {
            return Err(anyhow!("--debounce must be greater than zero"));
        }
        cfg.debounce = window;
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    validate_dump_directory(fs.as_ref(), &cfg)?;

    info!("Dump directory: {}", cfg.dump_directory.display());
    info!("Processing {} destination rules", cfg.destinations.len());

    let organizer = Organizer::new(fs, Arc::new(cfg));

    if args.dry_run {
        print_dry_run(&organizer)?;
        return Ok(());
    }

    info!("Organizing existing files...");
    let prescan = organizer.clone();
    tokio::task::spawn_blocking(move || organize_and_report(&prescan)).await?;

    if args.once {
        return Ok(());
    }

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let _watcher_handle =
        spawn_watcher(organizer.config().dump_directory.clone(), rt_tx.clone())?;

    spawn_shutdown_listener(rt_tx);

    let window = organizer.config().debounce;
    let debouncer = Debouncer::new(window, move || {
        organize_and_report(&organizer);
    });

    Runtime::new(debouncer, rt_rx).run().await?;
    Ok(())
}

/// Run one organize pass and log its summary line.
///
/// A failed pass (the dump directory could not be listed) is logged and
/// returns `None`; the process keeps running and the next trigger retries.
pub fn organize_and_report(organizer: &Organizer) -> Option<OrganizeOutcome> {
    match organizer.organize() {
        Ok(outcome) => {
            info!(
                moved = outcome.moved,
                skipped = outcome.skipped,
                "Summary: {}",
                outcome
            );
            Some(outcome)
        }
        Err(err) => {
            error!(error = %err, "organize pass failed");
            None
        }
    }
}

fn spawn_shutdown_listener(tx: mpsc::Sender<RuntimeEvent>) {
    tokio::spawn(async move {
        if let Err(e) = wait_for_termination().await {
            error!("failed to listen for termination signals: {e}");
            return;
        }
        let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
    });
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            info!("Received signal: interrupt");
        }
        _ = terminate.recv() => {
            info!("Received signal: terminated");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Received signal: interrupt");
    Ok(())
}

/// Dry-run output: print the rules and what a pass would do.
fn print_dry_run(organizer: &Organizer) -> Result<()> {
    let cfg = organizer.config();

    println!("prefix dry-run");
    println!("  dump_directory = {}", cfg.dump_directory.display());
    println!("  debounce = {:?}", cfg.debounce);
    println!();

    println!("destinations ({}):", cfg.destinations.len());
    for (i, dest) in cfg.destinations.iter().enumerate() {
        println!("  [{i}] {}", dest.path.display());
        if let Some(prefix) = dest.prefix() {
            println!("      prefix: {prefix}");
        }
        if let Some(suffix) = dest.suffix() {
            println!("      suffix: {suffix}");
        }
    }
    println!();

    let planned = organizer.plan()?;
    let moving = planned.iter().filter(|m| m.dest.is_some()).count();
    println!("planned moves ({moving} of {} files):", planned.len());
    for mv in &planned {
        match &mv.dest {
            Some(dest) => println!("  {} -> {}", mv.source.display(), dest.display()),
            None => println!("  {} (no match, stays)", mv.source.display()),
        }
    }

    debug!("dry-run complete (nothing moved)");
    Ok(())
}
