//! spcweb - Command line client for SPC alarm panels
//!
//! Talks to the panel's web interface: show and change the arm state,
//! list zones, inhibit zones, or watch the panel for changes.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spcweb::config::Config;
use spcweb::{SessionClient, Zone};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spcweb")]
#[command(about = "SPC alarm panel web interface client", long_about = None)]
struct Args {
    /// Config file path (default: spcweb.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show panel identity and arm state
    Status,
    /// Fullset all areas
    Arm {
        /// Force set, ignoring open zones
        #[arg(short, long)]
        force: bool,
    },
    /// Unset all areas
    Disarm,
    /// List all zones
    Zones,
    /// Inhibit a zone
    Inhibit { zone_id: u32 },
    /// Deinhibit a zone
    Deinhibit { zone_id: u32 },
    /// Poll the panel and log changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cfg = Config::load(args.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.level)),
        )
        .init();

    cfg.validate().context("Invalid configuration")?;

    let mut spc = SessionClient::connect(&cfg.panel.url, cfg.credentials(), &cfg.http_options())
        .context("Failed to create HTTP client")?;

    match args.command {
        Cmd::Status => {
            let arm_state = spc.get_arm_state().await?;
            if args.json {
                let status = serde_json::json!({
                    "model": spc.model(),
                    "serial_number": spc.serial_number(),
                    "site": spc.site(),
                    "arm_state": arm_state,
                });
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("Panel:     {} ({})", spc.device_name(), spc.model());
                println!("Serial:    {}", spc.serial_number());
                println!("Arm state: {}", arm_state);
            }
        }
        Cmd::Arm { force } => {
            let target = if force { "forceset" } else { "fullset" };
            let arm_state = spc.set_arm_state(target).await?;
            println!("Arm state: {}", arm_state);
        }
        Cmd::Disarm => {
            let arm_state = spc.set_arm_state("unset").await?;
            println!("Arm state: {}", arm_state);
        }
        Cmd::Zones => {
            let zones = spc.get_zones().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&zones)?);
            } else {
                for zone in &zones {
                    print_zone(zone);
                }
            }
        }
        Cmd::Inhibit { zone_id } => set_inhibit(&mut spc, zone_id, true).await?,
        Cmd::Deinhibit { zone_id } => set_inhibit(&mut spc, zone_id, false).await?,
        Cmd::Watch => run_watch(&cfg, &mut spc).await?,
    }

    Ok(())
}

fn print_zone(zone: &Zone) {
    let mut flags = Vec::new();
    if zone.is_open() {
        flags.push("OPEN");
    }
    if zone.is_actuated() {
        flags.push("ALARM");
    }
    if zone.is_tampered() {
        flags.push("TAMPER");
    }
    if zone.is_inhibited() {
        flags.push("INHIBITED");
    }

    println!(
        "{:>4} {:<24} {:>3} {:<16} {:<12} {:<8} {:<10} {}",
        zone.zone_id,
        zone.zone_name,
        zone.area_id,
        zone.area_name,
        zone.zone_type,
        zone.input,
        zone.status,
        flags.join(" ")
    );
}

async fn set_inhibit(spc: &mut SessionClient, zone_id: u32, inhibit: bool) -> Result<()> {
    match spc.set_zone_inhibit(zone_id, inhibit).await? {
        Some(zone) => print_zone(&zone),
        None => anyhow::bail!("Zone {} is not reported by the panel", zone_id),
    }
    Ok(())
}

/// Poll the panel and log arm state and zone changes
async fn run_watch(cfg: &Config, spc: &mut SessionClient) -> Result<()> {
    const MAX_CONSECUTIVE_FAILURES: u32 = 3;

    let poll_interval = cfg.poll_interval();
    tracing::info!(
        "Watching {} every {}s",
        cfg.panel.url,
        poll_interval.as_secs()
    );

    let mut last_arm_state: Option<String> = None;
    let mut last_zones: HashMap<u32, Zone> = HashMap::new();
    let mut consecutive_failures = 0;
    let mut ticker = tokio::time::interval(poll_interval);

    loop {
        ticker.tick().await;

        let poll = async {
            let arm_state = spc.get_arm_state().await?;
            let zones = spc.get_zones().await?;
            Ok::<_, spcweb::Error>((arm_state, zones))
        };

        match poll.await {
            Ok((arm_state, zones)) => {
                if consecutive_failures > 0 {
                    tracing::info!("Panel available again");
                    consecutive_failures = 0;
                }

                if last_arm_state.as_deref() != Some(arm_state.as_str()) {
                    tracing::info!("Arm state: {}", arm_state);
                    last_arm_state = Some(arm_state);
                }

                for zone in zones {
                    match last_zones.get(&zone.zone_id) {
                        Some(prev) if prev.input == zone.input && prev.status == zone.status => {}
                        _ => tracing::info!(
                            "Zone {} {}: input={} status={}",
                            zone.zone_id,
                            zone.zone_name,
                            zone.input,
                            zone.status
                        ),
                    }
                    last_zones.insert(zone.zone_id, zone);
                }
            }
            Err(e) => {
                consecutive_failures += 1;
                tracing::error!(
                    "Panel unavailable (attempt {}/{}): {}",
                    consecutive_failures,
                    MAX_CONSECUTIVE_FAILURES,
                    e
                );

                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    tracing::error!("Too many failures, backing off...");
                    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                    consecutive_failures = 0;
                }
            }
        }
    }
}
