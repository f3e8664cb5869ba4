// NetCommand - Main Entry Point
// SPDX-License-Identifier: MIT

//! # NetCommand
//!
//! A single control surface for host network adapters: route priority,
//! DNS, DHCP leases, and live connectivity/identity diagnostics.
//!
//! Adapter/DNS/lease commands need elevated privileges; without them each
//! individual command reports failure rather than the tool refusing to
//! start.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::mpsc;

mod command;
mod controller;
mod inventory;
mod models;
mod services;
mod storage;

use command::CommandRunner;
use controller::Controller;
use models::{AppConfig, Error, Result, StepOutcome};
use services::{LookupClient, Prober, StatusMonitor};

/// Human-readable application name.
pub const APP_NAME: &str = "NetCommand";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print version information and exit.
fn print_version() {
    println!("{} {}", APP_NAME, VERSION);
    println!("License: MIT");
    println!();
    println!("Network adapter configuration and diagnostics manager.");
}

/// Print help information and exit.
fn print_help() {
    let program = env::args()
        .next()
        .unwrap_or_else(|| "netcommand".to_string());
    println!("Usage: {} [OPTIONS] COMMAND", program);
    println!();
    println!("Network adapter configuration and diagnostics manager.");
    println!();
    println!("Commands:");
    println!("  adapters                              List network adapters");
    println!("  prioritize ADAPTER                    Route traffic through ADAPTER");
    println!("  dns set ADAPTER PRIMARY [SECONDARY]   Set static DNS servers");
    println!("  dns google ADAPTER                    Use Google DNS (8.8.8.8, 8.8.4.4)");
    println!("  dns cloudflare ADAPTER                Use Cloudflare DNS (1.1.1.1, 1.0.0.1)");
    println!("  dns clear ADAPTER                     Revert ADAPTER to DHCP DNS");
    println!("  dns flush                             Flush the OS resolver cache");
    println!("  lease release [ADAPTER]               Release DHCP lease (all adapters if omitted)");
    println!("  lease renew [ADAPTER]                 Renew DHCP lease (all adapters if omitted)");
    println!("  probe [TARGET]                        Measure latency and packet loss");
    println!("  report                                Full public-IP identity report");
    println!("  watch                                 Live status updates until Ctrl+C");
    println!("  config                                Show the settings file (create if missing)");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message and exit");
    println!("  -v, --version    Show version information and exit");
    println!("  -d, --debug      Enable debug logging");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG            Set log level (trace, debug, info, warn, error)");
    println!("  OPENCAGE_API_KEY    API key for the reverse-geocoding service");
}

fn print_outcome(outcome: &StepOutcome) -> ExitCode {
    println!("{}", outcome.display_line());
    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn usage_error(message: &str) -> ExitCode {
    eprintln!("{}", message);
    eprintln!("Try '--help' for more information.");
    ExitCode::FAILURE
}

async fn run_adapters(controller: &Controller<CommandRunner>) -> ExitCode {
    let adapters = controller.adapters().await;
    if adapters.is_empty() {
        println!("No adapters found.");
        return ExitCode::SUCCESS;
    }
    for adapter in &adapters {
        let mac = if adapter.mac_address.is_empty() {
            "-"
        } else {
            &adapter.mac_address
        };
        println!(
            "{:<24} {:<13} {:<18} {}",
            adapter.name, adapter.status, mac, adapter.description
        );
    }
    ExitCode::SUCCESS
}

async fn run_set_dns(
    controller: &Controller<CommandRunner>,
    adapter: &str,
    primary: &str,
    secondary: Option<&str>,
) -> Result<ExitCode> {
    let result = controller.set_dns(adapter, primary, secondary).await?;
    let code = print_outcome(&result.primary);
    if let Some(secondary) = &result.secondary {
        println!("{}", secondary.display_line());
    }
    Ok(code)
}

/// Full identity report, adapted from the interactive diagnostic flow:
/// public IP, geolocation, anonymity verdict, and (with an API key) a
/// reverse-geocoded street address.
async fn run_report(lookup: &LookupClient) -> Result<ExitCode> {
    let public_ip = lookup.public_ip().await;
    let local_ip = lookup.local_ip();

    // The one lookup whose business-level failure is allowed to be fatal.
    let info = lookup.geolocate(&public_ip).await?;

    println!();
    println!("=== NETWORK ===");
    println!("Public IP : {}", info.public_ip);
    println!("Local IP  : {}", local_ip);

    println!();
    println!("=== LOCATION (IP GEO) ===");
    println!("Country  : {}", info.country);
    println!("Region   : {}", info.region);
    println!("City     : {}", info.city);
    println!("Timezone : {}", info.timezone);
    println!("Lat/Lon  : {}, {}", info.lat, info.lon);

    println!();
    println!("=== PROVIDER ===");
    println!("ISP      : {}", info.isp);
    println!("Org      : {}", info.org);
    println!("ASN      : {}", info.asn);

    println!();
    println!("=== ANONYMITY CHECK ===");
    println!("Proxy/VPN Detected : {}", info.proxy);
    println!("Hosting Provider   : {}", info.hosting);
    println!("Verdict            : {}", info.anonymity_verdict());

    match lookup.reverse_geocode(info.lat, info.lon).await {
        Ok(Some(address)) => {
            println!();
            println!("=== DETAILED ADDRESS ===");
            println!("Address      : {}", address.formatted);
            println!(
                "Continent    : {}",
                address.continent.as_deref().unwrap_or("N/A")
            );
            println!(
                "Postal Code  : {}",
                address.postcode.as_deref().unwrap_or("N/A")
            );
            println!(
                "Currency     : {}",
                address.currency.as_deref().unwrap_or("N/A")
            );
            match address.calling_code {
                Some(code) => println!("Calling Code : +{}", code),
                None => println!("Calling Code : N/A"),
            }
        }
        // No match for these coordinates; nothing more to print.
        Ok(None) => {}
        Err(Error::MissingGeocodeKey) => {
            println!();
            println!("(detailed address skipped: no reverse-geocoding API key configured)");
        }
        Err(e) => return Err(e),
    }

    println!();
    Ok(ExitCode::SUCCESS)
}

async fn run_probe(config: &AppConfig, runner: CommandRunner, target: Option<&str>) -> ExitCode {
    let prober = Prober::new(runner, config);
    let target = target.unwrap_or_else(|| prober.target()).to_string();
    let stats = prober.probe_target(&target).await;
    println!("Target      : {}", target);
    println!("Ping        : {}", stats.latency_display());
    println!("Packet loss : {}", stats.loss_display());
    ExitCode::SUCCESS
}

async fn run_watch(config: &AppConfig, runner: CommandRunner) -> Result<ExitCode> {
    let (tx, mut rx) = mpsc::channel(8);
    let monitor = StatusMonitor::new(
        Prober::new(runner, config),
        LookupClient::new(config)?,
        Duration::from_secs(config.status_interval_secs),
        tx,
    );
    let worker = tokio::spawn(monitor.run());

    println!(
        "Watching network status every {}s (Ctrl+C to stop)",
        config.status_interval_secs
    );
    loop {
        tokio::select! {
            snapshot = rx.recv() => match snapshot {
                Some(snapshot) => println!("{}\n", snapshot.render()),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    worker.abort();
    Ok(ExitCode::SUCCESS)
}

fn run_config(config: &AppConfig) -> Result<ExitCode> {
    let path = storage::init_settings_file()?;
    println!("Settings file: {}", path.display());
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

async fn dispatch(words: &[String], config: &AppConfig) -> Result<ExitCode> {
    let runner = CommandRunner::new(Duration::from_secs(config.command_timeout_secs));
    let controller = Controller::new(runner.clone());
    let arg = |i: usize| words.get(i).map(String::as_str);

    match (arg(0), arg(1)) {
        (Some("adapters"), _) => Ok(run_adapters(&controller).await),
        (Some("prioritize"), Some(name)) => {
            let report = controller.prioritize(name).await;
            println!("{}", report.summary());
            Ok(if report.target.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        (Some("prioritize"), None) => Ok(usage_error("prioritize requires an adapter name")),
        (Some("dns"), Some("set")) => match (arg(2), arg(3)) {
            (Some(adapter), Some(primary)) => {
                run_set_dns(&controller, adapter, primary, arg(4)).await
            }
            _ => Ok(usage_error("dns set requires an adapter name and a primary server")),
        },
        (Some("dns"), Some("google")) => match arg(2) {
            Some(adapter) => run_set_dns(&controller, adapter, "8.8.8.8", Some("8.8.4.4")).await,
            None => Ok(usage_error("dns google requires an adapter name")),
        },
        (Some("dns"), Some("cloudflare")) => match arg(2) {
            Some(adapter) => run_set_dns(&controller, adapter, "1.1.1.1", Some("1.0.0.1")).await,
            None => Ok(usage_error("dns cloudflare requires an adapter name")),
        },
        (Some("dns"), Some("clear")) => match arg(2) {
            Some(adapter) => Ok(print_outcome(&controller.clear_dns(adapter).await)),
            None => Ok(usage_error("dns clear requires an adapter name")),
        },
        (Some("dns"), Some("flush")) => Ok(print_outcome(&controller.flush_dns().await)),
        (Some("dns"), _) => Ok(usage_error("unknown dns subcommand")),
        (Some("lease"), Some("release")) => {
            Ok(print_outcome(&controller.release_lease(arg(2)).await))
        }
        (Some("lease"), Some("renew")) => Ok(print_outcome(&controller.renew_lease(arg(2)).await)),
        (Some("lease"), _) => Ok(usage_error("lease requires 'release' or 'renew'")),
        (Some("probe"), target) => Ok(run_probe(config, runner, target).await),
        (Some("report"), _) => run_report(&LookupClient::new(config)?).await,
        (Some("watch"), _) => run_watch(config, runner).await,
        (Some("config"), _) => run_config(config),
        (Some(other), _) => Ok(usage_error(&format!("Unknown command: {}", other))),
        (None, _) => {
            print_help();
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut debug_mode = false;
    let mut words: Vec<String> = Vec::new();

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "-v" | "--version" => {
                print_version();
                return ExitCode::SUCCESS;
            }
            "-d" | "--debug" => {
                debug_mode = true;
            }
            _ if arg.starts_with('-') => {
                return usage_error(&format!("Unknown option: {}", arg));
            }
            _ => words.push(arg),
        }
    }

    let config = storage::load_config();

    let log_level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        config
            .log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    match dispatch(&words, &config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("FATAL ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}
