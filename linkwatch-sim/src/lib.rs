//! Host-side simulator for the `linkwatch` connection manager.
//!
//! Replays scripted chip status codes through a real `ConnectionManager`,
//! with the status LED rendered into the log, and prints the resulting
//! connection record.

use anyhow::{Context, bail};
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::time::Duration;

use linkwatch::driver::LoggingLed;
use linkwatch::sim::ScriptedLink;
use linkwatch::{ConnectionConfig, ConnectionManager, IpConfig, StatusReport};

#[derive(Parser, Debug)]
#[command(name = "linkwatch-sim")]
#[command(version)]
#[command(about = "Simulate the Wi-Fi connection manager against scripted status codes")]
struct Args {
    /// Network to join
    #[arg(long, default_value = "linkwatch-sim")]
    ssid: String,

    /// Network password
    #[arg(long, default_value = "")]
    password: String,

    /// Regulatory country code
    #[arg(long, default_value = "GB")]
    country: String,

    /// Status codes reported after one connect, comma separated (e.g. 1,2,3).
    /// Repeat for each attempt; connects past the last script stay Down.
    #[arg(long = "attempt", value_parser = parse_script, allow_hyphen_values = true)]
    attempts: Vec<Script>,

    /// Retries after the first failed attempt
    #[arg(long, default_value_t = 1)]
    max_retries: u32,

    /// Seconds to wait for the link to come up
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Seconds to back off between attempts
    #[arg(long, default_value_t = 5)]
    backoff_secs: u64,

    /// Run the background monitor for this many seconds instead of a single
    /// ensure pass
    #[arg(long)]
    monitor_secs: Option<u64>,

    /// Print the connection record as JSON
    #[arg(long)]
    json: bool,
}

/// Status codes the link reports, one per poll, after a single connect.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Script(Vec<i32>);

/// Parses a comma-separated status script such as `0,1,1,-3`.
fn parse_script(raw: &str) -> Result<Script, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| {
            code.parse::<i32>()
                .map_err(|e| format!("invalid status code '{code}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Script)
}

fn build_link(attempts: &[Script]) -> ScriptedLink {
    attempts
        .iter()
        .fold(ScriptedLink::new(0), |link, Script(codes)| {
            link.with_attempt(codes.iter().copied())
        })
        .with_ifconfig(IpConfig::new(
            "192.168.4.20",
            "255.255.255.0",
            "192.168.4.1",
            "192.168.4.1",
        ))
}

fn build_config(args: &Args) -> ConnectionConfig {
    ConnectionConfig::new(&args.ssid, &args.password, &args.country)
        .with_max_retries(args.max_retries)
        .with_connect_timeout(Duration::from_secs(args.timeout_secs))
        .with_backoff(Duration::from_secs(args.backoff_secs))
}

fn print_report(report: &StatusReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("MAC:     {}", report.mac);
        println!(
            "Status:  {} ({})",
            report.status_description, report.status_code
        );
        println!("IP:      {}", report.ip);
        println!("Subnet:  {}", report.subnet);
        println!("Gateway: {}", report.gateway);
        println!("DNS:     {}", report.dns);
    }
    Ok(())
}

async fn simulate(args: Args) -> anyhow::Result<()> {
    let config = build_config(&args);
    let manager = Arc::new(
        ConnectionManager::new(build_link(&args.attempts), LoggingLed::onboard(), config)
            .context("Failed to start connection manager")?,
    );

    match args.monitor_secs {
        Some(secs) => {
            info!("Running network monitor for {secs} seconds");
            let monitor = manager.spawn_monitor();
            tokio::time::sleep(Duration::from_secs(secs)).await;
            monitor.shutdown().await;
        }
        None => {
            if !manager.ensure_network_access().await {
                print_report(&manager.status_report(), args.json)?;
                bail!(
                    "no network access after {} attempts",
                    manager.config().max_attempts()
                );
            }
        }
    }

    if let Some(elapsed) = manager.last_connect_elapsed() {
        info!("Last connect took {}ms", elapsed.as_millis());
    }
    print_report(&manager.status_report(), args.json)
}

pub fn run() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(simulate(args))
}
