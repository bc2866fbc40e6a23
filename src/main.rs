//! Micro-grid simulator entry point: CLI wiring, logging, tick driver and API startup.

use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use microgrid_sim::config::GridConfig;
use microgrid_sim::sim::clock::SystemClock;
use microgrid_sim::sim::driver::TickDriver;
use microgrid_sim::sim::manager::SharedGrid;

/// Parsed CLI arguments.
#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    bind: Option<String>,
    port: Option<u16>,
}

fn print_help() {
    eprintln!("microgrid-sim: residential micro-grid simulator");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from a TOML file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        GridConfig::PRESETS.join(", ")
    );
    eprintln!("  --bind <ip>              Override server.bind");
    eprintln!("  --port <u16>             Override server.port");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If neither --config nor --preset is given, the house preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

fn fail(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                let path = args
                    .get(i)
                    .unwrap_or_else(|| fail("--config requires a path argument"));
                cli.config_path = Some(path.clone());
            }
            "--preset" => {
                i += 1;
                let name = args
                    .get(i)
                    .unwrap_or_else(|| fail("--preset requires a name argument"));
                cli.preset = Some(name.clone());
            }
            "--bind" => {
                i += 1;
                let bind = args
                    .get(i)
                    .unwrap_or_else(|| fail("--bind requires an IP address argument"));
                cli.bind = Some(bind.clone());
            }
            "--port" => {
                i += 1;
                let raw = args
                    .get(i)
                    .unwrap_or_else(|| fail("--port requires a u16 argument"));
                match raw.parse::<u16>() {
                    Ok(p) => cli.port = Some(p),
                    Err(_) => fail(&format!("--port value \"{raw}\" is not a valid u16")),
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.config_path.is_some() && cli.preset.is_some() {
        fail("--config and --preset are mutually exclusive; choose one source");
    }

    cli
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Resolves the configuration source: --config, then --preset, then the house default.
fn load_config(cli: &CliArgs) -> Result<GridConfig> {
    let mut config = if let Some(ref path) = cli.config_path {
        GridConfig::from_toml_file(Path::new(path))
            .with_context(|| format!("failed to load configuration from {path}"))?
    } else if let Some(ref name) = cli.preset {
        GridConfig::from_preset(name)?
    } else {
        GridConfig::house()
    };

    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            tracing::error!("{e}");
        }
        anyhow::bail!("invalid configuration ({} error(s))", errors.len());
    }
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = parse_args();
    let config = load_config(&cli)?;

    let grid = SharedGrid::new(config.build(SystemClock));
    let driver = TickDriver::spawn(grid.clone(), config.tick_interval());

    #[cfg(feature = "api")]
    {
        let addr = config.socket_addr()?;
        microgrid_sim::api::serve(grid, addr, shutdown_signal())
            .await
            .with_context(|| format!("API server on {addr} failed"))?;
    }
    #[cfg(not(feature = "api"))]
    {
        drop(grid);
        shutdown_signal().await;
    }

    driver.shutdown().await;
    Ok(())
}
