//! Command-line front end for the URL router.
//!
//! ```text
//! overlay-router --config routes.toml check
//! overlay-router --config routes.toml route app://host/item/42 -o source=push
//! overlay-router --config routes.toml watch   < urls.txt
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use overlay_router::config::{load_config, ConfigWatcher};
use overlay_router::observability::logging::init_logging;
use overlay_router::routing::{RouteDispatch, RouteMatcher, RouteOptions};

#[derive(Parser)]
#[command(name = "overlay-router")]
#[command(about = "Route URLs against a table of URL patterns", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and list routes
    Check,
    /// Route each URL given on the command line
    Route {
        /// Extra handler options as key=value
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,

        urls: Vec<String>,
    },
    /// Route URLs read from stdin, reloading routes when the config changes
    Watch {
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
    },
}

fn parse_option(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

fn to_route_options(pairs: Vec<(String, String)>) -> RouteOptions {
    pairs.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    init_logging(&config.observability)?;

    tracing::info!(
        path = %cli.config.display(),
        routes = config.routes.len(),
        "Configuration loaded"
    );

    let (tx, mut rx) = mpsc::unbounded_channel();

    match cli.command {
        Commands::Check => {
            for route in &config.routes {
                let state = if route.enabled { "enabled" } else { "disabled" };
                println!("{:<24} {:<8} {}", route.name, state, route.pattern);
            }
            println!("{} route(s) OK", config.routes.len());
        }
        Commands::Route { options, urls } => {
            let matcher = RouteMatcher::from_config(&config.routes, tx);
            let options = to_route_options(options);
            for url in &urls {
                route_and_print(&matcher, url, &options, &mut rx)?;
            }
        }
        Commands::Watch { options } => {
            let options = to_route_options(options);
            let table = Arc::new(ArcSwap::from_pointee(RouteMatcher::from_config(
                &config.routes,
                tx.clone(),
            )));

            let (watcher, mut updates) = ConfigWatcher::new(&cli.config);
            let _watcher = watcher.run()?;

            let reload_table = table.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    reload_table.store(Arc::new(RouteMatcher::from_config(&new_config.routes, tx.clone())));
                    tracing::info!(routes = new_config.routes.len(), "Route table reloaded");
                }
            });

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    line = lines.next_line() => {
                        let Some(line) = line? else { break };
                        let url = line.trim();
                        if url.is_empty() {
                            continue;
                        }
                        route_and_print(&table.load(), url, &options, &mut rx)?;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted");
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn route_and_print(
    matcher: &RouteMatcher,
    url: &str,
    options: &RouteOptions,
    rx: &mut mpsc::UnboundedReceiver<RouteDispatch>,
) -> Result<(), serde_json::Error> {
    if !matcher.route(url, options) {
        println!("no route: {}", url);
        return Ok(());
    }
    while let Ok(dispatch) = rx.try_recv() {
        println!("{}", serde_json::to_string(&dispatch)?);
    }
    Ok(())
}
