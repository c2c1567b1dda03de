mod cli;
mod collector;
mod kubernetes;
mod output;
mod quantity;
mod resources;
#[cfg(test)]
mod tests;
mod types;
mod utils;

use clap::Parser;
use kube::{Client, config};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use cli::Cli;
use collector::Handler;
use kubernetes::{InformerFactory, ServedApis};
use output::Sink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Records go to stdout, diagnostics to stderr
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_resources {
        for resource_type in resources::RESOURCE_TYPES {
            println!("{}", resource_type);
        }
        return Ok(());
    }

    let selected = match cli.selected_resources() {
        Ok(selected) => selected,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let namespaces: Vec<String> = cli
        .namespace
        .iter()
        .map(|ns| ns.trim().to_string())
        .filter(|ns| !ns.is_empty())
        .collect();

    let (context, client) = initialize_client(cli.context.as_deref()).await?;

    let served = ServedApis::discover(&client).await;
    let mut factory = InformerFactory::new(
        client,
        Duration::from_secs(cli.resync_period),
        served,
    );

    let mut handlers: Vec<Arc<dyn Handler>> = Vec::new();
    for resource_type in &selected {
        match resources::build(resource_type, &mut factory) {
            Ok(handler) => handlers.push(handler),
            Err(e) => warn!("[{}] Skipping {}: {}", context, resource_type, e),
        }
    }
    if handlers.is_empty() {
        anyhow::bail!("No resource kinds could be watched in context '{}'", context);
    }
    info!(
        "[{}] Watching {} resource kinds{}",
        context,
        handlers.len(),
        if namespaces.is_empty() {
            String::new()
        } else {
            format!(" in namespaces {}", namespaces.join(","))
        }
    );

    let unsynced = factory
        .wait_for_cache_sync(Duration::from_secs(cli.sync_timeout))
        .await;
    if !unsynced.is_empty() {
        warn!(
            "[{}] Caches not synced after {}s, collecting anyway: {}",
            context,
            cli.sync_timeout,
            unsynced.join(", ")
        );
    }

    let mut sink = Sink::stdout(cli.output);

    if cli.once {
        return run_pass(&handlers, &namespaces, &mut sink).await;
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(cli.interval.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_pass(&handlers, &namespaces, &mut sink).await {
                    error!("[{}] Failed to write snapshot: {:#}", context, e);
                }
            }
            res = &mut shutdown => {
                res?;
                info!("[{}] Interrupted, shutting down", context);
                break;
            }
        }
    }

    Ok(())
}

async fn initialize_client(context: Option<&str>) -> anyhow::Result<(String, Client)> {
    match context {
        Some(ctx) => {
            let config = config::Config::from_kubeconfig(&config::KubeConfigOptions {
                context: Some(ctx.to_string()),
                ..Default::default()
            })
            .await
            .map_err(|e| anyhow::anyhow!("Context '{}' not found in kubeconfig: {}", ctx, e))?;
            let client = Client::try_from(config)?;
            info!("Initialized client for context: {}", ctx);
            Ok((ctx.to_string(), client))
        }
        None => {
            // No kubeconfig when running in a pod; infer() falls back to the
            // service account.
            let current_context_name = config::Kubeconfig::read()
                .ok()
                .and_then(|kubeconfig| kubeconfig.current_context)
                .unwrap_or_else(|| "in-cluster".to_string());

            let config = config::Config::infer().await?;
            let client = Client::try_from(config)?;
            info!("Using current context: {}", current_context_name);
            Ok((current_context_name, client))
        }
    }
}

async fn run_pass(
    handlers: &[Arc<dyn Handler>],
    namespaces: &[String],
    sink: &mut Sink,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let entries = collector::collect_pass(handlers, namespaces).await;
    sink.emit(&entries)?;
    info!(
        "Snapshot: {} entries from {} kinds in {:?}",
        entries.len(),
        handlers.len(),
        started.elapsed()
    );
    Ok(())
}
