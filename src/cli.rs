use clap::Parser;

use crate::output::OutputFormat;
use crate::resources;

#[derive(Parser)]
#[command(name = "kube-snapshot")]
#[command(about = "Periodically snapshot Kubernetes cluster state as structured records")]
pub struct Cli {
    /// Resource kinds to collect (comma separated; default: all)
    #[arg(short, long, value_delimiter = ',')]
    pub resources: Vec<String>,

    /// Only collect objects in these namespaces (default: all)
    #[arg(short = 'n', long, value_delimiter = ',')]
    pub namespace: Vec<String>,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// Seconds between collection passes
    #[arg(short, long, default_value = "60")]
    pub interval: u64,

    /// Seconds before each watch is re-established (at most 290)
    #[arg(long, default_value = "290")]
    pub resync_period: u64,

    /// Seconds to wait for the initial cache sync
    #[arg(long, default_value = "120")]
    pub sync_timeout: u64,

    /// Record format
    #[arg(short, long, value_enum, default_value = "json")]
    pub output: OutputFormat,

    /// Run a single collection pass and exit
    #[arg(long)]
    pub once: bool,

    /// Print the supported resource kinds and exit
    #[arg(long)]
    pub list_resources: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Kinds to collect: the requested ones in order, or every known kind.
    pub fn selected_resources(&self) -> anyhow::Result<Vec<String>> {
        if self.resources.is_empty() {
            return Ok(resources::RESOURCE_TYPES
                .iter()
                .map(|r| r.to_string())
                .collect());
        }

        let mut selected: Vec<String> = Vec::new();
        for requested in &self.resources {
            let requested = requested.trim().to_lowercase();
            if requested.is_empty() || selected.contains(&requested) {
                continue;
            }
            if !resources::is_known(&requested) {
                anyhow::bail!(
                    "Unknown resource type '{}'. Valid types: {}",
                    requested,
                    resources::RESOURCE_TYPES.join(", ")
                );
            }
            selected.push(requested);
        }
        Ok(selected)
    }
}
