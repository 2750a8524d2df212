// Command line options
use anyhow::{bail, Result};
use bevy::prelude::*;
use clap::Parser;
use std::path::PathBuf;

use crate::constants::DEFAULT_REQUIRED_AGENTS;

pub const DEFAULT_LOG_FILTER: &str = "wgpu=error,naga=warn,bevy_agent_editor=info";

/// Agent scene editor
///
/// Examples:
///   bevy-agent-editor                                   # Plain editor
///   bevy-agent-editor --e2e                             # Expose the automation probe
///   bevy-agent-editor --e2e --probe-out probe.json      # Also write probe snapshots
///   bevy-agent-editor --e2e --required-agent ranger1    # Ready once ranger1 is in the scene
#[derive(Parser, Debug, Resource, Clone)]
#[clap(name = "bevy-agent-editor", version, about = "Interactive 3D scene editor for agents and zones")]
pub struct CliArgs {
    /// Enable the automation probe
    #[clap(long = "e2e")]
    pub e2e: bool,

    /// Rewrite a JSON probe snapshot here whenever the scene state changes
    #[clap(long = "probe-out", requires = "e2e")]
    pub probe_out: Option<PathBuf>,

    /// Agent that must exist before the scene counts as ready (repeatable)
    #[clap(long = "required-agent")]
    pub required_agents: Vec<String>,

    /// Log filter, e.g. "bevy_agent_editor=debug"
    #[clap(long = "log-filter", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl CliArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.probe_out {
            if path.is_dir() {
                bail!("--probe-out must name a file, got directory {}", path.display());
            }
        }
        if self.required_agents.iter().any(|id| id.trim().is_empty()) {
            bail!("--required-agent ids must not be empty");
        }
        Ok(())
    }

    /// Ids the scene must contain to be ready; the two starting rangers unless overridden
    pub fn required_agent_ids(&self) -> Vec<String> {
        if self.required_agents.is_empty() {
            DEFAULT_REQUIRED_AGENTS.iter().map(|id| id.to_string()).collect()
        } else {
            self.required_agents.clone()
        }
    }
}
