use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::defaults;
use crate::models::{OrgProject, OrgTeam};
use crate::registry::{NameList, OrgRegistry};
use crate::repository::RequestRepository;

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "ROADMAP_CONFIG";

/// AI integration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiSettings {
    pub enabled: bool,
    /// Explicit path to the LLM CLI; auto-detected when absent
    pub cli_path: Option<PathBuf>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            cli_path: None,
        }
    }
}

/// Session seed configuration. Every field falls back to the built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoadmapConfig {
    /// Author name on chat messages
    pub planner_name: String,
    pub stakeholders: Vec<String>,
    pub locations: Vec<String>,
    pub business_processes: Vec<String>,
    pub teams: Vec<OrgTeam>,
    pub projects: Vec<OrgProject>,
    /// Start the session with the sample backlog
    pub seed_sample_backlog: bool,
    pub ai: AiSettings,
}

impl Default for RoadmapConfig {
    fn default() -> Self {
        Self {
            planner_name: "Planner".to_string(),
            stakeholders: defaults::STAKEHOLDERS.iter().map(|s| s.to_string()).collect(),
            locations: defaults::LOCATIONS.iter().map(|s| s.to_string()).collect(),
            business_processes: defaults::BUSINESS_PROCESSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            teams: defaults::teams(),
            projects: defaults::org_projects(),
            seed_sample_backlog: true,
            ai: AiSettings::default(),
        }
    }
}

impl RoadmapConfig {
    /// Loads the config from the provided path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    /// Resolves and loads the config.
    ///
    /// An explicit path (argument or environment variable) must exist; the
    /// default location may be absent, in which case defaults are used.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load(path);
        }

        let path = default_config_path()?;
        if path.exists() {
            Self::load(path)
        } else {
            log::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Writes the default config, refusing to overwrite unless forced
    pub fn write_default<P: AsRef<Path>>(path: P, force: bool) -> Result<()> {
        let path = path.as_ref();
        if path.exists() && !force {
            anyhow::bail!("Config file already exists: {:?} (use --force to overwrite)", path);
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(&Self::default())?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Organizational registry seeded from this config
    pub fn registry(&self) -> OrgRegistry {
        OrgRegistry::with_entries(
            NameList::new(self.stakeholders.iter().cloned()),
            NameList::new(self.locations.iter().cloned()),
            NameList::new(self.business_processes.iter().cloned()),
            self.teams.clone(),
            self.projects.clone(),
        )
    }

    /// Live backlog the session starts from
    pub fn initial_backlog(&self) -> RequestRepository {
        if self.seed_sample_backlog {
            RequestRepository::from_requests(defaults::sample_backlog())
        } else {
            RequestRepository::new()
        }
    }
}

/// Gets the default config file path
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
    Ok(config_dir.join("rice-roadmap").join("config.yaml"))
}
