use anyhow::{bail, Context, Result};
use budget_core::RuleTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputSection,
    pub chart: ChartSection,
    /// Exact description -> category overrides, merged over the built-in rules
    pub rules: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSection {
    pub csv: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSection {
    pub bar_width: u16,
    pub bar_gap: u16,
    /// Rows used by the terminal chart, including its border
    pub height: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: InputSection::default(),
            chart: ChartSection::default(),
            rules: RuleTable::builtin()
                .iter()
                .map(|(d, c)| (d.to_string(), c.to_string()))
                .collect(),
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("transactions.csv"),
        }
    }
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            bar_width: 7,
            bar_gap: 2,
            height: 20,
        }
    }
}

impl Config {
    /// Built-in rules with this config's `[rules]` layered on top.
    pub fn rule_table(&self) -> RuleTable {
        RuleTable::builtin().extend(self.rules.clone())
    }
}

/// `<home>/.budget/config.toml`, or None without a usable home.
fn default_config_path(home: Option<OsString>) -> Option<PathBuf> {
    home.filter(|h| !h.is_empty())
        .map(|h| PathBuf::from(h).join(".budget").join("config.toml"))
}

/// `--config` if given, else ~/.budget/config.toml. Only computes the path;
/// nothing is created.
pub fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| default_config_path(std::env::var_os("HOME")))
}

/// Config for the report commands. No path (HOME unset, no `--config`) means defaults.
pub fn load_optional_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            log::info!("HOME is not set and no --config given, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: Config =
        toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    log::info!("loaded config from {} ({} rules)", path.display(), cfg.rules.len());
    Ok(cfg)
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Write the defaults to `path`, creating its directory. `path` is None only
/// when there is neither `--config` nor a HOME to put ~/.budget under.
pub fn init_config(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.context("HOME is not set; pass --config <path>")?;
    if path.exists() {
        bail!("config already exists: {}", path.display());
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    save_config(path, &Config::default())?;
    Ok(path.to_path_buf())
}
