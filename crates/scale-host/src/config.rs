use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use scale_control::{
    Description, DisplayMode, HitTolerance, LayoutModeSelector, RangeError, RangeModel,
    ScaleControl, Size, UnitSize, ViewMetrics,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RangeConfig {
    pub minimum: i64,
    pub maximum: i64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        let range = RangeModel::default();
        Self {
            minimum: range.lower(),
            maximum: range.upper(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DescriptionConfig {
    pub minimum: Option<String>,
    pub maximum: Option<String>,
}

/// Stand-in for what a real view would measure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    pub width: f64,
    pub height: f64,
    pub font_scale: f64,
    pub display_scale: f64,
    pub compact: bool,
    pub mode: Option<DisplayMode>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            font_scale: 1.0,
            display_scale: 1.0,
            compact: false,
            mode: None,
        }
    }
}

impl ViewConfig {
    pub fn metrics(&self) -> ViewMetrics {
        ViewMetrics {
            available: Size::new(self.width, self.height),
            unit: UnitSize::scaled(self.font_scale, self.display_scale),
            compact: self.compact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub range: RangeConfig,
    pub selected: Option<i64>,
    pub descriptions: DescriptionConfig,
    pub view: ViewConfig,
    pub layout: LayoutModeSelector,
    pub tolerance: HitTolerance,
    pub selector_inset: f64,
    /// Largest range that still gets one label per value.
    pub label_limit: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            range: RangeConfig::default(),
            selected: None,
            descriptions: DescriptionConfig::default(),
            view: ViewConfig::default(),
            layout: LayoutModeSelector::default(),
            tolerance: HitTolerance::default(),
            selector_inset: ScaleControl::DEFAULT_SELECTOR_INSET,
            label_limit: ScaleControl::DEFAULT_LABEL_LIMIT,
        }
    }
}

impl Config {
    /// The configured range, refused when it is inverted or has more values
    /// than `label_limit`.
    pub fn range_model(&self) -> Result<RangeModel, RangeError> {
        let range = RangeModel::new(self.range.minimum, self.range.maximum)?;
        range.check_count(self.label_limit)?;
        Ok(range)
    }

    /// Builds a control with the configured initial selection.
    pub fn build_control(&self) -> Result<ScaleControl, RangeError> {
        let mut control = ScaleControl::default();
        self.apply(&mut control)?;
        control.set_selected_value(self.selected, false);
        control.update();
        Ok(control)
    }

    /// Applies everything except the selection, which belongs to the user
    /// once the control is live. Leaves `control` untouched on error.
    pub fn apply(&self, control: &mut ScaleControl) -> Result<(), RangeError> {
        let range = self.range_model()?;
        control.set_minimum_value(range.lower());
        control.set_maximum_value(range.upper());

        control.set_minimum_description(self.descriptions.minimum.clone().map(Description::new));
        control.set_maximum_description(self.descriptions.maximum.clone().map(Description::new));
        control.set_selector(self.layout);
        control.set_tolerance(self.tolerance);
        control.set_label_limit(self.label_limit);
        control.set_selector_inset(self.selector_inset);
        control.set_metrics(self.view.metrics());
        control.set_mode_override(self.view.mode);
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "scale", "scale-host").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("SCALE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::HostEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<HostEvent>) {
    if let Err(e) = watch_config(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

/// Sends a reload event whenever the config file is written, created or
/// removed. Returns once the host stops listening.
async fn watch_config(tx: Sender<HostEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .to_path_buf();
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Watch error: {}", ConfigError::from(e));
                continue;
            }
        };
        let touches_config = matches!(
            event.kind,
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
        ) && event.paths.contains(&config_path);

        if touches_config && tx.send(HostEvent::ConfigReload).await.is_err() {
            break;
        }
    }
    Ok(())
}
