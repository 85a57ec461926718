use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::{ItemId, LoadError, MenuConfig, MenuItem, Viewport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

fn default_true() -> bool {
    true
}

/// One menu entry as written in `config.toml` or an included file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub id: ItemId,
    /// Falls back to the id.
    pub label: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_true")]
    pub selectable: bool,
    #[serde(default)]
    pub children: Vec<ItemConfig>,
    /// Items file read on first entry, relative to the including file.
    pub include: Option<PathBuf>,
}

impl ItemConfig {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }

    pub fn to_item(&self, base: &Path) -> MenuItem {
        let item = MenuItem::new(self.id.clone(), self.label())
            .with_disabled(self.disabled)
            .with_selectable(self.selectable);

        if let Some(include) = &self.include {
            let path = base.join(include);
            item.with_loader(move || load_items_file(path.clone()))
        } else if self.children.is_empty() {
            item
        } else {
            item.with_children(self.children.iter().map(|c| c.to_item(base)).collect())
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ItemsFile {
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub menu: MenuConfig,
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl AppConfig {
    /// The menu config, repaired when it would be rejected by the engine.
    pub fn menu_config(&self) -> MenuConfig {
        match self.menu.validate() {
            Ok(()) => self.menu.clone(),
            Err(e) => {
                log::warn!("Invalid menu config ({}), clamping", e);
                self.menu.clamped()
            }
        }
    }

    pub fn build_items(&self, base: &Path) -> Vec<MenuItem> {
        self.items.iter().map(|c| c.to_item(base)).collect()
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
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// Directory that relative `include` paths are resolved against.
pub fn base_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(config::Environment::with_prefix("ORBIT").separator("__"))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Like [`load_config`], but a broken file only costs a warning.
pub fn load_or_default(path: &Path) -> AppConfig {
    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Failed to load {}: {}", path.display(), e);
            AppConfig::default()
        }
    }
}

pub fn parse_items(text: &str) -> Result<ItemsFile, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(text, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loader behind `include = "..."` items.
pub async fn load_items_file(path: PathBuf) -> Result<Vec<MenuItem>, LoadError> {
    log::debug!("Reading items from {}", path.display());
    let text = fs_err::tokio::read_to_string(&path)
        .await
        .map_err(LoadError::new)?;
    let file = parse_items(&text).map_err(LoadError::new)?;
    let base = base_dir(&path);
    Ok(file.items.iter().map(|c| c.to_item(&base)).collect())
}

/// Writes the default menu definition and the items file it includes,
/// leaving existing files alone.
pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    let base = base_dir(path);
    fs_err::create_dir_all(&base)?;
    for (target, contents) in [
        (path.to_path_buf(), DEFAULT_CONFIG),
        (base.join(DEFAULT_INCLUDE), DEFAULT_RECENT),
    ] {
        if !target.exists() {
            fs_err::write(&target, contents)?;
        }
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");
const DEFAULT_RECENT: &str = include_str!("default_recent.toml");
const DEFAULT_INCLUDE: &str = "recent.toml";

/// True for events that should make the menu definition reload.
fn is_reload_event(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

fn watch_config_dir(
    config_dir: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, ConfigError> {
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(config_dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Sends [`AppEvent::ConfigReload`] whenever the menu definition changes.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = base_dir(&config_path);
    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create {} for watching: {}", config_dir.display(), e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let _watcher = match watch_config_dir(&config_dir, bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Not watching {}: {}", config_path.display(), e);
            return;
        }
    };
    log::debug!("Watching {} for changes", config_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_reload_event(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
