use crate::events::AppEvent;
use crate::store::CategorySelector;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::{CarouselSettings, InputConfig, LayoutMode, LayoutParams, PageSize, ViewportKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub page_size: PageSize,
    pub layout: LayoutMode,
    pub breakpoint: u32,
    pub viewport_width: u32,
    pub ease_ms: u64,
    pub start_category: CategorySelector,
    pub input: InputConfig,
    pub tuning: LayoutParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            layout: LayoutMode::Carousel,
            breakpoint: orbit::layout::DEFAULT_BREAKPOINT,
            viewport_width: 1280,
            ease_ms: 250,
            start_category: CategorySelector::First,
            input: InputConfig::default(),
            tuning: LayoutParams::default(),
        }
    }
}

impl Config {
    pub fn carousel_settings(&self) -> CarouselSettings {
        CarouselSettings {
            page_size: self.page_size,
            params: self.tuning,
            viewport: ViewportKind::from_width(self.viewport_width, self.breakpoint),
            breakpoint: self.breakpoint,
            ease: Duration::from_millis(self.ease_ms),
            mode: self.layout,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "tabdeck", "tabdeck").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("TABDECK").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::error!("Falling back to default config: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
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

/// Sends `event` whenever `path` is created, modified or removed.
pub async fn run_async_watcher(path: PathBuf, event: AppEvent, tx: Sender<AppEvent>) {
    let dir = match path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&dir) {
        log::error!("Failed to create {} for watching: {}", dir.display(), e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch {}: {}", dir.display(), e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(change) => {
                let meaningful_event = matches!(
                    change.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && change.paths.iter().any(|p| p == &path)
                    && tx.send(event.clone()).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CategoryName;

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_bundled_config_matches_defaults() {
        assert_eq!(parse(DEFAULT_CONFIG).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse(
            r#"
            page_size = 5
            layout = "grid"
            start_category = "Work"

            [tuning]
            min_divisor = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.page_size.get(), 5);
        assert_eq!(config.layout, LayoutMode::Grid);
        assert_eq!(
            config.start_category,
            CategorySelector::Name(CategoryName::new("Work"))
        );
        assert_eq!(config.tuning.min_divisor, 6);
        assert_eq!(config.tuning.full, LayoutParams::default().full);
        assert_eq!(config.breakpoint, 768);
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        assert!(parse("page_size = 0").is_err());
    }

    #[test]
    fn test_settings_pick_viewport() {
        let config = Config {
            viewport_width: 600,
            ..Config::default()
        };
        let settings = config.carousel_settings();
        assert_eq!(settings.viewport, ViewportKind::Compact);
        assert_eq!(settings.ease, Duration::from_millis(250));
    }
}
