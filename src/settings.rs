use crate::store::{JsonDirStore, MemoryStore, StoreHandle};
use crate::widgets::SearchEngine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Directory holding one JSON file per store key. When `None` the
    /// dashboard keeps its state in memory only.
    #[serde(default)]
    pub store_dir: Option<String>,
    /// When enabled the logger is initialised at debug level and honours
    /// `RUST_LOG`.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Engine used when a search intent does not name one.
    #[serde(default)]
    pub search_engine: SearchEngine,
    /// Interval in seconds between clock updates.
    #[serde(default = "default_clock_refresh")]
    pub clock_refresh: f32,
    /// Interval in seconds between weather fetches.
    #[serde(default = "default_weather_refresh")]
    pub weather_refresh: f32,
    /// Interval in seconds between countdown refreshes.
    #[serde(default = "default_countdown_refresh")]
    pub countdown_refresh: f32,
    /// Delay after the last memo edit before it is saved automatically.
    #[serde(default = "default_memo_autosave_ms")]
    pub memo_autosave_ms: u64,
}

fn default_clock_refresh() -> f32 {
    1.0
}

fn default_weather_refresh() -> f32 {
    30.0 * 60.0
}

fn default_countdown_refresh() -> f32 {
    60.0
}

fn default_memo_autosave_ms() -> u64 {
    1_000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_dir: None,
            debug_logging: false,
            log_file: None,
            search_engine: SearchEngine::default(),
            clock_refresh: default_clock_refresh(),
            weather_refresh: default_weather_refresh(),
            countdown_refresh: default_countdown_refresh(),
            memo_autosave_ms: default_memo_autosave_ms(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Open the store described by these settings.
    pub fn open_store(&self) -> StoreHandle {
        match &self.store_dir {
            Some(dir) => Arc::new(JsonDirStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        }
    }

    pub fn clock_interval(&self) -> Duration {
        interval("clock_refresh", self.clock_refresh, default_clock_refresh())
    }

    pub fn weather_interval(&self) -> Duration {
        interval("weather_refresh", self.weather_refresh, default_weather_refresh())
    }

    pub fn countdown_interval(&self) -> Duration {
        interval(
            "countdown_refresh",
            self.countdown_refresh,
            default_countdown_refresh(),
        )
    }

    pub fn memo_autosave_delay(&self) -> Duration {
        Duration::from_millis(self.memo_autosave_ms)
    }
}

fn interval(name: &str, secs: f32, default: f32) -> Duration {
    if secs.is_finite() && secs > 0.0 && secs < 1.0e9 {
        return Duration::from_secs_f32(secs);
    }
    tracing::warn!("setting {name} = {secs} is not a usable interval; using {default}s");
    Duration::from_secs_f32(default)
}
