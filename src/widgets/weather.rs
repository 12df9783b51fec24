//! Weather display backed by an external provider.
use crate::store::{StoreHandle, WEATHER_API_KEY};
use crate::widget_state::WidgetState;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

/// Key used when none has been configured.
pub const DEMO_API_KEY: &str = "demo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub description: String,
    /// Provider icon code such as `01d`.
    pub icon: String,
    pub city: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Source of weather data. `fetch` runs on a background thread and may
/// block for as long as it needs.
pub trait WeatherProvider: Send + Sync {
    fn fetch(&self, api_key: &str) -> anyhow::Result<WeatherSnapshot>;
}

/// Provider returning fixed sample data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoWeatherProvider;

impl WeatherProvider for DemoWeatherProvider {
    fn fetch(&self, _api_key: &str) -> anyhow::Result<WeatherSnapshot> {
        Ok(WeatherSnapshot {
            temperature: 15.0,
            description: "晴れ".into(),
            icon: "01d".into(),
            city: "東京".into(),
            humidity: 60,
            wind_speed: 3.5,
        })
    }
}

/// Map a provider icon code to an icon class using its first two digits.
pub fn icon_class(icon: &str) -> &'static str {
    match icon.get(..2).unwrap_or_default() {
        "01" => "fa-sun",
        "02" => "fa-cloud-sun",
        "03" | "04" => "fa-cloud",
        "09" => "fa-cloud-rain",
        "10" => "fa-cloud-sun-rain",
        "11" => "fa-bolt",
        "13" => "fa-snowflake",
        "50" => "fa-smog",
        _ => "fa-cloud",
    }
}

/// Snapshot prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub temperature: i64,
    pub description: String,
    pub city: String,
    pub humidity: u8,
    /// Wind speed with one decimal.
    pub wind_speed: String,
    pub icon_class: &'static str,
}

impl From<&WeatherSnapshot> for WeatherView {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            temperature: s.temperature.round() as i64,
            description: s.description.clone(),
            city: s.city.clone(),
            humidity: s.humidity,
            wind_speed: format!("{:.1}", s.wind_speed),
            icon_class: icon_class(&s.icon),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherStatus {
    Loading,
    Ready(WeatherView),
    Unavailable,
}

type FetchResult = anyhow::Result<WeatherSnapshot>;

pub struct WeatherWidget {
    api_key: WidgetState<Option<String>>,
    status: WeatherStatus,
    pending: Option<Receiver<FetchResult>>,
}

impl WeatherWidget {
    pub fn load(store: StoreHandle) -> Self {
        Self {
            api_key: WidgetState::load(store, WEATHER_API_KEY, || None),
            status: WeatherStatus::Loading,
            pending: None,
        }
    }

    pub fn api_key(&self) -> &str {
        self.api_key
            .get()
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .unwrap_or(DEMO_API_KEY)
    }

    pub fn set_api_key(&mut self, key: Option<String>) -> anyhow::Result<()> {
        let key = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());
        self.api_key.replace(key)
    }

    pub fn status(&self) -> &WeatherStatus {
        &self.status
    }

    /// Whether a fetch has been started and its result not yet applied.
    pub fn is_fetching(&self) -> bool {
        self.pending.is_some()
    }

    /// Start fetching on a background thread. The shown status is left as
    /// it is until [`WeatherWidget::poll`] picks up the result. A fetch that
    /// is still running is abandoned and its result ignored.
    pub fn request(&mut self, provider: &Arc<dyn WeatherProvider>) {
        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(provider);
        let api_key = self.api_key().to_string();
        let spawned = std::thread::Builder::new()
            .name("weather-fetch".into())
            .spawn(move || {
                // the receiver is gone when a newer fetch replaced this one
                let _ = tx.send(provider.fetch(&api_key));
            });
        match spawned {
            Ok(_) => self.pending = Some(rx),
            Err(e) => {
                self.pending = None;
                self.apply(Err(anyhow::Error::new(e).context("failed to start weather fetch")));
            }
        }
    }

    /// Apply the result of a finished fetch, if there is one. Returns `true`
    /// when the status was updated.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("weather fetch ended without a result")),
        };
        self.pending = None;
        self.apply(result);
        true
    }

    /// Replace the shown status with the outcome of a fetch. A failure only
    /// changes what is shown.
    pub fn apply(&mut self, result: FetchResult) -> &WeatherStatus {
        self.status = match result {
            Ok(snapshot) => WeatherStatus::Ready(WeatherView::from(&snapshot)),
            Err(e) => {
                tracing::warn!("weather unavailable: {e:#}");
                WeatherStatus::Unavailable
            }
        };
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    struct FailingProvider;

    impl WeatherProvider for FailingProvider {
        fn fetch(&self, _api_key: &str) -> anyhow::Result<WeatherSnapshot> {
            anyhow::bail!("network down")
        }
    }

    #[test]
    fn demo_data_is_rendered() {
        let mut widget = WeatherWidget::load(MemoryStore::shared());
        assert_eq!(widget.status(), &WeatherStatus::Loading);
        match widget.apply(DemoWeatherProvider.fetch(DEMO_API_KEY)) {
            WeatherStatus::Ready(view) => {
                assert_eq!(view.temperature, 15);
                assert_eq!(view.wind_speed, "3.5");
                assert_eq!(view.icon_class, "fa-sun");
                assert_eq!(view.city, "東京");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn provider_failure_marks_unavailable() {
        let mut widget = WeatherWidget::load(MemoryStore::shared());
        assert_eq!(
            widget.apply(FailingProvider.fetch("k")),
            &WeatherStatus::Unavailable
        );
    }

    fn wait_for_result(widget: &mut WeatherWidget) {
        for _ in 0..200 {
            if widget.poll() {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        panic!("weather fetch did not finish");
    }

    #[test]
    fn request_fetches_in_background() {
        let mut widget = WeatherWidget::load(MemoryStore::shared());
        let provider: Arc<dyn WeatherProvider> = Arc::new(DemoWeatherProvider);
        widget.request(&provider);
        assert!(widget.is_fetching());
        wait_for_result(&mut widget);
        assert!(!widget.is_fetching());
        assert!(matches!(widget.status(), WeatherStatus::Ready(_)));
        assert!(!widget.poll());
    }

    #[test]
    fn failed_background_fetch_marks_unavailable() {
        let mut widget = WeatherWidget::load(MemoryStore::shared());
        let provider: Arc<dyn WeatherProvider> = Arc::new(FailingProvider);
        widget.request(&provider);
        wait_for_result(&mut widget);
        assert_eq!(widget.status(), &WeatherStatus::Unavailable);
    }

    #[test]
    fn icon_codes_fall_back_to_cloud() {
        assert_eq!(icon_class("10n"), "fa-cloud-sun-rain");
        assert_eq!(icon_class("99d"), "fa-cloud");
        assert_eq!(icon_class(""), "fa-cloud");
    }

    #[test]
    fn api_key_defaults_to_demo() {
        let store = MemoryStore::shared();
        let mut widget = WeatherWidget::load(store.clone());
        assert_eq!(widget.api_key(), DEMO_API_KEY);
        widget.set_api_key(Some(" abc ".into())).unwrap();
        assert_eq!(WeatherWidget::load(store).api_key(), "abc");
    }
}
