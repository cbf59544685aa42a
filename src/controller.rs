//! Application state and the operations a user can perform on it.
//!
//! [`AppState::apply`] is a pure transition: it takes an event and returns
//! the next state plus the effects to run. [`Controller`] owns the state and
//! runs the effects (network, geolocation, persistence), feeding their
//! results back in as events.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::WeatherSource;
use crate::error::{LocationError, StoreError, WeatherError};
use crate::forecast::reduce_forecast;
use crate::location::Geolocator;
use crate::models::{
    Coordinates, CurrentConditions, ForecastSample, LocationQuery, Preferences, Theme,
    UnitSystem, WeatherReport,
};
use crate::store::PreferenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error,
}

/// One-shot message for the user; cleared by [`Event::Acknowledge`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    QueryNotFound { by_coordinates: bool },
    LocationUnavailable(LocationError),
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Self::QueryNotFound {
                by_coordinates: false,
            } => "City not found!",
            Self::QueryNotFound {
                by_coordinates: true,
            } => "Could not fetch your location's weather.",
            Self::LocationUnavailable(LocationError::Unsupported) => "Geolocation not supported.",
            Self::LocationUnavailable(LocationError::PermissionDenied) => {
                "Location permission denied."
            }
        }
    }
}

#[derive(Debug)]
pub enum Event {
    Search(String),
    SelectSavedCity(String),
    UseMyLocation,
    Located {
        seq: u64,
        result: Result<Coordinates, LocationError>,
    },
    Fetched {
        seq: u64,
        result: Result<WeatherReport, WeatherError>,
    },
    Acknowledge,
    Cancel,
    SaveCurrentCity,
    ToggleUnit,
    ToggleTheme,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Fetch {
        seq: u64,
        query: LocationQuery,
        units: UnitSystem,
    },
    Locate {
        seq: u64,
    },
    PersistCities(Vec<String>),
    PersistTheme(Theme),
}

impl Effect {
    fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistCities(_) | Self::PersistTheme(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRequest {
    seq: u64,
    by_coordinates: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub query: String,
    pub phase: Phase,
    pub current: Option<CurrentConditions>,
    pub forecast: Vec<ForecastSample>,
    pub unit: UnitSystem,
    pub theme: Theme,
    pub saved_cities: Vec<String>,
    pub notice: Option<Notice>,
    last_seq: u64,
    pending: Option<PendingRequest>,
}

impl AppState {
    pub fn new(preferences: Preferences) -> Self {
        Self {
            theme: preferences.theme,
            saved_cities: preferences.cities,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// Whether a response tagged `seq` would still be applied
    pub fn is_awaiting(&self, seq: u64) -> bool {
        self.pending.is_some_and(|p| p.seq == seq)
    }

    pub fn apply(&self, event: Event) -> (AppState, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::Search(text) | Event::SelectSavedCity(text) => {
                if let Some(query) = LocationQuery::place_name(&text) {
                    let seq = next.begin_request(false);
                    next.query = text;
                    next.phase = Phase::Loading;
                    effects.push(Effect::Fetch {
                        seq,
                        query,
                        units: next.unit,
                    });
                }
            }
            Event::UseMyLocation => {
                let seq = next.begin_request(true);
                effects.push(Effect::Locate { seq });
            }
            Event::Located { seq, result } => {
                if !self.is_awaiting(seq) {
                    return (next, effects);
                }
                match result {
                    Ok(coords) => {
                        next.phase = Phase::Loading;
                        effects.push(Effect::Fetch {
                            seq,
                            query: LocationQuery::Coordinates(coords),
                            units: next.unit,
                        });
                    }
                    Err(e) => {
                        next.pending = None;
                        next.fail(Notice::LocationUnavailable(e));
                    }
                }
            }
            Event::Fetched { seq, result } => {
                if !self.is_awaiting(seq) {
                    return (next, effects);
                }
                let by_coordinates = next.pending.take().is_some_and(|p| p.by_coordinates);
                match result {
                    Ok(report) => {
                        next.forecast = reduce_forecast(&report.forecast);
                        next.query = report.current.name.clone();
                        next.current = Some(report.current);
                        next.phase = Phase::Loaded;
                    }
                    Err(_) => next.fail(Notice::QueryNotFound { by_coordinates }),
                }
            }
            Event::Acknowledge => {
                if next.phase == Phase::Error {
                    next.notice = None;
                    next.phase = next.settled_phase();
                }
            }
            Event::Cancel => {
                if next.pending.take().is_some() && next.phase == Phase::Loading {
                    next.phase = next.settled_phase();
                }
            }
            Event::SaveCurrentCity => {
                if next.phase == Phase::Loaded {
                    let name = next.current.as_ref().map(|c| c.name.clone());
                    if let Some(name) = name.filter(|n| !n.is_empty()) {
                        if !next.saved_cities.contains(&name) {
                            next.saved_cities.push(name);
                            effects.push(Effect::PersistCities(next.saved_cities.clone()));
                        }
                    }
                }
            }
            Event::ToggleUnit => {
                next.unit = next.unit.toggle();
            }
            Event::ToggleTheme => {
                next.theme = next.theme.toggle();
                effects.push(Effect::PersistTheme(next.theme));
            }
        }

        (next, effects)
    }

    /// Supersedes any outstanding request and returns the new sequence number
    fn begin_request(&mut self, by_coordinates: bool) -> u64 {
        self.last_seq += 1;
        self.pending = Some(PendingRequest {
            seq: self.last_seq,
            by_coordinates,
        });
        if self.phase == Phase::Error {
            self.notice = None;
            self.phase = self.settled_phase();
        }
        self.last_seq
    }

    fn fail(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.phase = Phase::Error;
    }

    fn settled_phase(&self) -> Phase {
        if self.current.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }
}

/// Owns the application state and performs its side effects
pub struct Controller<W, G> {
    source: W,
    locator: G,
    store: Arc<dyn PreferenceStore>,
    state: Mutex<AppState>,
}

impl<W: WeatherSource, G: Geolocator> Controller<W, G> {
    pub fn new(source: W, locator: G, store: Arc<dyn PreferenceStore>) -> Self {
        let preferences = store.load();
        tracing::info!(
            "Loaded {} saved cities, theme {}",
            preferences.cities.len(),
            preferences.theme.as_str()
        );

        Self {
            source,
            locator,
            store,
            state: Mutex::new(AppState::new(preferences)),
        }
    }

    pub fn state(&self) -> AppState {
        self.state.lock().clone()
    }

    pub async fn search(&self, text: &str) -> Result<AppState, StoreError> {
        tracing::info!("Search: {:?}", text);
        self.dispatch(Event::Search(text.to_string())).await
    }

    pub async fn select_saved_city(&self, name: &str) -> Result<AppState, StoreError> {
        tracing::info!("Selected saved city: {}", name);
        self.dispatch(Event::SelectSavedCity(name.to_string())).await
    }

    pub async fn use_my_location(&self) -> Result<AppState, StoreError> {
        tracing::info!("Looking up weather for device location");
        self.dispatch(Event::UseMyLocation).await
    }

    pub async fn save_current_city(&self) -> Result<AppState, StoreError> {
        self.dispatch(Event::SaveCurrentCity).await
    }

    pub async fn toggle_unit(&self) -> Result<AppState, StoreError> {
        self.dispatch(Event::ToggleUnit).await
    }

    pub async fn toggle_theme(&self) -> Result<AppState, StoreError> {
        self.dispatch(Event::ToggleTheme).await
    }

    pub async fn acknowledge(&self) -> Result<AppState, StoreError> {
        self.dispatch(Event::Acknowledge).await
    }

    pub async fn cancel(&self) -> Result<AppState, StoreError> {
        self.dispatch(Event::Cancel).await
    }

    /// Applies `event` and every event produced by its effects.
    ///
    /// A transition whose persistence fails is not committed.
    pub async fn dispatch(&self, event: Event) -> Result<AppState, StoreError> {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let effects = {
                let mut state = self.state.lock();
                if let Event::Fetched { seq, .. } | Event::Located { seq, .. } = &event {
                    if !state.is_awaiting(*seq) {
                        tracing::debug!("Dropping stale response for request {}", seq);
                        continue;
                    }
                }

                let (next, effects) = state.apply(event);
                let (persist, deferred): (Vec<_>, Vec<_>) =
                    effects.into_iter().partition(Effect::is_persistence);
                for effect in persist {
                    self.persist(effect)?;
                }
                *state = next;
                deferred
            };

            for effect in effects {
                if let Some(follow_up) = self.run(effect).await {
                    queue.push_back(follow_up);
                }
            }
        }

        Ok(self.state())
    }

    fn persist(&self, effect: Effect) -> Result<(), StoreError> {
        match effect {
            Effect::PersistCities(cities) => {
                tracing::info!("Saving {} cities", cities.len());
                self.store.save_cities(&cities)
            }
            Effect::PersistTheme(theme) => {
                tracing::info!("Switching theme to {}", theme.as_str());
                self.store.save_theme(theme)
            }
            Effect::Fetch { .. } | Effect::Locate { .. } => Ok(()),
        }
    }

    async fn run(&self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Fetch { seq, query, units } => Some(Event::Fetched {
                seq,
                result: self.source.fetch_weather(&query, units).await,
            }),
            Effect::Locate { seq } => Some(Event::Located {
                seq,
                result: self.locator.current_position().await,
            }),
            Effect::PersistCities(_) | Effect::PersistTheme(_) => None,
        }
    }
}
