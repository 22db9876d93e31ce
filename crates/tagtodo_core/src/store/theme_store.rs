//! Light/dark theme preference.
//!
//! Shares the task store's persistence contract: one string value under
//! `@theme_mode`, no write before the initial load, failures logged only.

use crate::persist::{SettleReport, SnapshotWriter};
use crate::storage::{KeyValueStorage, THEME_KEY};
use log::{error, info, warn};
use std::sync::Arc;
use tokio::runtime::Handle;

/// Persisted theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    /// Stored representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses a stored value; anything but `dark`/`light` is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Owner of the theme preference.
pub struct ThemeStore<S: KeyValueStorage> {
    mode: ThemeMode,
    /// `Some` until `load` completes; holds the latest mode set meanwhile.
    loading: Option<Option<ThemeMode>>,
    writer: SnapshotWriter<S>,
}

impl<S: KeyValueStorage> ThemeStore<S> {
    pub fn new(storage: Arc<S>, runtime: Handle) -> Self {
        Self {
            mode: ThemeMode::default(),
            loading: Some(None),
            writer: SnapshotWriter::new(storage, THEME_KEY, runtime),
        }
    }

    /// Reads the stored preference; missing or unreadable values fall back to
    /// light. A mode set while loading wins over the stored one.
    pub async fn load(&mut self) -> ThemeMode {
        let Some(deferred) = self.loading.take() else {
            return self.mode;
        };

        let stored = match self.writer.read().await {
            Ok(Some(value)) => ThemeMode::parse(&value).unwrap_or_else(|| {
                warn!("event=theme_load module=store status=error error_code=unknown_value");
                ThemeMode::default()
            }),
            Ok(None) => ThemeMode::default(),
            Err(err) => {
                error!("event=theme_load module=store status=error error_code=read_failed error={err}");
                ThemeMode::default()
            }
        };

        self.mode = deferred.unwrap_or(stored);
        if deferred.is_some() {
            self.schedule_write();
        }
        info!(
            "event=theme_load module=store status=ok mode={} deferred={}",
            self.mode.as_str(),
            deferred.is_some()
        );
        self.mode
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    /// Sets the mode; a value equal to the current one writes nothing.
    pub fn set_mode(&mut self, mode: ThemeMode) {
        if let Some(deferred) = self.loading.as_mut() {
            self.mode = mode;
            *deferred = Some(mode);
            return;
        }
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.schedule_write();
    }

    /// Switches between light and dark and returns the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    pub async fn settle(&mut self) -> SettleReport {
        self.writer.settle().await
    }

    fn schedule_write(&mut self) {
        let mode = self.mode;
        self.writer.schedule(move || Ok(mode.as_str().to_string()));
    }
}
