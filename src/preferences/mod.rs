//! Persisted dashboard preferences.
//!
//! [`Preferences`] records which widgets a user shows and where they sit on
//! each breakpoint. [`PreferencesStore`] loads them through a
//! [`PreferenceBackend`], reconciling against the current
//! [`WidgetCatalog`] on every load, and saves them after every mutation.
//!
//! Nothing here fails outward: an absent or corrupt record yields catalog
//! defaults, and a failed write is logged and the session carries on with
//! its in-memory preferences.
//!
//! # Example
//!
//! ```
//! use inventory_dashboard::catalog::WidgetCatalog;
//! use inventory_dashboard::preferences::{MemoryBackend, PreferencesStore};
//!
//! let mut store = PreferencesStore::new(MemoryBackend::new(), "alice", WidgetCatalog::builtin());
//! let prefs = store.load();
//! assert_eq!(prefs.visible_widgets.len(), 8);
//! store.save(&prefs);
//! assert!(store.backend().record("alice").is_some());
//! ```

pub mod backend;
pub mod reconcile;

pub use backend::{record_key, FileBackend, MemoryBackend, PreferenceBackend, StorageError};
pub use reconcile::{apply_min_sizes, parse_record, reconcile, CorruptPreferences};

use serde::{Deserialize, Serialize};

use crate::breakpoint::Breakpoint;
use crate::catalog::{WidgetCatalog, WidgetId};
use crate::layout::{Layout, ResponsiveLayouts};

/// A user's dashboard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Widgets shown on the dashboard, in display order.
    pub visible_widgets: Vec<WidgetId>,
    /// Widgets the user has explicitly hidden.
    ///
    /// Keeps a hidden widget from being treated as new (and re-shown) on
    /// the next load. Omitted from the record when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hidden_widgets: Vec<WidgetId>,
    /// Per-breakpoint layouts, including items of hidden widgets.
    pub layouts: ResponsiveLayouts,
}

impl Preferences {
    /// Every catalog widget visible at its default position.
    pub fn defaults(catalog: &WidgetCatalog) -> Self {
        Self {
            visible_widgets: catalog.all_ids(),
            hidden_widgets: Vec::new(),
            layouts: catalog.default_layouts(),
        }
    }

    /// Returns `true` if the widget is shown.
    pub fn is_visible(&self, id: &WidgetId) -> bool {
        self.visible_widgets.contains(id)
    }

    /// Layout of `breakpoint` restricted to visible widgets.
    pub fn visible_layout(&self, breakpoint: Breakpoint) -> Layout {
        self.layouts.get(breakpoint).filtered(&self.visible_widgets)
    }

    /// Flips a widget's visibility and returns whether it is now visible.
    ///
    /// Layouts are left untouched: a hidden widget keeps its item so it
    /// reappears where it was.
    pub fn toggle(&mut self, id: &WidgetId) -> bool {
        if let Some(pos) = self.visible_widgets.iter().position(|v| v == id) {
            self.visible_widgets.remove(pos);
            if !self.hidden_widgets.contains(id) {
                self.hidden_widgets.push(id.clone());
            }
            false
        } else {
            self.hidden_widgets.retain(|h| h != id);
            self.visible_widgets.push(id.clone());
            true
        }
    }
}

/// Loads and saves one user's preferences through a backend.
#[derive(Debug)]
pub struct PreferencesStore<B: PreferenceBackend> {
    backend: B,
    key: String,
    catalog: WidgetCatalog,
    session_only: bool,
}

impl<B: PreferenceBackend> PreferencesStore<B> {
    /// Creates a store for `user`'s record.
    pub fn new(backend: B, user: &str, catalog: WidgetCatalog) -> Self {
        Self {
            backend,
            key: user.to_string(),
            catalog,
            session_only: false,
        }
    }

    /// Catalog preferences are reconciled against.
    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    /// User name the record is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns `true` once a write has failed and saving has stopped.
    pub fn is_session_only(&self) -> bool {
        self.session_only
    }

    /// Catalog defaults.
    pub fn defaults(&self) -> Preferences {
        Preferences::defaults(&self.catalog)
    }

    /// Loads and reconciles the stored preferences.
    ///
    /// Returns catalog defaults if the record is absent, unreadable or
    /// structurally invalid.
    pub fn load(&self) -> Preferences {
        let raw = match self.backend.read(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored preferences for {}, using defaults", self.key);
                return self.defaults();
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                return self.defaults();
            }
        };

        match parse_record(&raw) {
            Ok(stored) => reconcile(stored, &self.catalog),
            Err(e) => {
                tracing::warn!("Ignoring preferences for {}: {}", self.key, e);
                self.defaults()
            }
        }
    }

    /// Persists `prefs`, overwriting the stored record.
    ///
    /// Failures are logged, never returned. After the first failed write
    /// the store stops writing for the rest of the session.
    pub fn save(&mut self, prefs: &Preferences) {
        if self.session_only {
            tracing::debug!("Preferences for {} are session-only, not saving", self.key);
            return;
        }
        if let Err(e) = self.try_save(prefs) {
            tracing::warn!(
                "{}; keeping preferences for this session only ({})",
                e,
                std::error::Error::source(&e)
                    .map(|s| s.to_string())
                    .unwrap_or_default()
            );
            self.session_only = true;
        }
    }

    /// Overwrites the stored record with catalog defaults and returns them.
    pub fn reset(&mut self) -> Preferences {
        let defaults = self.defaults();
        tracing::info!("Resetting dashboard preferences for {}", self.key);
        self.save(&defaults);
        defaults
    }

    fn try_save(&mut self, prefs: &Preferences) -> Result<(), StorageError> {
        let raw = serde_json::to_string(prefs)?;
        self.backend.write(&self.key, &raw)
    }
}
