use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::backend::error::StorageResult;
use crate::backend::models::Session;
use crate::backend::store::KeyValueStore;

pub const SESSION_KEY: &str = "unicms:user";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than "dark" is light.
    pub fn parse(raw: &str) -> Self {
        if raw.trim() == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// The signed-in identity, persisted under [`SESSION_KEY`].
///
/// Every change made through `set` or picked up by `reload` is published to
/// subscribers. Reads never fail: anything unreadable is treated as signed out.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let current = read_session(backend.as_ref());
        let (tx, _rx) = watch::channel(current);
        Self { backend, tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Option<Session> {
        read_session(self.backend.as_ref())
    }

    pub fn set(&self, session: Option<Session>) -> StorageResult<()> {
        match &session {
            Some(s) => {
                let raw = serde_json::to_string(s)?;
                self.backend.put(SESSION_KEY, &raw)?;
                info!("Signed in as {} ({:?})", s.email, s.role);
            }
            None => {
                self.backend.remove(SESSION_KEY)?;
                info!("Signed out");
            }
        }
        self.tx.send_replace(session);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Re-reads storage after an outside change (another tab or window) and
    /// notifies subscribers if the session differs from the last one seen.
    pub fn reload(&self) {
        let current = self.get();
        let changed = self.tx.send_if_modified(|seen| {
            if *seen != current {
                *seen = current.clone();
                true
            } else {
                false
            }
        });
        if changed {
            debug!("Session changed outside this view");
        }
    }

    pub fn theme(&self) -> Theme {
        match self.backend.get(THEME_KEY) {
            Ok(Some(raw)) => Theme::parse(&raw),
            Ok(None) => Theme::Light,
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                Theme::Light
            }
        }
    }

    pub fn set_theme(&self, theme: Theme) -> StorageResult<()> {
        self.backend.put(THEME_KEY, theme.as_str())
    }
}

fn read_session(backend: &dyn KeyValueStore) -> Option<Session> {
    let raw = match backend.get(SESSION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!("Failed to read session: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            debug!("Ignoring unparsable session: {}", e);
            None
        }
    }
}
