pub mod analytics;
pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod guard;
pub mod insights;
pub mod models;
pub mod notify;
pub mod session;
pub mod store;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use api::CourseApi;
use config::AppConfig;
use notify::Toaster;
use session::SessionStore;
#[cfg(target_arch = "wasm32")]
use store::BrowserStore;

/// Everything the views talk to. Cheap to clone; provided once at the root
/// as context.
#[derive(Clone)]
pub struct Services {
    pub api: CourseApi,
    pub session: SessionStore,
    pub toaster: Toaster,
    #[cfg(target_arch = "wasm32")]
    pub browser_store: Arc<BrowserStore>,
}

impl Services {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn init(config: AppConfig) -> Self {
        let backend: Arc<dyn store::KeyValueStore> = match store::SqliteStore::open(&config.state_db) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::warn!(
                    "Failed to open state store at {}: {}; session will not persist",
                    config.state_db.display(),
                    e
                );
                Arc::new(store::MemoryStore::new())
            }
        };
        tracing::info!("Using API at {}", config.api_base_url);
        Self {
            api: CourseApi::new(&config.api_base_url),
            session: SessionStore::new(backend),
            toaster: Toaster::default(),
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn init(config: AppConfig) -> Self {
        let browser_store = Arc::new(BrowserStore::new());
        tracing::info!("Using API at {}", config.api_base_url);
        Self {
            api: CourseApi::new(&config.api_base_url),
            session: SessionStore::new(browser_store.clone()),
            toaster: Toaster::default(),
            browser_store,
        }
    }
}

/// Runs a future outside any component scope.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_detached<F>(fut: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(fut);
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_detached<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(fut);
}

pub async fn sleep(duration: Duration) {
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
}
