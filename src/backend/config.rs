#[cfg(not(target_arch = "wasm32"))]
use std::env;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api/v1";

/// Runtime settings. In the browser there is no process environment, so the
/// API base is fixed at build time through `UNICMS_API`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    #[cfg(not(target_arch = "wasm32"))]
    pub state_db: PathBuf,
}

impl AppConfig {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api = env::var("UNICMS_API")
            .ok()
            .or_else(|| option_env!("UNICMS_API").map(str::to_string));

        let state_db = env::var("UNICMS_STATE_DB")
            .unwrap_or_else(|_| "unicms.db".to_string())
            .into();

        Self {
            api_base_url: normalize_base_url(api.as_deref()),
            state_db,
        }
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self {
            api_base_url: normalize_base_url(option_env!("UNICMS_API")),
        }
    }
}

/// Blank means the default; trailing slashes are dropped so paths can be
/// appended as `/courses`.
pub fn normalize_base_url(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => DEFAULT_API_BASE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_and_trims() {
        assert_eq!(normalize_base_url(None), DEFAULT_API_BASE);
        assert_eq!(normalize_base_url(Some("   ")), DEFAULT_API_BASE);
        assert_eq!(
            normalize_base_url(Some(" https://ucms.example.com/api/v1/ ")),
            "https://ucms.example.com/api/v1"
        );
    }

    #[test]
    fn loads_from_env() {
        env::set_var("UNICMS_API", "http://test:9000/api/v1/");
        env::set_var("UNICMS_STATE_DB", "/tmp/unicms-test.db");

        let cfg = AppConfig::from_env();
        assert_eq!(cfg.api_base_url, "http://test:9000/api/v1");
        assert_eq!(cfg.state_db, PathBuf::from("/tmp/unicms-test.db"));

        env::remove_var("UNICMS_API");
        env::remove_var("UNICMS_STATE_DB");
    }
}
