//! Server configuration read once from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `GRIND_DB_PATH` | `grind.db` |
//! | `GRIND_PORT` | `3000` |
//! | `GRIND_ADMIN_EMAIL` | `admin@grindstories.com` |
//! | `GRIND_ADMIN_PASSWORD` | `the beast, 123` |
//! | `GRIND_DEFAULT_AUTHOR` | `A. Vanderbilt` |
//! | `GEMINI_API_KEY` | unset |
//! | `GEMINI_MODEL` | `gemini-2.5-flash` |
//! | `GEMINI_API_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` |

pub const DEFAULT_DB_PATH: &str = "grind.db";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@grindstories.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "the beast, 123";
pub const DEFAULT_AUTHOR: &str = "A. Vanderbilt";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// `None` (or blank) disables generation.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

/// Everything the server reads from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: String,
    pub port: String,
    pub admin_email: String,
    pub admin_password: String,
    /// Byline of new drafts.
    pub default_author: String,
    pub gemini: GeminiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_path: DEFAULT_DB_PATH.to_string(),
            port: DEFAULT_PORT.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            default_author: DEFAULT_AUTHOR.to_string(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source, falling back to
    /// defaults for unset or blank values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = ServerConfig::default();

        ServerConfig {
            db_path: var("GRIND_DB_PATH").unwrap_or(defaults.db_path),
            port: var("GRIND_PORT").unwrap_or(defaults.port),
            admin_email: var("GRIND_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: var("GRIND_ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            default_author: var("GRIND_DEFAULT_AUTHOR").unwrap_or(defaults.default_author),
            gemini: GeminiConfig {
                api_key: var("GEMINI_API_KEY"),
                model: var("GEMINI_MODEL").unwrap_or(defaults.gemini.model),
                api_base_url: var("GEMINI_API_BASE_URL")
                    .unwrap_or(defaults.gemini.api_base_url),
            },
        }
    }
}
