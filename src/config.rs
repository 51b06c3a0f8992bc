use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Credential for the Resend API. Sending fails while it is unset.
    #[serde(default)]
    pub resend_api_key: Option<String>,
    /// Value expected in the `x-api-key` header of submission requests.
    #[serde(default, alias = "x_api_key")]
    pub api_key: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_template_dir")]
    pub template_dir: String,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
}

const fn default_port() -> u16 {
    3000
}

fn default_sender() -> String {
    "onboarding@resend.dev".to_string()
}

fn default_template_dir() -> String {
    "email-template".to_string()
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            api_key: None,
            port: default_port(),
            sender: default_sender(),
            template_dir: default_template_dir(),
            resend_base_url: default_resend_base_url(),
        }
    }
}

#[derive(Deserialize)]
struct EnvConfig {
    resend_api_key: Option<String>,
    x_api_key: Option<String>,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_sender")]
    sender: String,
    #[serde(default = "default_template_dir")]
    template_dir: String,
    #[serde(default = "default_resend_base_url")]
    resend_base_url: String,
}

impl From<EnvConfig> for Config {
    fn from(env: EnvConfig) -> Self {
        Self {
            resend_api_key: non_empty(env.resend_api_key),
            api_key: non_empty(env.x_api_key),
            port: env.port,
            sender: env.sender,
            template_dir: env.template_dir,
            resend_base_url: env.resend_base_url,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub const fn has_resend_api_key(&self) -> bool {
        self.resend_api_key.is_some()
    }
}

pub fn from_yaml(contents: &str, path: &str) -> Result<Config, ConfigError> {
    let mut cfg: Config = serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_string(),
        source,
    })?;
    cfg.api_key = non_empty(cfg.api_key);
    cfg.resend_api_key = non_empty(cfg.resend_api_key);
    Ok(cfg)
}

pub fn from_env() -> Result<Config, ConfigError> {
    from_vars(env::vars())
}

fn from_vars<I>(vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_cfg: EnvConfig = envy::from_iter(vars)?;
    Ok(env_cfg.into())
}

pub fn load_config() -> Result<Config, ConfigError> {
    // Pick up a local .env if there is one
    dotenvy::dotenv().ok();

    let config_path =
        env::var("CONTACT_RELAY_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    if Path::new(&config_path).exists() {
        tracing::info!("Loading configuration from '{}'", config_path);
        let contents = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        return from_yaml(&contents, &config_path);
    }

    tracing::info!(
        "Config file '{}' not found, loading configuration from environment variables",
        config_path
    );
    from_env()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_fills_in_defaults() {
        let cfg = from_yaml("api_key: secret\n", "test.yaml").unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert!(cfg.resend_api_key.is_none());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.sender, "onboarding@resend.dev");
        assert_eq!(cfg.template_dir, "email-template");
        assert_eq!(cfg.resend_base_url, "https://api.resend.com");
    }

    #[test]
    fn yaml_accepts_env_style_key_name() {
        let cfg = from_yaml("x_api_key: secret\nport: 8080\n", "test.yaml").unwrap();

        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.port, 8080);
    }

    #[test]
    fn empty_credentials_count_as_missing() {
        let cfg = from_yaml("api_key: ''\nresend_api_key: ''\n", "test.yaml").unwrap();

        assert!(!cfg.has_api_key());
        assert!(!cfg.has_resend_api_key());
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn env_maps_variable_names() {
        let cfg = from_vars(vars(&[
            ("RESEND_API_KEY", "re_123"),
            ("X_API_KEY", "secret"),
            ("PORT", "8080"),
            ("TEMPLATE_DIR", "/srv/templates"),
        ]))
        .unwrap();

        assert_eq!(cfg.resend_api_key.as_deref(), Some("re_123"));
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.template_dir, "/srv/templates");
        assert_eq!(cfg.sender, "onboarding@resend.dev");
        assert_eq!(cfg.resend_base_url, "https://api.resend.com");
    }

    #[test]
    fn env_without_credentials_still_loads() {
        let cfg = from_vars(vars(&[("X_API_KEY", ""), ("RESEND_API_KEY", "")])).unwrap();

        assert!(!cfg.has_api_key());
        assert!(!cfg.has_resend_api_key());
        assert_eq!(cfg.port, 3000);

        let cfg = from_vars(Vec::new()).unwrap();
        assert!(!cfg.has_api_key());
        assert!(!cfg.has_resend_api_key());
    }

    #[test]
    fn env_rejects_invalid_port() {
        let err = from_vars(vars(&[("PORT", "not-a-port")])).unwrap_err();

        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = from_yaml("port: [not a number", "broken.yaml").unwrap_err();

        assert!(err.to_string().contains("broken.yaml"));
    }
}
