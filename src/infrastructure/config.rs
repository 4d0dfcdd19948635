use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub backend: BackendSettings,
    #[serde(default)]
    pub firebase: FirebaseSettings,
    #[serde(default)]
    pub explanation: Option<ExplanationSettings>,
    #[serde(default)]
    pub legacy: LegacySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_regions_path")]
    pub regions_path: String,
    #[serde(default = "default_stations_path")]
    pub stations_path: String,
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,
    #[serde(default = "default_series_path")]
    pub series_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FirebaseSettings {
    /// Realtime Database URL; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub auth_token: Option<String>,
    #[serde(default = "default_charts_path")]
    pub charts_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExplanationSettings {
    pub endpoint: String,
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LegacySettings {
    #[serde(default = "default_legacy_dir")]
    pub directory: String,
}

impl Default for LegacySettings {
    fn default() -> Self {
        Self {
            directory: default_legacy_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_regions_path() -> String {
    "/regiones".to_string()
}

fn default_stations_path() -> String {
    "/regiones/${region}/estaciones".to_string()
}

fn default_metrics_path() -> String {
    "/estaciones/${station}/metricas".to_string()
}

fn default_series_path() -> String {
    "/estaciones/${station}/metricas/${metric}/${sub_metric}".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_charts_path() -> String {
    "charts".to_string()
}

fn default_legacy_dir() -> String {
    "data/legacy".to_string()
}

/// Load `config/observatorio.*`, overridden by `OBSERVATORIO__SECTION__KEY`
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/observatorio"))
        .add_source(config::Environment::with_prefix("OBSERVATORIO").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace `${name}` placeholders in a path template with URL-encoded values
pub fn prepare_path(template: &str, vars: &HashMap<&str, &str>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_path() {
        let mut vars = HashMap::new();
        vars.insert("station", "Parque O'Higgins");
        vars.insert("metric", "Temperatura");
        vars.insert("sub_metric", "Media");

        let result = prepare_path(&default_series_path(), &vars);

        assert_eq!(
            result,
            "/estaciones/Parque%20O%27Higgins/metricas/Temperatura/Media"
        );
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        let vars = HashMap::new();
        assert_eq!(prepare_path("/regiones/${region}", &vars), "/regiones/${region}");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                "[backend]\nbase_url = \"http://localhost:5000/api\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let cfg: AppConfig = settings.try_deserialize().unwrap();

        assert_eq!(cfg.server.bind, "0.0.0.0:8080");
        assert_eq!(cfg.backend.stations_path, "/regiones/${region}/estaciones");
        assert!(cfg.firebase.database_url.is_none());
        assert_eq!(cfg.firebase.charts_path, "charts");
        assert!(cfg.explanation.is_none());
    }
}
