use serde::Deserialize;

/// Application configuration. Loaded from environment variables with the
/// prefix `ADREPORT__`; CLI flags override individual fields after load.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory the report files are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Default tracing filter, overridden by `RUST_LOG` when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_output_dir() -> String {
    "output".to_string()
}
fn default_log_filter() -> String {
    "adreport=info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            log_filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("ADREPORT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
