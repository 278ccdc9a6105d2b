use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

pub const CONFIG_FILE: &str = "course_md";
pub const ENV_PREFIX: &str = "COURSE_MD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_filter: String,
    pub import_extension: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from("data/courses.sqlite"),
            log_filter: "info".to_string(),
            import_extension: "md".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then `course_md.toml` if present, then `COURSE_MD_*` env vars.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let defaults = Settings::default();
        let settings = builder
            .set_default("db_path", defaults.db_path.to_string_lossy().into_owned())?
            .set_default("log_filter", defaults.log_filter)?
            .set_default("import_extension", defaults.import_extension)?
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
