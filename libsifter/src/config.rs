use config::Config;
#[cfg(not(target_arch = "wasm32"))]
use config::{Environment, File};
#[cfg(not(target_arch = "wasm32"))]
use directories::ProjectDirs;
use eyre::{Result, bail};
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::sync::LazyLock;

use crate::ingest::IngestOptions;
use crate::pagination::Paging;

#[cfg(not(target_arch = "wasm32"))]
pub static PROJECT_DIR: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("org", "sifter", "sifter"));
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "config.toml";
#[cfg(not(target_arch = "wasm32"))]
pub const LOCAL_DIR: &str = ".sifter";

const DEFAULT_CONFIG: &str = include_str!("../../default_config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct SifterConfig {
    pub pagination: Paging,
    pub ingest: IngestConfig,
    pub layout: SifterLayout,
    pub behavior: SifterBehavior,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Field separator, a single ASCII character
    pub delimiter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SifterLayout {
    /// Initial width of the native window
    pub window_width: usize,
    /// Initial height of the native window
    pub window_height: usize,
    pub show_statusbar: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SifterBehavior {
    /// Open the log window when loading a file fails
    pub show_logs_on_error: bool,
}

impl SifterConfig {
    /// Loads the embedded defaults, then (unless `force_default_config` is set) the user
    /// config file, a local `.sifter/config.toml` and finally `SIFTER_*` environment
    /// variables, each overriding the previous.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(force_default_config: bool) -> Result<Self> {
        let mut config = Config::builder().add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ));

        if !force_default_config {
            if let Some(proj_dirs) = &*PROJECT_DIR {
                let config_file = proj_dirs.config_dir().join(CONFIG_FILE);
                config = config.add_source(File::from(config_file).required(false));
            }
            config = config
                .add_source(File::from(Path::new(LOCAL_DIR).join(CONFIG_FILE)).required(false))
                .add_source(
                    Environment::with_prefix("sifter")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                );
        }

        let config: Self = config
            .build()?
            .try_deserialize()
            .map_err(|e| eyre::eyre!("Failed to parse config {e}"))?;
        config.validated()
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new(_force_default_config: bool) -> Result<Self> {
        Self::new_from_toml(DEFAULT_CONFIG)
    }

    pub fn new_from_toml(config: &str) -> Result<Self> {
        let config: Self = toml::from_str(config)?;
        config.validated()
    }

    fn validated(self) -> Result<Self> {
        if self.pagination.page_size == 0 {
            bail!("pagination.page_size must be at least 1");
        }
        if self.pagination.window_size == 0 {
            bail!("pagination.window_size must be at least 1");
        }
        if !matches!(self.ingest.delimiter.as_bytes(), [b] if b.is_ascii()) {
            bail!(
                "ingest.delimiter must be a single ASCII character, got '{}'",
                self.ingest.delimiter
            );
        }
        Ok(self)
    }

    #[must_use]
    pub fn paging(&self) -> Paging {
        self.pagination
    }

    #[must_use]
    pub fn ingest_options(&self) -> IngestOptions {
        // validated() guarantees exactly one ASCII byte
        IngestOptions {
            delimiter: self.ingest.delimiter.as_bytes()[0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_overrides(overrides: &str) -> Result<SifterConfig> {
        let merged: toml::Table = {
            let mut base: toml::Table = toml::from_str(DEFAULT_CONFIG).unwrap();
            let extra: toml::Table = toml::from_str(overrides).unwrap();
            for (section, values) in extra {
                if let (Some(toml::Value::Table(target)), toml::Value::Table(values)) =
                    (base.get_mut(&section), values)
                {
                    target.extend(values);
                }
            }
            base
        };
        SifterConfig::new_from_toml(&toml::to_string(&merged).unwrap())
    }

    #[test]
    fn embedded_defaults() {
        let config = SifterConfig::new(true).unwrap();
        assert_eq!(config.paging(), Paging::default());
        assert_eq!(config.ingest_options(), IngestOptions::default());
        assert!(config.layout.show_statusbar);
        assert!(config.behavior.show_logs_on_error);
    }

    #[test]
    fn environment_overrides_defaults() {
        // SAFETY: no other test reads or writes this variable
        unsafe { std::env::set_var("SIFTER_PAGINATION__PAGE_SIZE", "7") };
        let config = SifterConfig::new(false);
        unsafe { std::env::remove_var("SIFTER_PAGINATION__PAGE_SIZE") };

        let config = config.unwrap();
        assert_eq!(config.pagination.page_size, 7);
        assert_eq!(config.pagination.window_size, 20);
        assert_eq!(SifterConfig::new(true).unwrap().pagination.page_size, 100);
    }

    #[test]
    fn embedded_defaults_parse_as_plain_toml() {
        let config = SifterConfig::new_from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.pagination.page_size, 100);
        assert_eq!(config.pagination.window_size, 20);
    }

    #[test]
    fn semicolon_delimiter() {
        let config = with_overrides("[ingest]\ndelimiter = \";\"").unwrap();
        assert_eq!(config.ingest_options().delimiter, b';');
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(with_overrides("[pagination]\npage_size = 0").is_err());
        assert!(with_overrides("[pagination]\nwindow_size = 0").is_err());
    }

    #[test]
    fn bad_delimiters_are_rejected() {
        assert!(with_overrides("[ingest]\ndelimiter = \"\"").is_err());
        assert!(with_overrides("[ingest]\ndelimiter = \";;\"").is_err());
        assert!(with_overrides("[ingest]\ndelimiter = \"§\"").is_err());
    }
}
