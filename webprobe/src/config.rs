//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The file path
//! defaults to `webprobe.yaml` but can be specified via the `-f` flag or the `WEBPROBE_CONFIG`
//! environment variable. A missing file is not an error: every field has a default.
//!
//! ## Loading Priority
//!
//! 1. **YAML config file** - Base configuration (default: `webprobe.yaml`)
//! 2. **Environment variables** - Variables prefixed with `WEBPROBE_` override YAML values
//! 3. **`--base-url`** - Overrides `base_url` from every other source
//!
//! Nested values use double underscores, e.g. `WEBPROBE_DEFAULTS__UPLOAD_PATH=/up/blob.bin`.
//! Only variables naming a config field are read; others sharing the prefix, such as
//! `WEBPROBE_CONFIG`, are ignored. Unknown keys in the YAML file are still rejected.
//!
//! ## Example
//!
//! ```yaml
//! base_url: "http://127.0.0.1:8080/"
//! log_filter: "webprobe=debug"
//! defaults:
//!   upload_path: /upload/my.bin
//!   text_path: /upload/note.txt
//!   fetch_path: /
//! form:
//!   upload_file: ./fixtures/logo.png
//!   text_body: "hello from webprobe"
//!   fetch_path: /index.html
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::errors::Error;
use crate::form::{FormInputs, load_selection};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/";

/// Top-level `Config` fields settable from `WEBPROBE_` variables.
const ENV_KEYS: [&str; 4] = ["base_url", "log_filter", "defaults", "form"];

/// Whether an unprefixed env key (e.g. `DEFAULTS__FETCH_PATH`) targets a config field.
fn is_config_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    ENV_KEYS.iter().any(|field| {
        key == *field || key.strip_prefix(field).is_some_and(|rest| rest.starts_with("__"))
    })
}

/// CLI arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "WEBPROBE_CONFIG", default_value = "webprobe.yaml")]
    pub config: String,

    /// Server to probe; relative target paths resolve against it
    #[arg(long)]
    pub base_url: Option<Url>,

    /// How rendered panels are printed
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Validate configuration and exit without sending anything.
    #[arg(long)]
    pub validate: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// POST a file's raw bytes as application/octet-stream
    UploadFile {
        /// Target path or URL (put-file-path)
        #[arg(long)]
        path: Option<String>,
        /// File to upload (put-file-input)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// POST text as text/plain; charset=UTF-8
    UploadText {
        /// Target path or URL (put-text-path)
        #[arg(long)]
        path: Option<String>,
        /// Text to send (put-text-body)
        #[arg(long)]
        body: Option<String>,
    },
    /// GET a resource and render its body
    Fetch {
        /// Target path or URL (get-path)
        #[arg(long)]
        path: Option<String>,
    },
    /// Invoke every action concurrently with the configured form
    Page,
    /// List registered actions with their input fields and output panel
    Actions,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL that relative target paths resolve against
    pub base_url: Url,
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Fallback target paths for blank path fields
    pub defaults: DefaultPaths,
    /// Preset values for the page's input fields
    pub form: FormConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            log_filter: "warn".to_string(),
            defaults: DefaultPaths::default(),
            form: FormConfig::default(),
        }
    }
}

/// Target paths used when an action's path field is blank.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultPaths {
    pub upload_path: String,
    pub text_path: String,
    pub fetch_path: String,
}

impl Default for DefaultPaths {
    fn default() -> Self {
        Self {
            upload_path: "/upload/my.bin".to_string(),
            text_path: "/upload/note.txt".to_string(),
            fetch_path: "/".to_string(),
        }
    }
}

/// Preset input field values. The file field is given as a path on disk.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    pub upload_path: Option<String>,
    pub upload_file: Option<PathBuf>,
    pub text_path: Option<String>,
    pub text_body: Option<String>,
    pub fetch_path: Option<String>,
}

impl FormConfig {
    /// Apply a command's flags on top of the preset values.
    pub fn with_command(mut self, command: &Command) -> Self {
        match command {
            Command::UploadFile { path, file } => {
                if path.is_some() {
                    self.upload_path = path.clone();
                }
                if file.is_some() {
                    self.upload_file = file.clone();
                }
            }
            Command::UploadText { path, body } => {
                if path.is_some() {
                    self.text_path = path.clone();
                }
                if body.is_some() {
                    self.text_body = body.clone();
                }
            }
            Command::Fetch { path } => {
                if path.is_some() {
                    self.fetch_path = path.clone();
                }
            }
            Command::Page | Command::Actions => {}
        }
        self
    }

    /// Resolve into page inputs, reading the selected file from disk.
    pub async fn load_inputs(&self) -> crate::errors::Result<FormInputs> {
        Ok(FormInputs {
            upload_path: self.upload_path.clone(),
            upload_file: load_selection(self.upload_file.as_deref()).await?,
            text_path: self.text_path.clone(),
            text_body: self.text_body.clone(),
            fetch_path: self.fetch_path.clone(),
        })
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        if let Some(base_url) = &args.base_url {
            config.base_url = base_url.clone();
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        if !matches!(self.base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig {
                message: format!("base_url must use http or https, got '{}'", self.base_url.scheme()),
            });
        }

        if self.base_url.host_str().is_none() {
            return Err(Error::InvalidConfig {
                message: format!("base_url '{}' has no host", self.base_url),
            });
        }

        for (name, value) in [
            ("defaults.upload_path", &self.defaults.upload_path),
            ("defaults.text_path", &self.defaults.text_path),
            ("defaults.fetch_path", &self.defaults.fetch_path),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidConfig {
                    message: format!("{name} cannot be empty"),
                });
            }
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Skip WEBPROBE_CONFIG and any other variable that is not a field
            .merge(
                Env::prefixed("WEBPROBE_")
                    .filter(|key| is_config_key(key.as_str()))
                    .split("__"),
            )
    }
}
