use std::fmt;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File as ConfigFile, Value};
use missing_media_core::library::database::find_default_database;
use missing_media_core::{Error, LibrarySource, RunConfig};
use serde::Deserialize;
use tracing::{info, warn};

use crate::commands::Options;
use crate::prompt::{self, Prompt};

pub const DEFAULT_HOST: &str = "http://localhost:32400";

/// Configuration as found in the layered sources, before prompting.
///
/// Precedence, first match wins: command line, environment (`PLEX_*`),
/// config file, built-in default, interactive prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub use_database: bool,
    pub db_path: Option<PathBuf>,
    pub host: String,
    pub token: Option<String>,
    pub section: Option<i64>,
    pub find_extras: Option<bool>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Settings {
    pub fn load(options: &Options) -> Result<Self, ConfigError> {
        let file = match &options.config {
            Some(path) => ConfigFile::from(path.as_path()).required(true),
            None => ConfigFile::with_name("config").required(false),
        };

        let layered = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PLEX")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("ignore_patterns"),
            )
            .build()?;

        Self::from_layers(layered, options)
    }

    fn from_layers(layered: Config, options: &Options) -> Result<Self, ConfigError> {
        let overrides = command_line_values(options);
        for (key, value) in &overrides {
            if value.is_some() && layered.get::<Value>(key).is_ok() {
                warn!(
                    "Duplicate argument \"{}\" found in both command-line arguments and configuration. Using command-line value",
                    key
                );
            }
        }

        let mut builder = Config::builder()
            .set_default("host", DEFAULT_HOST)?
            .set_default("use_database", false)?
            .add_source(layered);
        for (key, value) in overrides {
            builder = builder.set_override_option(key, value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Fill the gaps left by the configured layers, asking through `prompt`
    /// when one is given, and produce the typed configuration for a run.
    pub fn into_run_config(self, mut prompt: Option<&mut dyn Prompt>) -> Result<RunConfig, Error> {
        let source = if self.use_database {
            LibrarySource::Database {
                path: resolve_db_path(self.db_path, prompt.as_deref_mut())?,
            }
        } else {
            LibrarySource::Api {
                host: self.host,
                token: resolve_token(self.token, prompt.as_deref_mut())?,
            }
        };

        // the database already holds extras alongside everything else
        let find_extras = match (self.find_extras, self.use_database, prompt.as_deref_mut()) {
            (Some(find_extras), _, _) => find_extras,
            (None, false, Some(prompt)) => prompt.confirm(
                "Find extras? (Note: This is _significantly_ slower)",
                Some(false),
            )?,
            (None, _, _) => false,
        };

        let mut config = RunConfig::new(source)
            .with_find_extras(find_extras)
            .with_ignore_patterns(self.ignore_patterns);
        config.section_id = self.section;
        Ok(config)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unset = "<unset>".to_string();
        writeln!(f, "use_database:    {}", self.use_database)?;
        writeln!(
            f,
            "db_path:         {}",
            self.db_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| unset.clone())
        )?;
        writeln!(f, "host:            {}", self.host)?;
        writeln!(
            f,
            "token:           {}",
            if self.token.is_some() { "<redacted>" } else { "<unset>" }
        )?;
        writeln!(
            f,
            "section:         {}",
            self.section.map(|s| s.to_string()).unwrap_or_else(|| unset.clone())
        )?;
        writeln!(
            f,
            "find_extras:     {}",
            self.find_extras.map(|e| e.to_string()).unwrap_or(unset)
        )?;
        write!(f, "ignore_patterns: {:?}", self.ignore_patterns)
    }
}

fn command_line_values(options: &Options) -> Vec<(&'static str, Option<Value>)> {
    vec![
        ("use_database", options.use_database.map(Value::from)),
        (
            "db_path",
            options
                .db_path
                .as_ref()
                .map(|p| Value::from(p.to_string_lossy().into_owned())),
        ),
        ("host", options.host.clone().map(Value::from)),
        ("token", options.token.clone().map(Value::from)),
        ("section", options.section.map(Value::from)),
        ("find_extras", options.find_extras.map(Value::from)),
    ]
}

fn resolve_token(
    configured: Option<String>,
    prompt: Option<&mut (dyn Prompt + '_)>,
) -> Result<String, Error> {
    if let Some(token) = configured.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }

    let missing = || {
        Error::Configuration(
            "no Plex token given; pass --token or set token in the config file".to_string(),
        )
    };
    match prompt {
        Some(prompt) => prompt
            .line("Enter your Plex token")?
            .filter(|t| !t.is_empty())
            .ok_or_else(missing),
        None => Err(missing()),
    }
}

fn resolve_db_path(
    configured: Option<PathBuf>,
    prompt: Option<&mut (dyn Prompt + '_)>,
) -> Result<PathBuf, Error> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path);
        }
        warn!(
            "Configured Plex database {} does not exist, looking in the default locations",
            path.display()
        );
    }

    if let Some(path) = find_default_database() {
        info!("Found Plex database at {}", path.display());
        return Ok(path);
    }

    let missing = || {
        Error::Configuration("could not find the Plex database; pass --db-path".to_string())
    };
    match prompt {
        Some(prompt) => prompt::database_path(prompt)?.ok_or_else(missing),
        None => Err(missing()),
    }
}
