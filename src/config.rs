//! The `cps` configuration file.
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs::read_to_string;
use std::io;
use std::path::{Path, PathBuf};
use serde::Deserialize;

/// Settings read from a YAML file. Every field may be left out.
///
/// ```yaml
/// data_dir: games
/// extensions: [pgn, txt]
/// stop_on_error: true
/// log_file: replay.log
/// log_level: debug
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned by `replay` when no paths are given
    pub data_dir: PathBuf,
    /// File extensions accepted when scanning a directory
    pub extensions: Vec<String>,
    /// Whether `replay` stops at the first game that fails
    pub stop_on_error: bool,
    /// Log file used when `--log-file` is not given
    pub log_file: Option<PathBuf>,
    /// Log level used when `--log-level` is not given
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("data"),
            extensions: vec!["pgn".to_owned()],
            stop_on_error: false,
            log_file: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Returns the path of the configuration file used when none is given: `~/.cps/config.yaml`,
    /// or `.cps/config.yaml` if there is no home directory.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(".cps"))
            .unwrap_or_else(|| PathBuf::from(".cps"))
            .join("config.yaml")
    }

    /// Parses a configuration from YAML text
    pub fn from_yaml_str(s: &str) -> Result<Config, ConfigError> {
        if s.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Reads the configuration file at `path`
    pub fn read(path: &Path) -> Result<Config, ConfigError> {
        let s = read_to_string(path)?;
        Config::from_yaml_str(&s)
    }

    /// Reads the configuration file at `path` if one is given, or else from the default path.
    ///
    /// A missing file at the default path gives the default configuration; a missing file that
    /// was asked for by name is an error.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Config::read(path),
            None => {
                let path = Config::default_path();
                if path.is_file() {
                    Config::read(&path)
                } else {
                    Ok(Config::default())
                }
            },
        }
    }
}

/// An error reading or parsing the configuration file
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read
    Io(io::Error),
    /// The file is not valid YAML for a `Config`
    Yaml(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => err.fmt(f),
            ConfigError::Yaml(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ConfigError { }

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}
