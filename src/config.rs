/*
 *  config.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */
use crate::advice::{DEFAULT_ROUNDS, MAX_ROUNDS, MIN_ROUNDS};
use crate::output::OutputChannel;
use crate::secrets::{DEFAULT_SECRET_BYTES, MAX_SECRET_BYTES, MIN_SECRET_BYTES};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub channel: Option<OutputChannel>,
    pub directory: Option<PathBuf>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SecretConfig {
    pub bytes: Option<usize>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BcryptConfig {
    pub rounds: Option<u32>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub secret: SecretConfig,
    #[serde(default)]
    pub bcrypt: BcryptConfig,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Error reading config file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Error deserializing config file: {}", .0.message())]
    Deserialize(toml::de::Error),
    #[error("Work factor must be between 4 and 31, got {0}")]
    InvalidRounds(u32),
    #[error("Secret size must be between 32 and 1024 bytes, got {0}")]
    InvalidBytes(usize),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let file = match std::fs::read_to_string(path) {
            Ok(f) => f,
            Err(source) => {
                return Err(LoadError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&file)
    }

    pub fn parse(contents: &str) -> Result<Self, LoadError> {
        toml::from_str::<Config>(contents).map_err(LoadError::Deserialize)
    }

    /// Finds the config file to use, if any.
    ///
    /// An explicit path must exist. Otherwise `config.toml` in the user's
    /// config directory is used when present.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, LoadError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let Some(project_dirs) = directories::ProjectDirs::from("io.github", "tancop", "bcrypt-secret")
        else {
            log::debug!("No home directory, using built-in defaults");
            return Ok(Self::default());
        };

        let path = project_dirs.config_dir().join("config.toml");
        if path.is_file() {
            log::debug!("Loading config from {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Values from the command line. `None` means "not given".
#[derive(Default)]
pub struct Overrides {
    pub channel: Option<OutputChannel>,
    pub directory: Option<PathBuf>,
    pub rounds: Option<u32>,
    pub bytes: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    pub channel: OutputChannel,
    pub directory: PathBuf,
    pub rounds: u32,
    pub bytes: usize,
}

impl Settings {
    /// Layers defaults, then `config`, then `overrides`, and validates the result.
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self, LoadError> {
        let settings = Settings {
            channel: overrides
                .channel
                .or(config.output.channel)
                .unwrap_or_default(),
            directory: overrides
                .directory
                .or(config.output.directory)
                .unwrap_or_else(std::env::temp_dir),
            rounds: overrides
                .rounds
                .or(config.bcrypt.rounds)
                .unwrap_or(DEFAULT_ROUNDS),
            bytes: overrides
                .bytes
                .or(config.secret.bytes)
                .unwrap_or(DEFAULT_SECRET_BYTES),
        };

        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&settings.rounds) {
            return Err(LoadError::InvalidRounds(settings.rounds));
        }
        if !(MIN_SECRET_BYTES..=MAX_SECRET_BYTES).contains(&settings.bytes) {
            return Err(LoadError::InvalidBytes(settings.bytes));
        }

        Ok(settings)
    }
}
