/*
 *  output.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use cfg_if::cfg_if;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

pub const FILE_PREFIX: &str = "bcrypt-secret-";
pub const FILE_SUFFIX: &str = ".txt";

/// Where the generated secret is handed to the user.
#[derive(Deserialize, clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputChannel {
    /// Print the secret to the terminal
    Stdout,
    /// Write the secret to an owner-only temporary file
    #[default]
    File,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Printed,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("Failed to print secret: {0}")]
    Print(std::io::Error),
    #[error("Failed to create secret file in {}: {source}", .dir.display())]
    Create {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to restrict secret file permissions: {0}")]
    Permissions(std::io::Error),
    #[error("Failed to write secret file: {0}")]
    Write(std::io::Error),
    #[error("Failed to sync secret file: {0}")]
    Sync(std::io::Error),
    #[error("Failed to keep secret file: {0}")]
    Persist(std::io::Error),
}

/// Hands `secret` to the user through `channel`.
///
/// The stdout channel writes the secret to `out`. The file channel writes it to
/// a fresh file in `dir` and only the path goes to `out`. The file is kept on
/// disk only once its path has been printed.
pub fn materialize(
    secret: &SecretString,
    channel: OutputChannel,
    dir: &Path,
    out: &mut impl Write,
) -> Result<Delivery, MaterializeError> {
    match channel {
        OutputChannel::Stdout => {
            writeln!(out, "Generated password: {}", secret.expose_secret())
                .and_then(|_| writeln!(out, "Store this password securely!"))
                .map_err(MaterializeError::Print)?;

            Ok(Delivery::Printed)
        }
        OutputChannel::File => {
            let tmp = create_secret_file(secret, dir)?;

            // Dropping `tmp` on error removes the file again
            writeln!(out, "Generated password written to: {}", tmp.path().display())
                .and_then(|_| writeln!(out, "The file is readable by your user only."))
                .and_then(|_| out.flush())
                .map_err(MaterializeError::Print)?;

            let path = match tmp.keep() {
                Ok((_, path)) => path,
                Err(e) => return Err(MaterializeError::Persist(e.error)),
            };
            log::debug!("Secret stored at {}", path.display());

            Ok(Delivery::File(path))
        }
    }
}

/// Creates `<dir>/bcrypt-secret-XXXXXX.txt` holding only the secret.
///
/// The file is deleted when the returned handle drops unless it is kept.
pub fn create_secret_file(
    secret: &SecretString,
    dir: &Path,
) -> Result<NamedTempFile, MaterializeError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(FILE_PREFIX)
        .suffix(FILE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|source| MaterializeError::Create {
            dir: dir.to_path_buf(),
            source,
        })?;

    // Mode must be restricted before the secret touches the disk
    restrict_permissions(tmp.as_file()).map_err(MaterializeError::Permissions)?;

    tmp.as_file_mut()
        .write_all(secret.expose_secret().as_bytes())
        .map_err(MaterializeError::Write)?;
    tmp.as_file().sync_all().map_err(MaterializeError::Sync)?;

    Ok(tmp)
}

cfg_if! {
    if #[cfg(unix)] {
        fn restrict_permissions(file: &File) -> Result<(), std::io::Error> {
            use std::os::unix::fs::PermissionsExt;

            file.set_permissions(std::fs::Permissions::from_mode(0o600))
        }
    } else {
        fn restrict_permissions(_file: &File) -> Result<(), std::io::Error> {
            log::warn!("Owner-only mode is not supported on this platform, relying on default ACLs");
            Ok(())
        }
    }
}
