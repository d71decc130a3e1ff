/*
 *  advice.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::output::Delivery;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;

pub const DEFAULT_ROUNDS: u32 = 12;
pub const MIN_ROUNDS: u32 = 4;
pub const MAX_ROUNDS: u32 = 31;

const PLACEHOLDER: &str = "PASSWORD_HERE";

/// Builds the instructions for hashing the secret with an external bcrypt tool.
///
/// The raw secret only appears when it was already printed to the terminal.
pub fn advisory(secret: &SecretString, delivery: &Delivery, rounds: u32) -> String {
    let last_steps = match delivery {
        Delivery::Printed => {
            format!("3. Replace {PLACEHOLDER} with: {}\n", secret.expose_secret())
        }
        Delivery::File(path) => format!(
            "3. Replace {PLACEHOLDER} with the contents of: {}\n\
             4. Delete the file once the hash is stored:\n   \
             rm {}\n",
            path.display(),
            shell_quote(path)
        ),
    };

    format!(
        "\n\
         To generate a bcrypt hash (work factor {rounds}):\n\
         1. Install bcrypt: pip install bcrypt\n\
         2. Run: python3 -c \"import bcrypt; print(bcrypt.hashpw(b'{PLACEHOLDER}', bcrypt.gensalt(rounds={rounds})).decode())\"\n\
         {last_steps}"
    )
}

/// Single-quotes `path` for a POSIX shell.
fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}
