/*
 *  secrets.rs
 *  (c) 2025 Teodor Potancok
 *
 *  This Source Code Form is subject to the terms of the Mozilla Public
 *  License, v. 2.0. If a copy of the MPL was not distributed with this
 *  file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use secrecy::SecretString;
use zeroize::Zeroizing;

/// Random bytes drawn for a secret when nothing else is configured (256 bits).
pub const DEFAULT_SECRET_BYTES: usize = 32;
pub const MIN_SECRET_BYTES: usize = 32;
pub const MAX_SECRET_BYTES: usize = 1024;

/// Draws `bytes` random bytes and encodes them as unpadded URL-safe base64.
///
/// `rand::rng()` is a ChaCha-based CSPRNG reseeded from the OS, so a failure of
/// the OS entropy source panics instead of returning weak output. The raw bytes
/// are wiped on return and the encoded string is wiped when the secret drops.
pub fn generate_secret(bytes: usize) -> SecretString {
    let mut buf = Zeroizing::new(vec![0u8; bytes]);
    rand::rng().fill_bytes(buf.as_mut_slice());

    SecretString::from(URL_SAFE_NO_PAD.encode(buf.as_slice()))
}
