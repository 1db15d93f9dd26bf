//! Throwaway SSH credential generation
//!
//! Every invocation generates a fresh 2048-bit RSA key pair. The public
//! half travels to the task as a single authorized-keys line in an
//! environment variable; the private half only ever exists in memory and
//! in a mode-0600 temporary file that is removed when the session ends.

use std::io::Write;

use rand::rngs::OsRng;
use ssh_key::private::{KeypairData, RsaKeypair};
use ssh_key::{LineEnding, PrivateKey};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};

/// RSA modulus size for generated key pairs
pub const RSA_KEY_BITS: usize = 2048;

/// An in-memory SSH key pair in its two transport encodings.
pub struct KeyPair {
    private_openssh: String,
    public_authorized: String,
}

impl KeyPair {
    /// Generate a fresh RSA key pair.
    ///
    /// No persistence and no caching: a new pair per call.
    pub fn generate() -> Result<Self> {
        let rsa = RsaKeypair::random(&mut OsRng, RSA_KEY_BITS)?;
        let private = PrivateKey::new(KeypairData::Rsa(rsa), crate::config::STARTED_BY)?;

        let private_openssh = private.to_openssh(LineEnding::LF)?.to_string();
        let public_authorized = private.public_key().to_openssh()?;

        debug!(bits = RSA_KEY_BITS, "generated RSA key pair");

        Ok(Self {
            private_openssh,
            public_authorized,
        })
    }

    /// The public half as a single-line authorized-keys entry.
    pub fn public_authorized_key(&self) -> &str {
        &self.public_authorized
    }

    /// Write the private half to a temporary file usable as an ssh identity.
    ///
    /// The file is created mode 0600 and removed when the returned handle
    /// is dropped, on every exit path.
    pub fn write_private_to_tempfile(&self) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(".fargate-login-key-")
            .tempfile()
            .map_err(Error::KeyFile)?;

        file.write_all(self.private_openssh.as_bytes())
            .map_err(Error::KeyFile)?;
        file.flush().map_err(Error::KeyFile)?;

        debug!(path = %file.path().display(), "wrote private key");

        Ok(file)
    }
}

impl std::fmt::Debug for KeyPair {
    // Keep the private half out of debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public_authorized", &self.public_authorized)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ssh_key::{Algorithm, HashAlg, PublicKey};

    #[test]
    fn public_encoding_is_a_single_authorized_keys_line() {
        let pair = KeyPair::generate().unwrap();
        let line = pair.public_authorized_key();

        assert!(!line.contains('\n'));

        let parsed = PublicKey::from_openssh(line).expect("authorized-keys parser rejected it");
        assert!(matches!(parsed.algorithm(), Algorithm::Rsa { .. }));
    }

    #[test]
    fn private_encoding_round_trips_to_matching_public_half() {
        let pair = KeyPair::generate().unwrap();

        let private = PrivateKey::from_openssh(pair.private_openssh.as_bytes()).unwrap();
        let public = PublicKey::from_openssh(pair.public_authorized_key()).unwrap();

        assert_eq!(
            private.public_key().fingerprint(HashAlg::Sha256),
            public.fingerprint(HashAlg::Sha256),
        );
    }

    #[test]
    fn consecutive_pairs_are_distinct() {
        let a = KeyPair::generate().unwrap();
        let b = KeyPair::generate().unwrap();
        assert_ne!(a.public_authorized_key(), b.public_authorized_key());
    }

    #[test]
    fn tempfile_holds_a_parseable_key_and_vanishes_on_drop() {
        let pair = KeyPair::generate().unwrap();
        let file = pair.write_private_to_tempfile().unwrap();
        let path = file.path().to_path_buf();

        let bytes = std::fs::read(&path).unwrap();
        PrivateKey::from_openssh(&bytes).expect("file is not a usable identity");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }

        drop(file);
        assert!(!path.exists());
    }
}
