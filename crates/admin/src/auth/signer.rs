//! HMAC signing and verification of session nonces.
//!
//! Verification recomputes the signature and compares; nothing is looked up.
//! This is what makes the session layer stateless: rotating the key (a new
//! process with a new `ADMIN_SESSION_SECRET`) invalidates every outstanding
//! token at once.

use core::fmt;

use hmac::{Hmac, Mac};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Random bytes in a freshly minted nonce (128 bits of entropy).
const NONCE_BYTES: usize = 16;

/// Signs and verifies session nonces with a server-held secret.
///
/// Constructed once at startup and shared through application state; unit
/// tests model key rotation by constructing independent signers with
/// different keys.
#[derive(Clone)]
pub struct Signer {
    key: SecretString,
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer").field("key", &"[REDACTED]").finish()
    }
}

impl Signer {
    /// Create a signer over the given key.
    #[must_use]
    pub const fn new(key: SecretString) -> Self {
        Self { key }
    }

    /// HMAC-SHA256 over the UTF-8 bytes of `nonce`, hex-encoded.
    ///
    /// Deterministic: the same nonce under the same key always yields the
    /// same signature.
    #[must_use]
    pub fn sign(&self, nonce: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(nonce.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Recompute the signature for `nonce` and compare constant-time.
    ///
    /// A signature that fails hex-decoding is a verification failure, never
    /// an error. The length check is the only early exit in the comparison.
    #[must_use]
    pub fn verify(&self, nonce: &str, signature: &str) -> bool {
        let Ok(provided) = hex::decode(signature) else {
            return false;
        };

        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .expect("HMAC-SHA256 accepts keys of any length");
        mac.update(nonce.as_bytes());
        let expected = mac.finalize().into_bytes();

        constant_time_eq(&expected, &provided)
    }
}

/// Mint a fresh random nonce: [`NONCE_BYTES`] CSPRNG bytes, hex-encoded.
#[must_use]
pub fn mint_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Constant-time byte comparison to prevent timing attacks.
///
/// Differing bytes never short-circuit the loop; only the length check
/// exits early.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::new(SecretString::from("k7#mQ9$xR2&vN5!pL8*wT3^zB6@jH4%s"))
    }

    #[test]
    fn test_sign_is_deterministic() {
        let s = signer();
        assert_eq!(s.sign("a1b2c3"), s.sign("a1b2c3"));
    }

    #[test]
    fn test_sign_is_hex_sha256() {
        let sig = signer().sign("a1b2c3");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_accepts_own_signature() {
        let s = signer();
        for _ in 0..16 {
            let nonce = mint_nonce();
            let sig = s.sign(&nonce);
            assert!(s.verify(&nonce, &sig));
        }
    }

    #[test]
    fn test_verify_rejects_flipped_signature() {
        let s = signer();
        let nonce = mint_nonce();
        let sig = s.sign(&nonce);

        // Flip one bit in every hex position; all must fail.
        for i in 0..sig.len() {
            let mut bytes = sig.clone().into_bytes();
            bytes[i] ^= 0x01;
            let Ok(flipped) = String::from_utf8(bytes) else {
                continue;
            };
            assert!(!s.verify(&nonce, &flipped), "flip at {i} was accepted");
        }
    }

    #[test]
    fn test_verify_rejects_other_key() {
        // Key rotation: tokens signed under the old key are dead.
        let old = signer();
        let new = Signer::new(SecretString::from("y2@fD8!qW5$cJ1&nZ7*rV4^mG0#xP3%t"));
        let nonce = mint_nonce();
        let sig = old.sign(&nonce);
        assert!(!new.verify(&nonce, &sig));
    }

    #[test]
    fn test_verify_rejects_malformed_hex() {
        let s = signer();
        assert!(!s.verify("a1b2c3", "not-hex-at-all"));
        assert!(!s.verify("a1b2c3", "zz"));
        assert!(!s.verify("a1b2c3", ""));
    }

    #[test]
    fn test_verify_rejects_wrong_length() {
        let s = signer();
        let sig = s.sign("a1b2c3");
        assert!(!s.verify("a1b2c3", &sig[..62]));
        assert!(!s.verify("a1b2c3", &format!("{sig}00")));
    }

    #[test]
    fn test_mint_nonce_shape() {
        let nonce = mint_nonce();
        assert_eq!(nonce.len(), NONCE_BYTES * 2);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_mint_nonce_unique() {
        let a = mint_nonce();
        let b = mint_nonce();
        assert_ne!(a, b);
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(constant_time_eq(b"", b""));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(!constant_time_eq(b"hello", b"helloo"));
    }
}
