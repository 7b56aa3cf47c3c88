//! Admin sessions.
//!
//! A session is a stateless token carrying its expiry and a random nonce, authenticated with a
//! keyed BLAKE3 hash. The key is derived from `ADMIN_SESSION_SECRET`, so rotating the secret
//! revokes every outstanding session.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use rand::{RngCore, rngs::OsRng};
use zeroize::Zeroize;

use crate::auth::{
    AdminSessionError, SESSION_NONCE_BYTES, SessionToken, SessionTokenVersion,
    token::signed_payload,
};

/// Minimum length of the configured session secret.
pub const MIN_SECRET_BYTES: usize = 32;

const KEY_CONTEXT: &str = "storefront 2026-01-01 admin session v1";

/// Hash a passphrase into the hex digest expected by `ADMIN_PASSPHRASE_HASH`.
#[must_use]
pub fn hash_passphrase(passphrase: &str) -> String {
    blake3::hash(passphrase.as_bytes()).to_hex().to_string()
}

struct SessionKey([u8; blake3::KEY_LEN]);

impl Drop for SessionKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A freshly minted session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: Timestamp,
}

/// A verified session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    pub expires_at: Timestamp,
}

/// Issues and verifies admin session tokens.
pub struct AdminSessions {
    key: SessionKey,
    passphrase_hash: blake3::Hash,
    ttl: SignedDuration,
}

impl fmt::Debug for AdminSessions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSessions")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl AdminSessions {
    /// # Errors
    ///
    /// Returns an error when the secret is shorter than [`MIN_SECRET_BYTES`], the passphrase
    /// hash is not a BLAKE3 hex digest, or the lifetime is not positive.
    pub fn new(
        secret: &[u8],
        passphrase_hash: &str,
        ttl: SignedDuration,
    ) -> Result<Self, AdminSessionError> {
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AdminSessionError::WeakSecret);
        }

        if !ttl.is_positive() {
            return Err(AdminSessionError::InvalidLifetime);
        }

        let passphrase_hash = blake3::Hash::from_hex(passphrase_hash.trim())
            .map_err(|_hex| AdminSessionError::InvalidPassphraseHash)?;

        Ok(Self {
            key: SessionKey(blake3::derive_key(KEY_CONTEXT, secret)),
            passphrase_hash,
            ttl,
        })
    }

    #[must_use]
    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }

    /// Constant-time comparison of the passphrase digest.
    #[must_use]
    pub fn check_passphrase(&self, passphrase: &str) -> bool {
        blake3::hash(passphrase.as_bytes()) == self.passphrase_hash
    }

    /// Exchange the admin passphrase for a session.
    ///
    /// # Errors
    ///
    /// Returns [`AdminSessionError::InvalidCredentials`] when the passphrase does not match.
    pub fn login(&self, passphrase: &str, now: Timestamp) -> Result<IssuedSession, AdminSessionError> {
        if !self.check_passphrase(passphrase) {
            return Err(AdminSessionError::InvalidCredentials);
        }

        self.issue(now)
    }

    /// Mint a session token valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns an error when the expiry overflows the timestamp range.
    pub fn issue(&self, now: Timestamp) -> Result<IssuedSession, AdminSessionError> {
        let expires_at = now
            .checked_add(self.ttl)
            .map_err(|_overflow| AdminSessionError::InvalidLifetime)?;

        let mut nonce = [0_u8; SESSION_NONCE_BYTES];
        OsRng.fill_bytes(&mut nonce);

        let version = SessionTokenVersion::V1;
        let expires_secs = expires_at.as_second();

        let mac = self.mac(&signed_payload(version, expires_secs, &nonce));

        let token = SessionToken {
            version,
            expires_at: expires_secs,
            nonce,
            mac: *mac.as_bytes(),
        };

        Ok(IssuedSession {
            token: token.to_string(),
            expires_at,
        })
    }

    /// Verify a presented token.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is malformed, its MAC does not verify, or it has
    /// expired.
    pub fn verify(&self, token: &str, now: Timestamp) -> Result<AdminSession, AdminSessionError> {
        let token: SessionToken = token.parse()?;

        if self.mac(&token.signed_payload()) != token.mac {
            return Err(AdminSessionError::Forged);
        }

        let expires_at = Timestamp::from_second(token.expires_at)
            .map_err(|_range| AdminSessionError::Expired)?;

        if expires_at <= now {
            return Err(AdminSessionError::Expired);
        }

        Ok(AdminSession { expires_at })
    }

    fn mac(&self, payload: &str) -> blake3::Hash {
        blake3::keyed_hash(&self.key.0, payload.as_bytes())
    }
}
