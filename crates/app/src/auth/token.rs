//! Admin session token formatting and parsing.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Number of random nonce bytes encoded in a token.
pub const SESSION_NONCE_BYTES: usize = 16;

/// Number of MAC bytes encoded in a token.
pub const SESSION_MAC_BYTES: usize = blake3::OUT_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionTokenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionTokenError::UnsupportedVersion),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionTokenError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token encoding is invalid")]
    InvalidEncoding,
}

/// A parsed `v1.<expires>.<nonce>.<mac>` token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub version: SessionTokenVersion,
    /// Expiry as unix seconds.
    pub expires_at: i64,
    pub nonce: [u8; SESSION_NONCE_BYTES],
    pub mac: [u8; SESSION_MAC_BYTES],
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("version", &self.version)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl SessionToken {
    /// The bytes covered by the MAC: everything before the final segment.
    #[must_use]
    pub fn signed_payload(&self) -> String {
        signed_payload(self.version, self.expires_at, &self.nonce)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.signed_payload(), encode_hex(&self.mac))
    }
}

impl FromStr for SessionToken {
    type Err = SessionTokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut parts = token.trim().split('.');

        let version = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
        let expires_at = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
        let nonce = parts.next().ok_or(SessionTokenError::InvalidFormat)?;
        let mac = parts.next().ok_or(SessionTokenError::InvalidFormat)?;

        if parts.next().is_some() {
            return Err(SessionTokenError::InvalidFormat);
        }

        Ok(Self {
            version: version.parse()?,
            expires_at: expires_at
                .parse()
                .map_err(|_parse| SessionTokenError::InvalidFormat)?,
            nonce: decode_hex(nonce).ok_or(SessionTokenError::InvalidEncoding)?,
            mac: decode_hex(mac).ok_or(SessionTokenError::InvalidEncoding)?,
        })
    }
}

pub(crate) fn signed_payload(
    version: SessionTokenVersion,
    expires_at: i64,
    nonce: &[u8; SESSION_NONCE_BYTES],
) -> String {
    format!("{}.{expires_at}.{}", version.segment(), encode_hex(nonce))
}

fn encode_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut encoded = String::with_capacity(bytes.len() * 2);

    for byte in bytes {
        for nibble in [byte >> 4, byte & 0x0f] {
            if let Some(digit) = HEX.get(usize::from(nibble)) {
                encoded.push(char::from(*digit));
            }
        }
    }

    encoded
}

fn decode_hex<const N: usize>(hex: &str) -> Option<[u8; N]> {
    if hex.len() != N * 2 {
        return None;
    }

    let mut bytes = [0_u8; N];

    for (byte, pair) in bytes.iter_mut().zip(hex.as_bytes().chunks_exact(2)) {
        let [hi, lo] = pair else {
            return None;
        };

        *byte = (decode_hex_nibble(*hi)? << 4) | decode_hex_nibble(*lo)?;
    }

    Some(bytes)
}

fn decode_hex_nibble(value: u8) -> Option<u8> {
    match value {
        b'0'..=b'9' => Some(value - b'0'),
        b'a'..=b'f' => Some(value - b'a' + 10),
        b'A'..=b'F' => Some(value - b'A' + 10),
        _ => None,
    }
}
