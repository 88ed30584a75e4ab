// SPDX-License-Identifier: Apache-2.0

//! Signed form tokens bound to a per-browser nonce.
//!
//! The browser holds a random nonce in the `brewmap_csrf` cookie. A token is
//! `"{issued_unix_secs}.{hex_hmac}"` where the MAC covers the nonce and the
//! issue time under the process secret, so a token only verifies alongside
//! the cookie it was minted for and only within the TTL.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

type HmacSha256 = Hmac<Sha256>;

pub const CSRF_COOKIE: &str = "brewmap_csrf";

const TOKEN_DOMAIN: &str = "brewmap-form";
const NONCE_BYTES: usize = 16;
const MAX_FUTURE_SKEW_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfError {
    Missing,
    NoSession,
    Malformed,
    BadSignature,
    Expired,
    NotYetValid,
}

impl CsrfError {
    /// Message shown next to the form.
    #[must_use]
    pub const fn user_message(self) -> &'static str {
        match self {
            Self::Missing => "The CSRF token is missing.",
            Self::NoSession => "The CSRF session token is missing.",
            Self::Expired => "The CSRF token has expired.",
            Self::Malformed | Self::BadSignature | Self::NotYetValid => {
                "The CSRF token is invalid."
            }
        }
    }
}

impl fmt::Display for CsrfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Missing => "csrf token missing",
            Self::NoSession => "csrf cookie nonce missing",
            Self::Malformed => "csrf token malformed",
            Self::BadSignature => "csrf token signature mismatch",
            Self::Expired => "csrf token expired",
            Self::NotYetValid => "csrf token issued in the future",
        };
        f.write_str(text)
    }
}

impl std::error::Error for CsrfError {}

/// Fresh random cookie nonce, hex encoded.
#[must_use]
pub fn new_nonce() -> String {
    hex::encode(rand::random::<[u8; NONCE_BYTES]>())
}

#[must_use]
pub fn is_valid_nonce(raw: &str) -> bool {
    raw.len() == NONCE_BYTES * 2 && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

pub struct CsrfGuard {
    keyed: HmacSha256,
    ttl: Duration,
}

impl CsrfGuard {
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, String> {
        let keyed = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| format!("invalid csrf secret: {e}"))?;
        Ok(Self { keyed, ttl })
    }

    #[must_use]
    pub fn issue(&self, nonce: &str) -> String {
        self.issue_at(nonce, unix_now_secs())
    }

    #[must_use]
    pub fn issue_at(&self, nonce: &str, issued: u64) -> String {
        let mac = self.mac_for(nonce, issued);
        format!("{issued}.{}", hex::encode(mac.finalize().into_bytes()))
    }

    pub fn verify(&self, token: Option<&str>, nonce: Option<&str>) -> Result<(), CsrfError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(CsrfError::Missing);
        };
        let Some(nonce) = nonce.filter(|n| is_valid_nonce(n)) else {
            return Err(CsrfError::NoSession);
        };
        self.verify_at(token, nonce, unix_now_secs())
    }

    pub fn verify_at(&self, token: &str, nonce: &str, now: u64) -> Result<(), CsrfError> {
        let (issued_raw, sig_hex) = token.split_once('.').ok_or(CsrfError::Malformed)?;
        let issued = issued_raw
            .parse::<u64>()
            .map_err(|_| CsrfError::Malformed)?;
        let sig = hex::decode(sig_hex).map_err(|_| CsrfError::Malformed)?;
        self.mac_for(nonce, issued)
            .verify_slice(&sig)
            .map_err(|_| CsrfError::BadSignature)?;
        if issued > now.saturating_add(MAX_FUTURE_SKEW_SECS) {
            return Err(CsrfError::NotYetValid);
        }
        if now.saturating_sub(issued) > self.ttl.as_secs() {
            return Err(CsrfError::Expired);
        }
        Ok(())
    }

    fn mac_for(&self, nonce: &str, issued: u64) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(format!("{TOKEN_DOMAIN}\n{nonce}\n{issued}\n").as_bytes());
        mac
    }
}

fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
