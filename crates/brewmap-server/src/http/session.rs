// SPDX-License-Identifier: Apache-2.0

use crate::csrf::{is_valid_nonce, new_nonce, CSRF_COOKIE};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;

/// The browser's form nonce: the one its cookie already carries, or a new
/// one that `attach` hands out with the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormSession {
    nonce: String,
    fresh: bool,
}

impl FormSession {
    pub(crate) fn from_headers(headers: &HeaderMap) -> Self {
        match cookie_nonce(headers) {
            Some(nonce) => Self {
                nonce,
                fresh: false,
            },
            None => Self {
                nonce: new_nonce(),
                fresh: true,
            },
        }
    }

    pub(crate) fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Nonce the request actually presented; `None` when a new one was minted.
    pub(crate) fn presented(&self) -> Option<&str> {
        (!self.fresh).then_some(self.nonce.as_str())
    }

    pub(crate) fn attach(&self, mut response: Response) -> Response {
        if self.fresh {
            let cookie = format!("{CSRF_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax", self.nonce);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

pub(crate) fn cookie_nonce(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CSRF_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| is_valid_nonce(value))
        .map(ToString::to_string)
}
