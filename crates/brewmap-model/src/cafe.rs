// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

// Column widths declared in the table DDL. Not enforced on input.
pub const NAME_MAX_LEN: usize = 250;
pub const URL_MAX_LEN: usize = 500;
pub const LOCATION_MAX_LEN: usize = 250;
pub const TEXT_MAX_LEN: usize = 250;

/// Store-assigned primary key of a cafe row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CafeId(i64);

impl CafeId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Parses the `id` query parameter. Only plain positive decimal integers
    /// qualify; surrounding whitespace is rejected.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError("cafe id must not be empty".to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError(format!("cafe id must be numeric, got {s:?}")));
        }
        let value = s
            .parse::<i64>()
            .map_err(|e| ValidationError(format!("cafe id out of range: {e}")))?;
        if value <= 0 {
            return Err(ValidationError("cafe id must be positive".to_string()));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Display for CafeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CafeRecord {
    pub id: CafeId,
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
}

impl CafeRecord {
    #[must_use]
    pub fn from_new(id: CafeId, cafe: NewCafe) -> Self {
        Self {
            id,
            name: cafe.name,
            map_url: cafe.map_url,
            img_url: cafe.img_url,
            location: cafe.location,
            has_sockets: cafe.has_sockets,
            has_toilet: cafe.has_toilet,
            has_wifi: cafe.has_wifi,
            can_take_calls: cafe.can_take_calls,
            seats: cafe.seats,
            coffee_price: cafe.coffee_price,
        }
    }

    /// Applies the fields present in `update`; everything else is left as is.
    pub fn apply(&mut self, update: &CafeUpdate) {
        if let Some(v) = update.has_sockets {
            self.has_sockets = v;
        }
        if let Some(v) = update.has_toilet {
            self.has_toilet = v;
        }
        if let Some(v) = update.has_wifi {
            self.has_wifi = v;
        }
        if let Some(v) = &update.seats {
            self.seats = Some(v.clone());
        }
        if let Some(v) = &update.coffee_price {
            self.coffee_price = Some(v.clone());
        }
    }
}

/// A record that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCafe {
    pub name: String,
    pub map_url: String,
    pub img_url: String,
    pub location: String,
    pub has_sockets: bool,
    pub has_toilet: bool,
    pub has_wifi: bool,
    pub can_take_calls: bool,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
}

/// Partial update over the mutable columns. `None` leaves a column untouched.
///
/// Name, links, location and `can_take_calls` are fixed at creation and have
/// no counterpart here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CafeUpdate {
    pub has_sockets: Option<bool>,
    pub has_toilet: Option<bool>,
    pub has_wifi: Option<bool>,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
}

impl CafeUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.has_sockets.is_none()
            && self.has_toilet.is_none()
            && self.has_wifi.is_none()
            && self.seats.is_none()
            && self.coffee_price.is_none()
    }
}
