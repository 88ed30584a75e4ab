// SPDX-License-Identifier: Apache-2.0

//! Add and edit form schemas.
//!
//! Fields arrive as raw strings so a partially filled form can be shown
//! back to the user unchanged. `validate` either produces the complete
//! payload or names every failing field; it never yields a partial payload.

use brewmap_model::{flag_literal, parse_flag, CafeRecord, CafeUpdate, NewCafe};
use serde::Deserialize;
use std::collections::BTreeMap;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str = "Not a valid choice.";
pub const CSRF_FIELD: &str = "csrf_token";

/// Field name to message. Ordered so pages render errors deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, &'static str>);

impl FormErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.0.keys().copied().collect()
    }
}

fn required_text(
    errors: &mut FormErrors,
    field: &'static str,
    value: Option<&String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v.clone()),
        _ => {
            errors.insert(field, REQUIRED_MESSAGE);
            None
        }
    }
}

fn required_flag(
    errors: &mut FormErrors,
    field: &'static str,
    value: Option<&String>,
) -> Option<bool> {
    match value {
        Some(v) if !v.trim().is_empty() => match parse_flag(v) {
            Ok(flag) => Some(flag),
            Err(_) => {
                errors.insert(field, INVALID_CHOICE_MESSAGE);
                None
            }
        },
        _ => {
            errors.insert(field, REQUIRED_MESSAGE);
            None
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddCafeForm {
    pub name: Option<String>,
    pub map_url: Option<String>,
    pub img_url: Option<String>,
    pub location: Option<String>,
    pub has_sockets: Option<String>,
    pub has_toilet: Option<String>,
    pub has_wifi: Option<String>,
    pub can_take_calls: Option<String>,
    pub seats: Option<String>,
    pub coffee_price: Option<String>,
    pub csrf_token: Option<String>,
}

impl AddCafeForm {
    pub fn validate(&self) -> Result<NewCafe, FormErrors> {
        let mut errors = FormErrors::new();
        let name = required_text(&mut errors, "name", self.name.as_ref());
        let map_url = required_text(&mut errors, "map_url", self.map_url.as_ref());
        let img_url = required_text(&mut errors, "img_url", self.img_url.as_ref());
        let location = required_text(&mut errors, "location", self.location.as_ref());
        let has_sockets = required_flag(&mut errors, "has_sockets", self.has_sockets.as_ref());
        let has_toilet = required_flag(&mut errors, "has_toilet", self.has_toilet.as_ref());
        let has_wifi = required_flag(&mut errors, "has_wifi", self.has_wifi.as_ref());
        let can_take_calls =
            required_flag(&mut errors, "can_take_calls", self.can_take_calls.as_ref());
        let seats = required_text(&mut errors, "seats", self.seats.as_ref());
        let coffee_price = required_text(&mut errors, "coffee_price", self.coffee_price.as_ref());

        match (
            name,
            map_url,
            img_url,
            location,
            has_sockets,
            has_toilet,
            has_wifi,
            can_take_calls,
            seats,
            coffee_price,
        ) {
            (
                Some(name),
                Some(map_url),
                Some(img_url),
                Some(location),
                Some(has_sockets),
                Some(has_toilet),
                Some(has_wifi),
                Some(can_take_calls),
                Some(seats),
                Some(coffee_price),
            ) if errors.is_empty() => Ok(NewCafe {
                name,
                map_url,
                img_url,
                location,
                has_sockets,
                has_toilet,
                has_wifi,
                can_take_calls,
                seats: Some(seats),
                coffee_price: Some(coffee_price),
            }),
            _ => Err(errors),
        }
    }
}

/// Edit schema. `coffe_price` is the historical wire name of the price input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditCafeForm {
    pub wifi: Option<String>,
    pub sockets: Option<String>,
    pub toilet: Option<String>,
    pub coffe_price: Option<String>,
    pub seats: Option<String>,
    pub csrf_token: Option<String>,
}

impl EditCafeForm {
    /// Form values mirroring the stored record, used to pre-fill the edit page.
    #[must_use]
    pub fn from_record(cafe: &CafeRecord) -> Self {
        Self {
            wifi: Some(flag_literal(cafe.has_wifi).to_string()),
            sockets: Some(flag_literal(cafe.has_sockets).to_string()),
            toilet: Some(flag_literal(cafe.has_toilet).to_string()),
            coffe_price: cafe.coffee_price.clone(),
            seats: cafe.seats.clone(),
            csrf_token: None,
        }
    }

    /// Always yields a full overwrite of the five mutable columns.
    pub fn validate(&self) -> Result<CafeUpdate, FormErrors> {
        let mut errors = FormErrors::new();
        let has_wifi = required_flag(&mut errors, "wifi", self.wifi.as_ref());
        let has_sockets = required_flag(&mut errors, "sockets", self.sockets.as_ref());
        let has_toilet = required_flag(&mut errors, "toilet", self.toilet.as_ref());
        let coffee_price = required_text(&mut errors, "coffe_price", self.coffe_price.as_ref());
        let seats = required_text(&mut errors, "seats", self.seats.as_ref());
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CafeUpdate {
            has_sockets,
            has_toilet,
            has_wifi,
            seats,
            coffee_price,
        })
    }
}

/// Body of the hardened `POST /delete`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteForm {
    pub csrf_token: Option<String>,
}
