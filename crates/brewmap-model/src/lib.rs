#![forbid(unsafe_code)]
//! Cafe record model SSOT.
//!
//! Everything the store and the server agree on lives here: the record
//! shape, the identifier newtype, the insert/update payloads and the
//! two-value flag domain used by HTML forms.

mod cafe;
mod flag;

pub use cafe::{
    CafeId, CafeRecord, CafeUpdate, NewCafe, ValidationError, LOCATION_MAX_LEN, NAME_MAX_LEN,
    TEXT_MAX_LEN, URL_MAX_LEN,
};
pub use flag::{flag_literal, parse_flag, FLAG_CHOICES, FLAG_FALSE, FLAG_TRUE};

pub const CRATE_NAME: &str = "brewmap-model";
