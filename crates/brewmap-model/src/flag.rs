// SPDX-License-Identifier: Apache-2.0

//! Two-value boolean domain used by radio inputs.

use crate::ValidationError;

pub const FLAG_TRUE: &str = "1";
pub const FLAG_FALSE: &str = "0";

/// Literal and label pairs in render order.
pub const FLAG_CHOICES: [(&str, &str); 2] = [(FLAG_TRUE, "Yes"), (FLAG_FALSE, "No")];

/// Exact match only; padded literals are not a valid choice.
pub fn parse_flag(input: &str) -> Result<bool, ValidationError> {
    match input {
        FLAG_TRUE => Ok(true),
        FLAG_FALSE => Ok(false),
        other => Err(ValidationError(format!(
            "flag must be {FLAG_TRUE} or {FLAG_FALSE}, got {other:?}"
        ))),
    }
}

#[must_use]
pub const fn flag_literal(value: bool) -> &'static str {
    if value {
        FLAG_TRUE
    } else {
        FLAG_FALSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_two_literals_are_accepted() {
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag("0"), Ok(false));
        for raw in ["", " 1 ", "0 ", "yes", "true", "2", "10"] {
            assert!(parse_flag(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn literal_matches_parse() {
        for value in [true, false] {
            assert_eq!(parse_flag(flag_literal(value)), Ok(value));
        }
    }
}
