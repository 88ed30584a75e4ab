// SPDX-License-Identifier: Apache-2.0

use crate::http::forms::{AddCafeForm, EditCafeForm, FormErrors, CSRF_FIELD};
use axum::http::StatusCode;
use brewmap_model::{CafeRecord, FLAG_CHOICES};

pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\
<nav><a href=\"/\">All cafes</a> | <a href=\"/add\">Add a cafe</a></nav>\
{body}\
</body></html>",
        escape_html(title)
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn csrf_input(token: &str) -> String {
    format!(
        "<input type=\"hidden\" name=\"{CSRF_FIELD}\" value=\"{}\">",
        escape_html(token)
    )
}

fn field_error(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .map(|msg| format!("<span class=\"error\">{}</span>", escape_html(msg)))
        .unwrap_or_default()
}

fn text_field(
    errors: &FormErrors,
    name: &'static str,
    label: &str,
    value: Option<&String>,
) -> String {
    format!(
        "<p><label for=\"{name}\">{}</label> \
<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{}\"> {}</p>",
        escape_html(label),
        escape_html(value.map_or("", String::as_str)),
        field_error(errors, name)
    )
}

fn radio_field(
    errors: &FormErrors,
    name: &'static str,
    label: &str,
    value: Option<&String>,
) -> String {
    let selected = value.map(String::as_str);
    let mut options = String::new();
    for (literal, text) in FLAG_CHOICES {
        let checked = if selected == Some(literal) {
            " checked"
        } else {
            ""
        };
        options.push_str(&format!(
            "<label><input type=\"radio\" name=\"{name}\" value=\"{literal}\"{checked}> {text}</label> "
        ));
    }
    format!(
        "<fieldset><legend>{}</legend>{options}{}</fieldset>",
        escape_html(label),
        field_error(errors, name)
    )
}

fn form_level_error(errors: &FormErrors) -> String {
    errors
        .get(CSRF_FIELD)
        .map(|msg| format!("<p class=\"error\">{}</p>", escape_html(msg)))
        .unwrap_or_default()
}

pub(crate) fn cafe_list_page(cafes: &[CafeRecord], csrf_token: &str) -> String {
    let mut rows = String::new();
    for cafe in cafes {
        let id = cafe.id;
        rows.push_str(&format!(
            "<tr>\
<td><img src=\"{}\" alt=\"{}\" width=\"120\"></td>\
<td><a href=\"{}\">{}</a></td>\
<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
<td><a href=\"/edit?id={id}\">Edit</a> \
<form method=\"post\" action=\"/delete?id={id}\" style=\"display:inline\">{}<button type=\"submit\">Delete</button></form></td>\
</tr>",
            escape_html(&cafe.img_url),
            escape_html(&cafe.name),
            escape_html(&cafe.map_url),
            escape_html(&cafe.name),
            escape_html(&cafe.location),
            yes_no(cafe.has_sockets),
            yes_no(cafe.has_toilet),
            yes_no(cafe.has_wifi),
            yes_no(cafe.can_take_calls),
            escape_html(cafe.seats.as_deref().unwrap_or("")),
            escape_html(cafe.coffee_price.as_deref().unwrap_or("")),
            csrf_input(csrf_token),
        ));
    }
    let table = if rows.is_empty() {
        "<p>No cafes yet.</p>".to_string()
    } else {
        format!(
            "<table><thead><tr><th></th><th>Name</th><th>Location</th><th>Sockets</th>\
<th>Toilet</th><th>Wifi</th><th>Calls</th><th>Seats</th><th>Coffee price</th><th></th></tr></thead>\
<tbody>{rows}</tbody></table>"
        )
    };
    layout("Cafes", &format!("<h1>Cafes</h1>{table}"))
}

pub(crate) fn add_cafe_page(form: &AddCafeForm, errors: &FormErrors, csrf_token: &str) -> String {
    let fields = [
        text_field(errors, "name", "Cafe name", form.name.as_ref()),
        text_field(errors, "map_url", "Google Maps URL", form.map_url.as_ref()),
        text_field(errors, "img_url", "Image URL", form.img_url.as_ref()),
        text_field(errors, "location", "Location", form.location.as_ref()),
        radio_field(errors, "has_sockets", "Has sockets?", form.has_sockets.as_ref()),
        radio_field(errors, "has_toilet", "Has toilet?", form.has_toilet.as_ref()),
        radio_field(errors, "has_wifi", "Has wifi?", form.has_wifi.as_ref()),
        radio_field(errors, "can_take_calls", "Can take calls?", form.can_take_calls.as_ref()),
        text_field(errors, "seats", "Number of seats (e.g., 10-20)", form.seats.as_ref()),
        text_field(
            errors,
            "coffee_price",
            "Coffee price (e.g., $2.50)",
            form.coffee_price.as_ref(),
        ),
    ]
    .concat();
    layout(
        "Add a cafe",
        &format!(
            "<h1>Add a cafe</h1>{}<form method=\"post\" action=\"/add\">{}{fields}\
<p><button type=\"submit\">Add Cafe</button></p></form>",
            form_level_error(errors),
            csrf_input(csrf_token)
        ),
    )
}

pub(crate) fn edit_cafe_page(
    cafe: &CafeRecord,
    form: &EditCafeForm,
    errors: &FormErrors,
    csrf_token: &str,
) -> String {
    let fields = [
        radio_field(errors, "wifi", "Has wifi?", form.wifi.as_ref()),
        radio_field(errors, "sockets", "Has sockets?", form.sockets.as_ref()),
        radio_field(errors, "toilet", "Has toilets?", form.toilet.as_ref()),
        text_field(errors, "coffe_price", "New coffee price", form.coffe_price.as_ref()),
        text_field(errors, "seats", "Number of seats", form.seats.as_ref()),
    ]
    .concat();
    layout(
        &format!("Edit {}", cafe.name),
        &format!(
            "<h1>Edit {}</h1><p>{}</p>{}<form method=\"post\" action=\"/edit?id={}\">{}{fields}\
<p><button type=\"submit\">Okay!</button></p></form>",
            escape_html(&cafe.name),
            escape_html(&cafe.location),
            form_level_error(errors),
            cafe.id,
            csrf_input(csrf_token)
        ),
    )
}

pub(crate) fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    layout(
        reason,
        &format!(
            "<h1>{} {}</h1><p>{}</p>",
            status.as_u16(),
            escape_html(reason),
            escape_html(message)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewmap_model::{CafeId, NewCafe};

    fn cafe(name: &str) -> CafeRecord {
        CafeRecord::from_new(
            CafeId::new(3),
            NewCafe {
                name: name.to_string(),
                map_url: "http://x".to_string(),
                img_url: "http://y".to_string(),
                location: "Town".to_string(),
                has_sockets: true,
                has_toilet: false,
                has_wifi: true,
                can_take_calls: false,
                seats: Some("10-20".to_string()),
                coffee_price: None,
            },
        )
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape_html("<a href=\"x\">Joe's & co</a>"),
            "&lt;a href=&quot;x&quot;&gt;Joe&#x27;s &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn list_page_escapes_user_values_and_links_actions() {
        let html = cafe_list_page(&[cafe("<script>alert(1)</script>")], "tok");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("/edit?id=3"));
        assert!(html.contains("action=\"/delete?id=3\""));
        assert!(html.contains("name=\"csrf_token\" value=\"tok\""));
    }

    #[test]
    fn empty_list_page_says_so() {
        assert!(cafe_list_page(&[], "tok").contains("No cafes yet."));
    }

    #[test]
    fn edit_page_checks_current_flag_values() {
        let record = cafe("Joe's");
        let html = edit_cafe_page(
            &record,
            &EditCafeForm::from_record(&record),
            &FormErrors::new(),
            "tok",
        );
        assert!(html.contains("name=\"wifi\" value=\"1\" checked"));
        assert!(html.contains("name=\"toilet\" value=\"0\" checked"));
        assert!(html.contains("name=\"seats\" value=\"10-20\""));
    }

    #[test]
    fn add_page_shows_field_errors() {
        let errors = AddCafeForm::default().validate().expect_err("empty form");
        let html = add_cafe_page(&AddCafeForm::default(), &errors, "tok");
        assert_eq!(html.matches("This field is required.").count(), 10);
    }
}
