//! # Fragments
//!
//! The two pieces of markup the SDK ever produces. Both are pure functions
//! over already-final strings; no escaping is applied.

/// Button fragment carrying the variant and the encoded payload.
///
/// ```rust
/// use giveit_sdk::fragment::button_fragment;
///
/// assert_eq!(
///     button_fragment("blue_rect_sm", "Q0lQSEVS"),
///     r#"<span class="giveit-button" data-giveit-buttontype="blue_rect_sm" data-giveit-data="Q0lQSEVS"></span>"#
/// );
/// ```
pub fn button_fragment(button_type: &str, ciphertext: &str) -> String {
    format!(
        r#"<span class="giveit-button" data-giveit-buttontype="{button_type}" data-giveit-data="{ciphertext}"></span>"#
    )
}

/// Error fragment with one `giveit-error` child per message, in order.
pub fn error_fragment<S: AsRef<str>>(messages: &[S]) -> String {
    let mut html = String::from(r#"<span class="giveit-button">"#);

    for message in messages {
        html.push_str("\n\t<span class=\"giveit-error\">");
        html.push_str(message.as_ref());
        html.push_str("</span>");
    }

    html.push_str("\n</span>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_fragment_keeps_order() {
        let html = error_fragment(&["missing field details:code", "product data is invalid"]);
        assert_eq!(
            html,
            "<span class=\"giveit-button\">\
             \n\t<span class=\"giveit-error\">missing field details:code</span>\
             \n\t<span class=\"giveit-error\">product data is invalid</span>\
             \n</span>"
        );
    }

    #[test]
    fn test_error_fragment_empty() {
        let none: [&str; 0] = [];
        assert_eq!(
            error_fragment(&none),
            "<span class=\"giveit-button\">\n</span>"
        );
    }
}
