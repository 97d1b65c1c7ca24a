use std::borrow::Cow;

/// Escapes text for XML element content and attribute values.
///
/// Control characters that XML 1.0 forbids are dropped. Input that needs no
/// changes is returned borrowed.
pub fn escape_xml(value: &str) -> Cow<'_, str> {
    if !value.chars().any(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c if is_forbidden(c) => {}
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Drops forbidden control characters and leaves markup escaping to the serializer.
pub(crate) fn strip_forbidden(value: &str) -> Cow<'_, str> {
    if !value.chars().any(is_forbidden) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(value.chars().filter(|c| !is_forbidden(*c)).collect())
}

fn needs_escape(ch: char) -> bool {
    matches!(ch, '&' | '<' | '>' | '"' | '\'') || is_forbidden(ch)
}

fn is_forbidden(ch: char) -> bool {
    (ch as u32) < 0x20 && !matches!(ch, '\t' | '\n' | '\r')
}
