/// HTML escaping for untrusted text interpolated into email bodies.
pub mod html {
    /// Escape text for an HTML element context.
    pub fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#39;"),
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// Escape text for a double-quoted HTML attribute value.
    pub fn escape_attribute(text: &str) -> String {
        escape(text)
    }
}
