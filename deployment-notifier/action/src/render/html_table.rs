use serde_json::Value;

/// Renders a JSON value as left-to-right nested tables: every object becomes
/// a `<table>` with one `<th>key</th><td>value</td>` row per entry, in
/// insertion order, and nested objects become tables inside the cell.
#[must_use]
pub fn convert(value: &Value) -> String {
    let mut html = String::new();
    write_value(&mut html, value);
    html
}

fn write_value(html: &mut String, value: &Value) {
    match value {
        Value::Object(entries) => {
            html.push_str("<table>");
            for (key, value) in entries {
                html.push_str("<tr><th>");
                html.push_str(&escape(key));
                html.push_str("</th><td>");
                write_value(html, value);
                html.push_str("</td></tr>");
            }
            html.push_str("</table>");
        }
        Value::Array(items) => {
            html.push_str("<ul>");
            for item in items {
                html.push_str("<li>");
                write_value(html, item);
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        Value::String(text) => html.push_str(&escape(text)),
        other => html.push_str(&escape(&other.to_string())),
    }
}

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
