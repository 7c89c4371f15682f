use serde_json::{Map, Value};

/// Render the `hugo` metadata mapping as a front-matter block delimited by
/// `---` lines, one `key: value` line per entry, in mapping order.
pub fn render_front_matter(metadata: &Map<String, Value>) -> String {
    let mut out = String::from("---\n");
    for (key, value) in metadata {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(&render_value(key, value));
        out.push('\n');
    }
    out.push_str("---\n");
    out
}

// Strings are quoted, booleans are bare literals, everything else renders
// raw. The `date` key stays unquoted even when its value is a string, so
// Hugo reads it as a date literal.
fn render_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(text) if key != "date" => format!("\"{}\"", text),
        Value::String(text) => text.clone(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        other => other.to_string(),
    }
}
