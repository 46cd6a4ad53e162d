//! Field-level change summaries for audit entries

use serde_json::Value;

/// Summarise the top-level fields that differ between two snapshots
///
/// Returns `None` when nothing changed. Bookkeeping fields that move on
/// every write are left out.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    const IGNORED: [&str; 2] = ["updated_at", "version"];

    let (Value::Object(before_obj), Value::Object(after_obj)) = (before, after) else {
        return (before != after).then(|| format!("{} -> {}", render(before), render(after)));
    };

    let mut changes: Vec<String> = before_obj
        .iter()
        .filter(|(key, _)| !IGNORED.contains(&key.as_str()))
        .filter_map(|(key, old)| match after_obj.get(key) {
            Some(new) if new == old => None,
            Some(new) => Some(format!("{}: {} -> {}", key, render(old), render(new))),
            None => Some(format!("{}: {} -> (removed)", key, render(old))),
        })
        .collect();

    changes.extend(
        after_obj
            .iter()
            .filter(|(key, _)| !before_obj.contains_key(*key))
            .map(|(key, new)| format!("{}: (added) -> {}", key, render(new))),
    );

    (!changes.is_empty()).then(|| changes.join(", "))
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
