pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of an envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Flatten nested objects and arrays into dotted `field` / scalar pairs,
/// e.g. `errors.amount` or `snapshots.1.status`.
pub fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into("", value, &mut rows);
    rows
}

fn flatten_into(prefix: &str, value: &Value, rows: &mut Vec<(String, Value)>) {
    let key = |k: &str| {
        if prefix.is_empty() {
            k.to_string()
        } else {
            format!("{prefix}.{k}")
        }
    };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (k, v) in map {
                flatten_into(&key(k), v, rows);
            }
        }
        Value::Array(arr) if !arr.is_empty() => {
            for (i, v) in arr.iter().enumerate() {
                flatten_into(&key(&i.to_string()), v, rows);
            }
        }
        _ => rows.push((prefix.to_string(), value.clone())),
    }
}

/// Scalar rendering shared by the text formatters.
pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_errors() {
        let rows = flatten(&json!({
            "valid": false,
            "errors": {"amount": "Amount is required", "type": "Mortgage type is required"}
        }));
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["errors.amount", "errors.type", "valid"]);
    }

    #[test]
    fn test_flatten_arrays_by_index() {
        let rows = flatten(&json!({"snapshots": [{"status": "idle"}, {"status": "computed"}]}));
        assert_eq!(rows[1].0, "snapshots.1.status");
        assert_eq!(rows[1].1, json!("computed"));
    }

    #[test]
    fn test_result_of_envelope() {
        let envelope = json!({"result": {"monthly": "100.00"}, "warnings": []});
        assert_eq!(result_of(&envelope), &json!({"monthly": "100.00"}));
        assert_eq!(result_of(&json!(3)), &json!(3));
    }
}
