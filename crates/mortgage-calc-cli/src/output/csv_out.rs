use serde_json::Value;
use std::io;

use super::{flatten, format_scalar, result_of};

/// Write the result as two-column `field,value` CSV to stdout. Nested values
/// are flattened to dotted field names; warnings follow as `warning` rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten(result_of(value)) {
        let _ = wtr.write_record([key.as_str(), &format_scalar(&val)]);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings {
            let _ = wtr.write_record(["warning", &format_scalar(w)]);
        }
    }

    let _ = wtr.flush();
}
