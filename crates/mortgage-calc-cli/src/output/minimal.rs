use serde_json::Value;

use super::{format_scalar, result_of};

/// Fields printed by `--output minimal`, in priority order.
const PRIORITY_KEYS: [&str; 3] = ["monthly", "valid", "final_status"];

/// Print just the headline answer.
///
/// A repayment result prints `monthly` and `total` on one line each; other
/// results print their first priority key, then fall back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    let Value::Object(map) = result_obj else {
        println!("{}", format_scalar(result_obj));
        return;
    };

    if let (Some(monthly), Some(total)) = (map.get("monthly"), map.get("total")) {
        println!("{}", format_scalar(monthly));
        println!("{}", format_scalar(total));
        return;
    }

    for key in PRIORITY_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            println!("{}", format_scalar(val));
            return;
        }
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, format_scalar(val));
    }
}
