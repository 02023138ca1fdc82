//! Wire equality: deep comparison with numbers compared by value.
//!
//! `serde_json::Value` equality tells `5` and `5.0` apart. Across the
//! widening rule a whole-valued float decodes to an integer and re-encodes
//! as one, so round trips are stated with this comparison instead.

use serde_json::{Number, Value};

use crate::WireMap;

/// Deep equality where numbers compare numerically.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use wiremap::wire_equal;
///
/// assert!(wire_equal(&json!({"n": 5}), &json!({"n": 5.0})));
/// assert!(!wire_equal(&json!({"n": 5}), &json!({"n": 5.5})));
/// assert!(!wire_equal(&json!({}), &json!({"n": null})));
/// ```
pub fn wire_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => number_equal(a, b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| wire_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => wire_map_equal(a, b),
        _ => false,
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn number_equal(a: &Number, b: &Number) -> bool {
    match (integer(a), integer(b)) {
        (Some(a), Some(b)) => a == b,
        (Some(i), None) => float_equals_integer(b.as_f64(), i),
        (None, Some(i)) => float_equals_integer(a.as_f64(), i),
        (None, None) => a.as_f64() == b.as_f64(),
    }
}

/// Exact: the float must be whole and convert back to the same integer.
fn float_equals_integer(f: Option<f64>, i: i128) -> bool {
    // 2^64 bounds every integer a wire number can hold; i128 holds it exactly.
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;
    match f {
        Some(f) if f.fract() == 0.0 && f.abs() <= LIMIT => f as i128 == i,
        _ => false,
    }
}

/// [`wire_equal`] over two maps; key order is ignored, absence is not.
pub fn wire_map_equal(a: &WireMap, b: &WireMap) -> bool {
    if a.len() != b.len() {
        return false;
    }
    for (key, val_a) in a {
        match b.get(key) {
            Some(val_b) => {
                if !wire_equal(val_a, val_b) {
                    return false;
                }
            }
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_by_value() {
        assert!(wire_equal(&json!(1), &json!(1.0)));
        assert!(wire_equal(&json!(-2), &json!(-2.0)));
        assert!(!wire_equal(&json!(1), &json!(2)));
        assert!(wire_equal(&json!(u64::MAX), &json!(u64::MAX)));
    }

    #[test]
    fn large_integers_compare_exactly() {
        assert!(!wire_equal(&json!(i64::MAX), &json!(9.223372036854775807e18)));
        assert!(wire_equal(&json!(1i64 << 62), &json!(4.611686018427387904e18)));
        assert!(!wire_equal(&json!(u64::MAX), &json!(1.8446744073709552e19)));
        assert!(!wire_equal(&json!(i64::MAX), &json!(i64::MAX - 1)));
        assert!(!wire_equal(&json!(3), &json!(3.5)));
    }

    #[test]
    fn kinds_never_cross() {
        assert!(!wire_equal(&json!(0), &json!(false)));
        assert!(!wire_equal(&json!(null), &json!(0)));
        assert!(!wire_equal(&json!("1"), &json!(1)));
        assert!(!wire_equal(&json!([]), &json!({})));
    }

    #[test]
    fn key_order_is_ignored() {
        let a = json!({"a": 1, "b": [1, {"c": null}]});
        let b = json!({"b": [1.0, {"c": null}], "a": 1});
        assert!(wire_equal(&a, &b));
    }

    #[test]
    fn absent_differs_from_null() {
        assert!(!wire_equal(&json!({"a": null}), &json!({})));
        assert!(!wire_equal(&json!({"a": null}), &json!({"b": null})));
    }

    #[test]
    fn list_order_matters() {
        assert!(!wire_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(!wire_equal(&json!([1]), &json!([1, 1])));
    }
}
