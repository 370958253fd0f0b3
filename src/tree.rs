use crate::error::Result;
use crate::path::{KeyPath, PathSegment};
use serde_json::Value;

pub fn value_type(v: &Value) -> &'static str {
    match v {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// Structural equality where numbers compare by value, so `1` equals `1.0`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            x == y || ((x.is_f64() || y.is_f64()) && x.as_f64() == y.as_f64())
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xm), Value::Object(ym)) => {
            xm.len() == ym.len()
                && xm
                    .iter()
                    .all(|(k, x)| ym.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Follow `path` from `root`. Keys only step into objects, indices only into arrays.
pub fn resolve<'a>(root: &'a Value, path: &KeyPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), PathSegment::Key(k)) => map.get(k),
            (Value::Array(arr), PathSegment::Index(i)) => arr.get(*i),
            _ => None,
        })
}

pub fn resolve_mut<'a>(root: &'a mut Value, path: &KeyPath) -> Option<&'a mut Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| match (node, segment) {
            (Value::Object(map), PathSegment::Key(k)) => map.get_mut(k),
            (Value::Array(arr), PathSegment::Index(i)) => arr.get_mut(*i),
            _ => None,
        })
}

/// Resolve a dotted display path such as `rec1.items[0]`.
///
/// A malformed string is an error; a well-formed path that leads nowhere is `Ok(None)`.
pub fn resolve_str<'a>(root: &'a Value, path: &str) -> Result<Option<&'a Value>> {
    let parsed = KeyPath::parse(path)?;
    Ok(resolve(root, &parsed))
}

/// Case-insensitive substring test. `needle` must already be lowercased.
pub fn text_matches(text: &str, needle: &str) -> bool {
    text.to_lowercase().contains(needle)
}

/// Every node path below the root in depth-first pre-order.
pub fn all_paths(root: &Value) -> Vec<KeyPath> {
    let mut out = Vec::new();
    let mut current = KeyPath::root();
    collect_paths(root, &mut current, &mut out);
    out
}

fn collect_paths(value: &Value, current: &mut KeyPath, out: &mut Vec<KeyPath>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter() {
                current.push(PathSegment::Key(k.clone()));
                out.push(current.clone());
                collect_paths(v, current, out);
                current.pop();
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                current.push(PathSegment::Index(i));
                out.push(current.clone());
                collect_paths(item, current, out);
                current.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_resolve_nested() {
        let doc = json!({"items": [{"name": "a"}, {"name": "b"}]});
        let path = KeyPath::root().key("items").index(1).key("name");
        assert_eq!(resolve(&doc, &path), Some(&json!("b")));
        assert_eq!(resolve(&doc, &KeyPath::root()), Some(&doc));
    }

    #[test]
    fn test_resolve_kind_mismatch_is_none() {
        let doc = json!({"items": [1, 2]});
        assert!(resolve(&doc, &KeyPath::root().key("items").key("0")).is_none());
        assert!(resolve(&doc, &KeyPath::root().index(0)).is_none());
    }

    #[test]
    fn test_resolve_str() {
        let doc = json!({"_": [{"id": 1}, {"id": 2}]});
        assert_eq!(resolve_str(&doc, "_[1].id").unwrap(), Some(&json!(2)));
        assert_eq!(resolve_str(&doc, "_[9].id").unwrap(), None);
        assert!(matches!(
            resolve_str(&doc, "_[x]"),
            Err(Error::MalformedPath { .. })
        ));
    }

    #[test]
    fn test_resolve_mut_edits_in_place() {
        let mut doc = json!({"a": {"b": 1}});
        *resolve_mut(&mut doc, &KeyPath::root().key("a").key("b")).unwrap() = json!(2);
        assert_eq!(doc, json!({"a": {"b": 2}}));
    }

    #[test]
    fn test_all_paths_preorder() {
        let doc = json!({"a": {"b": 1}, "c": [true]});
        let shown: Vec<String> = all_paths(&doc).iter().map(|p| p.to_string()).collect();
        assert_eq!(shown, vec!["a", "a.b", "c", "c[0]"]);
    }

    #[test]
    fn test_value_type_names() {
        assert_eq!(value_type(&json!({})), "object");
        assert_eq!(value_type(&json!([])), "array");
        assert_eq!(value_type(&json!(null)), "null");
    }

    #[test]
    fn test_values_equal_numbers_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"a": [2, {"b": 3.0}]}), &json!({"a": [2.0, {"b": 3}]})));
        assert!(!values_equal(&json!(1), &json!(1.5)));
        assert!(!values_equal(&json!(u64::MAX), &json!(u64::MAX - 1)));
        assert!(!values_equal(&json!(1), &json!("1")));
        assert!(!values_equal(&json!([1]), &json!([1, 1])));
        assert!(!values_equal(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }
}
