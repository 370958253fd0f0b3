//! Record-level helpers built on [`search`](crate::search::search).
//!
//! A *record* is the mapping or sequence that holds a matched entry.
//! [`get_info`] pulls named sibling fields out of records identified by a
//! known value; [`filter_objects`] selects whole records by field value.

use crate::error::{Error, Result};
use crate::path::{KeyPath, PathSegment};
use crate::search::search;
use crate::tree::{resolve, value_type, values_equal};
use crate::types::{Match, Query};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::debug;

/// Collect the records that contain any of `target_values`.
///
/// With no `desired_keys`, every value hit is merged into the result under
/// the display form of its record path (top-level hits are merged flatly).
/// Otherwise only records that hold both a target value and one of the
/// desired keys contribute, and both entries are merged under the record.
/// A later entry with the same key overwrites an earlier one.
///
/// ```
/// use serde_json::json;
/// use teddy_lib::records::get_info;
///
/// let doc = json!({
///     "rec1": {"id": "X", "name": "foo"},
///     "rec2": {"id": "Y", "name": "bar"}
/// });
/// let info = get_info(&doc, &[json!("X")], &["name".to_string()], true, true);
/// assert_eq!(json!(info), json!({"rec1": {"id": "X", "name": "foo"}}));
/// ```
pub fn get_info(
    document: &Value,
    target_values: &[Value],
    desired_keys: &[String],
    strict_values: bool,
    strict_keys: bool,
) -> Map<String, Value> {
    let mut result = Map::new();
    if target_values.is_empty() {
        return result;
    }

    let key_hits: Vec<(KeyPath, Match<'_>)> = desired_keys
        .iter()
        .flat_map(|key| search(document, &Query::key(key.as_str()), strict_keys))
        .map(|m| (m.record_path(), m))
        .collect();

    for target in target_values {
        let value_hits = search(document, &Query::Value(target.clone()), strict_values);

        if desired_keys.is_empty() {
            for hit in &value_hits {
                merge_entry(&mut result, &hit.record_path(), hit);
            }
            continue;
        }

        let value_records: Vec<KeyPath> = value_hits.iter().map(Match::record_path).collect();
        for (key_record, key_hit) in &key_hits {
            for (value_record, value_hit) in value_records.iter().zip(&value_hits) {
                if value_record == key_record {
                    merge_entry(&mut result, value_record, value_hit);
                    merge_entry(&mut result, key_record, key_hit);
                }
            }
        }
    }

    debug!(
        targets = target_values.len(),
        keys = desired_keys.len(),
        records = result.len(),
        "get_info merged"
    );
    result
}

fn merge_entry(result: &mut Map<String, Value>, record: &KeyPath, hit: &Match<'_>) {
    let key = hit.entry_key();
    if record.is_root() {
        result.insert(key, hit.value.clone());
        return;
    }
    let slot = result
        .entry(record.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    if let Value::Object(fields) = slot {
        fields.insert(key, hit.value.clone());
    }
}

/// Select the top-level records of `document` by the values of `keys`.
///
/// A record is a top-level entry of a mapping (`name`, or `name[i]` when
/// the entry is a list) or an element of a top-level list. A record is a
/// candidate when any of `keys` matches inside it. If `accepts` is not
/// empty only candidates with a matched value in `accepts` are kept;
/// candidates with a matched value in `rejects` are always dropped, so
/// reject wins. A matched list value also counts through its first element.
/// Records come back sorted by locator and de-duplicated.
///
/// Fails with [`Error::NotTraversable`] for a scalar document.
pub fn filter_objects(
    document: &Value,
    keys: &[String],
    accepts: &[Value],
    rejects: &[Value],
    strict: bool,
) -> Result<Vec<Value>> {
    if !matches!(document, Value::Object(_) | Value::Array(_)) {
        return Err(Error::NotTraversable(value_type(document)));
    }

    let mut candidates = BTreeSet::new();
    let mut accepted = BTreeSet::new();
    let mut rejected = BTreeSet::new();

    for key in keys {
        for hit in search(document, &Query::key(key.as_str()), strict) {
            let Some(locator) = record_locator(&hit.path) else {
                continue;
            };
            if value_in(hit.value, accepts) {
                accepted.insert(locator.clone());
            }
            if value_in(hit.value, rejects) {
                rejected.insert(locator.clone());
            }
            candidates.insert(locator);
        }
    }

    let selected: Vec<KeyPath> = candidates
        .into_iter()
        .filter(|loc| accepts.is_empty() || accepted.contains(loc))
        .filter(|loc| !rejected.contains(loc))
        .collect();

    debug!(
        keys = keys.len(),
        selected = selected.len(),
        rejected = rejected.len(),
        "filter_objects selected records"
    );

    selected
        .iter()
        .map(|loc| {
            resolve(document, loc).cloned().ok_or_else(|| {
                Error::malformed_path(&loc.to_string(), 0, "record locator does not resolve")
            })
        })
        .collect()
}

/// First key segment plus a directly following index, or a leading index
/// when the document itself is a list.
fn record_locator(path: &KeyPath) -> Option<KeyPath> {
    let mut segments = path.segments().iter();
    match segments.next()? {
        PathSegment::Key(k) => {
            let locator = KeyPath::root().key(k.clone());
            match segments.next() {
                Some(PathSegment::Index(i)) => Some(locator.index(*i)),
                _ => Some(locator),
            }
        }
        PathSegment::Index(i) => Some(KeyPath::root().index(*i)),
    }
}

fn value_in(value: &Value, set: &[Value]) -> bool {
    let in_set = |v: &Value| set.iter().any(|s| values_equal(s, v));
    if in_set(value) {
        return true;
    }
    match value {
        Value::Array(items) => items.first().is_some_and(in_set),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_get_info_example() {
        let doc = json!({
            "rec1": {"id": "X", "name": "foo"},
            "rec2": {"id": "Y", "name": "bar"}
        });
        let info = get_info(&doc, &[json!("X")], &keys(&["name"]), true, true);
        assert_eq!(Value::Object(info), json!({"rec1": {"id": "X", "name": "foo"}}));
    }

    #[test]
    fn test_get_info_without_targets_is_empty() {
        let doc = json!({"rec1": {"id": "X"}});
        assert!(get_info(&doc, &[], &keys(&["id"]), true, true).is_empty());
    }

    #[test]
    fn test_get_info_without_keys_merges_hits() {
        let doc = json!({
            "top": "X",
            "rec1": {"id": "X", "name": "foo"},
            "list": ["X", "Y"]
        });
        let info = get_info(&doc, &[json!("X")], &[], true, true);
        assert_eq!(
            Value::Object(info),
            json!({
                "top": "X",
                "rec1": {"id": "X"},
                "list": {"0": "X"}
            })
        );
    }

    #[test]
    fn test_get_info_no_coincidence_contributes_nothing() {
        let doc = json!({
            "rec1": {"id": "X"},
            "rec2": {"name": "bar"}
        });
        assert!(get_info(&doc, &[json!("X")], &keys(&["name"]), true, true).is_empty());
    }

    #[test]
    fn test_get_info_nested_records_and_multiple_keys() {
        let doc = json!({
            "users": [
                {"id": 7, "name": "ann", "mail": "a@x"},
                {"id": 8, "name": "bob", "mail": "b@x"}
            ]
        });
        let info = get_info(&doc, &[json!(8)], &keys(&["name", "mail"]), true, true);
        assert_eq!(
            Value::Object(info),
            json!({"users[1]": {"id": 8, "name": "bob", "mail": "b@x"}})
        );
    }

    #[test]
    fn test_get_info_fuzzy_modes() {
        let doc = json!({
            "a": {"Title": "Big Movie", "Year": 1999},
            "b": {"Title": "Small", "Year": 2001}
        });
        let info = get_info(&doc, &[json!("movie")], &keys(&["year"]), false, false);
        assert_eq!(
            Value::Object(info),
            json!({"a": {"Title": "Big Movie", "Year": 1999}})
        );
    }

    #[test]
    fn test_filter_objects_example() {
        let doc = json!([
            {"type": "a", "id": 1},
            {"type": "b", "id": 2},
            {"type": "a", "id": 3}
        ]);
        let out = filter_objects(&doc, &keys(&["type"]), &[json!("a")], &[json!("b")], true).unwrap();
        assert_eq!(
            out,
            vec![json!({"type": "a", "id": 1}), json!({"type": "a", "id": 3})]
        );
    }

    #[test]
    fn test_filter_objects_reject_wins() {
        let doc = json!([{"type": "a"}, {"type": "b"}]);
        let out = filter_objects(
            &doc,
            &keys(&["type"]),
            &[json!("a"), json!("b")],
            &[json!("a")],
            true,
        )
        .unwrap();
        assert_eq!(out, vec![json!({"type": "b"})]);
    }

    #[test]
    fn test_filter_objects_without_accepts_keeps_all_candidates() {
        let doc = json!([{"type": "a"}, {"kind": "b"}, {"type": "c"}]);
        let out = filter_objects(&doc, &keys(&["type"]), &[], &[json!("c")], true).unwrap();
        assert_eq!(out, vec![json!({"type": "a"})]);
    }

    #[test]
    fn test_filter_objects_fuzzy_keys() {
        let doc = json!([{"Type": "a"}, {"subtype": "b"}, {"id": 1}]);
        let out = filter_objects(&doc, &keys(&["type"]), &[], &[json!("b")], false).unwrap();
        assert_eq!(out, vec![json!({"Type": "a"})]);

        let strict = filter_objects(&doc, &keys(&["type"]), &[], &[json!("b")], true).unwrap();
        assert!(strict.is_empty());
    }

    #[test]
    fn test_filter_objects_accepts_compare_numbers_by_value() {
        let doc = json!([{"rank": 1.0}, {"rank": 2}]);
        let out = filter_objects(&doc, &keys(&["rank"]), &[json!(1)], &[], true).unwrap();
        assert_eq!(out, vec![json!({"rank": 1.0})]);
    }

    #[test]
    fn test_filter_objects_first_element_quirk() {
        let doc = json!([{"type": ["a", "z"]}, {"type": ["z", "a"]}]);
        let out = filter_objects(&doc, &keys(&["type"]), &[json!("a")], &[], true).unwrap();
        assert_eq!(out, vec![json!({"type": ["a", "z"]})]);
    }

    #[test]
    fn test_filter_objects_sorted_and_deduplicated() {
        let mut items: Vec<Value> = (0..12).map(|i| json!({"type": "a", "tag": "a", "n": i})).collect();
        items.reverse();
        let doc = json!({"items": items});
        let out = filter_objects(&doc, &keys(&["type", "tag"]), &[json!("a")], &[], true).unwrap();
        assert_eq!(out.len(), 12);
        let ns: Vec<i64> = out.iter().map(|v| v["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, (0..12).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_filter_objects_mapping_records() {
        let doc = json!({
            "zeta": {"status": "on"},
            "alpha": {"status": "on"},
            "mid": {"status": "off"}
        });
        let out = filter_objects(&doc, &keys(&["status"]), &[json!("on")], &[], true).unwrap();
        assert_eq!(out, vec![json!({"status": "on"}), json!({"status": "on"})]);
    }

    #[test]
    fn test_filter_objects_rejects_scalar_document() {
        let err = filter_objects(&json!("text"), &keys(&["type"]), &[], &[], true).unwrap_err();
        assert!(matches!(err, Error::NotTraversable("string")));
    }

    #[test]
    fn test_record_locator_shapes() {
        let p = KeyPath::root().key("items").index(4).key("type");
        assert_eq!(record_locator(&p), Some(KeyPath::root().key("items").index(4)));
        let p = KeyPath::root().index(2).key("type");
        assert_eq!(record_locator(&p), Some(KeyPath::root().index(2)));
        let p = KeyPath::root().key("rec").key("type");
        assert_eq!(record_locator(&p), Some(KeyPath::root().key("rec")));
        assert_eq!(record_locator(&KeyPath::root()), None);
    }
}
