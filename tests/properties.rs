//! Property tests for search over arbitrary documents.

use proptest::prelude::*;
use serde_json::{json, Value};
use teddy_lib::tree::{all_paths, resolve};
use teddy_lib::{search, KeyPath, PathSegment, Query};

fn arb_document() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_strict_key_search_finds_every_key_path(doc in arb_document()) {
        for path in all_paths(&doc) {
            if let Some(PathSegment::Key(k)) = path.last() {
                let hits = search(&doc, &Query::key(k.as_str()), true);
                prop_assert!(hits.iter().any(|m| m.path == path), "missing {}", path);
            }
        }
    }

    #[test]
    fn prop_strict_value_search_finds_every_node(doc in arb_document()) {
        for path in all_paths(&doc) {
            let node = resolve(&doc, &path).unwrap();
            let hits = search(&doc, &Query::Value(node.clone()), true);
            prop_assert!(hits.iter().any(|m| m.path == path && m.value == node));
        }
    }

    #[test]
    fn prop_search_is_idempotent(doc in arb_document(), key in "[a-z]{1,2}") {
        let query = Query::key(key);
        prop_assert_eq!(search(&doc, &query, false), search(&doc, &query, false));
    }

    #[test]
    fn prop_display_form_parses_back(doc in arb_document()) {
        for path in all_paths(&doc) {
            let parsed: KeyPath = path.to_string().parse().unwrap();
            prop_assert_eq!(parsed, path);
        }
    }
}
