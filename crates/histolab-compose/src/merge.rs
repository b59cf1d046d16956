use serde_json::Value;

/// Fill a tree of overrides with defaults, recursively.
///
/// Objects merge key-wise: an override leaf wins over the default, a key
/// missing from the override is taken from the defaults, and nested objects
/// recurse. Keys present only in the override are kept verbatim. This is what
/// keeps old saved designs renderable after the default schema grows new
/// keys: whatever the stored blob lacks comes back from the defaults.
pub fn merge_defaults(overrides: &Value, defaults: &Value) -> Value {
    match (overrides, defaults) {
        (Value::Object(over), Value::Object(def)) => {
            let mut merged = serde_json::Map::with_capacity(def.len());
            for (key, def_value) in def {
                let value = match over.get(key) {
                    Some(over_value) => merge_defaults(over_value, def_value),
                    None => def_value.clone(),
                };
                merged.insert(key.clone(), value);
            }
            for (key, over_value) in over {
                if !def.contains_key(key) {
                    merged.insert(key.clone(), over_value.clone());
                }
            }
            Value::Object(merged)
        }
        (Value::Null, _) => defaults.clone(),
        _ => overrides.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn missing_keys_come_from_defaults() {
        let overrides = json!({ "margins": { "top": 30 } });
        let defaults = json!({ "margins": { "top": 20, "bottom": 20 }, "scale": 100 });

        let merged = merge_defaults(&overrides, &defaults);
        assert_eq!(merged["margins"]["top"], 30);
        assert_eq!(merged["margins"]["bottom"], 20);
        assert_eq!(merged["scale"], 100);
    }

    #[test]
    fn override_leaves_win() {
        let overrides = json!({ "scale": 80 });
        let defaults = json!({ "scale": 100 });
        assert_eq!(merge_defaults(&overrides, &defaults)["scale"], 80);
    }

    #[test]
    fn unknown_override_keys_survive() {
        let overrides = json!({ "custom_block": { "x": 1 } });
        let defaults = json!({ "scale": 100 });

        let merged = merge_defaults(&overrides, &defaults);
        assert_eq!(merged["custom_block"]["x"], 1);
        assert_eq!(merged["scale"], 100);
    }

    #[test]
    fn null_override_yields_defaults() {
        let defaults = json!({ "a": 1 });
        assert_eq!(merge_defaults(&Value::Null, &defaults), defaults);
    }

    #[test]
    fn type_mismatch_keeps_the_override() {
        // A stored scalar where the schema grew an object: the stored value
        // wins; the typed layer falls back to its own defaults downstream.
        let overrides = json!({ "header": "legacy" });
        let defaults = json!({ "header": { "size": 14 } });
        assert_eq!(merge_defaults(&overrides, &defaults)["header"], "legacy");
    }

    #[test]
    fn empty_override_is_identity_of_defaults() {
        let defaults = json!({ "a": { "b": { "c": 3 } }, "d": [1, 2] });
        assert_eq!(merge_defaults(&json!({}), &defaults), defaults);
    }

    fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(depth, 32, 4, |inner| {
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect()))
        })
    }

    fn arb_json_object(depth: u32) -> impl Strategy<Value = Value> {
        prop::collection::btree_map("[a-z]{1,4}", arb_json(depth), 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect()))
    }

    proptest! {
        /// Merging any object of overrides keeps every top-level default key.
        #[test]
        fn merged_tree_covers_all_default_keys(
            overrides in arb_json_object(3),
            defaults in arb_json_object(3),
        ) {
            let merged = merge_defaults(&overrides, &defaults);
            let (Value::Object(merged), Value::Object(defaults)) = (&merged, &defaults) else {
                unreachable!("strategies generate objects");
            };
            prop_assert!(defaults.keys().all(|k| merged.contains_key(k)));
        }

        /// Merging the defaults into themselves changes nothing.
        #[test]
        fn merge_with_self_is_identity(tree in arb_json(3)) {
            prop_assert_eq!(merge_defaults(&tree, &tree), tree);
        }
    }
}
