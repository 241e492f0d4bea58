use proptest::prelude::*;
use serde_json::{Value, json};

/// Strategy for arbitrary JSON values nested up to `depth` levels.
pub fn arb_json(depth: u32) -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-50i64..50).prop_map(|i| json!(i)),
        "[a-z0-9]{0,4}".prop_map(Value::String),
    ];

    leaf.prop_recursive(depth, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,3}", inner), 0..4).prop_map(|pairs| {
                let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
                Value::Object(map)
            }),
        ]
    })
}

/// Strategy for a JSON object root.
pub fn arb_object(depth: u32) -> impl Strategy<Value = Value> {
    prop::collection::vec(("[a-z]{1,3}", arb_json(depth)), 0..5).prop_map(|pairs| {
        let map: serde_json::Map<String, Value> = pairs.into_iter().collect();
        Value::Object(map)
    })
}

/// Every dotted path present in a JSON value, depth-first.
pub fn extract_paths(value: &Value, prefix: &str, paths: &mut Vec<String>) {
    let children: Vec<(String, &Value)> = match value {
        Value::Object(obj) => obj.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Value::Array(arr) => arr.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        _ => return,
    };
    for (segment, child) in children {
        let path = valdn::path::join(prefix, &segment);
        paths.push(path.clone());
        extract_paths(child, &path, paths);
    }
}
