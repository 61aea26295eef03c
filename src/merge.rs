use std::collections::BTreeMap;

use crate::value::Value;

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            Value::Mapping(merge_maps(base, overlay))
        }
        (_, overlay) => overlay,
    }
}

fn merge_maps(
    mut base: BTreeMap<String, Value>,
    overlay: BTreeMap<String, Value>,
) -> BTreeMap<String, Value> {
    for (key, overlay_val) in overlay {
        let merged = match base.remove(&key) {
            Some(base_val) => deep_merge(base_val, overlay_val),
            None => overlay_val,
        };
        base.insert(key, merged);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::yaml;

    fn get<'a>(value: &'a Value, dotted: &str) -> &'a Value {
        dotted.split('.').fold(value, |v, seg| &v.as_mapping().unwrap()[seg])
    }

    #[test]
    fn disjoint_keys_merge() {
        let merged = deep_merge(yaml("host: localhost"), yaml("port: 3000"));
        assert_eq!(get(&merged, "host"), &Value::String("localhost".into()));
        assert_eq!(get(&merged, "port"), &Value::Integer(3000));
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let merged = deep_merge(yaml("port: 8080"), yaml("port: 3000"));
        assert_eq!(get(&merged, "port"), &Value::Integer(3000));
    }

    #[test]
    fn nested_mappings_recurse() {
        let base = yaml("database:\n  url: postgres://old\n  pool_size: 5\n");
        let overlay = yaml("database:\n  pool_size: 20\n");
        let merged = deep_merge(base, overlay);
        assert_eq!(
            get(&merged, "database.url"),
            &Value::String("postgres://old".into())
        );
        assert_eq!(get(&merged, "database.pool_size"), &Value::Integer(20));
    }

    #[test]
    fn overlay_scalar_replaces_mapping() {
        let merged = deep_merge(yaml("database:\n  url: x\n"), yaml("database: flat_string"));
        assert_eq!(get(&merged, "database"), &Value::String("flat_string".into()));
    }

    #[test]
    fn overlay_sequence_replaces_not_appends() {
        let merged = deep_merge(yaml("hosts: [a, b]"), yaml("hosts: [c]"));
        assert_eq!(
            get(&merged, "hosts"),
            &Value::Sequence(vec![Value::String("c".into())])
        );
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = yaml("port: 8080");
        assert_eq!(deep_merge(base.clone(), Value::default()), base);
    }

    #[test]
    fn multiple_sequential_merges() {
        let merged = deep_merge(
            deep_merge(yaml("host: a"), yaml("port: 1000")),
            yaml("host: c"),
        );
        assert_eq!(get(&merged, "host"), &Value::String("c".into()));
        assert_eq!(get(&merged, "port"), &Value::Integer(1000));
    }
}
