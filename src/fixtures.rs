#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;

    use crate::flatten::FlatMap;
    use crate::value::{Scalar, Value};

    /// Parse a YAML snippet into a generic [`Value`].
    pub fn yaml(src: &str) -> Value {
        let parsed: serde_yaml::Value = serde_yaml::from_str(src).unwrap();
        Value::try_from(parsed).unwrap()
    }

    /// Build a mapping value from literal pairs.
    pub fn mapping(pairs: Vec<(&str, Value)>) -> Value {
        Value::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    /// Build a flat map of string values.
    pub fn flat(pairs: &[(&str, &str)]) -> FlatMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Scalar::String(v.to_string())))
            .collect()
    }

    /// A small service config used across module tests.
    pub const SERVICE_YAML: &str = "\
service:
  name: billing
  port: 8443
  tls: true
  timeout: 2.5
database:
  host: db.internal
  replicas: [a, b]
";

    #[test]
    fn service_fixture_parses() {
        let value = yaml(SERVICE_YAML);
        let root = value.as_mapping().unwrap();
        assert!(root.contains_key("service"));
        assert!(root.contains_key("database"));
    }
}
