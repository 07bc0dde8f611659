// ABOUTME: Removes vendor-specific x-kong-* extension keys from parsed specification documents.
// ABOUTME: Works on the parsed key/value tree so string values that mention x-kong- are left alone.

/// Prefix shared by all Kong gateway extension keys.
pub const KONG_ANNOTATION_PREFIX: &str = "x-kong-";

/// Whether a mapping key is a Kong annotation.
pub fn is_kong_annotation(key: &str) -> bool {
    key.starts_with(KONG_ANNOTATION_PREFIX)
}

/// Recursively remove every mapping entry whose key is a Kong annotation.
/// Returns the number of entries removed. Entry order is preserved.
pub fn strip_yaml_annotations(value: &mut serde_yaml::Value) -> usize {
    match value {
        serde_yaml::Value::Mapping(mapping) => {
            let mut removed = 0;
            let entries = std::mem::take(mapping);
            for (key, mut child) in entries {
                if key.as_str().is_some_and(is_kong_annotation) {
                    removed += 1;
                    continue;
                }
                removed += strip_yaml_annotations(&mut child);
                mapping.insert(key, child);
            }
            removed
        }
        serde_yaml::Value::Sequence(items) => items.iter_mut().map(strip_yaml_annotations).sum(),
        serde_yaml::Value::Tagged(tagged) => strip_yaml_annotations(&mut tagged.value),
        _ => 0,
    }
}

/// JSON counterpart of [`strip_yaml_annotations`].
pub fn strip_json_annotations(value: &mut serde_json::Value) -> usize {
    match value {
        serde_json::Value::Object(map) => {
            let before = map.len();
            map.retain(|key, _| !is_kong_annotation(key));
            let mut removed = before - map.len();
            for child in map.values_mut() {
                removed += strip_json_annotations(child);
            }
            removed
        }
        serde_json::Value::Array(items) => items.iter_mut().map(strip_json_annotations).sum(),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> serde_yaml::Value {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn recognizes_prefix_only() {
        assert!(is_kong_annotation("x-kong-plugin-key-auth"));
        assert!(is_kong_annotation("x-kong-"));
        assert!(!is_kong_annotation("x-kongfoo"));
        assert!(!is_kong_annotation("x-internal"));
        assert!(!is_kong_annotation("my-x-kong-key"));
    }

    #[test]
    fn strips_nested_yaml_keys() {
        let mut doc = yaml(
            r#"
openapi: 3.0.2
x-kong-name: top
info:
  title: Pets
  x-kong-upstream-defaults:
    slots: 10
paths:
  /pets:
    x-kong-plugin-rate-limiting:
      enabled: true
    get:
      operationId: listPets
      x-kong-route-defaults:
        strip_path: false
"#,
        );

        let removed = strip_yaml_annotations(&mut doc);

        assert_eq!(removed, 4);
        let text = serde_yaml::to_string(&doc).unwrap();
        assert!(!text.contains("x-kong-"));
        assert!(text.contains("operationId: listPets"));
        assert!(text.contains("title: Pets"));
    }

    #[test]
    fn strips_inside_sequences() {
        let mut doc = yaml(
            r#"
servers:
  - url: https://example.com
    x-kong-service-defaults:
      retries: 3
  - url: https://backup.example.com
"#,
        );

        assert_eq!(strip_yaml_annotations(&mut doc), 1);
        assert_eq!(doc["servers"][0]["url"].as_str(), Some("https://example.com"));
        assert!(doc["servers"][0].get("x-kong-service-defaults").is_none());
        assert_eq!(doc["servers"].as_sequence().map(Vec::len), Some(2));
    }

    #[test]
    fn keeps_string_values_mentioning_prefix() {
        let mut doc = yaml("description: configure x-kong-plugin-cors on routes\n");

        assert_eq!(strip_yaml_annotations(&mut doc), 0);
        assert_eq!(
            doc["description"].as_str(),
            Some("configure x-kong-plugin-cors on routes")
        );
    }

    #[test]
    fn preserves_key_order() {
        let mut doc = yaml("openapi: 3.0.2\nx-kong-a: 1\ninfo: {}\npaths: {}\n");

        strip_yaml_annotations(&mut doc);

        let keys: Vec<&str> = doc
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["openapi", "info", "paths"]);
    }

    #[test]
    fn strips_nested_json_keys() {
        let mut doc = serde_json::json!({
            "openapi": "3.0.2",
            "x-kong-plugin-key-auth": {"name": "key-auth"},
            "paths": {
                "/pets": {
                    "get": {"x-kong-route-defaults": {}, "summary": "x-kong-mention"}
                }
            },
            "tags": [{"name": "pets", "x-kong-tag": true}]
        });

        assert_eq!(strip_json_annotations(&mut doc), 3);
        assert_eq!(doc["paths"]["/pets"]["get"]["summary"], "x-kong-mention");
        assert!(doc.get("x-kong-plugin-key-auth").is_none());
        assert!(doc["paths"]["/pets"]["get"].get("x-kong-route-defaults").is_none());
        assert!(doc["tags"][0].get("x-kong-tag").is_none());
    }

    #[test]
    fn scalars_are_untouched() {
        let mut value = serde_yaml::Value::String("x-kong-value".to_string());
        assert_eq!(strip_yaml_annotations(&mut value), 0);

        let mut value = serde_json::Value::Null;
        assert_eq!(strip_json_annotations(&mut value), 0);
    }
}
