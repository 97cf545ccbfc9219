use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

/// Untyped document tree that supports a default-preserving deep merge.
pub(crate) trait Document: Sized {
    /// Human-readable name of the node's shape.
    fn kind(&self) -> &'static str;

    fn is_mapping(&self) -> bool;

    /// True for an empty document (`null`), which carries no overrides.
    fn is_blank(&self) -> bool;

    /// Deep merges two documents, `overlay` taking precedence.
    ///
    /// We start with overlay as base, then add the keys it is missing from
    /// base. Mappings merge recursively; a `null` in overlay keeps the base
    /// value, and every other node in overlay replaces base completely
    /// (sequences are not concatenated).
    fn merge(base: Self, overlay: Self) -> Self;
}

impl Document for JsonValue {
    fn kind(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }

    fn is_mapping(&self) -> bool {
        self.is_object()
    }

    fn is_blank(&self) -> bool {
        self.is_null()
    }

    fn merge(base: Self, overlay: Self) -> Self {
        match (base, overlay) {
            (JsonValue::Object(base_map), JsonValue::Object(overlay_map)) => {
                let mut merged_map = overlay_map;

                for (key, base_value) in base_map {
                    let value = match merged_map.remove(&key) {
                        None => base_value,
                        Some(overlay_value) => Self::merge(base_value, overlay_value),
                    };
                    merged_map.insert(key, value);
                }

                JsonValue::Object(merged_map)
            }
            (base, JsonValue::Null) => base,
            (_, overlay) => overlay,
        }
    }
}

impl Document for YamlValue {
    fn kind(&self) -> &'static str {
        match self {
            YamlValue::Null => "null",
            YamlValue::Bool(_) => "boolean",
            YamlValue::Number(_) => "number",
            YamlValue::String(_) => "string",
            YamlValue::Sequence(_) => "sequence",
            YamlValue::Mapping(_) => "mapping",
            YamlValue::Tagged(_) => "tagged value",
        }
    }

    fn is_mapping(&self) -> bool {
        matches!(self, YamlValue::Mapping(_))
    }

    fn is_blank(&self) -> bool {
        self.is_null()
    }

    fn merge(base: Self, overlay: Self) -> Self {
        match (base, overlay) {
            (YamlValue::Mapping(base_map), YamlValue::Mapping(overlay_map)) => {
                let mut merged_map = overlay_map;

                for (key, base_value) in base_map {
                    let value = match merged_map.remove(&key) {
                        None => base_value,
                        Some(overlay_value) => Self::merge(base_value, overlay_value),
                    };
                    merged_map.insert(key, value);
                }

                YamlValue::Mapping(merged_map)
            }
            (base, YamlValue::Null) => base,
            (_, overlay) => overlay,
        }
    }
}
