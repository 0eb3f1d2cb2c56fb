//! Flattened `<properties>` blocks
//!
//! Components, filters and strategies carry free-form configuration in a
//! `properties` element. [`PropertyMap::from_node`] turns that element into
//! an ordered map keyed by property name.

use super::node::{Content, Node};
use crate::schema::NodeKind;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Value of one entry in a properties block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// `property` or `text-property`
    Value { value: String },
    /// `system-property`: looked up when the component is created
    System { key: String, default: Option<String> },
    /// `factory-property`: produced by a factory class
    Factory { factory: String },
    /// Nested `map`
    Map { entries: PropertyMap },
    /// Nested `list`
    List { values: Vec<String> },
}

impl PropertyValue {
    /// Literal value, for plain properties only.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Value { value } => Some(value),
            _ => None,
        }
    }

    /// Resolve a plain or system property using `lookup` for system keys.
    pub fn resolve_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        match self {
            PropertyValue::Value { value } => Some(value.clone()),
            PropertyValue::System { key, default } => lookup(key).or_else(|| default.clone()),
            _ => None,
        }
    }
}

/// `file-properties` reference: an external properties file to merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertiesFile {
    pub location: String,
    pub override_existing: bool,
}

/// Ordered name to value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMap {
    entries: Vec<(String, PropertyValue)>,
    files: Vec<PropertiesFile>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten a `properties` or `map` node. Entries keep document order; a
    /// later entry with the same name replaces the earlier value in place.
    pub fn from_node(node: &Node) -> Self {
        let mut map = Self::new();
        for item in node.content() {
            let Content::Child { node: child, .. } = item else {
                continue;
            };
            let name = child.get_str("name").unwrap_or_default().to_string();
            match child.kind() {
                NodeKind::Property => {
                    let value = child.get_str("value").unwrap_or_default().to_string();
                    map.insert(name, PropertyValue::Value { value });
                }
                NodeKind::TextProperty => {
                    let value = child.text().unwrap_or_default().to_string();
                    map.insert(name, PropertyValue::Value { value });
                }
                NodeKind::SystemProperty => {
                    let key = child.get_str("key").unwrap_or_default().to_string();
                    let default = child.get_str("defaultValue").map(str::to_string);
                    map.insert(name, PropertyValue::System { key, default });
                }
                NodeKind::FactoryProperty => {
                    let factory = child.get_str("factory").unwrap_or_default().to_string();
                    map.insert(name, PropertyValue::Factory { factory });
                }
                NodeKind::MapProperty => {
                    map.insert(name, PropertyValue::Map { entries: PropertyMap::from_node(child) });
                }
                NodeKind::ListProperty => {
                    let values = child
                        .children("entry")
                        .iter()
                        .filter_map(|entry| entry.get_str("value"))
                        .map(str::to_string)
                        .collect();
                    map.insert(name, PropertyValue::List { values });
                }
                NodeKind::FileProperties => map.files.push(PropertiesFile {
                    location: child.get_str("location").unwrap_or_default().to_string(),
                    override_existing: child.get_bool("override").unwrap_or(true),
                }),
                _ => {}
            }
        }
        map
    }

    /// Flatten the `properties` child of `owner`, if any.
    pub fn of(owner: &Node) -> Self {
        owner.child("properties").map(Self::from_node).unwrap_or_default()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, value: PropertyValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(PropertyValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn files(&self) -> &[PropertiesFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.files.is_empty()
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;

    fn property(name: &str, value: &str) -> Node {
        Node::standard(NodeKind::Property)
            .with("name", name)
            .and_then(|node| node.with("value", value))
            .expect("property")
    }

    #[test]
    fn flattens_in_document_order() {
        let registry = SchemaRegistry::standard();
        let mut properties = Node::standard(NodeKind::Properties);
        properties.push_child("property", property("b", "2")).expect("property");

        let mut text = Node::standard(NodeKind::TextProperty).with("name", "script").expect("name");
        text.set_text(Some("return true;"), registry).expect("text");
        properties.push_child("text-property", text).expect("text-property");
        properties.push_child("property", property("a", "1")).expect("property");

        let mut list = Node::standard(NodeKind::ListProperty).with("name", "hosts").expect("name");
        for host in ["alpha", "beta"] {
            list.push_child("entry", Node::standard(NodeKind::ListEntry).with("value", host).expect("value"))
                .expect("entry");
        }
        properties.push_child("list", list).expect("list");

        let map = PropertyMap::from_node(&properties);
        let keys: Vec<&str> = map.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "script", "a", "hosts"]);
        assert_eq!(map.get_str("script"), Some("return true;"));
        assert_eq!(
            map.get("hosts"),
            Some(&PropertyValue::List { values: vec!["alpha".to_string(), "beta".to_string()] })
        );
    }

    #[test]
    fn duplicate_names_keep_first_position() {
        let mut properties = Node::standard(NodeKind::Properties);
        properties.push_child("property", property("a", "1")).expect("property");
        properties.push_child("property", property("b", "2")).expect("property");
        properties.push_child("property", property("a", "3")).expect("property");

        let map = PropertyMap::from_node(&properties);
        assert_eq!(map.len(), 2);
        assert_eq!(map.iter().next().map(|(key, value)| (key, value.as_str())), Some(("a", Some("3"))));
    }

    #[test]
    fn system_properties_resolve_with_fallback() {
        let value = PropertyValue::System { key: "mule.home".to_string(), default: Some("/opt/mule".to_string()) };
        assert_eq!(value.resolve_with(|_| None).as_deref(), Some("/opt/mule"));
        assert_eq!(value.resolve_with(|_| Some("/srv".to_string())).as_deref(), Some("/srv"));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let mut map = PropertyMap::new();
        map.insert("z", PropertyValue::Value { value: "1".to_string() });
        map.insert("a", PropertyValue::Factory { factory: "org.example.Factory".to_string() });
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(
            json,
            r#"{"z":{"type":"value","value":"1"},"a":{"type":"factory","factory":"org.example.Factory"}}"#
        );
    }
}
