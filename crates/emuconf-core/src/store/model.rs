//! In-memory model of one configuration file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named configuration file: section name → section.
///
/// Sections and keys are kept sorted so a store always serialises the same
/// way regardless of the order edits were made in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IniStore {
    sections: BTreeMap<String, Section>,
}

impl IniStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the section, creating an empty one if it does not exist yet.
    pub fn get_or_create_section(&mut self, name: &str) -> &mut Section {
        self.sections.entry(name.to_string()).or_default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterates over `(name, section)` pairs in name order.
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, section)| (name.as_str(), section))
    }

    /// True when the store holds no sections at all.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }
}

/// Key/value pairs of one section. Values are kept as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Section {
    values: BTreeMap<String, String>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Removes the key, returning true if it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads a boolean value.
    ///
    /// Accepts `True`/`False` (the form written by [`Section::set_bool`]) as
    /// well as `true`/`false` and `1`/`0`. Missing or unparsable values yield
    /// `default`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
            Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
            _ => default,
        }
    }

    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, if value { "True" } else { "False" });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_section_is_lazy() {
        let mut store = IniStore::new();
        assert!(store.section("Settings").is_none());

        store.get_or_create_section("Settings").set("Backend", "Vulkan");
        store.get_or_create_section("Settings");

        assert_eq!(store.sections().count(), 1);
        assert_eq!(
            store.section("Settings").unwrap().get("Backend"),
            Some("Vulkan")
        );
    }

    #[test]
    fn test_section_delete_and_exists() {
        let mut section = Section::default();
        section.set("ThemeName", "Clean");
        assert!(section.exists("ThemeName"));
        assert!(section.delete("ThemeName"));
        assert!(!section.delete("ThemeName"));
        assert!(section.is_empty());
    }

    #[test]
    fn test_bool_parsing() {
        let mut section = Section::default();
        section.set("A", "True");
        section.set("B", "0");
        section.set("C", "maybe");
        section.set_bool("D", false);

        assert!(section.get_bool("A", false));
        assert!(!section.get_bool("B", true));
        assert!(section.get_bool("C", true));
        assert!(!section.get_bool("C", false));
        assert!(!section.get_bool("D", true));
        assert!(section.get_bool("Missing", true));
        assert_eq!(section.get("D"), Some("False"));
    }

    #[test]
    fn test_store_serializes_as_tables() {
        let mut store = IniStore::new();
        store.get_or_create_section("General").set("ISOPaths", "2");
        store
            .get_or_create_section("Interface")
            .set("ThemeName", "Clean Blue");

        let text = toml::to_string(&store).unwrap();
        assert!(text.contains("[General]"));
        assert!(text.contains("ThemeName = \"Clean Blue\""));

        let parsed: IniStore = toml::from_str(&text).unwrap();
        assert_eq!(parsed, store);
    }
}
