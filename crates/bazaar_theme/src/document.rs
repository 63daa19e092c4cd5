//! Document root style surface
//!
//! [`StyleTarget`] is everything the engine needs from the live document:
//! custom properties on the root element plus `<link rel="stylesheet">`
//! elements addressed by id. [`RootStyle`] is an in-memory document root that
//! renders to a standalone stylesheet.

use indexmap::IndexMap;
use std::sync::RwLock;

/// Write access to the document root's styles
pub trait StyleTarget {
    /// Set a custom property (name includes the leading `--`)
    fn set_property(&self, name: &str, value: &str);

    /// Current value of a custom property
    fn property(&self, name: &str) -> Option<String>;

    /// Insert a stylesheet link with the given id
    fn set_link(&self, id: &str, href: &str);

    /// Remove the element with the given id, if present
    fn remove_element(&self, id: &str);
}

impl<T: StyleTarget + ?Sized> StyleTarget for &T {
    fn set_property(&self, name: &str, value: &str) {
        (**self).set_property(name, value)
    }

    fn property(&self, name: &str) -> Option<String> {
        (**self).property(name)
    }

    fn set_link(&self, id: &str, href: &str) {
        (**self).set_link(id, href)
    }

    fn remove_element(&self, id: &str) {
        (**self).remove_element(id)
    }
}

/// In-memory document root.
///
/// Properties keep first-insertion order so rendered output is stable.
#[derive(Default)]
pub struct RootStyle {
    properties: RwLock<IndexMap<String, String>>,
    links: RwLock<IndexMap<String, String>>,
}

impl RootStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all properties in insertion order
    pub fn properties(&self) -> Vec<(String, String)> {
        self.properties
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Snapshot of `(id, href)` stylesheet links
    pub fn links(&self) -> Vec<(String, String)> {
        self.links
            .read()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Render the links as `@import` rules followed by a `:root` block
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (_, href) in self.links.read().unwrap().iter() {
            css.push_str(&format!("@import url(\"{href}\");\n"));
        }
        if !css.is_empty() {
            css.push('\n');
        }
        css.push_str(":root {\n");
        for (name, value) in self.properties.read().unwrap().iter() {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }

    /// Render the links as HTML `<link>` tags
    pub fn to_link_tags(&self) -> String {
        self.links
            .read()
            .unwrap()
            .iter()
            .map(|(id, href)| format!("<link id=\"{id}\" rel=\"stylesheet\" href=\"{href}\">\n"))
            .collect()
    }
}

impl StyleTarget for RootStyle {
    fn set_property(&self, name: &str, value: &str) {
        self.properties
            .write()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.read().unwrap().get(name).cloned()
    }

    fn set_link(&self, id: &str, href: &str) {
        self.links
            .write()
            .unwrap()
            .insert(id.to_string(), href.to_string());
    }

    fn remove_element(&self, id: &str) {
        self.links.write().unwrap().shift_remove(id);
    }
}
