//! Global signal definitions, looked up by the catch events that reference them.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::xml::XmlElement;

/// Maps signal definition ids to their display names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalCatalog {
    signals: HashMap<String, String, ahash::RandomState>,
}

impl SignalCatalog {
    /// Collect every signal declared anywhere in the document.
    /// Signals are declared next to the process rather than inside it, so the whole tree is scanned.
    pub fn build(document: &XmlElement) -> Self {
        let mut signals = HashMap::default();
        for signal in document.find_all_bpmn("signal") {
            match (signal.attribute("id"), signal.attribute("name")) {
                (Some(id), Some(name)) => {
                    signals.insert(id.to_string(), name.to_string());
                }
                _ => debug!(element = %signal.name, "skipping signal without id or name"),
            }
        }
        Self { signals }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.signals.get(id).map(String::as_str)
    }

    /// The display name for a signal reference, or a placeholder naming the unknown reference
    pub fn resolve(&self, signal_ref: &str) -> String {
        match self.get(signal_ref) {
            Some(name) => name.to_string(),
            None => {
                warn!(signal_ref, "unresolved signal reference");
                format!("Unknown signal reference: {}", signal_ref)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SignalCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let signals = iter
            .into_iter()
            .map(|(id, name)| (id.into(), name.into()))
            .collect();
        SignalCatalog { signals }
    }
}
