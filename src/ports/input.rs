//! Input source port: where the collector reads raw form values from.

use std::collections::{BTreeMap, HashMap};

/// Raw, unvalidated text for each feature.
///
/// `None` (or blank text) means the user left the control untouched and
/// the feature default applies.
pub trait InputSource {
    fn raw_value(&self, key: &str) -> Option<&str>;
}

impl InputSource for HashMap<String, String> {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl InputSource for BTreeMap<String, String> {
    fn raw_value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}
