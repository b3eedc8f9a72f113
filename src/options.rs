use serde::{Deserialize, Serialize};


/// Configuration of [`modify_modlist`](crate::modify_modlist).
///
/// Can be read from TOML; every key is optional:
///
/// ```toml
/// ignore_attribute_types = ["modifyTimestamp"]
/// case_ignore_attribute_types = ["mail"]
/// ignore_oldexistent = false
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Attribute types that never show up in any operation.
    pub ignore_attribute_types: Vec<String>,

    /// Attribute types whose values are compared case-insensitively.
    pub case_ignore_attribute_types: Vec<String>,

    /// If set, attributes of the old entry that the new entry does not
    /// mention at all are left alone instead of being deleted.
    pub ignore_oldexistent: bool,
}
impl DiffOptions {
    pub fn new() -> Self { Self::default() }

    pub fn ignoring<S: Into<String>, I: IntoIterator<Item = S>>(mut self, attribute_types: I) -> Self {
        self.ignore_attribute_types.extend(attribute_types.into_iter().map(|s| s.into()));
        self
    }

    pub fn case_ignoring<S: Into<String>, I: IntoIterator<Item = S>>(mut self, attribute_types: I) -> Self {
        self.case_ignore_attribute_types.extend(attribute_types.into_iter().map(|s| s.into()));
        self
    }

    pub fn keeping_oldexistent(mut self, ignore_oldexistent: bool) -> Self {
        self.ignore_oldexistent = ignore_oldexistent;
        self
    }
}
