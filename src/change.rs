use crate::entry::Entry;


/// The attributes of a new entry, ready to be sent as an add request.
pub type AddList = Vec<(String, Vec<Vec<u8>>)>;


/// One attribute-level operation of a modify request.
///
/// Replacing the values of an attribute is expressed as a `Delete` of the
/// whole attribute followed by an `Add` of the new values.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Change {
    Add {
        attribute: String,
        values: Vec<Vec<u8>>,
    },

    /// Removes the given values, or the whole attribute if `values` is `None`.
    Delete {
        attribute: String,
        values: Option<Vec<Vec<u8>>>,
    },
}
impl Change {
    pub fn add<N: Into<String>>(attribute: N, values: Vec<Vec<u8>>) -> Self {
        Self::Add { attribute: attribute.into(), values }
    }

    pub fn delete_attribute<N: Into<String>>(attribute: N) -> Self {
        Self::Delete { attribute: attribute.into(), values: None }
    }

    pub fn delete_values<N: Into<String>>(attribute: N, values: Vec<Vec<u8>>) -> Self {
        Self::Delete { attribute: attribute.into(), values: Some(values) }
    }

    pub fn attribute(&self) -> &str {
        match self {
            Self::Add { attribute, .. } => attribute,
            Self::Delete { attribute, .. } => attribute,
        }
    }

    /// The values carried by this operation; `None` for a whole-attribute delete.
    pub fn values(&self) -> Option<&[Vec<u8>]> {
        match self {
            Self::Add { values, .. } => Some(values),
            Self::Delete { values, .. } => values.as_deref(),
        }
    }

    pub fn is_add(&self) -> bool { matches!(self, Self::Add { .. }) }
    pub fn is_delete(&self) -> bool { matches!(self, Self::Delete { .. }) }
}


/// Applies a list of changes to a copy of an entry, the way a directory
/// server would apply a modify request.
///
/// Attribute type names are matched case-insensitively. Deleting values that
/// are not present is a no-op here (a server would reject it).
pub fn apply_changes(entry: &Entry, changes: &[Change]) -> Entry {
    let mut result = entry.clone();
    for change in changes {
        match change {
            Change::Add { attribute, values } => {
                match result.get_folded_mut(attribute) {
                    Some(existing) => existing.values.extend(values.iter().cloned()),
                    None => result.insert(attribute.clone(), values.iter().cloned()),
                }
            },
            Change::Delete { attribute, values: None } => {
                result.remove_folded(attribute);
            },
            Change::Delete { attribute, values: Some(values) } => {
                let now_empty = match result.get_folded_mut(attribute) {
                    Some(existing) => {
                        existing.values.retain(|v| !values.contains(v));
                        existing.values.is_empty()
                    },
                    None => false,
                };
                if now_empty {
                    result.remove_folded(attribute);
                }
            },
        }
    }
    result
}
