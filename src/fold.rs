//! Case folding for attribute type names and attribute values.
//!
//! Every case-insensitive lookup in this crate goes through the functions in
//! this module, so names coming from configuration and names coming from
//! entries are always folded the same way.


use std::collections::BTreeSet;

use unicase::UniCase;


/// Folds an attribute type name for comparison.
pub fn fold_name(name: &str) -> UniCase<&str> {
    UniCase::new(name)
}

/// Folds a list of attribute type names into a lookup set.
pub fn fold_names<S: AsRef<str>>(names: &[S]) -> BTreeSet<UniCase<&str>> {
    names.iter()
        .map(|n| fold_name(n.as_ref()))
        .collect()
}


/// The comparison form of an attribute value.
///
/// Values of case-sensitive attributes compare byte for byte. Values of
/// case-insensitive attributes compare with Unicode case folding if they are
/// valid UTF-8 and with ASCII case folding otherwise.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueKey<'a> {
    Exact(&'a [u8]),
    Text(UniCase<&'a str>),
    Binary(Vec<u8>),
}

pub fn fold_value(value: &[u8], case_insensitive: bool) -> ValueKey<'_> {
    if !case_insensitive {
        return ValueKey::Exact(value);
    }
    match std::str::from_utf8(value) {
        Ok(text) => ValueKey::Text(UniCase::new(text)),
        Err(_) => ValueKey::Binary(value.to_ascii_lowercase()),
    }
}
