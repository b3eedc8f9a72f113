use std::slice;

use crate::fold::fold_name;


/// A single attribute of an [`Entry`]: its type name and its values in order.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<Vec<u8>>,
}
impl Attribute {
    pub fn new(name: String, values: Vec<Vec<u8>>) -> Self {
        Self {
            name,
            values,
        }
    }
}


/// The state of one directory object: attribute type names mapped to values.
///
/// Attributes keep their insertion order and names are unique as exact
/// strings. Values are stored in the order they were given; absent values
/// (`None`) are dropped as soon as they reach the entry, so nothing
/// downstream ever sees them.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Entry {
    attributes: Vec<Attribute>,
}
impl Entry {
    pub fn new() -> Self { Self { attributes: Vec::new() } }

    /// Builder-style variant of [`Entry::insert`].
    pub fn with<N, I, V>(mut self, name: N, values: I) -> Self
        where
            N: Into<String>,
            I: IntoIterator<Item = V>,
            V: Into<Vec<u8>> {
        self.insert(name, values);
        self
    }

    /// Sets the values of an attribute, replacing any previous values stored
    /// under exactly the same name (its position is kept).
    pub fn insert<N, I, V>(&mut self, name: N, values: I)
        where
            N: Into<String>,
            I: IntoIterator<Item = V>,
            V: Into<Vec<u8>> {
        self.insert_nullable(name, values.into_iter().map(Some))
    }

    /// Like [`Entry::insert`], but values may be absent. Absent values are
    /// discarded.
    pub fn insert_nullable<N, I, V>(&mut self, name: N, values: I)
        where
            N: Into<String>,
            I: IntoIterator<Item = Option<V>>,
            V: Into<Vec<u8>> {
        let name = name.into();
        let values: Vec<Vec<u8>> = values
            .into_iter()
            .flatten()
            .map(|v| v.into())
            .collect();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.values = values,
            None => self.attributes.push(Attribute::new(name, values)),
        }
    }

    /// Appends a single value to an attribute, creating the attribute if
    /// necessary.
    pub fn push_value<N: Into<String>>(&mut self, name: N, value: Vec<u8>) {
        let name = name.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.values.push(value),
            None => self.attributes.push(Attribute::new(name, vec![value])),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.attributes.iter()
            .find(|a| a.name == name)
            .map(|a| a.values.as_slice())
    }

    /// Looks up an attribute by case-folded type name.
    ///
    /// If several attributes fold to the same name, the last one wins.
    pub fn get_folded(&self, name: &str) -> Option<&Attribute> {
        let folded = fold_name(name);
        self.attributes.iter()
            .rev()
            .find(|a| fold_name(&a.name) == folded)
    }

    pub(crate) fn get_folded_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        let folded = fold_name(name);
        self.attributes.iter_mut()
            .rev()
            .find(|a| fold_name(&a.name) == folded)
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Vec<u8>>> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).values)
    }

    /// Removes every attribute whose type name folds to the same name as
    /// `name`.
    pub(crate) fn remove_folded(&mut self, name: &str) {
        let folded = fold_name(name);
        self.attributes.retain(|a| fold_name(&a.name) != folded);
    }

    pub fn len(&self) -> usize { self.attributes.len() }
    pub fn is_empty(&self) -> bool { self.attributes.is_empty() }
    pub fn iter(&self) -> slice::Iter<'_, Attribute> { self.attributes.iter() }
}
impl<'a> IntoIterator for &'a Entry {
    type Item = &'a Attribute;
    type IntoIter = slice::Iter<'a, Attribute>;
    fn into_iter(self) -> Self::IntoIter { self.attributes.iter() }
}
impl IntoIterator for Entry {
    type Item = Attribute;
    type IntoIter = std::vec::IntoIter<Attribute>;
    fn into_iter(self) -> Self::IntoIter { self.attributes.into_iter() }
}
impl<N, I, V> FromIterator<(N, I)> for Entry
        where
            N: Into<String>,
            I: IntoIterator<Item = V>,
            V: Into<Vec<u8>> {
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut entry = Entry::new();
        for (name, values) in iter {
            entry.insert(name, values);
        }
        entry
    }
}


#[cfg(test)]
mod tests {
    use super::Entry;

    #[test]
    fn test_insert_keeps_order_and_replaces() {
        let mut entry = Entry::new()
            .with("cn", ["Alice"])
            .with("sn", ["Smith"]);
        entry.insert("cn", ["Bob"]);

        let names: Vec<&str> = entry.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["cn", "sn"]);
        assert_eq!(entry.get("cn").unwrap(), [b"Bob".to_vec()]);
    }

    #[test]
    fn test_null_values_dropped() {
        let mut entry = Entry::new();
        entry.insert_nullable("mail", [Some("a@x"), None, Some("b@x")]);
        entry.insert_nullable("description", [None::<&str>]);

        assert_eq!(entry.get("mail").unwrap(), [b"a@x".to_vec(), b"b@x".to_vec()]);
        assert_eq!(entry.get("description").unwrap().len(), 0);
        assert_eq!(entry.len(), 2);
    }

    #[test]
    fn test_names_are_exact_but_folded_lookup_works() {
        let entry = Entry::new()
            .with("cn", ["lower"])
            .with("CN", ["upper"]);
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.get("Cn"), None);
        assert_eq!(entry.get_folded("Cn").unwrap().name, "CN");
    }

    #[test]
    fn test_push_value() {
        let mut entry = Entry::new();
        entry.push_value("objectClass", b"top".to_vec());
        entry.push_value("objectClass", b"person".to_vec());
        assert_eq!(entry.get("objectClass").unwrap(), [b"top".to_vec(), b"person".to_vec()]);
        assert_eq!(entry.remove("objectClass").unwrap().len(), 2);
        assert!(entry.is_empty());
    }
}
