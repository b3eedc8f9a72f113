use tracing::trace;

use crate::change::AddList;
use crate::entry::Entry;
use crate::fold::{fold_name, fold_names};


/// Builds the attribute list for adding `entry` as a new directory object.
///
/// Attributes whose type is in `ignore_attribute_types` (compared
/// case-insensitively) and attributes without any values are left out. The
/// remaining attributes keep their order and their values are passed on
/// unchanged.
pub fn add_modlist<S: AsRef<str>>(entry: &Entry, ignore_attribute_types: &[S]) -> AddList {
    let ignored = fold_names(ignore_attribute_types);

    let mut add_list = Vec::with_capacity(entry.len());
    for attribute in entry {
        if ignored.contains(&fold_name(&attribute.name)) {
            trace!(attribute = %attribute.name, "ignored");
            continue;
        }
        if attribute.values.is_empty() {
            trace!(attribute = %attribute.name, "no values");
            continue;
        }
        add_list.push((attribute.name.clone(), attribute.values.clone()));
    }
    add_list
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::add_modlist;
    use crate::change::AddList;
    use crate::entry::Entry;

    #[test]
    fn test_add_modlist() {
        let mut entry = Entry::new()
            .with("objectClass", ["top", "person"])
            .with("cn", ["Alice"])
            .with("modifyTimestamp", ["20240101000000Z"]);
        entry.insert_nullable("description", [None::<&str>]);
        entry.insert_nullable("sn", [None, Some("Smith")]);

        let add_list = add_modlist(&entry, &["MODIFYTIMESTAMP"]);
        assert_eq!(add_list, vec![
            ("objectClass".to_owned(), vec![b"top".to_vec(), b"person".to_vec()]),
            ("cn".to_owned(), vec![b"Alice".to_vec()]),
            ("sn".to_owned(), vec![b"Smith".to_vec()]),
        ]);
    }

    #[test]
    fn test_add_modlist_empty() {
        let no_ignores: &[&str] = &[];
        assert_eq!(add_modlist(&Entry::new(), no_ignores), AddList::new());

        let entry = Entry::new().with("cn", ["Alice"]);
        assert_eq!(add_modlist(&entry, &["cn"]), AddList::new());
    }

    #[test]
    fn test_add_modlist_does_not_touch_input() {
        let entry = Entry::new()
            .with("cn", ["Alice"])
            .with("userPassword", ["secret"]);
        let before = entry.clone();
        let add_list = add_modlist(&entry, &["userpassword"]);
        assert_eq!(add_list.len(), 1);
        assert_eq!(entry, before);
    }
}
