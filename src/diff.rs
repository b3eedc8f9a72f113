use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;
use unicase::UniCase;

use crate::change::Change;
use crate::entry::{Attribute, Entry};
use crate::fold::{fold_name, fold_names, fold_value};
use crate::options::DiffOptions;


/// Computes the modify operations that turn `old_entry` into `new_entry`.
///
/// Attributes are processed in the order of `new_entry`:
///
/// * an attribute missing from (or empty in) the old entry is added,
/// * an attribute that is empty in the new entry is deleted,
/// * an attribute whose values differ is deleted and then added with the new
///   values.
///
/// Values are compared as unordered collections, but the number of values
/// must match as well. Attributes of the old entry that `new_entry` does not
/// mention are then deleted, unless `options.ignore_oldexistent` is set.
/// Ignored attribute types never produce an operation.
pub fn modify_modlist(old_entry: &Entry, new_entry: &Entry, options: &DiffOptions) -> Vec<Change> {
    let ignored = fold_names(&options.ignore_attribute_types);
    let case_ignored = fold_names(&options.case_ignore_attribute_types);

    // later attributes with the same folded name shadow earlier ones
    let mut unmatched_old: BTreeMap<UniCase<&str>, &Attribute> = BTreeMap::new();
    for attribute in old_entry {
        unmatched_old.insert(fold_name(&attribute.name), attribute);
    }

    let mut changes = Vec::new();
    for attribute in new_entry {
        let folded = fold_name(&attribute.name);
        if ignored.contains(&folded) {
            trace!(attribute = %attribute.name, "ignored");
            continue;
        }

        let new_value = attribute.values.as_slice();
        let old_value = match unmatched_old.remove(&folded) {
            Some(old_attribute) => old_attribute.values.as_slice(),
            None => &[],
        };

        match (old_value.is_empty(), new_value.is_empty()) {
            (true, true) => {},
            (true, false) => {
                trace!(attribute = %attribute.name, "adding");
                changes.push(Change::add(attribute.name.clone(), new_value.to_vec()));
            },
            (false, true) => {
                trace!(attribute = %attribute.name, "deleting");
                changes.push(Change::delete_attribute(attribute.name.clone()));
            },
            (false, false) => {
                let case_insensitive = case_ignored.contains(&folded);
                if values_differ(old_value, new_value, case_insensitive) {
                    trace!(attribute = %attribute.name, case_insensitive, "replacing");
                    changes.push(Change::delete_attribute(attribute.name.clone()));
                    changes.push(Change::add(attribute.name.clone(), new_value.to_vec()));
                } else {
                    trace!(attribute = %attribute.name, case_insensitive, "unchanged");
                }
            },
        }
    }

    if !options.ignore_oldexistent {
        // each folded name is deleted where it first appears, spelled like
        // the attribute that won it
        for attribute in old_entry {
            let folded = fold_name(&attribute.name);
            if ignored.contains(&folded) {
                continue;
            }
            let Some(unmatched) = unmatched_old.remove(&folded) else { continue };

            trace!(attribute = %unmatched.name, "deleting attribute missing from new entry");
            changes.push(Change::delete_attribute(unmatched.name.clone()));
        }
    }

    changes
}


/// Whether two non-empty value lists differ.
///
/// They are considered equal if they have the same length and each value of
/// one list can be found in the other.
fn values_differ(old_value: &[Vec<u8>], new_value: &[Vec<u8>], case_insensitive: bool) -> bool {
    if old_value.len() != new_value.len() {
        return true;
    }

    let new_keys: BTreeSet<_> = new_value.iter()
        .map(|v| fold_value(v, case_insensitive))
        .collect();
    if old_value.iter().any(|v| !new_keys.contains(&fold_value(v, case_insensitive))) {
        return true;
    }

    let old_keys: BTreeSet<_> = old_value.iter()
        .map(|v| fold_value(v, case_insensitive))
        .collect();
    new_value.iter().any(|v| !old_keys.contains(&fold_value(v, case_insensitive)))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::modify_modlist;
    use crate::change::Change;
    use crate::entry::Entry;
    use crate::options::DiffOptions;

    fn values(vs: &[&str]) -> Vec<Vec<u8>> {
        vs.iter().map(|v| v.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_replace_changed_values() {
        let old = Entry::new().with("mail", ["a@x", "b@x"]);
        let new = Entry::new().with("mail", ["b@x", "c@x"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), vec![
            Change::delete_attribute("mail"),
            Change::add("mail", values(&["b@x", "c@x"])),
        ]);
    }

    #[test]
    fn test_unchanged() {
        let old = Entry::new().with("sn", ["Smith"]);
        let new = Entry::new().with("sn", ["Smith"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), Vec::<Change>::new());
    }

    #[test]
    fn test_add_to_empty() {
        let new = Entry::new().with("cn", ["Alice"]);
        assert_eq!(modify_modlist(&Entry::new(), &new, &DiffOptions::default()), vec![
            Change::add("cn", values(&["Alice"])),
        ]);
    }

    #[test]
    fn test_value_order_is_irrelevant() {
        let old = Entry::new().with("objectClass", ["top", "person", "inetOrgPerson"]);
        let new = Entry::new().with("objectClass", ["inetOrgPerson", "top", "person"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), Vec::<Change>::new());
    }

    #[test]
    fn test_value_count_matters() {
        let old = Entry::new()
            .with("sn", ["X"])
            .with("cn", ["Y"]);
        let new = Entry::new()
            .with("sn", ["X"])
            .with("cn", ["Y", "Y"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), vec![
            Change::delete_attribute("cn"),
            Change::add("cn", values(&["Y", "Y"])),
        ]);

        let old = Entry::new().with("cn", ["a", "a"]);
        let new = Entry::new().with("cn", ["a"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()).len(), 2);
    }

    #[test]
    fn test_case_sensitivity() {
        let old = Entry::new().with("cn", ["A"]);
        let new = Entry::new().with("cn", ["a"]);

        let sensitive = modify_modlist(&old, &new, &DiffOptions::default());
        assert_eq!(sensitive, vec![
            Change::delete_attribute("cn"),
            Change::add("cn", values(&["a"])),
        ]);

        let insensitive = modify_modlist(&old, &new, &DiffOptions::new().case_ignoring(["CN"]));
        assert_eq!(insensitive, Vec::<Change>::new());
    }

    #[test]
    fn test_attribute_names_fold() {
        let old = Entry::new().with("Mail", ["a@x"]);
        let new = Entry::new().with("mail", ["a@x"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), Vec::<Change>::new());

        // operations use the new entry's spelling
        let new = Entry::new().with("MAIL", ["b@x"]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), vec![
            Change::delete_attribute("MAIL"),
            Change::add("MAIL", values(&["b@x"])),
        ]);
    }

    #[test]
    fn test_delete_emptied_attribute() {
        let old = Entry::new().with("description", ["old"]);
        let mut new = Entry::new();
        new.insert_nullable("description", [None::<&str>]);
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), vec![
            Change::delete_attribute("description"),
        ]);

        // also with ignore_oldexistent, since the new entry mentions it
        let options = DiffOptions::new().keeping_oldexistent(true);
        assert_eq!(modify_modlist(&old, &new, &options), vec![
            Change::delete_attribute("description"),
        ]);
    }

    #[test]
    fn test_empty_on_both_sides() {
        let old = Entry::new().with("description", Vec::<Vec<u8>>::new());
        let new = Entry::new().with("description", Vec::<Vec<u8>>::new());
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), Vec::<Change>::new());
    }

    #[test]
    fn test_old_only_attributes() {
        let old = Entry::new()
            .with("cn", ["Alice"])
            .with("telephoneNumber", ["123"])
            .with("modifyTimestamp", ["20240101000000Z"])
            .with("mobile", ["456"]);
        let new = Entry::new().with("cn", ["Alice"]);

        let options = DiffOptions::new().ignoring(["modifytimestamp"]);
        assert_eq!(modify_modlist(&old, &new, &options), vec![
            Change::delete_attribute("telephoneNumber"),
            Change::delete_attribute("mobile"),
        ]);

        let options = options.keeping_oldexistent(true);
        assert_eq!(modify_modlist(&old, &new, &options), Vec::<Change>::new());
    }

    #[test]
    fn test_ignored_attributes() {
        let old = Entry::new()
            .with("userPassword", ["old"])
            .with("cn", ["Alice"]);
        let new = Entry::new()
            .with("userPassword", ["new"])
            .with("cn", ["Alicia"]);
        let options = DiffOptions::new().ignoring(["USERPASSWORD"]);
        assert_eq!(modify_modlist(&old, &new, &options), vec![
            Change::delete_attribute("cn"),
            Change::add("cn", values(&["Alicia"])),
        ]);
    }

    #[test]
    fn test_old_duplicate_spellings_delete_once() {
        let old = Entry::new()
            .with("ou", ["first"])
            .with("OU", ["second"]);
        let new = Entry::new();
        assert_eq!(modify_modlist(&old, &new, &DiffOptions::default()), vec![
            Change::delete_attribute("OU"),
        ]);
    }

    #[test]
    fn test_old_duplicate_spellings_keep_first_position() {
        let old = Entry::new()
            .with("ou", ["first"])
            .with("cn", ["Alice"])
            .with("OU", ["second"]);
        assert_eq!(modify_modlist(&old, &Entry::new(), &DiffOptions::default()), vec![
            Change::delete_attribute("OU"),
            Change::delete_attribute("cn"),
        ]);
    }

    #[test]
    fn test_inputs_untouched() {
        let old = Entry::new().with("cn", ["Alice"]).with("sn", ["Smith"]);
        let new = Entry::new().with("cn", ["Bob"]);
        let (old_before, new_before) = (old.clone(), new.clone());
        let _ = modify_modlist(&old, &new, &DiffOptions::default());
        assert_eq!(old, old_before);
        assert_eq!(new, new_before);
    }
}
