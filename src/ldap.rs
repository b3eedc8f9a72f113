//! Hand-off of computed operations to an [`ldap3`] session.
//!
//! ```no_run
//! # async fn run(ldap: &mut ldap3::Ldap, old: &ldapmodlist::Entry, new: &ldapmodlist::Entry) -> ldap3::result::Result<()> {
//! use ldapmodlist::{modify_modlist, DiffOptions};
//! use ldapmodlist::ldap::to_ldap_mods;
//!
//! let changes = modify_modlist(old, new, &DiffOptions::default());
//! if !changes.is_empty() {
//!     ldap.modify("cn=Alice,dc=example,dc=com", to_ldap_mods(&changes)).await?.success()?;
//! }
//! # Ok(())
//! # }
//! ```


use std::collections::HashSet;

use ldap3::Mod;

use crate::change::Change;


/// Converts changes into modifications for [`ldap3::Ldap::modify`].
///
/// A whole-attribute delete becomes a [`Mod::Delete`] with an empty value
/// set, which the protocol defines as removing the attribute. Value sets lose
/// ordering and duplicates, as the protocol does not carry them anyway.
pub fn to_ldap_mods(changes: &[Change]) -> Vec<Mod<Vec<u8>>> {
    changes.iter()
        .map(|change| match change {
            Change::Add { attribute, values } => Mod::Add(
                attribute.clone().into_bytes(),
                values.iter().cloned().collect(),
            ),
            Change::Delete { attribute, values } => Mod::Delete(
                attribute.clone().into_bytes(),
                values.iter().flatten().cloned().collect(),
            ),
        })
        .collect()
}

/// Converts an add list into attributes for [`ldap3::Ldap::add`].
pub fn to_ldap_attrs(add_list: &[(String, Vec<Vec<u8>>)]) -> Vec<(Vec<u8>, HashSet<Vec<u8>>)> {
    add_list.iter()
        .map(|(name, values)| (
            name.clone().into_bytes(),
            values.iter().cloned().collect(),
        ))
        .collect()
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use ldap3::Mod;

    use super::{to_ldap_attrs, to_ldap_mods};
    use crate::change::Change;

    fn set(vs: &[&str]) -> HashSet<Vec<u8>> {
        vs.iter().map(|v| v.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_to_ldap_mods() {
        let changes = vec![
            Change::delete_attribute("mail"),
            Change::add("mail", vec![b"b@x".to_vec(), b"c@x".to_vec()]),
            Change::delete_values("objectClass", vec![b"person".to_vec()]),
        ];
        let mods = to_ldap_mods(&changes);
        assert_eq!(mods.len(), 3);

        match &mods[0] {
            Mod::Delete(name, values) => {
                assert_eq!(name, b"mail");
                assert!(values.is_empty());
            },
            other => panic!("unexpected {:?}", other),
        }
        match &mods[1] {
            Mod::Add(name, values) => {
                assert_eq!(name, b"mail");
                assert_eq!(values, &set(&["b@x", "c@x"]));
            },
            other => panic!("unexpected {:?}", other),
        }
        match &mods[2] {
            Mod::Delete(name, values) => {
                assert_eq!(name, b"objectClass");
                assert_eq!(values, &set(&["person"]));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_to_ldap_attrs() {
        let add_list = vec![
            ("objectClass".to_owned(), vec![b"top".to_vec(), b"person".to_vec()]),
            ("cn".to_owned(), vec![b"Alice".to_vec()]),
        ];
        let attrs = to_ldap_attrs(&add_list);
        assert_eq!(attrs, vec![
            (b"objectClass".to_vec(), set(&["top", "person"])),
            (b"cn".to_vec(), set(&["Alice"])),
        ]);
    }
}
