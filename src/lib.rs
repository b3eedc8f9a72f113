//! Compute LDAP add and modify lists.
//!
//! [`add_modlist`] turns an [`Entry`] into the attribute list of an add
//! request. [`modify_modlist`] compares an existing entry with the desired
//! one and returns the smallest list of [`Change`]s that a modify request
//! needs to get from one to the other.
//!
//! ```
//! use ldapmodlist::{modify_modlist, Change, DiffOptions, Entry};
//!
//! let old = Entry::new().with("mail", ["a@x", "b@x"]);
//! let new = Entry::new().with("mail", ["b@x", "c@x"]);
//! let changes = modify_modlist(&old, &new, &DiffOptions::default());
//! assert_eq!(changes, vec![
//!     Change::delete_attribute("mail"),
//!     Change::add("mail", vec![b"b@x".to_vec(), b"c@x".to_vec()]),
//! ]);
//! ```


pub mod change;
pub mod diff;
pub mod dn;
pub mod entry;
pub mod fold;
pub mod ldap;
pub mod ldif;
pub mod normalize;
pub mod options;


pub use crate::change::{apply_changes, AddList, Change};
pub use crate::diff::modify_modlist;
pub use crate::entry::{Attribute, Entry};
pub use crate::normalize::add_modlist;
pub use crate::options::DiffOptions;
