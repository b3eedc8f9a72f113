//! Reading entries from and writing change records to LDIF (RFC 2849).


pub mod read;
pub mod write;


pub use read::{parse_ldif, LdifError, LdifRecord};
pub use write::{write_add_record, write_delete_record, write_modify_record, ByteWriteAdapter};
