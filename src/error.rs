use std::io;
use std::path::PathBuf;

use ldapmodlist::ldif::LdifError;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path:?}")]
    Read { path: PathBuf, #[source] source: io::Error },

    #[error("failed to parse options file {path:?}")]
    Config { path: PathBuf, #[source] source: toml::de::Error },

    #[error("failed to parse LDIF file {path:?}")]
    Ldif { path: PathBuf, #[source] source: LdifError },

    #[error("{path:?}: invalid DN {dn:?}")]
    InvalidDn { path: PathBuf, dn: String },

    #[error("{path:?}: DN {dn:?} appears more than once")]
    DuplicateDn { path: PathBuf, dn: String },

    #[error("failed to create {path:?}")]
    Create { path: PathBuf, #[source] source: io::Error },

    #[error("failed to write output")]
    Write(#[source] io::Error),

    #[error("failed to flush output")]
    Flush(#[source] io::Error),
}
