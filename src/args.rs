use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};


#[derive(Clone, Debug, Eq, Hash, Ord, Parser, PartialEq, PartialOrd)]
#[command(version, about = "Compute LDAP add and modify records from LDIF files")]
pub struct Opts {
    /// TOML file with diff options.
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Attribute type to leave out entirely; may be repeated.
    #[arg(short = 'i', long = "ignore", value_name = "ATTRIBUTE")]
    pub ignore_attribute_types: Vec<String>,

    /// Attribute type whose values compare case-insensitively; may be repeated.
    #[arg(short = 'C', long = "case-ignore", value_name = "ATTRIBUTE")]
    pub case_ignore_attribute_types: Vec<String>,

    /// Do not delete attributes that only the old entry has.
    #[arg(long)]
    pub ignore_oldexistent: bool,

    /// Write the LDIF output here instead of to standard output.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Subcommand)]
pub enum Mode {
    /// Write an add record for every entry of an LDIF file.
    Add(AddOpts),

    /// Write the records that turn the entries of one LDIF file into those of another.
    Diff(DiffOpts),
}

#[derive(Args, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AddOpts {
    pub ldif_path: PathBuf,
}

#[derive(Args, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DiffOpts {
    pub old_path: PathBuf,
    pub new_path: PathBuf,

    /// Do not delete entries that only the old file has.
    #[arg(long)]
    pub keep_missing: bool,
}
