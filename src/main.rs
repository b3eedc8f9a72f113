mod args;
mod error;


use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use ldapmodlist::{add_modlist, modify_modlist, DiffOptions};
use ldapmodlist::dn::DnKey;
use ldapmodlist::ldif::{
    parse_ldif, write_add_record, write_delete_record, write_modify_record, ByteWriteAdapter,
    LdifRecord,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::{AddOpts, DiffOpts, Mode, Opts};
use crate::error::Error;


fn load_options(opts: &Opts) -> Result<DiffOptions, Error> {
    let mut options = match &opts.config {
        Some(config_path) => {
            let config_string = std::fs::read_to_string(config_path)
                .map_err(|source| Error::Read { path: config_path.clone(), source })?;
            toml::from_str(&config_string)
                .map_err(|source| Error::Config { path: config_path.clone(), source })?
        },
        None => DiffOptions::default(),
    };

    // command line extends the options file
    options.ignore_attribute_types.extend(opts.ignore_attribute_types.iter().cloned());
    options.case_ignore_attribute_types.extend(opts.case_ignore_attribute_types.iter().cloned());
    if opts.ignore_oldexistent {
        options.ignore_oldexistent = true;
    }
    Ok(options)
}


fn read_records(path: &Path) -> Result<Vec<LdifRecord>, Error> {
    let ldif_string = std::fs::read_to_string(path)
        .map_err(|source| Error::Read { path: path.to_owned(), source })?;
    let records = parse_ldif(&ldif_string)
        .map_err(|source| Error::Ldif { path: path.to_owned(), source })?;
    debug!(path = %path.display(), records = records.len(), "loaded LDIF file");
    Ok(records)
}

fn index_by_dn(path: &Path, records: &[LdifRecord]) -> Result<BTreeMap<DnKey, usize>, Error> {
    let mut index = BTreeMap::new();
    for (i, record) in records.iter().enumerate() {
        let key = DnKey::parse(&record.dn)
            .ok_or_else(|| Error::InvalidDn { path: path.to_owned(), dn: record.dn.clone() })?;
        if index.insert(key, i).is_some() {
            return Err(Error::DuplicateDn { path: path.to_owned(), dn: record.dn.clone() });
        }
    }
    Ok(index)
}


fn write_failed<W: Write>(writer: &mut ByteWriteAdapter<'_, W>) -> Error {
    let source = writer.take_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "failed to format LDIF"));
    Error::Write(source)
}


fn write_adds<W: Write>(out: &mut W, opts: &AddOpts, options: &DiffOptions) -> Result<(), Error> {
    let records = read_records(&opts.ldif_path)?;

    let mut writer = ByteWriteAdapter::new(out);
    let mut added = 0usize;
    for record in &records {
        let add_list = add_modlist(&record.entry, &options.ignore_attribute_types);
        if add_list.is_empty() {
            warn!(dn = %record.dn, "skipping entry without any attributes to add");
            continue;
        }
        write_add_record(&mut writer, &record.dn, &add_list)
            .map_err(|_| write_failed(&mut writer))?;
        added += 1;
    }

    info!(added, "wrote add records");
    Ok(())
}

fn write_diff<W: Write>(out: &mut W, opts: &DiffOpts, options: &DiffOptions) -> Result<(), Error> {
    let old_records = read_records(&opts.old_path)?;
    let new_records = read_records(&opts.new_path)?;
    let mut unmatched_old = index_by_dn(&opts.old_path, &old_records)?;
    index_by_dn(&opts.new_path, &new_records)?;

    let mut writer = ByteWriteAdapter::new(out);
    let (mut added, mut modified, mut deleted) = (0usize, 0usize, 0usize);
    for new_record in &new_records {
        let key = DnKey::parse(&new_record.dn)
            .ok_or_else(|| Error::InvalidDn { path: opts.new_path.clone(), dn: new_record.dn.clone() })?;
        match unmatched_old.remove(&key) {
            Some(old_index) => {
                let changes = modify_modlist(&old_records[old_index].entry, &new_record.entry, options);
                if changes.is_empty() {
                    debug!(dn = %new_record.dn, "unchanged");
                    continue;
                }
                write_modify_record(&mut writer, &new_record.dn, &changes)
                    .map_err(|_| write_failed(&mut writer))?;
                modified += 1;
            },
            None => {
                let add_list = add_modlist(&new_record.entry, &options.ignore_attribute_types);
                if add_list.is_empty() {
                    warn!(dn = %new_record.dn, "skipping new entry without any attributes to add");
                    continue;
                }
                write_add_record(&mut writer, &new_record.dn, &add_list)
                    .map_err(|_| write_failed(&mut writer))?;
                added += 1;
            },
        }
    }

    if !opts.keep_missing {
        let leftover: BTreeSet<usize> = unmatched_old.into_values().collect();
        for (old_index, old_record) in old_records.iter().enumerate() {
            if !leftover.contains(&old_index) {
                continue;
            }
            write_delete_record(&mut writer, &old_record.dn)
                .map_err(|_| write_failed(&mut writer))?;
            deleted += 1;
        }
    }

    info!(added, modified, deleted, "wrote change records");
    Ok(())
}


fn run(opts: Opts) -> Result<(), Error> {
    let options = load_options(&opts)?;

    let mut out: Box<dyn Write> = match &opts.output {
        Some(output_path) => {
            let file = File::create(output_path)
                .map_err(|source| Error::Create { path: output_path.clone(), source })?;
            Box::new(BufWriter::new(file))
        },
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match &opts.mode {
        Mode::Add(add_opts) => write_adds(&mut out, add_opts, &options)?,
        Mode::Diff(diff_opts) => write_diff(&mut out, diff_opts, &options)?,
    }

    out.flush()
        .map_err(Error::Flush)
}


fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let opts = Opts::parse();
    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(s) = source {
                eprintln!("  caused by: {}", s);
                source = std::error::Error::source(s);
            }
            ExitCode::FAILURE
        },
    }
}
