use std::borrow::Cow;

use base64::Engine;
use thiserror::Error;
use tracing::debug;

use crate::entry::Entry;


/// One content record of an LDIF file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LdifRecord {
    pub dn: String,
    pub entry: Entry,
}


#[derive(Debug, Error)]
pub enum LdifError {
    #[error("record {record}: line is missing a colon: {line:?}")]
    MissingColon { record: usize, line: String },

    #[error("record {record}: invalid base64 value for {attribute:?}")]
    InvalidBase64 {
        record: usize,
        attribute: String,
        #[source] source: base64::DecodeError,
    },

    #[error("record {record}: URL value for {attribute:?} is not supported")]
    UrlValue { record: usize, attribute: String },

    #[error("record {record}: does not start with a \"dn\" line")]
    MissingDn { record: usize },

    #[error("record {record}: more than one \"dn\" line")]
    DuplicateDn { record: usize },

    #[error("record {record}: DN is not valid UTF-8")]
    DnNotUtf8 { record: usize },

    #[error("record {record}: change records are not supported")]
    ChangeRecord { record: usize },
}
impl LdifError {
    /// The 1-based number of the offending record.
    pub fn record(&self) -> usize {
        match self {
            Self::MissingColon { record, .. } => *record,
            Self::InvalidBase64 { record, .. } => *record,
            Self::UrlValue { record, .. } => *record,
            Self::MissingDn { record } => *record,
            Self::DuplicateDn { record } => *record,
            Self::DnNotUtf8 { record } => *record,
            Self::ChangeRecord { record } => *record,
        }
    }
}


fn normalize_newlines<'a>(ldif: &'a str) -> Cow<'a, str> {
    if ldif.contains("\r\n") {
        Cow::Owned(ldif.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(ldif)
    }
}

fn join_continuations<'a>(ldif: &'a str) -> Cow<'a, str> {
    if ldif.contains("\n ") {
        Cow::Owned(ldif.replace("\n ", ""))
    } else {
        Cow::Borrowed(ldif)
    }
}

fn strip_comments<'a>(ldif: &'a str) -> Cow<'a, str> {
    if ldif.starts_with('#') || ldif.contains("\n#") {
        let uncommented: Vec<&str> = ldif.split('\n')
            .filter(|ln| !ln.starts_with('#'))
            .collect();
        Cow::Owned(uncommented.join("\n"))
    } else {
        Cow::Borrowed(ldif)
    }
}

fn strip_version<'a>(ldif: &'a str) -> &'a str {
    let trimmed = ldif.trim_start_matches('\n');
    match trimmed.split_once('\n') {
        Some((first_line, rest)) if is_version_line(first_line) => rest,
        None if is_version_line(trimmed) => "",
        _ => trimmed,
    }
}

fn is_version_line(line: &str) -> bool {
    line.split_once(':')
        .map(|(key, _)| key.eq_ignore_ascii_case("version"))
        .unwrap_or(false)
}

fn cut_str_to_max(s: &str, mut max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    while !s.is_char_boundary(max_bytes) {
        max_bytes -= 1;
    }
    &s[0..max_bytes]
}


/// Decodes the value part of an LDIF line (everything after the first
/// colon).
fn decode_value(record: usize, attribute: &str, rest: &str) -> Result<Vec<u8>, LdifError> {
    if let Some(base64_str) = rest.strip_prefix(':') {
        // base64; strip off additional spaces
        let base64_str = base64_str.trim_matches(' ');
        base64::engine::general_purpose::STANDARD.decode(base64_str)
            .map_err(|source| LdifError::InvalidBase64 {
                record,
                attribute: attribute.to_owned(),
                source,
            })
    } else if rest.starts_with('<') {
        Err(LdifError::UrlValue { record, attribute: attribute.to_owned() })
    } else {
        // plain (possibly empty); only the separating spaces go
        Ok(rest.trim_start_matches(' ').as_bytes().to_vec())
    }
}


/// Parses LDIF content records.
///
/// Repeated attribute lines append to the attribute's values, which keep
/// their order from the file.
pub fn parse_ldif(ldif: &str) -> Result<Vec<LdifRecord>, LdifError> {
    // normalize LDIF
    let normalized = normalize_newlines(ldif);
    let joined = join_continuations(&normalized);
    let stripped = strip_comments(&joined);
    let content = strip_version(&stripped);

    // records are separated by one or more empty lines
    let mut records = Vec::new();
    let mut current_lines: Vec<&str> = Vec::new();
    for line in content.split('\n') {
        if line.len() > 0 {
            current_lines.push(line);
            continue;
        }
        if current_lines.len() > 0 {
            let record = parse_record(records.len() + 1, &current_lines)?;
            records.push(record);
            current_lines.clear();
        }
    }
    if current_lines.len() > 0 {
        let record = parse_record(records.len() + 1, &current_lines)?;
        records.push(record);
    }

    Ok(records)
}

fn parse_record(record_number: usize, lines: &[&str]) -> Result<LdifRecord, LdifError> {
    let mut dn = None;
    let mut entry = Entry::new();

    for line in lines {
        // split at the attribute name
        let Some((key, rest)) = line.split_once(':') else {
            return Err(LdifError::MissingColon {
                record: record_number,
                line: cut_str_to_max(line, 64).to_owned(),
            });
        };
        let value = decode_value(record_number, key, rest)?;

        if key.eq_ignore_ascii_case("dn") {
            if dn.is_some() {
                return Err(LdifError::DuplicateDn { record: record_number });
            }
            let dn_string = String::from_utf8(value)
                .map_err(|_| LdifError::DnNotUtf8 { record: record_number })?;
            dn = Some(dn_string);
            continue;
        }
        if dn.is_none() {
            return Err(LdifError::MissingDn { record: record_number });
        }
        if key.eq_ignore_ascii_case("changetype") {
            return Err(LdifError::ChangeRecord { record: record_number });
        }

        entry.push_value(key, value);
    }

    let dn = dn.ok_or(LdifError::MissingDn { record: record_number })?;
    debug!(record = record_number, %dn, attributes = entry.len(), "parsed LDIF record");
    Ok(LdifRecord { dn, entry })
}
