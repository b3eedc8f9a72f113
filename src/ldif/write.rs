use std::fmt;
use std::io;

use base64::Engine;

use crate::change::Change;


const MAX_LINE_LENGTH: usize = 76;


/// Adapts an [`io::Write`] into a [`fmt::Write`].
///
/// [`fmt::Error`] carries no details, so the I/O error behind a failed write
/// is kept and can be fetched with [`ByteWriteAdapter::take_error`].
pub struct ByteWriteAdapter<'a, W: io::Write> {
    writer: &'a mut W,
    error: Option<io::Error>,
}
impl<'a, W: io::Write> ByteWriteAdapter<'a, W> {
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// The I/O error of the last failed write, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}
impl<'a, W: io::Write> fmt::Write for ByteWriteAdapter<'a, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.writer.write_all(s.as_bytes())
            .map_err(|e| {
                self.error = Some(e);
                fmt::Error
            })
    }
}


/// Whether a value may be written as-is (an RFC 2849 SAFE-STRING that also
/// does not end in a space).
fn is_safe_string(value: &[u8]) -> bool {
    let Some(&first) = value.first() else { return true };
    if matches!(first, b' ' | b':' | b'<') {
        return false;
    }
    if value.last() == Some(&b' ') {
        return false;
    }
    value.iter().all(|b| matches!(b, 0x01..=0x09 | 0x0B..=0x0C | 0x0E..=0x7F))
}

/// Writes a line, folding it if it is longer than the recommended maximum.
fn write_line<W: fmt::Write>(writer: &mut W, line: &str) -> fmt::Result {
    let mut rest = line;
    let mut limit = MAX_LINE_LENGTH;
    let mut first = true;
    loop {
        if rest.len() <= limit {
            if !first {
                writer.write_char(' ')?;
            }
            writer.write_str(rest)?;
            return writer.write_char('\n');
        }

        let mut cut = limit;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if !first {
            writer.write_char(' ')?;
        }
        writer.write_str(&rest[..cut])?;
        writer.write_char('\n')?;

        rest = &rest[cut..];
        // continuation lines start with a space
        limit = MAX_LINE_LENGTH - 1;
        first = false;
    }
}

fn write_value<W: fmt::Write>(writer: &mut W, name: &str, value: &[u8]) -> fmt::Result {
    if value.is_empty() {
        write_line(writer, &format!("{}:", name))
    } else if let (true, Ok(text)) = (is_safe_string(value), std::str::from_utf8(value)) {
        write_line(writer, &format!("{}: {}", name, text))
    } else {
        let encoded = base64::engine::general_purpose::STANDARD.encode(value);
        write_line(writer, &format!("{}:: {}", name, encoded))
    }
}

fn write_dn<W: fmt::Write>(writer: &mut W, dn: &str) -> fmt::Result {
    write_value(writer, "dn", dn.as_bytes())
}


/// Writes a `changetype: add` record.
pub fn write_add_record<W: fmt::Write>(writer: &mut W, dn: &str, add_list: &[(String, Vec<Vec<u8>>)]) -> fmt::Result {
    write_dn(writer, dn)?;
    writeln!(writer, "changetype: add")?;
    for (name, values) in add_list {
        for value in values {
            write_value(writer, name, value)?;
        }
    }
    writeln!(writer)
}

/// Writes a `changetype: modify` record.
pub fn write_modify_record<W: fmt::Write>(writer: &mut W, dn: &str, changes: &[Change]) -> fmt::Result {
    write_dn(writer, dn)?;
    writeln!(writer, "changetype: modify")?;
    for change in changes {
        let (operation, name) = match change {
            Change::Add { attribute, .. } => ("add", attribute),
            Change::Delete { attribute, .. } => ("delete", attribute),
        };
        write_line(writer, &format!("{}: {}", operation, name))?;
        for value in change.values().unwrap_or(&[]) {
            write_value(writer, name, value)?;
        }
        writeln!(writer, "-")?;
    }
    writeln!(writer)
}

/// Writes a `changetype: delete` record.
pub fn write_delete_record<W: fmt::Write>(writer: &mut W, dn: &str) -> fmt::Result {
    write_dn(writer, dn)?;
    writeln!(writer, "changetype: delete")?;
    writeln!(writer)
}
