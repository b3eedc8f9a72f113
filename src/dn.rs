use std::fmt;

use unicase::UniCase;


/// One `type=value` pair of a relative distinguished name.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Ava {
    pub key: String,
    pub value: Vec<u8>,
}
impl Ava {
    pub fn new(key: String, value: Vec<u8>) -> Self {
        Self {
            key,
            value,
        }
    }
}


/// A relative distinguished name; usually a single [`Ava`], several if the RDN
/// is multi-valued (`cn=a+uid=b`).
pub type Rdn = Vec<Ava>;


/// A distinguished name in a form suitable for matching.
///
/// Attribute types and values compare case-insensitively, surrounding spaces
/// and escaping are ignored, and the AVAs of a multi-valued RDN may appear in
/// any order.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DnKey {
    rdns: Vec<Vec<(UniCase<String>, Vec<u8>)>>,
}
impl DnKey {
    pub fn parse(dn: &str) -> Option<Self> {
        let rdns = dn_to_rdns(dn)?;
        let mut folded_rdns = Vec::with_capacity(rdns.len());
        for rdn in rdns {
            let mut folded_avas: Vec<(UniCase<String>, Vec<u8>)> = rdn.into_iter()
                .map(|ava| (UniCase::new(ava.key), fold_dn_value(ava.value)))
                .collect();
            folded_avas.sort();
            folded_rdns.push(folded_avas);
        }
        Some(Self { rdns: folded_rdns })
    }

    pub fn len(&self) -> usize { self.rdns.len() }
    pub fn is_empty(&self) -> bool { self.rdns.is_empty() }
}
impl fmt::Display for DnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first_rdn = true;
        for rdn in &self.rdns {
            if first_rdn {
                first_rdn = false;
            } else {
                write!(f, ",")?;
            }
            let mut first_ava = true;
            for (key, value) in rdn {
                if first_ava {
                    first_ava = false;
                } else {
                    write!(f, "+")?;
                }
                write!(f, "{}={}", key.to_lowercase(), String::from_utf8_lossy(value))?;
            }
        }
        Ok(())
    }
}

fn fold_dn_value(value: Vec<u8>) -> Vec<u8> {
    match String::from_utf8(value) {
        Ok(s) => s.to_lowercase().into_bytes(),
        Err(e) => e.into_bytes().to_ascii_lowercase(),
    }
}


/// Splits a DN (RFC 4514) into its RDNs, most specific first.
///
/// Returns `None` if the DN is malformed.
pub fn dn_to_rdns(dn: &str) -> Option<Vec<Rdn>> {
    if dn.trim_matches(' ').len() == 0 {
        return Some(Vec::with_capacity(0));
    }

    let tokens = tokenize(dn)?;

    let pieces = split_at_unescaped(&tokens, ',');
    let mut rdns = Vec::with_capacity(pieces.len());
    for piece in pieces {
        let mut rdn = Vec::new();
        for ava_tokens in split_at_unescaped(&piece, '+') {
            let (key_tokens, value_tokens) = split_at_first_unescaped_equals(&ava_tokens)?;
            let key_bytes = tokens_to_bytes(&key_tokens);
            let value_bytes = tokens_to_bytes(&value_tokens);

            let key_string = String::from_utf8(key_bytes).ok()?;
            let key = key_string.trim_matches(' ');
            if key.len() == 0 {
                return None;
            }
            rdn.push(Ava::new(key.to_owned(), value_bytes));
        }
        rdns.push(rdn);
    }

    Some(rdns)
}

#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
enum Token<'a> {
    UnescapedSlice(&'a str),
    EscapedByte(u8),
}

/// Tokenizes the given DN string.
///
/// Used to abstract away escapes.
fn tokenize(dn: &str) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();

    let mut current_start = 0;
    loop {
        let next_backslash = match find_from(dn, '\\', current_start) {
            Some(nb) => nb,
            None => {
                let rest_slice = &dn[current_start..];
                if rest_slice.len() > 0 {
                    tokens.push(Token::UnescapedSlice(rest_slice));
                }
                break;
            },
        };

        // eat the part until the backslash
        let eaten = &dn[current_start..next_backslash];
        tokens.push(Token::UnescapedSlice(eaten));

        // what follows the backslash?
        let c = dn[next_backslash+1..].chars().nth(0)?;
        if [' ', '"', '#', '+', ',', ';', '<', '=', '>', '\\'].binary_search(&c).is_ok() {
            tokens.push(Token::EscapedByte(c as u8));

            // continue after that escaped character
            current_start = next_backslash + 2;
        } else if c.is_ascii_hexdigit() {
            // okay, do we have another hex digit?
            let c2 = dn[next_backslash+2..].chars().nth(0)?;
            if !c2.is_ascii_hexdigit() {
                // a string like "\A%"
                return None;
            }
            let hex_slice = &dn[next_backslash+1..next_backslash+3];
            let hex_value = u8::from_str_radix(hex_slice, 16).ok()?;
            tokens.push(Token::EscapedByte(hex_value));

            // continue after the second hex digit
            current_start = next_backslash + 3;
        } else {
            // nothing else may be escaped
            return None;
        }
    }

    Some(tokens)
}


fn find_from(haystack: &str, needle: char, offset: usize) -> Option<usize> {
    haystack[offset..]
        .find(needle)
        .map(|i| i + offset)
}

fn split_at_unescaped<'a>(tokens: &[Token<'a>], separator: char) -> Vec<Vec<Token<'a>>> {
    let mut pieces = Vec::new();
    let mut current_piece = Vec::new();
    for token in tokens {
        match token {
            Token::EscapedByte(_) => {
                current_piece.push(*token);
            },
            Token::UnescapedSlice(s) => {
                let mut parts = s.split(separator);
                if let Some(first) = parts.next() {
                    if first.len() > 0 {
                        current_piece.push(Token::UnescapedSlice(first));
                    }
                }
                for part in parts {
                    pieces.push(std::mem::take(&mut current_piece));
                    if part.len() > 0 {
                        current_piece.push(Token::UnescapedSlice(part));
                    }
                }
            },
        }
    }
    pieces.push(current_piece);
    pieces
}

fn split_at_first_unescaped_equals<'a>(tokens: &[Token<'a>]) -> Option<(Vec<Token<'a>>, Vec<Token<'a>>)> {
    let mut front_pieces = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::EscapedByte(_) => {
                front_pieces.push(*token);
            },
            Token::UnescapedSlice(s) => {
                match s.find('=') {
                    None => {
                        front_pieces.push(*token);
                    },
                    Some(equals_index) => {
                        let before = &s[..equals_index];
                        let after = &s[equals_index+1..];

                        if before.len() > 0 {
                            front_pieces.push(Token::UnescapedSlice(before));
                        }

                        // handle the rest
                        let mut rear_pieces = Vec::new();
                        if after.len() > 0 {
                            rear_pieces.push(Token::UnescapedSlice(after));
                        }
                        for rest_piece in tokens.iter().skip(i + 1) {
                            rear_pieces.push(*rest_piece);
                        }
                        trim_unescaped_spaces(&mut rear_pieces);

                        return Some((front_pieces, rear_pieces));
                    },
                }
            },
        }
    }

    // no unescaped equals found
    None
}

/// Strips unescaped spaces from both ends of a value.
fn trim_unescaped_spaces(tokens: &mut Vec<Token<'_>>) {
    if let Some(Token::UnescapedSlice(s)) = tokens.first_mut() {
        let untrimmed: &str = *s;
        *s = untrimmed.trim_start_matches(' ');
    }
    if let Some(Token::UnescapedSlice(s)) = tokens.last_mut() {
        let untrimmed: &str = *s;
        *s = untrimmed.trim_end_matches(' ');
    }
}

fn tokens_to_bytes(tokens: &[Token<'_>]) -> Vec<u8> {
    let mut ret = Vec::new();
    for token in tokens {
        match token {
            Token::EscapedByte(b) => ret.push(*b),
            Token::UnescapedSlice(slice) => ret.extend_from_slice(slice.as_bytes()),
        }
    }
    ret
}
