//! Byte-level scanner: pulls the next lexeme from a [`Stream`].
//!
//! Token classes: one-char newline/punctuation tokens, `$X` two-byte char
//! literals, quote-delimited string literals, and default tokens that run
//! to the next whitespace/quote/punctuation byte.

use crate::errors::{VmError, VmResult};
use crate::stream::Stream;

pub const MAX_TOKEN: usize = 255;
const PUNCTUATION: &[u8] = b"\\:(){}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Newline,
    /// Punctuation, char literals, tick literals, and plain words — the
    /// dispatcher tells these apart by content.
    Text(String),
    /// A `"…"` or `` `…` ``-delimited string literal's payload.
    Str(String),
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'"' || b == b'`' || PUNCTUATION.contains(&b)
}

/// Read the next token, returning `None` at end of input.
pub fn get_token(stream: &mut Stream) -> VmResult<Option<Token>> {
    // Skip whitespace other than newline.
    loop {
        match stream.peek_char()? {
            None => return Ok(None),
            Some(b) if b == b'\n' => break,
            Some(b) if b.is_ascii_whitespace() => {
                stream.get_char()?;
            }
            _ => break,
        }
    }

    let first = match stream.get_char()? {
        None => return Ok(None),
        Some(b) => b,
    };

    if first == b'\n' {
        return Ok(Some(Token::Newline));
    }
    if PUNCTUATION.contains(&first) {
        return Ok(Some(Token::Text((first as char).to_string())));
    }
    if first == b'$' {
        let c = stream.get_char()?.ok_or_else(|| VmError::Other("Unexpected EOF after $".into()))?;
        return Ok(Some(Token::Text(format!("${}", c as char))));
    }
    if first == b'"' || first == b'`' {
        let delim = first;
        let mut body = Vec::new();
        loop {
            match stream.get_char()? {
                None => {
                    let partial = String::from_utf8_lossy(&body).into_owned();
                    return Err(VmError::UnterminatedString(partial));
                }
                Some(b) if b == delim => break,
                Some(b) => body.push(b),
            }
        }
        return Ok(Some(Token::Str(String::from_utf8_lossy(&body).into_owned())));
    }

    let mut buf = vec![first];
    loop {
        match stream.peek_char()? {
            Some(b) if !is_delimiter(b) => {
                if buf.len() >= MAX_TOKEN {
                    return Err(VmError::TokenTooLong);
                }
                buf.push(stream.get_char()?.unwrap());
            }
            _ => break,
        }
    }
    Ok(Some(Token::Text(String::from_utf8_lossy(&buf).into_owned())))
}
