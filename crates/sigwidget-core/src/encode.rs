//! Textual PDF encoding of parsed objects
//!
//! The revised page dictionary is written back out as PDF source text. Values
//! that the update does not touch are rendered from lopdf's unresolved object
//! model, so references stay references and every other value keeps its
//! meaning exactly.

use crate::error::{Result, SigWidgetError};
use lopdf::{Dictionary, Object, StringFormat};
use std::fmt::Write;

/// Escape text for use inside a PDF literal string and wrap it in parentheses
///
/// Non-ASCII characters are replaced with `?`. Used for content stream text
/// shown with a standard Type 1 font; see [`text_string`] for field values.
pub fn pdf_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('(');
    for c in s.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ if c.is_ascii() => out.push(c),
            _ => out.push('?'),
        }
    }
    out.push(')');
    out
}

/// Encode a PDF text string for annotation fields such as `/T`, `/TU` and `/Alt`
///
/// ASCII text becomes an escaped literal string. Anything else is written as
/// UTF-16BE with a byte order mark in a hex string so no character is lost.
pub fn text_string(s: &str) -> String {
    if s.is_ascii() {
        return pdf_string(s);
    }
    let mut out = String::from("<FEFF");
    for unit in s.encode_utf16() {
        let _ = write!(out, "{:04X}", unit);
    }
    out.push('>');
    out
}

/// Render an indirect reference token
pub fn reference(id: lopdf::ObjectId) -> String {
    format!("{} {} R", id.0, id.1)
}

/// Render any non-stream object as PDF source text
pub fn encode_object(obj: &Object) -> Result<String> {
    let mut out = String::new();
    write_object(&mut out, obj)?;
    Ok(out)
}

fn write_object(out: &mut String, obj: &Object) -> Result<()> {
    match obj {
        Object::Null => out.push_str("null"),
        Object::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
        Object::Integer(i) => {
            let _ = write!(out, "{}", i);
        }
        Object::Real(r) => write_real(out, *r)?,
        Object::Name(name) => write_name(out, name),
        Object::String(bytes, StringFormat::Literal) => write_literal(out, bytes),
        Object::String(bytes, StringFormat::Hexadecimal) => {
            out.push('<');
            for b in bytes {
                let _ = write!(out, "{:02X}", b);
            }
            out.push('>');
        }
        Object::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                write_object(out, item)?;
            }
            out.push(']');
        }
        Object::Dictionary(dict) => write_dictionary(out, dict)?,
        Object::Reference(id) => out.push_str(&reference(*id)),
        Object::Stream(_) => {
            return Err(SigWidgetError::EncodingFailed(
                "stream objects cannot be written inline".into(),
            ))
        }
    }
    Ok(())
}

fn write_real(out: &mut String, r: f32) -> Result<()> {
    if !r.is_finite() {
        return Err(SigWidgetError::EncodingFailed(format!(
            "non-finite real number {}",
            r
        )));
    }
    // Display never uses exponent notation, which PDF does not allow
    let _ = write!(out, "{}", r);
    Ok(())
}

fn write_dictionary(out: &mut String, dict: &Dictionary) -> Result<()> {
    out.push_str("<<");
    for (key, value) in dict.iter() {
        out.push(' ');
        write_name(out, key);
        out.push(' ');
        write_object(out, value)?;
    }
    out.push_str(" >>");
    Ok(())
}

/// Write `/Name`, escaping delimiters, whitespace and non-printable bytes as `#xx`
pub(crate) fn write_name(out: &mut String, name: &[u8]) {
    out.push('/');
    for &b in name {
        let regular = (0x21..=0x7e).contains(&b)
            && !matches!(
                b,
                b'#' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
            );
        if regular {
            out.push(b as char);
        } else {
            let _ = write!(out, "#{:02X}", b);
        }
    }
}

fn write_literal(out: &mut String, bytes: &[u8]) {
    out.push('(');
    for &b in bytes {
        match b {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            0x20..=0x7e => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out.push(')');
}
