//! Content-Disposition header parsing (filename and filename*).

use crate::error::{BibdumpError, Result};
use percent_encoding::percent_decode_str;

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; decoded)
///
/// Parameters may come in any order and unknown ones are ignored. If both `filename` and
/// `filename*` exist, a decodable `filename*` takes precedence. The plain `filename` value is
/// URL-decoded with form semantics (`+` is a space), which is how dump servers encode it.
pub fn parse_content_disposition_filename(header_value: &str) -> Result<String> {
    let mut plain: Option<String> = None;
    let mut extended: Option<String> = None;

    for param in split_params(header_value.trim()) {
        let Some((name, v)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim();
        let v = v.trim();

        if name.eq_ignore_ascii_case("filename*") && extended.is_none() {
            extended = decode_ext_value(v);
        } else if name.eq_ignore_ascii_case("filename") && plain.is_none() {
            let raw = if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
                decode_quoted_filename(&v[1..v.len() - 1])
            } else {
                v.to_string()
            };
            plain = Some(unquote_plus(&raw));
        }
    }

    let name = extended
        .or(plain)
        .ok_or_else(|| BibdumpError::MissingFilename {
            value: header_value.to_string(),
        })?;
    check_filename(&name, header_value)?;
    Ok(name)
}

/// Split on `;` outside double quotes.
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// RFC 5987 `charset'language'value`. Only UTF-8 and ISO-8859-1 are understood.
fn decode_ext_value(v: &str) -> Option<String> {
    let v = v.trim_matches('"');
    let mut it = v.splitn(3, '\'');
    let charset = it.next()?;
    let _language = it.next()?;
    let encoded = it.next()?;
    let bytes = percent_decode_str(encoded);
    let decoded = if charset.eq_ignore_ascii_case("utf-8") {
        bytes.decode_utf8().ok()?.into_owned()
    } else if charset.eq_ignore_ascii_case("iso-8859-1") {
        bytes.map(char::from).collect()
    } else {
        return None;
    };
    (!decoded.is_empty()).then_some(decoded)
}

/// Form-style URL decoding: `+` becomes a space, then `%XX` escapes are decoded.
fn unquote_plus(s: &str) -> String {
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// The decoded name is joined onto the output directory, so it must stay a single component.
fn check_filename(name: &str, header_value: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("empty")
    } else if name == "." || name == ".." {
        Some("reserved name")
    } else if name.contains(['/', '\\', '\0']) {
        Some("path separator")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(BibdumpError::MalformedFilename {
            value: header_value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
