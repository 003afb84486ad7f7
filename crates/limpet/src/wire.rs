//! Decoders for the pipe-delimited tool wire format.
//!
//! Every tool takes a single string argument; multi-field inputs are encoded
//! as `|`-separated segments in a fixed order (`path|content`,
//! `path|find|replace`, ...). The driving model has been prompted against
//! this exact convention, so the format is preserved byte-for-byte and each
//! tool owns one small decoder here, keeping parsing out of the validation
//! logic.

use crate::error::ToolError;

/// Split `input` into exactly two fields on the first `|`.
pub fn split2(input: &str, usage: &str) -> Result<(String, String), ToolError> {
    match input.split_once('|') {
        Some((a, b)) => Ok((a.to_string(), b.to_string())),
        None => Err(ToolError::InvalidInput(format!(
            "input must be in the format '{usage}'; pipe separator '|' is missing"
        ))),
    }
}

/// Split `input` into exactly three fields on the first two `|` separators.
///
/// The final field may itself contain `|` characters.
pub fn split3(input: &str, usage: &str) -> Result<(String, String, String), ToolError> {
    let mut parts = input.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), Some(c)) => Ok((a.to_string(), b.to_string(), c.to_string())),
        _ => Err(ToolError::InvalidInput(format!(
            "input must be in the format '{usage}'"
        ))),
    }
}

/// Decode literal escape sequences a model tends to emit in content fields.
///
/// `\n`, `\t` and `\r` become real control characters and `\\` a single
/// backslash; anything else is passed through untouched.
pub fn decode_escapes(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Strip the `Success:` / `CSV Data:` framing lines other tools prepend to
/// CSV payloads, so their output can be piped straight into the data tools.
pub fn strip_csv_prefixes(data: &str) -> &str {
    let mut rest = data;
    loop {
        let trimmed = rest.trim_start();
        if trimmed.starts_with("Success:") || trimmed.starts_with("CSV Data:") {
            match trimmed.split_once('\n') {
                Some((_, tail)) => rest = tail,
                None => return "",
            }
        } else {
            return trimmed;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split2_on_first_pipe_only() {
        let (path, content) = split2("a.txt|x|y", "path|content").unwrap();
        assert_eq!(path, "a.txt");
        assert_eq!(content, "x|y");
    }

    #[test]
    fn test_split2_missing_pipe() {
        let err = split2("just-a-path", "path|content").unwrap_err();
        assert!(err.to_tool_message().contains("path|content"));
    }

    #[test]
    fn test_split3_last_field_keeps_pipes() {
        let (path, find, replace) = split3("f.txt|a|b|c", "path|find|replace").unwrap();
        assert_eq!((path.as_str(), find.as_str(), replace.as_str()), ("f.txt", "a", "b|c"));
    }

    #[test]
    fn test_split3_too_few_fields() {
        assert!(split3("f.txt|only", "path|find|replace").is_err());
    }

    #[test]
    fn test_decode_escapes() {
        assert_eq!(decode_escapes("line1\\nline2"), "line1\nline2");
        assert_eq!(decode_escapes("a\\tb"), "a\tb");
        assert_eq!(decode_escapes("keep \\x as-is"), "keep \\x as-is");
        assert_eq!(decode_escapes("double \\\\n"), "double \\n");
        assert_eq!(decode_escapes("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_strip_csv_prefixes() {
        let framed = "Success: fetched.\nCSV Data:\nDate,Close\n2024-01-01,1.0\n";
        assert_eq!(strip_csv_prefixes(framed), "Date,Close\n2024-01-01,1.0\n");
        assert_eq!(strip_csv_prefixes("Date,Close\n1,2"), "Date,Close\n1,2");
        assert_eq!(strip_csv_prefixes("Success: nothing else"), "");
    }
}
