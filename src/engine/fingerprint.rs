use crate::language::LangId;

/// Placeholder substituted for every quoted string literal, so fingerprints
/// collapse files that differ only in message text.
const STRING_PLACEHOLDER: &str = "\"\"";

/// Digest of normalized content. Files differing only in whitespace,
/// comments or string contents produce the same fingerprint.
pub fn fingerprint(content: &str, lang_id: LangId) -> String {
    let normalized = normalize(content, lang_id);
    blake3::hash(normalized.as_bytes()).to_hex().to_string()
}

/// Normalize content for equality comparison: lowercase, line comments
/// stripped, string literals replaced by a placeholder, whitespace runs
/// collapsed to a single space.
pub fn normalize(content: &str, lang_id: LangId) -> String {
    let lowered = content.to_lowercase();
    let comment = lang_id.line_comment();

    let mut out = String::with_capacity(lowered.len());
    for line in lowered.lines() {
        strip_line(line, comment, &mut out);
        out.push(' ');
    }

    collapse_whitespace(&out)
}

/// Copy one line into `out` with string literals replaced and the trailing
/// line comment removed. The scanner tracks quote state so a comment marker
/// inside a string does not truncate the line.
fn strip_line(line: &str, comment: &str, out: &mut String) {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'"' || c == b'\'' {
            out.push_str(STRING_PLACEHOLDER);
            i += 1;
            while i < bytes.len() {
                if bytes[i] == b'\\' {
                    i += 2;
                    continue;
                }
                if bytes[i] == c {
                    i += 1;
                    break;
                }
                i += 1;
            }
        } else if line[i..].starts_with(comment) {
            break;
        } else {
            // Copy the full UTF-8 scalar, not just the lead byte
            let ch_len = utf8_len(c);
            out.push_str(&line[i..i + ch_len]);
            i += ch_len;
        }
    }
}

#[inline]
fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        _ => 4,
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = true; // also trims leading whitespace
    for c in s.chars() {
        if c.is_whitespace() {
            if !in_ws {
                out.push(' ');
                in_ws = true;
            }
        } else {
            out.push(c);
            in_ws = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}
