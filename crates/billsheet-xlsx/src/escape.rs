//! Text escaping for SpreadsheetML
//!
//! XML 1.0 cannot carry most control characters, so Excel writes them as
//! `_xHHHH_`. A literal `_xHHHH_` in the text has its underscore escaped as
//! `_x005F_` so it survives a read.

/// Escape text for element content or attribute values
pub(crate) fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 => out.push_str(&format!("_x{:04X}_", c as u32)),
            '_' if looks_like_escape(&chars[i..]) => out.push_str("_x005F_"),
            c => out.push(c),
        }
    }

    out
}

/// Decode `_xHHHH_` sequences produced by [`escape_xml`] (or by Excel)
pub(crate) fn decode_excel_escapes(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        if looks_like_escape(&chars[i..]) {
            let hex: String = chars[i + 2..i + 6].iter().collect();
            if let Some(decoded) = u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                out.push(decoded);
                i += 7;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// True if `chars` starts with `_x` + four hex digits + `_`
fn looks_like_escape(chars: &[char]) -> bool {
    chars.len() >= 7
        && chars[0] == '_'
        && chars[1] == 'x'
        && chars[2..6].iter().all(|c| c.is_ascii_hexdigit())
        && chars[6] == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities() {
        assert_eq!(escape_xml("A & B <c> \"d\" 'e'"), "A &amp; B &lt;c&gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(escape_xml("a\u{1}b"), "a_x0001_b");
        assert_eq!(escape_xml("line\nbreak"), "line\nbreak");
        assert_eq!(decode_excel_escapes("a_x0001_b"), "a\u{1}b");
    }

    #[test]
    fn test_literal_escape_pattern_survives() {
        let text = "code _x0041_ here";
        let escaped = escape_xml(text);
        assert_eq!(escaped, "code _x005F_x0041_ here");
        assert_eq!(decode_excel_escapes(&escaped), text);
    }

    #[test]
    fn test_incomplete_patterns_untouched() {
        assert_eq!(decode_excel_escapes("_x12_"), "_x12_");
        assert_eq!(decode_excel_escapes("snake_case"), "snake_case");
        assert_eq!(escape_xml("_xZZZZ_"), "_xZZZZ_");
    }
}
