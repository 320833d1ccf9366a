// file: src/query/escaper.rs
// description: neutralizes query-grammar operators in raw query text
// reference: Lucene QueryParser.escape character set

use std::fmt;

const ESCAPE_MARKER: char = '\\';

/// Characters the query grammar reads as operators. `&&` and `||` are
/// covered by escaping every `&` and `|`.
const OPERATOR_CHARS: &[char] = &[
    '+', '-', '&', '|', '!', '(', ')', '{', '}', '[', ']', '^', '"', '~', '*', '?', ':', '\\',
    '/',
];

/// Query text that is safe to hand to the retriever's query parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedQuery(String);

impl EscapedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The query text with escape markers removed, every operator character
    /// taken literally.
    pub fn literal_text(&self) -> String {
        let mut literal = String::with_capacity(self.0.len());
        let mut chars = self.0.chars();

        while let Some(c) = chars.next() {
            if c == ESCAPE_MARKER {
                if let Some(escaped) = chars.next() {
                    literal.push(escaped);
                }
            } else {
                literal.push(c);
            }
        }

        literal
    }
}

impl fmt::Display for EscapedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// Trims `raw` and prefixes every operator character with a backslash.
pub fn escape(raw: &str) -> EscapedQuery {
    let trimmed = raw.trim();
    let mut escaped = String::with_capacity(trimmed.len() + trimmed.len() / 8);

    for c in trimmed.chars() {
        if is_operator_char(c) {
            escaped.push(ESCAPE_MARKER);
        }
        escaped.push(c);
    }

    EscapedQuery(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape("  find foo  ").as_str(), "find foo");
        assert_eq!(escape("boundary layer, 1958.").as_str(), "boundary layer, 1958.");
    }

    #[test]
    fn test_every_operator_escaped() {
        let raw = r#"+ - && || ! ( ) { } [ ] ^ " ~ * ? : \ /"#;
        let expected = r#"\+ \- \&\& \|\| \! \( \) \{ \} \[ \] \^ \" \~ \* \? \: \\ \/"#;

        assert_eq!(escape(raw).as_str(), expected);
    }

    #[test]
    fn test_query_with_field_syntax() {
        let escaped = escape(" what is title:(lift-drag)?");
        assert_eq!(escaped.as_str(), r"what is title\:\(lift\-drag\)\?");
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(escape("mach-zahl über").as_str(), r"mach\-zahl über");
    }

    #[test]
    fn test_literal_text_restores_trimmed_input() {
        let raw = r#" heat\transfer: "a" (study) [see ref. 3] a&&b || c/d "#;
        assert_eq!(escape(raw).literal_text(), raw.trim());

        for c in OPERATOR_CHARS {
            let raw = format!("x{c}y");
            assert_eq!(escape(&raw).literal_text(), raw);
        }
    }

    #[test]
    fn test_blank_query() {
        assert!(escape("   ").is_empty());
    }

    #[test]
    fn test_every_operator_is_preceded_by_marker() {
        let raw = "a+b-(c)!d~e*f?g:h/i";
        let escaped = escape(raw);
        let chars: Vec<char> = escaped.as_str().chars().collect();

        for (i, c) in chars.iter().enumerate() {
            if is_operator_char(*c) && *c != '\\' {
                assert_eq!(chars[i - 1], '\\', "unescaped {c} in {escaped}");
            }
        }
    }
}
