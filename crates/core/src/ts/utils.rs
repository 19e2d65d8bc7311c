//! Common helpers for TypeScript code generation.

use std::collections::HashSet;
use std::sync::LazyLock;

/// Comments are wrapped once a line grows past this many characters.
const COMMENT_WIDTH: usize = 80;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Check if an identifier needs quoting when used as a property key.
///
/// Returns true if the name:
/// - Is empty
/// - Doesn't start with a letter, underscore, or dollar sign
/// - Contains characters other than alphanumeric, underscore, or dollar sign
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in double- or single-quoted JavaScript literals.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
}

/// Escape text placed inside a template literal.
pub fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('$', "\\$")
}

/// Quote a property key if it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Name under which a method is exported from its controller namespace.
///
/// `delete` becomes `del`; other reserved words get a `_` prefix.
pub fn binding_name(name: &str) -> String {
    if name == "delete" {
        "del".to_string()
    } else if TS_RESERVED_WORDS.contains(name) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// Break a comment into lines of roughly [`COMMENT_WIDTH`] characters.
///
/// A word is moved to a new line once the current line has grown past the
/// width, so lines may overshoot by one word.
pub fn wrap_comment(comment: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in comment.split_whitespace() {
        if !current.is_empty() && current.len() > COMMENT_WIDTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

/// Push a `/** ... */` block for `comment`. Returns `false` when there is
/// nothing to document.
pub fn fill_multiline_comment(lines: &mut Vec<String>, comment: &str) -> bool {
    let wrapped = wrap_comment(comment);
    if wrapped.is_empty() {
        return false;
    }

    lines.push("/**".to_string());
    lines.extend(wrapped.into_iter().map(|l| format!(" * {l}")));
    lines.push(" */".to_string());
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));

        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello"), "hello");
        assert_eq!(escape_js_string("hel\"lo"), "hel\\\"lo");
        assert_eq!(escape_js_string("it's"), "it\\'s");
        assert_eq!(escape_js_string("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_template() {
        assert_eq!(escape_template("/users/${id}"), "/users/\\${id}");
        assert_eq!(escape_template("a `b`"), "a \\`b\\`");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("foo-bar"), "\"foo-bar\"");
        assert_eq!(quote_if_needed("123"), "\"123\"");
    }

    #[test]
    fn test_binding_name() {
        assert_eq!(binding_name("get"), "get");
        assert_eq!(binding_name("delete"), "del");
        assert_eq!(binding_name("new"), "_new");
    }

    #[test]
    fn test_wrap_comment() {
        let long = "word ".repeat(40);
        let wrapped = wrap_comment(&long);
        assert!(wrapped.len() > 1);
        assert!(wrapped.iter().all(|l| l.len() <= COMMENT_WIDTH + 5));
        assert!(wrap_comment("   ").is_empty());
    }

    #[test]
    fn test_fill_multiline_comment() {
        let mut lines = Vec::new();
        assert!(!fill_multiline_comment(&mut lines, ""));
        assert!(lines.is_empty());

        assert!(fill_multiline_comment(&mut lines, "An invoice."));
        assert_eq!(lines, vec!["/**", " * An invoice.", " */"]);
    }
}
