// src/core/arg_parser.rs

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// One argument: a run of quoted spans, escaped whitespace, or any other
    /// non-space character. Quoted spans are tried first so their inner
    /// whitespace never splits the token.
    static ref TOKEN_RE: Regex =
        Regex::new(r#"(?:"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'|\\\s|\S)+"#).expect("static regex");
    /// A token that is exactly one balanced quoted span.
    static ref DOUBLE_QUOTED_RE: Regex = Regex::new(r#"^"(?:\\.|[^"\\])*"$"#).expect("static regex");
    static ref SINGLE_QUOTED_RE: Regex = Regex::new(r#"^'(?:\\.|[^'\\])*'$"#).expect("static regex");
}

/// A single argument with its outer quotes removed.
pub type Token = String;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Command line contains no tokens: '{0}'")]
    NoTokens(String),
}

/// Splits a raw command line into an argument vector.
///
/// # Logic:
/// - Unescaped whitespace separates tokens; `\ ` keeps a space inside one.
/// - `"..."` and `'...'` spans are atomic and may contain `\"` / `\'`.
/// - A token that is exactly one balanced quoted span loses its quotes.
/// - `\"` becomes `"` in every token.
pub fn tokenize(command: &str) -> Result<Vec<Token>, ParseError> {
    let tokens: Vec<Token> = TOKEN_RE
        .find_iter(command)
        .map(|m| unquote(m.as_str()))
        .collect();

    if tokens.is_empty() {
        return Err(ParseError::NoTokens(command.to_string()));
    }
    log::debug!("Tokenized '{}' into {:?}", command, tokens);
    Ok(tokens)
}

fn unquote(raw: &str) -> Token {
    for (quote, span) in [('"', &*DOUBLE_QUOTED_RE), ('\'', &*SINGLE_QUOTED_RE)] {
        if !span.is_match(raw) {
            continue;
        }
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            let escaped_quote = format!("\\{}", quote);
            return inner
                .replace(&escaped_quote, &quote.to_string())
                .replace("\\\"", "\"");
        }
    }
    unescape_bare(raw)
}

/// Unescapes `\"` and backslash-whitespace in a token that is not wrapped in
/// quotes. Any other backslash is kept as written.
fn unescape_bare(raw: &str) -> Token {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('\\', Some(&next)) if next == '"' || next.is_whitespace() => {
                out.push(next);
                chars.next();
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quoted_argument() {
        let tokens = tokenize(r#"build --target "My App" -j4"#).unwrap();
        assert_eq!(tokens, vec!["build", "--target", "My App", "-j4"]);
    }

    #[test]
    fn test_tokenize_escaped_inner_quotes() {
        let tokens = tokenize(r#"echo "say \"hi\"""#).unwrap();
        assert_eq!(tokens, vec!["echo", r#"say "hi""#]);
    }

    #[test]
    fn test_tokenize_single_quotes() {
        let tokens = tokenize(r"run 'it\'s here' 'a b'").unwrap();
        assert_eq!(tokens, vec!["run", "it's here", "a b"]);
    }

    #[test]
    fn test_tokenize_escaped_space_and_runs_of_whitespace() {
        let tokens = tokenize("  cmake\t-S  my\\ dir \n -B build ").unwrap();
        assert_eq!(tokens, vec!["cmake", "-S", "my dir", "-B", "build"]);
    }

    #[test]
    fn test_quoted_span_inside_token_stays_whole() {
        let tokens = tokenize(r#"cmake -DNAME="a b" x"#).unwrap();
        assert_eq!(tokens, vec!["cmake", r#"-DNAME="a b""#, "x"]);
    }

    #[test]
    fn test_other_backslashes_are_kept() {
        let tokens = tokenize(r"copy C:\src\a.txt D:\out").unwrap();
        assert_eq!(tokens, vec!["copy", r"C:\src\a.txt", r"D:\out"]);
    }

    #[test]
    fn test_unterminated_quote_is_a_plain_token() {
        let tokens = tokenize(r#"echo "abc"#).unwrap();
        assert_eq!(tokens, vec!["echo", "\"abc"]);
    }

    #[test]
    fn test_escaped_closing_quote_is_a_plain_token() {
        let tokens = tokenize(r#"echo "abc\""#).unwrap();
        assert_eq!(tokens, vec!["echo", r#""abc""#]);
    }

    #[test]
    fn test_adjacent_quoted_spans_keep_their_quotes() {
        let tokens = tokenize(r#"x "a"b"c""#).unwrap();
        assert_eq!(tokens, vec!["x", r#""a"b"c""#]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_token() {
        assert_eq!(tokenize(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_no_tokens_is_an_error() {
        assert_eq!(tokenize(""), Err(ParseError::NoTokens(String::new())));
        assert!(matches!(tokenize(" \t\n"), Err(ParseError::NoTokens(_))));
    }
}
