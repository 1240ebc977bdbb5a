//! Extraction of roxygen comment blocks and their tagged entries.

use crate::parser::{ParserError, ParserResult};
use nom::bytes::complete::{tag, take_till};
use nom::character::complete::char;
use nom::combinator::{opt, rest};
use nom::multi::many0;
use nom::sequence::preceded;

/// One `@tag body` entry of a comment block.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct Entry<'a> {
    /// The tag name without the leading `@`.
    pub tag: &'a str,
    /// Everything after the tag name up to the next `@`, untrimmed.
    pub body: &'a str,
}

/// Collects the content of all roxygen lines of the input into one comment block.
/// Each content line is terminated by a newline; other lines are dropped.
/// Returns an empty string if the input has no roxygen lines.
pub fn extract_comment(input: &[u8]) -> String {
    let input = String::from_utf8_lossy(input);
    let mut comment = String::new();
    for line in input.lines() {
        if let Ok((_, content)) = roxygen_line(line) {
            comment.push_str(content);
            comment.push('\n');
        }
    }
    comment
}

/// Recognise a roxygen line and return its content.
/// The marker is `#'`, optionally followed by a single space that is not part of the content.
fn roxygen_line(line: &str) -> ParserResult<&str> {
    preceded(tag("#'"), preceded(opt(char(' ')), rest))(line)
}

/// Splits a comment block into its entries.
/// Text before the first `@` belongs to no entry and is dropped.
/// An `@` followed by whitespace or the end of the block is an error.
pub fn tokenize(comment: &str) -> ParserResult<Vec<Entry>> {
    many0(entry)(comment)
}

fn entry(s: &str) -> ParserResult<Entry> {
    let (s, _) = take_till(|c: char| c == '@')(s)?;
    let (s, _) = char('@')(s)?;
    if s.chars().next().map_or(true, char::is_whitespace) {
        let line = s.lines().next().unwrap_or_default().trim();
        return Err(nom::Err::Failure(ParserError::from(format!(
            "'@' without a tag name before {:?}",
            line
        ))));
    }
    let (s, tag) = take_till(|c: char| c.is_whitespace() || c == '@')(s)?;
    let (s, body) = take_till(|c: char| c == '@')(s)?;
    Ok((s, Entry { tag, body }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roxygen_lines() {
        assert_eq!(roxygen_line("#' A roxygen line").unwrap().1, "A roxygen line");
        assert_eq!(roxygen_line("#'").unwrap().1, "");
        assert_eq!(roxygen_line("#'  indented").unwrap().1, " indented");
        roxygen_line("Not a roxygen line").unwrap_err();
        roxygen_line("#").unwrap_err();
        roxygen_line(" #' not at line start").unwrap_err();
    }

    #[test]
    fn test_extract_comment() {
        assert_eq!(
            extract_comment(b"#' first\nf <- function(x) x\n#'second\r\n#'\n"),
            "first\nsecond\n\n"
        );
        assert_eq!(extract_comment(b"f <- function(x) x\n# plain comment\n"), "");
        assert_eq!(extract_comment(b""), "");
    }

    #[test]
    fn test_tokenize() {
        let (_, entries) =
            tokenize("ignored\n@description Does things\nover lines\n@param x an x\n@author A")
                .unwrap();
        assert_eq!(
            entries,
            vec![
                Entry {
                    tag: "description",
                    body: " Does things\nover lines\n",
                },
                Entry {
                    tag: "param",
                    body: " x an x\n",
                },
                Entry {
                    tag: "author",
                    body: " A",
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_without_tags() {
        assert!(tokenize("just text\n").unwrap().1.is_empty());
        assert!(tokenize("").unwrap().1.is_empty());
    }

    #[test]
    fn test_dangling_at() {
        for comment in ["@param x\n@ oops\n", "@description text\n@", "@\nnothing"] {
            assert!(matches!(tokenize(comment), Err(nom::Err::Failure(_))));
        }
        assert_eq!(tokenize("@@param x").unwrap().1.len(), 2);
    }

    #[test]
    fn test_tag_on_own_line() {
        let (_, entries) = tokenize("@return\nthe result\n").unwrap();
        assert_eq!(
            entries,
            vec![Entry {
                tag: "return",
                body: "\nthe result\n",
            }]
        );
    }
}
