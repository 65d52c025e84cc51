// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Splits a rule string into `NAME=VALUE` parts.

use std::fmt::Display;

use logos::Logos;

use crate::error::{RuleError, Span};

#[derive(Debug, PartialEq, Eq, Clone, Copy, logos::Logos)]
pub enum Token<'a> {
    /// Everything that is not a delimiter or whitespace.
    #[regex(r"[^;=\r\n\t ]+")]
    Word(&'a str),

    /// Semicolon (;), separates rule parts
    #[token(";")]
    Semi,

    /// Equal sign (=), separates a name from its value
    #[token("=")]
    Eq,

    /// Runs of spaces, tabs and line breaks
    #[regex(r"[\r\n\t ]+")]
    Space,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Word(s) => write!(f, "Word({s})"),
            Token::Semi => write!(f, "Semi"),
            Token::Eq => write!(f, "Eq"),
            Token::Space => write!(f, "Space"),
        }
    }
}

pub fn lex<'a>(src: &'a str) -> logos::Lexer<'a, Token<'a>> {
    Token::lexer(src)
}

/// One `NAME=VALUE` part of a rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPart<'a> {
    /// Parameter name, normalized to upper case
    pub name: String,

    /// Raw value, original casing
    pub value: &'a str,

    /// Location of the name
    pub name_span: Span,

    /// Location of the value; empty and placed right after `=` for empty values
    pub value_span: Span,
}

/// Split a rule string into its parts.
///
/// Whitespace around parts is ignored, blank parts (e.g. a trailing `;`) are
/// skipped. Names are compared case-insensitively, so `freq=DAILY;FREQ=DAILY`
/// is a duplicate.
///
/// ## Errors
///
/// A part without `=`, a part with an empty name, whitespace inside a part
/// or a repeated parameter name.
pub fn tokenize(src: &str) -> Result<Vec<RawPart<'_>>, RuleError> {
    let mut parts: Vec<RawPart<'_>> = Vec::new();
    let mut segment = Vec::new();

    let mut lexer = lex(src).spanned().peekable();
    while let Some((token, span)) = lexer.next() {
        // Every input character matches a token, the error arm is unreachable in practice
        let token = token.unwrap_or(Token::Word(src.get(span.clone()).unwrap_or_default()));
        if token != Token::Semi {
            segment.push((token, span));
            if lexer.peek().is_some() {
                continue;
            }
        }

        if let Some(part) = split_part(src, &segment)? {
            if parts.iter().any(|a| a.name == part.name) {
                return Err(RuleError::DuplicateParameter {
                    name: part.name,
                    span: Some(part.name_span),
                });
            }
            parts.push(part);
        }
        segment.clear();
    }

    Ok(parts)
}

fn split_part<'a>(src: &'a str, tokens: &[(Token<'a>, Span)]) -> Result<Option<RawPart<'a>>, RuleError> {
    // trim surrounding whitespace
    let start = tokens.iter().position(|(t, _)| *t != Token::Space);
    let end = tokens.iter().rposition(|(t, _)| *t != Token::Space);
    let (Some(start), Some(end)) = (start, end) else {
        return Ok(None); // blank part
    };
    let tokens = tokens.get(start..=end).unwrap_or_default();

    let first = tokens.first().map_or(0, |(_, s)| s.start);
    let last = tokens.last().map_or(first, |(_, s)| s.end);
    let part_span = first..last;
    let part = src.get(part_span.clone()).unwrap_or_default().to_owned();

    if let Some((_, span)) = tokens.iter().find(|(t, _)| *t == Token::Space) {
        return Err(RuleError::WhitespaceInValue {
            part,
            span: span.clone(),
        });
    }

    let Some(eq) = tokens.iter().position(|(t, _)| *t == Token::Eq) else {
        return Err(RuleError::MalformedPart {
            part,
            span: part_span,
        });
    };

    let (name, name_span) = match tokens.get(..eq) {
        Some([(Token::Word(name), span)]) => (name.to_ascii_uppercase(), span.clone()),
        _ => {
            return Err(RuleError::EmptyName {
                part,
                span: part_span,
            });
        }
    };

    // Everything after the first `=` belongs to the value, including further `=`
    let value_start = tokens.get(eq).map_or(last, |(_, s)| s.end);
    let value_span = value_start..last;
    let value = src.get(value_span.clone()).unwrap_or_default();

    Ok(Some(RawPart {
        name,
        value,
        name_span,
        value_span,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let mut lexer = lex("FREQ=DAILY;COUNT=5");

        assert_eq!(lexer.next().unwrap().unwrap(), Token::Word("FREQ"));
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Eq);
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Word("DAILY"));
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Semi);
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Word("COUNT"));
    }

    #[test]
    fn test_whitespace() {
        let mut lexer = lex(" \t\r\n");
        assert_eq!(lexer.next().unwrap().unwrap(), Token::Space);
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::Word("MO").to_string(), "Word(MO)");
        assert_eq!(Token::Semi.to_string(), "Semi");
        assert_eq!(Token::Eq.to_string(), "Eq");
        assert_eq!(Token::Space.to_string(), "Space");
    }

    #[test]
    fn tokenizes_parts() {
        let parts = tokenize("FREQ=WEEKLY;byday=mo,WE").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "FREQ");
        assert_eq!(parts[0].value, "WEEKLY");
        assert_eq!(parts[0].name_span, 0..4);
        assert_eq!(parts[0].value_span, 5..11);
        assert_eq!(parts[1].name, "BYDAY");
        assert_eq!(parts[1].value, "mo,WE");
    }

    #[test]
    fn trims_whitespace_around_parts() {
        let parts = tokenize("  FREQ=DAILY ; COUNT=3\r\n").unwrap();
        let pairs: Vec<_> = parts.iter().map(|p| (p.name.as_str(), p.value)).collect();
        assert_eq!(pairs, [("FREQ", "DAILY"), ("COUNT", "3")]);
    }

    #[test]
    fn skips_blank_parts() {
        let parts = tokenize("FREQ=DAILY;;COUNT=3;").unwrap();
        assert_eq!(parts.len(), 2);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn keeps_everything_after_first_eq() {
        let parts = tokenize("X=a=b").unwrap();
        assert_eq!(parts[0].name, "X");
        assert_eq!(parts[0].value, "a=b");
    }

    #[test]
    fn keeps_empty_values() {
        let parts = tokenize("BYDAY=;FREQ=DAILY").unwrap();
        assert_eq!(parts[0].value, "");
        assert_eq!(parts[0].value_span, 6..6);
    }

    #[test]
    fn rejects_malformed_parts() {
        let test_cases = [
            ("FREQ", "MalformedPart"),
            ("FREQ=DAILY;COUNT", "MalformedPart"),
            ("=DAILY", "EmptyName"),
            ("FREQ=DAILY;=3", "EmptyName"),
            ("FREQ=DAI LY", "WhitespaceInValue"),
            ("FR EQ=DAILY", "WhitespaceInValue"),
            ("FREQ=DAILY;freq=WEEKLY", "DuplicateParameter"),
        ];

        for (src, kind) in test_cases {
            let err = tokenize(src).unwrap_err();
            let matched = match err {
                RuleError::MalformedPart { .. } => "MalformedPart",
                RuleError::EmptyName { .. } => "EmptyName",
                RuleError::WhitespaceInValue { .. } => "WhitespaceInValue",
                RuleError::DuplicateParameter { .. } => "DuplicateParameter",
                _ => "other",
            };
            assert_eq!(matched, kind, "Unexpected error for input: {src}");
        }
    }

    #[test]
    fn duplicate_points_at_second_name() {
        let err = tokenize("FREQ=DAILY;Freq=WEEKLY").unwrap_err();
        assert_eq!(err.span(), Some(11..15));
    }
}
