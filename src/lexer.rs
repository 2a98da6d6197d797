// This file is part of minish, a miniature POSIX-style shell.
// Copyright (c) 2024 minish contributors
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be included
// in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS
// OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT.
// IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY
// CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT,
// TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Tokenizer (component B): a single left-to-right walk over the input
//! line that yields a flat, positioned token list.
//!
//! Quote state is tracked independently of word content: quote characters
//! stay in the `Word` lexeme so the expander and pipeline builder can see
//! exactly which spans were quoted, keeping delimiter recognition separate
//! from the later text-stripping passes.

use crate::error::ShellError;
use crate::token::{Token, TokenKind};

/// A character is a token delimiter outside quotes if it is whitespace or
/// opens a recognized operator.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '<' | '>' | '|') || c == '\0'
}

/// Tracks whether the scan is currently inside a single- or double-quoted
/// span. The two states are mutually exclusive by construction.
#[derive(Default)]
struct QuoteState {
    in_single: bool,
    in_double: bool,
}

impl QuoteState {
    fn observe(&mut self, c: char) {
        match c {
            '\'' if !self.in_double => self.in_single = !self.in_single,
            '"' if !self.in_single => self.in_double = !self.in_double,
            _ => {}
        }
    }

    fn is_neutral(&self) -> bool {
        !self.in_single && !self.in_double
    }
}

/// Walks `input` once, producing an ordered token list.
///
/// Returns [`ShellError::UnterminatedQuote`] if the quote state is not
/// neutral at end of input. Whitespace-only or empty input yields an empty,
/// `Ok` list.
pub fn tokenize(input: &str) -> Result<Vec<Token>, ShellError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut quotes = QuoteState::default();

    while i < chars.len() {
        let c = chars[i];
        if quotes.is_neutral() && c.is_whitespace() {
            i += 1;
            continue;
        }

        if quotes.is_neutral() {
            if let Some((kind, len)) = match_operator(&chars[i..]) {
                let lexeme: String = chars[i..i + len].iter().collect();
                tokens.push(Token::new(kind, lexeme));
                i += len;
                continue;
            }
        }

        let start = i;
        while i < chars.len() {
            let c = chars[i];
            quotes.observe(c);
            if quotes.is_neutral() && is_delimiter(c) {
                break;
            }
            i += 1;
        }
        let lexeme: String = chars[start..i].iter().collect();
        tokens.push(Token::new(TokenKind::Word, lexeme));
    }

    if !quotes.is_neutral() {
        return Err(ShellError::UnterminatedQuote);
    }

    for (idx, token) in tokens.iter_mut().enumerate() {
        token.position = idx;
    }
    Ok(tokens)
}

/// Recognizes an operator at the start of `rest`, checking two-character
/// operators before one-character ones.
fn match_operator(rest: &[char]) -> Option<(TokenKind, usize)> {
    if rest.len() >= 2 {
        match (rest[0], rest[1]) {
            ('>', '>') => return Some((TokenKind::AppendOut, 2)),
            ('<', '<') => return Some((TokenKind::Heredoc, 2)),
            _ => {}
        }
    }
    match rest.first()? {
        '|' => Some((TokenKind::Pipe, 1)),
        '<' => Some((TokenKind::RedirIn, 1)),
        '>' => Some((TokenKind::RedirOut, 1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_empty_list() {
        let tokens = tokenize("").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn whitespace_only_is_empty_list() {
        let tokens = tokenize("   \t  ").unwrap();
        assert!(tokens.is_empty());
    }

    #[test]
    fn simple_words() {
        let tokens = tokenize("echo hello world").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Word; 3]);
        assert_eq!(tokens[1].lexeme, "hello");
    }

    #[test]
    fn pipe_and_redirections() {
        let tokens = tokenize("cat < in | tr a-z A-Z >> out").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::RedirIn,
                TokenKind::Word,
                TokenKind::Pipe,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::AppendOut,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn two_char_operator_before_one_char() {
        let tokens = tokenize(">>x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::AppendOut);
    }

    #[test]
    fn position_equals_index() {
        let tokens = tokenize("a b c").unwrap();
        for (i, t) in tokens.iter().enumerate() {
            assert_eq!(t.position, i);
        }
    }

    #[test]
    fn quoted_operator_chars_stay_in_word() {
        let tokens = tokenize("'a|b'").unwrap();
        assert_eq!(kinds(&tokens), vec![TokenKind::Word]);
        assert_eq!(tokens[0].lexeme, "'a|b'");
    }

    #[test]
    fn double_quote_inside_single_quote_is_literal() {
        let tokens = tokenize("'say \"hi\"'").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].lexeme, "'say \"hi\"'");
    }

    #[test]
    fn unterminated_quote_errors() {
        let err = tokenize("echo \"unterminated").unwrap_err();
        assert!(matches!(err, ShellError::UnterminatedQuote));
    }

    #[test]
    fn deterministic_for_same_input() {
        let a = tokenize("echo $FOO | wc -l").unwrap();
        let b = tokenize("echo $FOO | wc -l").unwrap();
        assert_eq!(a, b);
    }
}
