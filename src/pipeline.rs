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

//! Pipeline builder (component D): partitions a token list at `PIPE`
//! boundaries into [`Stage`] records, stripping matched quote pairs from
//! each `Word` token as it becomes an `argv` entry.

use crate::error::ShellError;
use crate::token::{Token, TokenKind};

/// The kind of a redirection and, separately, which standard stream it
/// targets by default (stdin for `In`, stdout for the rest).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RedirKind {
    In,
    OutTrunc,
    OutAppend,
    HereDoc,
}

/// One `(kind, target)` redirection, in source order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redir {
    pub kind: RedirKind,
    pub target: String,
}

/// One pipeline segment: an optional command name, its full argv (argv[0]
/// equals `cmd` when present), and its redirections in source order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Stage {
    pub cmd: Option<String>,
    pub argv: Vec<String>,
    pub redirs: Vec<Redir>,
    pub position: usize,
}

/// Partitions `tokens` at `PIPE` boundaries into an ordered [`Stage`] list.
///
/// Returns [`ShellError::Syntax`] for a leading/trailing/doubled pipe or a
/// redirection with no following target, and
/// [`ShellError::HeredocUnsupported`] if a `<<` operator is present (body
/// capture is out of scope).
pub fn build(tokens: &[Token]) -> Result<Vec<Stage>, ShellError> {
    let segments = split_on_pipes(tokens)?;
    let mut stages = Vec::with_capacity(segments.len());
    for (position, segment) in segments.into_iter().enumerate() {
        stages.push(build_stage(segment, position)?);
    }
    Ok(stages)
}

fn split_on_pipes(tokens: &[Token]) -> Result<Vec<&[Token]>, ShellError> {
    if tokens.is_empty() {
        return Ok(vec![&[]]);
    }
    if matches!(tokens.first().unwrap().kind, TokenKind::Pipe)
        || matches!(tokens.last().unwrap().kind, TokenKind::Pipe)
    {
        return Err(ShellError::Syntax { token: "|".to_string() });
    }

    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev_was_pipe = false;
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Pipe {
            if prev_was_pipe {
                return Err(ShellError::Syntax { token: "|".to_string() });
            }
            segments.push(&tokens[start..i]);
            start = i + 1;
            prev_was_pipe = true;
        } else {
            prev_was_pipe = false;
        }
    }
    segments.push(&tokens[start..]);
    Ok(segments)
}

fn build_stage(segment: &[Token], position: usize) -> Result<Stage, ShellError> {
    let mut stage = Stage {
        position,
        ..Stage::default()
    };
    let mut i = 0;
    while i < segment.len() {
        let token = &segment[i];
        match token.kind {
            TokenKind::Word => {
                stage.argv.push(strip_quotes(&token.lexeme));
                i += 1;
            }
            TokenKind::Heredoc => return Err(ShellError::HeredocUnsupported),
            TokenKind::RedirIn | TokenKind::RedirOut | TokenKind::AppendOut => {
                let target = segment.get(i + 1).ok_or_else(|| ShellError::Syntax {
                    token: token.lexeme.clone(),
                })?;
                if target.kind != TokenKind::Word {
                    return Err(ShellError::Syntax {
                        token: token.lexeme.clone(),
                    });
                }
                let kind = match token.kind {
                    TokenKind::RedirIn => RedirKind::In,
                    TokenKind::RedirOut => RedirKind::OutTrunc,
                    TokenKind::AppendOut => RedirKind::OutAppend,
                    _ => unreachable!(),
                };
                stage.redirs.push(Redir {
                    kind,
                    target: strip_quotes(&target.lexeme),
                });
                i += 2;
            }
            TokenKind::Pipe => unreachable!("pipes are split out before building a stage"),
        }
    }
    stage.cmd = stage.argv.first().cloned();
    Ok(stage)
}

/// Removes matched `'...'`/`"..."` quote pairs and the quote characters
/// themselves, leaving interior content (including operator characters)
/// literal. A `"` inside `'...'` and a `'` inside `"..."` are literal text,
/// not quote delimiters, matching the tokenizer's own scanning rules.
fn strip_quotes(lexeme: &str) -> String {
    let mut out = String::with_capacity(lexeme.len());
    let mut in_single = false;
    let mut in_double = false;
    for c in lexeme.chars() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn stages_of(input: &str) -> Vec<Stage> {
        let tokens = tokenize(input).unwrap();
        build(&tokens).unwrap()
    }

    #[test]
    fn single_stage_no_redirs() {
        let stages = stages_of("echo hello");
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].cmd.as_deref(), Some("echo"));
        assert_eq!(stages[0].argv, vec!["echo", "hello"]);
        assert!(stages[0].redirs.is_empty());
    }

    #[test]
    fn pipeline_splits_on_pipe() {
        let stages = stages_of("echo hi | wc -c");
        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0].argv, vec!["echo", "hi"]);
        assert_eq!(stages[1].argv, vec!["wc", "-c"]);
        assert_eq!(stages[0].position, 0);
        assert_eq!(stages[1].position, 1);
    }

    #[test]
    fn redirections_are_recorded_in_order() {
        let stages = stages_of(">a >b >c echo hi");
        assert_eq!(stages[0].cmd.as_deref(), Some("echo"));
        assert_eq!(
            stages[0].redirs,
            vec![
                Redir { kind: RedirKind::OutTrunc, target: "a".into() },
                Redir { kind: RedirKind::OutTrunc, target: "b".into() },
                Redir { kind: RedirKind::OutTrunc, target: "c".into() },
            ]
        );
    }

    #[test]
    fn redirection_only_stage_has_no_cmd() {
        let tokens = tokenize(">out").unwrap();
        let stages = build(&tokens).unwrap();
        assert_eq!(stages.len(), 1);
        assert_eq!(stages[0].cmd, None);
        assert_eq!(stages[0].redirs[0].target, "out");
    }

    #[test]
    fn redirection_without_target_is_syntax_error() {
        let tokens = tokenize("echo >").unwrap();
        assert!(matches!(build(&tokens), Err(ShellError::Syntax { .. })));
    }

    #[test]
    fn leading_pipe_is_syntax_error() {
        let tokens = tokenize("| echo hi").unwrap();
        assert!(matches!(build(&tokens), Err(ShellError::Syntax { .. })));
    }

    #[test]
    fn trailing_pipe_is_syntax_error() {
        let tokens = tokenize("echo hi |").unwrap();
        assert!(matches!(build(&tokens), Err(ShellError::Syntax { .. })));
    }

    #[test]
    fn consecutive_pipes_are_syntax_error() {
        let tokens = tokenize("echo hi || wc").unwrap();
        // `||` tokenizes as two single-char PIPE tokens since `||` is not a
        // recognized two-character operator in this core (logical
        // connectives are not supported here).
        assert!(matches!(build(&tokens), Err(ShellError::Syntax { .. })));
    }

    #[test]
    fn quotes_are_stripped_from_argv() {
        let stages = stages_of("echo 'a b' \"c d\"");
        assert_eq!(stages[0].argv, vec!["echo", "a b", "c d"]);
    }

    #[test]
    fn double_quote_inside_single_quote_is_literal_in_argv() {
        let stages = stages_of(r#"echo 'say "hi"'"#);
        assert_eq!(stages[0].argv, vec!["echo", r#"say "hi""#]);
    }

    #[test]
    fn heredoc_operator_is_rejected() {
        let tokens = tokenize("cat <<EOF").unwrap();
        assert!(matches!(build(&tokens), Err(ShellError::HeredocUnsupported)));
    }

    #[test]
    fn deterministic_tokenizer_then_builder() {
        let a = stages_of("echo $FOO | wc -l");
        let b = stages_of("echo $FOO | wc -l");
        assert_eq!(a, b);
    }
}
