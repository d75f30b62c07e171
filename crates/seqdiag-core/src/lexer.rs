use crate::ast::Position;
use crate::{Error, Result};
use logos::{FilterResult, Lexer, Logos};
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"(//|#)[^\n]*")]
pub(crate) enum Tok {
    /// Never emitted: the callback skips the comment or fails on a missing `*/`.
    #[token("/*", block_comment)]
    BlockComment,

    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semi,
    #[token(",")]
    Comma,
    #[token("=")]
    Eq,

    #[token("=>", edge_op)]
    #[token("->", edge_op)]
    #[token("-->", edge_op)]
    #[token("->>", edge_op)]
    #[token("-->>", edge_op)]
    #[token("<-", edge_op)]
    #[token("<--", edge_op)]
    #[token("<<-", edge_op)]
    #[token("<<--", edge_op)]
    EdgeOp(String),

    #[token("===", |lex| separator_label(lex, "==="))]
    Divider(String),
    #[token("...", |lex| separator_label(lex, "..."))]
    Delay(String),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| unquote(lex.slice()))]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| unquote(lex.slice()))]
    Str(String),

    #[regex(r"-?(\.[0-9]+|[0-9]+(\.[0-9]*)?)", |lex| lex.slice().to_string(), priority = 4)]
    Number(String),

    #[regex(
        r"[A-Za-z_0-9\u{80}-\u{10FFFF}][A-Za-z_.0-9\u{80}-\u{10FFFF}]*",
        name,
        priority = 3
    )]
    Name(String),
}

impl Tok {
    pub(crate) fn describe(&self) -> String {
        match self {
            Tok::BlockComment => "comment".to_string(),
            Tok::LBrace => "`{`".to_string(),
            Tok::RBrace => "`}`".to_string(),
            Tok::LBracket => "`[`".to_string(),
            Tok::RBracket => "`]`".to_string(),
            Tok::Semi => "`;`".to_string(),
            Tok::Comma => "`,`".to_string(),
            Tok::Eq => "`=`".to_string(),
            Tok::EdgeOp(op) => format!("`{op}`"),
            Tok::Divider(_) | Tok::Delay(_) => "separator".to_string(),
            Tok::Str(s) => format!("string {s:?}"),
            Tok::Number(n) => format!("number `{n}`"),
            Tok::Name(n) => format!("`{n}`"),
        }
    }

    /// Returns the identifier text for tokens usable as an id (`Name`, `Number`, `Str`).
    pub(crate) fn as_id(&self) -> Option<&str> {
        match self {
            Tok::Name(s) | Tok::Number(s) | Tok::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn edge_op(lex: &mut Lexer<'_, Tok>) -> String {
    lex.slice().to_string()
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || !ch.is_ascii()
}

/// Extends a name over `-part` continuations (`web-server`, `db-1`). A `-`
/// followed by anything else is left for the edge operator that starts there.
fn name(lex: &mut Lexer<'_, Tok>) -> String {
    loop {
        let rest = lex.remainder();
        let Some(tail) = rest.strip_prefix('-') else {
            break;
        };
        let part = tail
            .char_indices()
            .find(|&(_, ch)| !is_name_char(ch))
            .map_or(tail.len(), |(idx, _)| idx);
        if part == 0 {
            break;
        }
        lex.bump(1 + part);
    }
    lex.slice().to_string()
}

fn block_comment(lex: &mut Lexer<'_, Tok>) -> FilterResult<(), ()> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            FilterResult::Skip
        }
        None => {
            lex.bump(lex.remainder().len());
            FilterResult::Error(())
        }
    }
}

/// Consumes the rest of a `=== label ===` / `... label ...` line up to the closing marker.
fn separator_label(lex: &mut Lexer<'_, Tok>, marker: &str) -> Option<String> {
    let rest = lex.remainder();
    let line_end = rest.find(['\r', '\n']).unwrap_or(rest.len());
    let line = &rest[..line_end];
    let close = line.find(marker)?;
    let label = line[..close].trim().to_string();
    lex.bump(close + marker.len());
    Some(label)
}

/// Strips surrounding quotes and resolves backslash escapes (`\n` becomes a newline).
pub(crate) fn unquote(raw: &str) -> String {
    let inner = if raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub(crate) fn position_of(source: &str, offset: usize) -> Position {
    let offset = offset.min(source.len());
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = source[line_start..offset].chars().count() + 1;
    Position { line, column }
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<(Tok, Range<usize>)>> {
    let mut out = Vec::new();
    let mut lexer = Tok::lexer(source);
    while let Some(tok) = lexer.next() {
        let span = lexer.span();
        match tok {
            Ok(tok) => out.push((tok, span)),
            Err(()) => {
                let pos = position_of(source, span.start);
                let text = &source[span];
                let message = if text.starts_with("/*") {
                    "unterminated block comment".to_string()
                } else {
                    format!("Got unexpected token {text:?}")
                };
                return Err(Error::Parse {
                    line: pos.line,
                    column: pos.column,
                    message,
                });
            }
        }
    }
    Ok(out)
}
