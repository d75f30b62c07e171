//! Recursive-descent parser for the seqdiag statement language.
//!
//! ```text
//! document  := ("diagram" | "seqdiag")? id? "{" stmt* "}"
//! stmt      := ( class | plugin | group | fragment | defaults
//!              | graph_attr | edge | separator | node ) ";"?
//! edge      := id (EDGE_OP id)+ attr_list* ("{" stmt* "}")?
//! attr_list := "[" (id ("=" id)? ","?)* "]"
//! ```
//!
//! Keywords are contextual: `group`, `alt`, `loop`, `class`, ... are plain
//! identifiers unless the following token selects the keyword form.

use crate::ast::{
    Attr, DefaultsStmt, DefaultsTarget, Document, EdgeStmt, ExtensionKind, ExtensionStmt,
    FragmentKind, FragmentStmt, GroupStmt, NodeStmt, Position, SeparatorKind, SeparatorStmt,
    Statement,
};
use crate::lexer::{Tok, position_of, tokenize};
use crate::{Error, Result};
use std::ops::Range;

pub fn parse(source: &str) -> Result<Document> {
    let tokens = tokenize(source)?;
    Parser {
        source,
        tokens,
        pos: 0,
    }
    .document()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Tok, Range<usize>)>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, ahead: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + ahead).map(|(t, _)| t)
    }

    fn position(&self) -> Position {
        let offset = self
            .tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len());
        position_of(self.source, offset)
    }

    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        let pos = self.position();
        Err(Error::Parse {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        })
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        match self.peek() {
            Some(tok) => self.error(format!("expected {expected}, got {}", tok.describe())),
            None => self.error(format!("expected {expected}, got end of input")),
        }
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Tok) -> Result<()> {
        if self.eat(tok) {
            Ok(())
        } else {
            self.unexpected(&tok.describe())
        }
    }

    fn id(&mut self) -> Result<String> {
        match self.peek().and_then(Tok::as_id) {
            Some(id) => {
                let id = id.to_string();
                self.pos += 1;
                Ok(id)
            }
            None => self.unexpected("an identifier"),
        }
    }

    fn peek_name_is(&self, ahead: usize, keyword: &str) -> bool {
        matches!(self.peek_at(ahead), Some(Tok::Name(n)) if n == keyword)
    }

    fn document(mut self) -> Result<Document> {
        if self.peek_name_is(0, "diagram") || self.peek_name_is(0, "seqdiag") {
            self.pos += 1;
        }
        let id = if self.peek() != Some(&Tok::LBrace) {
            Some(self.id()?)
        } else {
            None
        };
        let statements = self.block()?;
        if self.peek().is_some() {
            return self.unexpected("end of input");
        }
        Ok(Document { id, statements })
    }

    /// `"{" stmt* "}"`
    fn block(&mut self) -> Result<Vec<Statement>> {
        self.expect(&Tok::LBrace)?;
        let mut statements = Vec::new();
        loop {
            match self.peek() {
                Some(Tok::RBrace) => {
                    self.pos += 1;
                    return Ok(statements);
                }
                Some(Tok::Semi) => {
                    self.pos += 1;
                }
                Some(_) => {
                    statements.push(self.statement()?);
                    self.eat(&Tok::Semi);
                }
                None => return self.unexpected("`}`"),
            }
        }
    }

    fn statement(&mut self) -> Result<Statement> {
        let position = self.position();
        match self.peek() {
            Some(Tok::Divider(label)) => {
                let label = label.clone();
                self.pos += 1;
                return Ok(Statement::Separator(SeparatorStmt {
                    kind: SeparatorKind::Divider,
                    label,
                }));
            }
            Some(Tok::Delay(label)) => {
                let label = label.clone();
                self.pos += 1;
                return Ok(Statement::Separator(SeparatorStmt {
                    kind: SeparatorKind::Delay,
                    label,
                }));
            }
            _ => {}
        }

        let Some(first) = self.peek().and_then(Tok::as_id).map(str::to_string) else {
            return self.unexpected("a statement");
        };
        let is_name = matches!(self.peek(), Some(Tok::Name(_)));
        let next_is_id = self.peek_at(1).is_some_and(|t| t.as_id().is_some());
        let next_is_lbrace = self.peek_at(1) == Some(&Tok::LBrace);
        let next_is_lbracket = self.peek_at(1) == Some(&Tok::LBracket);
        let third_is_lbrace = self.peek_at(2) == Some(&Tok::LBrace);

        if is_name {
            match first.as_str() {
                "class" if next_is_id => {
                    self.pos += 1;
                    return self.extension(ExtensionKind::Class);
                }
                "plugin" if next_is_id => {
                    self.pos += 1;
                    return self.extension(ExtensionKind::Plugin);
                }
                "group" if next_is_lbrace || (next_is_id && third_is_lbrace) => {
                    self.pos += 1;
                    let id = if next_is_id { Some(self.id()?) } else { None };
                    let statements = self.block()?;
                    return Ok(Statement::Group(GroupStmt { id, statements }));
                }
                "alt" | "loop" if next_is_lbrace || next_is_lbracket => {
                    let kind = if first == "alt" {
                        FragmentKind::Alt
                    } else {
                        FragmentKind::Loop
                    };
                    self.pos += 1;
                    let attrs = self.attr_lists()?;
                    let statements = self.block()?;
                    return Ok(Statement::Fragment(FragmentStmt {
                        kind,
                        attrs,
                        statements,
                        position,
                    }));
                }
                "node" | "edge" | "graph" if next_is_lbracket => {
                    let target = match first.as_str() {
                        "node" => DefaultsTarget::Node,
                        "edge" => DefaultsTarget::Edge,
                        _ => DefaultsTarget::Graph,
                    };
                    self.pos += 1;
                    let attrs = self.attr_lists()?;
                    return Ok(Statement::Defaults(DefaultsStmt { target, attrs }));
                }
                _ if next_is_lbrace => {
                    return Err(Error::UnknownStatement {
                        kind: first.clone(),
                        line: position.line,
                        column: position.column,
                    });
                }
                _ => {}
            }
        }

        self.pos += 1;
        match self.peek() {
            Some(Tok::Eq) => {
                self.pos += 1;
                let value = self.id()?;
                Ok(Statement::Attribute(Attr::new(first, Some(value))))
            }
            Some(Tok::EdgeOp(_)) => self.edge(first),
            _ => {
                let attrs = self.attr_lists()?;
                Ok(Statement::Node(NodeStmt { id: first, attrs }))
            }
        }
    }

    fn extension(&mut self, kind: ExtensionKind) -> Result<Statement> {
        let name = self.id()?;
        let attrs = self.attr_lists()?;
        Ok(Statement::Extension(ExtensionStmt { kind, name, attrs }))
    }

    fn edge_op(&mut self) -> Option<String> {
        match self.peek() {
            Some(Tok::EdgeOp(op)) => {
                let op = op.clone();
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn edge(&mut self, from: String) -> Result<Statement> {
        let Some(edge_type) = self.edge_op() else {
            return self.unexpected("an edge operator");
        };
        let to = self.id()?;

        let mut followers = Vec::new();
        while let Some(op) = self.edge_op() {
            followers.push((op, self.id()?));
        }

        let attrs = self.attr_lists()?;
        let block = if self.peek() == Some(&Tok::LBrace) {
            Some(self.block()?)
        } else {
            None
        };

        Ok(Statement::Edge(EdgeStmt {
            from,
            edge_type,
            to,
            followers,
            attrs,
            block,
        }))
    }

    /// Zero or more bracketed attribute lists, flattened.
    fn attr_lists(&mut self) -> Result<Vec<Attr>> {
        let mut attrs = Vec::new();
        while self.eat(&Tok::LBracket) {
            loop {
                if self.eat(&Tok::RBracket) {
                    break;
                }
                let name = self.id()?;
                let attr = if self.eat(&Tok::Eq) {
                    Attr::new(name, Some(self.id()?))
                } else {
                    Attr::flag(name)
                };
                attrs.push(attr);
                self.eat(&Tok::Comma);
            }
        }
        Ok(attrs)
    }
}
