//! Statement tree produced by the parser and consumed by the tree builder.
//!
//! Statements form a closed sum type: adding a kind forces every consumer
//! (`builder`, tests) to handle it.

use serde::{Deserialize, Serialize};

/// 1-based source position of the token that started a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attr {
    pub name: String,
    pub value: Option<String>,
}

impl Attr {
    pub fn new<V: Into<String>>(name: impl Into<String>, value: Option<V>) -> Self {
        Self {
            name: name.into(),
            value: value.map(Into::into),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "snake_case")]
pub enum Statement {
    Node(NodeStmt),
    Edge(EdgeStmt),
    Group(GroupStmt),
    Separator(SeparatorStmt),
    Fragment(FragmentStmt),
    /// `name = value` at diagram, group or fragment scope.
    Attribute(Attr),
    /// `node [..]`, `edge [..]` or `graph [..]`.
    Defaults(DefaultsStmt),
    Extension(ExtensionStmt),
}

impl Statement {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Node(_) => "node",
            Statement::Edge(_) => "edge",
            Statement::Group(_) => "group",
            Statement::Separator(_) => "separator",
            Statement::Fragment(_) => "fragment",
            Statement::Attribute(_) => "attribute",
            Statement::Defaults(_) => "defaults",
            Statement::Extension(_) => "extension",
        }
    }

    /// Statements that configure their block rather than add content to it.
    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            Statement::Attribute(_) | Statement::Defaults(_) | Statement::Extension(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStmt {
    pub id: String,
    pub attrs: Vec<Attr>,
}

/// `from edge_type to (edge_type to)* [attrs] { block }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStmt {
    pub from: String,
    pub edge_type: String,
    pub to: String,
    /// Remaining `(edge_type, to)` links of a chained edge like `A -> B -> C`.
    pub followers: Vec<(String, String)>,
    pub attrs: Vec<Attr>,
    pub block: Option<Vec<Statement>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStmt {
    pub id: Option<String>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeparatorKind {
    /// `=== label ===`
    Divider,
    /// `... label ...`
    Delay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeparatorStmt {
    pub kind: SeparatorKind,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FragmentKind {
    Alt,
    Loop,
}

impl FragmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FragmentKind::Alt => "alt",
            FragmentKind::Loop => "loop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FragmentStmt {
    pub kind: FragmentKind,
    pub attrs: Vec<Attr>,
    pub statements: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultsTarget {
    Node,
    Edge,
    Graph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsStmt {
    pub target: DefaultsTarget,
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionKind {
    Class,
    Plugin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionStmt {
    pub kind: ExtensionKind,
    pub name: String,
    pub attrs: Vec<Attr>,
}
