#![forbid(unsafe_code)]

//! seqdiag parser + sequence diagram model (headless).
//!
//! Pipeline: [`parse`] turns source text into an [`ast::Document`], [`build`]
//! turns that into a read-only [`Diagram`]. Geometry lives in `seqdiag-render`.

pub mod ast;
pub mod builder;
pub mod diagnostics;
pub mod error;
mod lexer;
pub mod model;
pub mod parse;

pub use builder::build;
pub use diagnostics::Warning;
pub use error::{Error, Result};
pub use model::{
    Activation, Diagram, DiagramSettings, Fragment, FragmentId, Group, GroupId, Heading,
    LineStyle, Message, MessageDir, MessageId, Participant, ParticipantId, RowItem, Separator,
    SeparatorId, ShadowStyle,
};
pub use parse::parse;

/// Parses `source` and builds the diagram model in one call.
pub fn parse_and_build(source: &str) -> Result<Diagram> {
    let document = parse(source)?;
    build(&document)
}

#[cfg(test)]
mod tests;
