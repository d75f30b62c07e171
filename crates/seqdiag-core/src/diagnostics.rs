use serde::{Deserialize, Serialize};

/// Recoverable problems found while building or laying out a diagram.
///
/// Warnings never change whether a render succeeds. They are collected on the
/// model (and on the layout engine) and also emitted through `tracing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum Warning {
    #[error("unknown edge dir: {token}")]
    UnknownEdgeDirection { token: String },

    #[error("unknown {target} attribute: {name}")]
    UnknownAttribute { target: String, name: String },

    #[error("invalid value for attribute {name}: {value:?}")]
    InvalidAttributeValue { name: String, value: String },

    #[error("{name} is obsoleted; use {replacement}")]
    DeprecatedAttribute { name: String, replacement: String },

    #[error("unknown class: {name}")]
    UnknownClass { name: String },

    #[error("plugins are not supported; ignoring plugin {name}")]
    UnsupportedPlugin { name: String },

    #[error("unknown activation style: {value}")]
    UnknownActivationStyle { value: String },

    #[error("return message at row {row} closes no activation of {participant}")]
    UnbalancedReturn { participant: String, row: usize },

    #[error("{fragment} fragment at line {line}, column {column} contains no messages; skipped")]
    EmptyFragment {
        fragment: String,
        line: usize,
        column: usize,
    },

    #[error("edge_length is too short: {edge_length}")]
    EdgeLengthTooShort { edge_length: f64 },
}

impl Warning {
    /// Records the warning and mirrors it to the `tracing` side channel.
    pub fn record(self, warnings: &mut Vec<Warning>) {
        tracing::warn!("{self}");
        warnings.push(self);
    }
}
