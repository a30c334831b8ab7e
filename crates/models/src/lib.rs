pub mod action;
pub mod billing;
pub mod document;
pub mod ledger;
pub mod policy;
pub mod role;
pub mod status;

use thiserror::Error;

/// Returned when a string does not name a known variant of one of the domain enums
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}
