//! Error types for the decision core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("no legal actions available")]
    NoLegalActions,

    #[error("search produced no candidate: {0}")]
    EmptySearch(String),

    #[error("search value out of range: {0}")]
    ValueOutOfRange(f64),

    #[error("entity not found: {0}")]
    EntityNotFound(u32),
}

pub type Result<T> = std::result::Result<T, DecisionError>;
