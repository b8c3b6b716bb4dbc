use thiserror::Error;

use crate::coordinator::BindingId;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Property not found: {name} (available: {})", .available.join(", "))]
    PropertyNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error(
        "Input {input} cannot filter property {property} of type {value_type} (supported: {})",
        .supported.join(", ")
    )]
    UnsupportedInput {
        property: String,
        input: String,
        value_type: String,
        supported: Vec<String>,
    },

    #[error("Property already has a filter binding: {0}")]
    DuplicateBinding(String),

    #[error("Unknown filter binding: {0}")]
    UnknownBinding(BindingId),

    #[error("Invalid viewer offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
