use thiserror::Error;

use crate::core::types::{EmpireId, ObjectId};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Object not found: {0}")]
    ObjectNotFound(ObjectId),

    #[error("Duplicate object id: {0}")]
    DuplicateObject(ObjectId),

    #[error("Unknown empire: {0}")]
    UnknownEmpire(EmpireId),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
