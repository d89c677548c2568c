pub mod config;
pub mod error;
pub mod types;

pub use config::{config, load_config, seeded_rng, set_config, EngineConfig, EvalRng};
pub use error::{EngineError, Result};
pub use types::{DesignId, EmpireId, ObjectId, Position, Turn};
