pub mod stage;

pub use stage::{Stage, StageThread, DEFAULT_FINISH_TIMEOUT};
