mod capabilities;
mod generate;
mod message;
mod runner;
mod stages;

pub use capabilities::{
    CallbackBody, CallbackClient, CallbackError, CallbackStatus, GenerateError, Generator,
    ObjectStore, StorageError,
};
pub use generate::{InProcessGenerator, StoreMeshSource};
pub use message::JobMessage;
pub use runner::JobRunner;
pub use stages::{Disposition, StageOutcomes};
