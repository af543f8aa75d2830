use partfuse_mesh::TriangleMesh;
use partfuse_scene::SceneError;
use partfuse_union::UnionError;
use serde::Serialize;
use thiserror::Error;

/// Object storage the worker reads part meshes from and writes results to.
pub trait ObjectStore {
    fn get(&mut self, key: &str) -> Result<Vec<u8>, StorageError>;
    fn put(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

#[derive(Debug, Error)]
#[error("storage error: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Result code reported to the callback endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackStatus {
    Success,
    Error,
}

impl CallbackStatus {
    pub fn code(self) -> u8 {
        match self {
            CallbackStatus::Success => 1,
            CallbackStatus::Error => 2,
        }
    }
}

/// Body of the `PATCH callback_url` request.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackBody {
    pub secret: String,
    pub status: u8,
}

impl CallbackBody {
    pub fn new(secret: impl Into<String>, status: CallbackStatus) -> Self {
        Self {
            secret: secret.into(),
            status: status.code(),
        }
    }
}

/// Delivers the result callback. Anything but a 200 response is an error.
pub trait CallbackClient {
    fn patch(&mut self, url: &str, body: &CallbackBody) -> Result<(), CallbackError>;
}

#[derive(Debug, Error)]
#[error("callback delivery failed: {message}")]
pub struct CallbackError {
    pub message: String,
}

impl CallbackError {
    pub fn new(message: impl std::fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Runs the build -> flatten -> union pipeline for one metadata payload.
/// Implemented in-process or through a memory-limited subprocess.
pub trait Generator {
    fn generate(&mut self, metadata: &serde_json::Value) -> Result<TriangleMesh, GenerateError>;
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Union(#[from] UnionError),

    /// The sandboxed pipeline exceeded its virtual-memory ceiling. The same
    /// payload would exceed it again, so this never requeues.
    #[error("memory ceiling exceeded")]
    ResourceExceeded,

    #[error("generation failed: {message}")]
    Other { message: String },
}

impl GenerateError {
    pub fn other(message: impl std::fmt::Display) -> Self {
        Self::Other {
            message: message.to_string(),
        }
    }
}
