use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    /// The request payload is structurally invalid. Deterministic for a given
    /// payload, so never worth a retry.
    #[error("malformed request: {message}")]
    MalformedRequest { message: String },

    /// A referenced part mesh could not be resolved.
    #[error("failed to load mesh {key}: {message}")]
    MeshLoad { key: String, message: String },
}

impl SceneError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn mesh_load(key: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::MeshLoad {
            key: key.into(),
            message: message.to_string(),
        }
    }
}
