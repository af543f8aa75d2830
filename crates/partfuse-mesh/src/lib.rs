use glam::{DMat4, DVec3};
use thiserror::Error;

/// An indexed triangle mesh. The concrete mesh handle passed through the
/// whole pipeline; once unioned it is treated as an immutable artifact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertex_positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new(vertex_positions: Vec<DVec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertex_positions,
            triangles,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_positions.is_empty()
    }

    /// Rewrites all vertex positions in place. After this call no consumer
    /// can observe the untransformed coordinates.
    pub fn apply_transform(&mut self, matrix: &DMat4) {
        for position in &mut self.vertex_positions {
            *position = matrix.transform_point3(*position);
        }
    }

    /// Appends another mesh, rebasing its triangle indices.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.vertex_positions.len() as u32;

        self.vertex_positions
            .extend_from_slice(&other.vertex_positions);
        for triangle in &other.triangles {
            self.triangles.push([
                triangle[0] + offset,
                triangle[1] + offset,
                triangle[2] + offset,
            ]);
        }
    }
}

/// Decodes and encodes meshes in an on-disk interchange format. The actual
/// codec is an external capability; implementations adapt one behind this
/// trait.
pub trait MeshCodec {
    fn decode(&self, data: &[u8]) -> Result<TriangleMesh, CodecError>;
    fn encode(&self, mesh: &TriangleMesh) -> Result<Vec<u8>, CodecError>;
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid mesh data: {message}")]
    InvalidData { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}
