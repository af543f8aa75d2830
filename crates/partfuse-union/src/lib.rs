use std::time::Instant;

use partfuse_mesh::TriangleMesh;
use thiserror::Error;

/// Pairwise boolean union of two solids. The actual geometry engine is an
/// external capability behind this trait.
pub trait BooleanUnion {
    fn union(&mut self, a: TriangleMesh, b: TriangleMesh) -> Result<TriangleMesh, UnionError>;
}

#[derive(Debug, Error)]
#[error("boolean union failed: {message}")]
pub struct UnionError {
    pub message: String,
}

impl UnionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Left-folds a flattened mesh sequence into one solid.
///
/// A single mesh is returned unchanged without invoking the engine. The fold
/// is strictly sequential; the engine's union is not assumed safe to apply
/// out of order on degenerate inputs. The first failing pairwise union aborts
/// the whole reduction.
pub fn reduce(
    meshes: Vec<TriangleMesh>,
    engine: &mut dyn BooleanUnion,
) -> Result<TriangleMesh, UnionError> {
    let count = meshes.len();
    let mut meshes = meshes.into_iter();

    let Some(mut accumulator) = meshes.next() else {
        // Callers guarantee at least one mesh; a builder that attaches no
        // leaves rejects the request before reduction.
        return Err(UnionError::new("cannot reduce zero meshes"));
    };

    if count == 1 {
        return Ok(accumulator);
    }

    let start = Instant::now();
    for mesh in meshes {
        accumulator = engine.union(accumulator, mesh)?;
    }
    log::info!(
        "unioned {} meshes in {:.2}s",
        count,
        start.elapsed().as_secs_f64()
    );

    Ok(accumulator)
}

/// Degenerate engine that concatenates triangle soups instead of resolving
/// their boolean union. Stands in where no exact engine is wired up; the
/// output still encloses the same solid region for printing purposes.
#[derive(Debug, Default)]
pub struct ConcatUnion;

impl BooleanUnion for ConcatUnion {
    fn union(&mut self, mut a: TriangleMesh, b: TriangleMesh) -> Result<TriangleMesh, UnionError> {
        a.merge(&b);
        Ok(a)
    }
}
