use partfuse_mesh::{MeshCodec, TriangleMesh};
use partfuse_scene::{MeshSource, SceneError};
use partfuse_union::{reduce, BooleanUnion};

use crate::capabilities::{GenerateError, Generator, ObjectStore};

/// Mesh source backed by object storage plus a codec: fetch bytes by key,
/// decode them into geometry.
pub struct StoreMeshSource<'a> {
    store: &'a mut dyn ObjectStore,
    codec: &'a dyn MeshCodec,
}

impl<'a> StoreMeshSource<'a> {
    pub fn new(store: &'a mut dyn ObjectStore, codec: &'a dyn MeshCodec) -> Self {
        Self { store, codec }
    }
}

impl MeshSource for StoreMeshSource<'_> {
    fn load(&mut self, key: &str) -> Result<TriangleMesh, SceneError> {
        let data = self
            .store
            .get(key)
            .map_err(|err| SceneError::mesh_load(key, err))?;
        self.codec
            .decode(&data)
            .map_err(|err| SceneError::mesh_load(key, err))
    }
}

/// Generator that runs the whole pipeline inside the calling process. The
/// worker wraps this in a memory-limited subprocess for untrusted payloads.
pub struct InProcessGenerator<S, C, U> {
    store: S,
    codec: C,
    engine: U,
}

impl<S: ObjectStore, C: MeshCodec, U: BooleanUnion> InProcessGenerator<S, C, U> {
    pub fn new(store: S, codec: C, engine: U) -> Self {
        Self {
            store,
            codec,
            engine,
        }
    }
}

impl<S: ObjectStore, C: MeshCodec, U: BooleanUnion> Generator for InProcessGenerator<S, C, U> {
    fn generate(&mut self, metadata: &serde_json::Value) -> Result<TriangleMesh, GenerateError> {
        let mut source = StoreMeshSource::new(&mut self.store, &self.codec);
        let graph = partfuse_scene::build(metadata, &mut source)?;
        let meshes = graph.flatten();
        Ok(reduce(meshes, &mut self.engine)?)
    }
}
