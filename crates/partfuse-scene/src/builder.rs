use std::collections::HashSet;

use glam::DVec3;
use partfuse_mesh::TriangleMesh;
use partfuse_transform::compose;

use crate::description::{GraphDescription, NodeData};
use crate::error::SceneError;
use crate::{Graph, GraphNode};

/// Resolves a part file reference to mesh geometry. In production this is
/// object storage plus a mesh codec; tests substitute in-memory sources.
pub trait MeshSource {
    fn load(&mut self, key: &str) -> Result<TriangleMesh, SceneError>;
}

/// Builds the scene graph for a raw `metadata` payload.
///
/// The payload is deserialized into a [`GraphDescription`] first; any shape
/// mismatch (missing `root_id` included) is reported as
/// [`SceneError::MalformedRequest`] before any mesh is loaded.
pub fn build(
    metadata: &serde_json::Value,
    source: &mut dyn MeshSource,
) -> Result<Graph, SceneError> {
    let description: GraphDescription = serde_json::from_value(metadata.clone())
        .map_err(|err| SceneError::malformed(err.to_string()))?;

    build_graph(&description, source)
}

/// Builds the scene graph for an already-parsed description.
///
/// Every node id becomes a container node carrying only the
/// `position_within_parent` translation; sub-parts attach directly to it. If
/// the node references a part file, a wrapper carrying the node's rotation
/// and scale is attached as the container's first child, and the loaded mesh
/// hangs off the wrapper behind the pivot translation. Rotation and scale
/// therefore act on the node's own mesh and never on its sub-parts. Nodes
/// without a file reference are pure grouping nodes.
pub fn build_graph(
    description: &GraphDescription,
    source: &mut dyn MeshSource,
) -> Result<Graph, SceneError> {
    let mut builder = GraphBuilder {
        description,
        source,
        nodes: Vec::new(),
        visited: HashSet::new(),
        mesh_count: 0,
    };

    let root = builder.build_node(&description.tree.root_id)?;

    if builder.mesh_count == 0 {
        return Err(SceneError::malformed("description references no meshes"));
    }

    Ok(Graph {
        nodes: builder.nodes,
        root,
    })
}

struct GraphBuilder<'a> {
    description: &'a GraphDescription,
    source: &'a mut dyn MeshSource,
    nodes: Vec<GraphNode>,
    visited: HashSet<String>,
    mesh_count: usize,
}

impl GraphBuilder<'_> {
    fn build_node(&mut self, id: &str) -> Result<u32, SceneError> {
        if !self.is_known(id) {
            return Err(SceneError::malformed(format!("unknown node id `{id}`")));
        }
        if !self.visited.insert(id.to_owned()) {
            return Err(SceneError::malformed(format!(
                "node `{id}` referenced more than once"
            )));
        }

        let default_data = NodeData::default();
        let data = self
            .description
            .tree
            .data
            .get(id)
            .unwrap_or(&default_data)
            .clone();

        let index = self.nodes.len() as u32;
        self.nodes.push(GraphNode {
            local: compose(data.position_within_parent(), DVec3::ZERO, DVec3::ONE),
            children: Vec::new(),
            mesh: None,
        });

        // The node's own mesh subtree is the first child so a parent's mesh
        // flattens before its sub-parts'. The wrapper carries rotation and
        // scale, the leaf only the pivot translation, so the pivot applies
        // before both and neither reaches the sub-part children.
        if let Some(key) = self.description.file_mappings.get(id) {
            let mesh = self.source.load(key)?;
            let leaf_index = self.nodes.len() as u32;
            self.nodes.push(GraphNode {
                local: compose(data.pivot_translation(), DVec3::ZERO, DVec3::ONE),
                children: Vec::new(),
                mesh: Some(mesh),
            });
            let wrapper_index = self.nodes.len() as u32;
            self.nodes.push(GraphNode {
                local: compose(DVec3::ZERO, data.rotation(), data.scale()),
                children: vec![leaf_index],
                mesh: None,
            });
            self.nodes[index as usize].children.push(wrapper_index);
            self.mesh_count += 1;
        }

        if let Some(child_ids) = self.description.tree.children.get(id) {
            for child_id in child_ids {
                let child_index = self.build_node(child_id)?;
                self.nodes[index as usize].children.push(child_index);
            }
        }

        Ok(index)
    }

    fn is_known(&self, id: &str) -> bool {
        self.description.tree.data.contains_key(id)
            || self.description.tree.children.contains_key(id)
            || self.description.file_mappings.contains_key(id)
    }
}
