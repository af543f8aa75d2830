use glam::DMat4;
use partfuse_mesh::TriangleMesh;

mod builder;
mod description;
mod error;

pub use builder::{build, build_graph, MeshSource};
pub use description::{GraphDescription, NodeData, ScaleData, TreeDescription, Vec3Data};
pub use error::SceneError;

/// One node in the scene graph arena. The local transform is always relative
/// to the parent; child links are arena indices.
#[derive(Debug)]
pub struct GraphNode {
    pub local: DMat4,
    pub children: Vec<u32>,
    pub mesh: Option<TriangleMesh>,
}

impl GraphNode {
    pub fn compose_world(&self, parent_world: DMat4) -> DMat4 {
        parent_world * self.local
    }
}

/// A built scene graph. Constructed once by the builder, consumed exactly
/// once by [`Graph::flatten`].
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    root: u32,
}

impl Graph {
    /// Walks the graph depth-first, accumulating world transforms, and
    /// returns every mesh with its world transform already applied to the
    /// geometry. Parents' meshes come before their children's; children keep
    /// their declared order.
    pub fn flatten(mut self) -> Vec<TriangleMesh> {
        let mut output = Vec::new();
        let root = self.root;
        self.flatten_node(root, DMat4::IDENTITY, &mut output);
        output
    }

    fn flatten_node(&mut self, index: u32, parent_world: DMat4, output: &mut Vec<TriangleMesh>) {
        let node = &mut self.nodes[index as usize];
        let world = node.compose_world(parent_world);

        if let Some(mut mesh) = node.mesh.take() {
            mesh.apply_transform(&world);
            output.push(mesh);
        }

        let children = std::mem::take(&mut self.nodes[index as usize].children);
        for child in children {
            self.flatten_node(child, world, output);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use glam::DVec3;
    use partfuse_mesh::TriangleMesh;

    use super::*;

    /// In-memory mesh source that counts how often it is asked to load.
    struct FakeSource {
        meshes: HashMap<String, TriangleMesh>,
        loads: usize,
    }

    impl FakeSource {
        fn new(keys: &[&str]) -> Self {
            let meshes = keys
                .iter()
                .map(|key| ((*key).to_owned(), unit_triangle()))
                .collect();
            Self { meshes, loads: 0 }
        }
    }

    impl MeshSource for FakeSource {
        fn load(&mut self, key: &str) -> Result<TriangleMesh, SceneError> {
            self.loads += 1;
            self.meshes
                .get(key)
                .cloned()
                .ok_or_else(|| SceneError::mesh_load(key, "not found"))
        }
    }

    fn unit_triangle() -> TriangleMesh {
        TriangleMesh::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y], vec![[0, 1, 2]])
    }

    fn metadata(json: &str) -> serde_json::Value {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_leaf_identity_graph_keeps_geometry() {
        let mut source = FakeSource::new(&["a.stl"]);
        let graph = build(
            &metadata(r#"{ "tree": { "root_id": "A" }, "file_mappings": { "A": "a.stl" } }"#),
            &mut source,
        )
        .unwrap();

        let meshes = graph.flatten();
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0], unit_triangle());
    }

    #[test]
    fn container_translation_moves_leaf_mesh() {
        let mut source = FakeSource::new(&["a.stl"]);
        let graph = build(
            &metadata(
                r#"{
                    "tree": {
                        "root_id": "A",
                        "data": {
                            "A": { "position_within_parent": { "x": 1.0, "y": 0.0, "z": 0.0 } }
                        }
                    },
                    "file_mappings": { "A": "a.stl" }
                }"#,
            ),
            &mut source,
        )
        .unwrap();

        let meshes = graph.flatten();
        assert_eq!(meshes[0].vertex_positions[0], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(meshes[0].vertex_positions[1], DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn pivot_translation_applies_before_scale() {
        // Pivot moves the mesh one unit along x, then the container doubles
        // everything: (1, 0, 0) -> (2, 0, 0) for the original origin vertex.
        let mut source = FakeSource::new(&["a.stl"]);
        let graph = build(
            &metadata(
                r#"{
                    "tree": {
                        "root_id": "A",
                        "data": {
                            "A": {
                                "position": { "x": 1.0, "y": 0.0, "z": 0.0 },
                                "scale": 2.0
                            }
                        }
                    },
                    "file_mappings": { "A": "a.stl" }
                }"#,
            ),
            &mut source,
        )
        .unwrap();

        let meshes = graph.flatten();
        assert_eq!(meshes[0].vertex_positions[0], DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(meshes[0].vertex_positions[1], DVec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn child_meshes_inherit_parent_transform_in_order() {
        let mut source = FakeSource::new(&["a.stl", "b.stl"]);
        let graph = build(
            &metadata(
                r#"{
                    "tree": {
                        "root_id": "A",
                        "children": { "A": ["B"] },
                        "data": {
                            "A": {},
                            "B": { "position_within_parent": { "x": 1.0, "y": 0.0, "z": 0.0 } }
                        }
                    },
                    "file_mappings": { "A": "a.stl", "B": "b.stl" }
                }"#,
            ),
            &mut source,
        )
        .unwrap();

        let meshes = graph.flatten();
        assert_eq!(meshes.len(), 2);
        // A's own mesh flattens first at identity, then B's carrying the
        // (1, 0, 0) placement.
        assert_eq!(meshes[0].vertex_positions[0], DVec3::ZERO);
        assert_eq!(meshes[1].vertex_positions[0], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(meshes[1].vertex_positions[1], DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn parent_rotation_spins_its_own_mesh_but_not_its_children() {
        // A's rotation and scale act on a.stl only; B keeps its declared
        // placement inside A.
        let mut source = FakeSource::new(&["a.stl", "b.stl"]);
        let graph = build(
            &metadata(
                r#"{
                    "tree": {
                        "root_id": "A",
                        "children": { "A": ["B"] },
                        "data": {
                            "A": { "rotation": { "x": 0.0, "y": 0.0, "z": 1.5707963267948966 } },
                            "B": { "position_within_parent": { "x": 1.0, "y": 0.0, "z": 0.0 } }
                        }
                    },
                    "file_mappings": { "A": "a.stl", "B": "b.stl" }
                }"#,
            ),
            &mut source,
        )
        .unwrap();

        let meshes = graph.flatten();
        assert_eq!(meshes.len(), 2);
        // a.stl's x-axis vertex swings onto the y axis.
        let rotated = meshes[0].vertex_positions[1];
        assert!(rotated.abs_diff_eq(DVec3::new(0.0, 1.0, 0.0), 1e-12));
        // b.stl is untouched by A's rotation.
        assert_eq!(meshes[1].vertex_positions[0], DVec3::new(1.0, 0.0, 0.0));
        assert_eq!(meshes[1].vertex_positions[1], DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn grouping_node_contributes_no_mesh() {
        let mut source = FakeSource::new(&["b.stl"]);
        let graph = build(
            &metadata(
                r#"{
                    "tree": {
                        "root_id": "A",
                        "children": { "A": ["B"] },
                        "data": { "A": {}, "B": {} }
                    },
                    "file_mappings": { "B": "b.stl" }
                }"#,
            ),
            &mut source,
        )
        .unwrap();

        assert_eq!(graph.flatten().len(), 1);
    }

    #[test]
    fn missing_root_id_fails_without_loading_meshes() {
        let mut source = FakeSource::new(&["a.stl"]);
        let result = build(
            &metadata(r#"{ "tree": {}, "file_mappings": { "A": "a.stl" } }"#),
            &mut source,
        );

        assert!(matches!(
            result,
            Err(SceneError::MalformedRequest { .. })
        ));
        assert_eq!(source.loads, 0);
    }

    #[test]
    fn unknown_child_id_fails() {
        let mut source = FakeSource::new(&["a.stl"]);
        let result = build(
            &metadata(
                r#"{
                    "tree": { "root_id": "A", "children": { "A": ["GHOST"] } },
                    "file_mappings": { "A": "a.stl" }
                }"#,
            ),
            &mut source,
        );

        assert!(matches!(result, Err(SceneError::MalformedRequest { .. })));
    }

    #[test]
    fn self_referencing_node_fails_instead_of_recursing() {
        let mut source = FakeSource::new(&["a.stl"]);
        let result = build(
            &metadata(
                r#"{
                    "tree": { "root_id": "A", "children": { "A": ["A"] } },
                    "file_mappings": { "A": "a.stl" }
                }"#,
            ),
            &mut source,
        );

        assert!(matches!(result, Err(SceneError::MalformedRequest { .. })));
    }

    #[test]
    fn description_with_no_meshes_is_malformed() {
        let mut source = FakeSource::new(&[]);
        let result = build(
            &metadata(r#"{ "tree": { "root_id": "A", "data": { "A": {} } } }"#),
            &mut source,
        );

        assert!(matches!(result, Err(SceneError::MalformedRequest { .. })));
    }

    #[test]
    fn unresolvable_file_reference_surfaces_mesh_load_error() {
        let mut source = FakeSource::new(&[]);
        let result = build(
            &metadata(r#"{ "tree": { "root_id": "A" }, "file_mappings": { "A": "gone.stl" } }"#),
            &mut source,
        );

        assert!(matches!(result, Err(SceneError::MeshLoad { .. })));
    }
}
