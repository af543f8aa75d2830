use std::io::Cursor;

use glam::DVec3;
use partfuse::partfuse_mesh::{CodecError, MeshCodec, TriangleMesh};

/// STL mesh codec backed by the external `stl_io` crate.
pub struct StlCodec;

impl MeshCodec for StlCodec {
    fn decode(&self, data: &[u8]) -> Result<TriangleMesh, CodecError> {
        let indexed = stl_io::read_stl(&mut Cursor::new(data))?;

        let vertex_positions = indexed
            .vertices
            .iter()
            .map(|vertex| DVec3::new(vertex[0] as f64, vertex[1] as f64, vertex[2] as f64))
            .collect();
        let triangles = indexed
            .faces
            .iter()
            .map(|face| {
                [
                    face.vertices[0] as u32,
                    face.vertices[1] as u32,
                    face.vertices[2] as u32,
                ]
            })
            .collect();

        Ok(TriangleMesh::new(vertex_positions, triangles))
    }

    fn encode(&self, mesh: &TriangleMesh) -> Result<Vec<u8>, CodecError> {
        let mut faces = Vec::with_capacity(mesh.triangle_count());
        for triangle in &mesh.triangles {
            let v0 = vertex_at(mesh, triangle[0])?;
            let v1 = vertex_at(mesh, triangle[1])?;
            let v2 = vertex_at(mesh, triangle[2])?;

            let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
            faces.push(stl_io::Triangle {
                normal: stl_io::Normal::new([
                    normal.x as f32,
                    normal.y as f32,
                    normal.z as f32,
                ]),
                vertices: [to_stl_vertex(v0), to_stl_vertex(v1), to_stl_vertex(v2)],
            });
        }

        let mut data = Vec::new();
        stl_io::write_stl(&mut data, faces.iter())?;
        Ok(data)
    }
}

fn vertex_at(mesh: &TriangleMesh, index: u32) -> Result<DVec3, CodecError> {
    mesh.vertex_positions
        .get(index as usize)
        .copied()
        .ok_or_else(|| CodecError::invalid_data(format!("triangle index {index} out of range")))
}

fn to_stl_vertex(position: DVec3) -> stl_io::Vertex {
    stl_io::Vertex::new([position.x as f32, position.y as f32, position.z as f32])
}
