use std::collections::HashMap;

use glam::DVec3;
use serde::Deserialize;

/// The wire shape of one customized product: a flat node table plus a mapping
/// from node id to the storage key of its part mesh.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDescription {
    pub tree: TreeDescription,
    #[serde(default)]
    pub file_mappings: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeDescription {
    pub root_id: String,
    #[serde(default)]
    pub children: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub data: HashMap<String, NodeData>,
}

/// Per-node geometric fields. Everything defaults to zero/identity when
/// absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeData {
    /// Pivot translation, applied to the mesh before rotation and scale.
    pub position: Option<Vec3Data>,
    /// Euler angles in radians.
    pub rotation: Option<Vec3Data>,
    pub scale: Option<ScaleData>,
    /// Placement of this node inside its parent.
    pub position_within_parent: Option<Vec3Data>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Vec3Data {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<Vec3Data> for DVec3 {
    fn from(value: Vec3Data) -> Self {
        DVec3::new(value.x, value.y, value.z)
    }
}

/// Scale is either a scalar broadcast to all axes or a per-axis vector.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum ScaleData {
    Uniform(f64),
    PerAxis(Vec3Data),
}

impl From<ScaleData> for DVec3 {
    fn from(value: ScaleData) -> Self {
        match value {
            ScaleData::Uniform(scale) => DVec3::splat(scale),
            ScaleData::PerAxis(scale) => scale.into(),
        }
    }
}

impl NodeData {
    pub fn pivot_translation(&self) -> DVec3 {
        self.position.map(DVec3::from).unwrap_or(DVec3::ZERO)
    }

    pub fn rotation(&self) -> DVec3 {
        self.rotation.map(DVec3::from).unwrap_or(DVec3::ZERO)
    }

    pub fn scale(&self) -> DVec3 {
        self.scale.map(DVec3::from).unwrap_or(DVec3::ONE)
    }

    pub fn position_within_parent(&self) -> DVec3 {
        self.position_within_parent
            .map(DVec3::from)
            .unwrap_or(DVec3::ZERO)
    }
}
