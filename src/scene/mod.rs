//! In-memory scene graph handed over by the scene importer.
//!
//! The graph is immutable once loaded. Nodes own their children, so a scene
//! is always a tree rooted at [`Scene::root`].

pub mod gltf;

use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    /// Local transform relative to the parent node (translate * rotate * scale).
    pub transform: glm::Mat4,
    /// Indices into [`Scene::meshes`].
    pub meshes: Vec<usize>,
    pub children: Vec<SceneNode>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: glm::identity::<f32, 4>(),
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: glm::Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_translation(mut self, translation: glm::Vec3) -> Self {
        self.transform = glm::translation(&translation) * self.transform;
        self
    }

    pub fn with_mesh(mut self, mesh: usize) -> Self {
        self.meshes.push(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, this node included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

/// One primitive group of a mesh. Anything other than three indices is not
/// renderable as a triangle list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }

    pub fn is_triangle(&self) -> bool {
        self.indices.len() == 3
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneMesh {
    pub positions: Vec<[f32; 3]>,
    /// Empty when the source carries no normals.
    pub normals: Vec<[f32; 3]>,
    /// Tangents and bitangents come in pairs; both empty when absent.
    pub tangents: Vec<[f32; 3]>,
    pub bitangents: Vec<[f32; 3]>,
    /// One entry per texture-coordinate channel, each as long as `positions`.
    pub tex_coords: Vec<Vec<[f32; 2]>>,
    pub faces: Vec<Face>,
    pub material: Option<usize>,
}

impl SceneMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tangents_and_bitangents(&self) -> bool {
        !self.tangents.is_empty() && !self.bitangents.is_empty()
    }

    pub fn has_texture_coords(&self, channel: usize) -> bool {
        self.tex_coords
            .get(channel)
            .is_some_and(|uvs| !uvs.is_empty())
    }
}

/// Texture slots a material can reference, in the importer's terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureSlot {
    Diffuse,
    Specular,
    Emissive,
    Normals,
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneMaterial {
    pub name: String,
    pub textures: Vec<(TextureSlot, String)>,
}

impl SceneMaterial {
    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        self.textures
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, file)| file.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    pub root: SceneNode,
    pub meshes: Vec<SceneMesh>,
    pub materials: Vec<SceneMaterial>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_count_covers_subtree() {
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("a").with_child(SceneNode::new("b")))
            .with_child(SceneNode::new("c"));
        assert_eq!(root.count(), 4);
    }

    #[test]
    fn translation_is_applied_to_transform() {
        let node = SceneNode::new("n").with_translation(glm::vec3(1.0, 2.0, 3.0));
        assert_eq!(node.transform[(0, 3)], 1.0);
        assert_eq!(node.transform[(1, 3)], 2.0);
        assert_eq!(node.transform[(2, 3)], 3.0);
    }

    #[test]
    fn material_texture_lookup_by_slot() {
        let material = SceneMaterial {
            name: "m".to_string(),
            textures: vec![(TextureSlot::Diffuse, "body.png".to_string())],
        };
        assert_eq!(material.texture(TextureSlot::Diffuse), Some("body.png"));
        assert_eq!(material.texture(TextureSlot::Specular), None);
    }
}
