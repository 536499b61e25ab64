//! glTF / GLB reader producing a [`Scene`].
//!
//! The importer's node forest is put under one synthetic root node named after
//! the glTF scene, and every mesh primitive becomes its own [`SceneMesh`].
//!
//! Vertices are taken as stored. Identical vertices are not welded, and a
//! primitive without an index accessor gets one index per vertex.

use super::{Face, Scene, SceneMaterial, SceneMesh, SceneNode, TextureSlot};
use crate::error::ImportError;
use gltf::mesh::Mode;
use log::{debug, info, warn};
use nalgebra_glm as glm;
use std::path::Path;

/// Deepest node chain accepted below the synthetic root.
pub const MAX_NODE_DEPTH: usize = 256;

pub fn load(path: &Path) -> Result<Scene, ImportError> {
    let (document, buffers, _images) = gltf::import(path)
        .map_err(|e| ImportError::from(e).with_arg("path", path.display()))?;
    build_scene(&document, &buffers)
}

pub fn load_slice(bytes: &[u8]) -> Result<Scene, ImportError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;
    build_scene(&document, &buffers)
}

fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<Scene, ImportError> {
    let gltf_scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| ImportError::content("[SceneImporter] Model Import: file has no scene"))?;

    // glTF meshes hold several primitives; remember where each one landed
    let mut meshes = Vec::new();
    let mut primitive_ranges = Vec::with_capacity(document.meshes().count());
    for mesh in document.meshes() {
        let first = meshes.len();
        for primitive in mesh.primitives() {
            meshes.push(read_primitive(&primitive, buffers));
        }
        primitive_ranges.push(first..meshes.len());
    }

    let materials = document.materials().map(|m| read_material(&m)).collect();

    let mut root = SceneNode::new(gltf_scene.name().unwrap_or_default());
    let mut ancestors = Vec::new();
    for node in gltf_scene.nodes() {
        root.children.push(read_node(&node, &primitive_ranges, &mut ancestors)?);
    }

    info!(
        "Scene read: {} nodes / {} meshes / {} materials",
        root.count(),
        meshes.len(),
        document.materials().count()
    );

    Ok(Scene {
        root,
        meshes,
        materials,
    })
}

/// `ancestors` holds the indices of the nodes above `node`; a node reachable
/// from itself makes the file unusable.
fn read_node(
    node: &gltf::Node,
    primitive_ranges: &[std::ops::Range<usize>],
    ancestors: &mut Vec<usize>,
) -> Result<SceneNode, ImportError> {
    if ancestors.contains(&node.index()) {
        return Err(ImportError::content(format!(
            "[SceneImporter] Model Import: node {} is its own ancestor",
            node.index()
        )));
    }
    if ancestors.len() >= MAX_NODE_DEPTH {
        return Err(ImportError::content(format!(
            "[SceneImporter] Model Import: node hierarchy deeper than {MAX_NODE_DEPTH}"
        )));
    }

    let columns = node.transform().matrix();
    let flat: Vec<f32> = columns.iter().flatten().copied().collect();

    let meshes = node
        .mesh()
        .and_then(|mesh| primitive_ranges.get(mesh.index()).cloned())
        .map(|range| range.collect())
        .unwrap_or_default();

    ancestors.push(node.index());
    let children = node
        .children()
        .map(|child| read_node(&child, primitive_ranges, ancestors))
        .collect::<Result<Vec<_>, _>>();
    ancestors.pop();

    Ok(SceneNode {
        name: node.name().unwrap_or_default().to_string(),
        transform: glm::make_mat4(&flat),
        meshes,
        children: children?,
    })
}

fn read_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> SceneMesh {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<[f32; 3]> = reader
        .read_positions()
        .map(|iter| iter.collect())
        .unwrap_or_default();
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|iter| iter.collect())
        .unwrap_or_default();

    // w carries the handedness of the bitangent
    let mut tangents = Vec::new();
    let mut bitangents = Vec::new();
    if normals.len() == positions.len() {
        if let Some(iter) = reader.read_tangents() {
            for (t, n) in iter.zip(&normals) {
                let tangent = glm::vec3(t[0], t[1], t[2]);
                let bitangent = glm::cross(&glm::make_vec3(n), &tangent) * t[3];
                tangents.push([tangent.x, tangent.y, tangent.z]);
                bitangents.push([bitangent.x, bitangent.y, bitangent.z]);
            }
        }
    }

    let mut tex_coords = Vec::new();
    while let Some(iter) = reader.read_tex_coords(tex_coords.len() as u32) {
        tex_coords.push(iter.into_f32().collect());
    }

    let indices: Vec<u32> = match reader.read_indices() {
        Some(iter) => iter.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let faces = faces_for_mode(primitive.mode(), &indices);
    debug!(
        "Primitive {}: {} vertices, {} faces, mode {:?}",
        primitive.index(),
        positions.len(),
        faces.len(),
        primitive.mode()
    );

    SceneMesh {
        positions,
        normals,
        tangents,
        bitangents,
        tex_coords,
        faces,
        material: primitive.material().index(),
    }
}

/// Splits an index stream into faces the way the importer's triangulation
/// step would: strips and fans become triangles, lines stay two-index faces.
pub(crate) fn faces_for_mode(mode: Mode, indices: &[u32]) -> Vec<Face> {
    match mode {
        Mode::Points => indices.iter().map(|&i| Face { indices: vec![i] }).collect(),
        Mode::Lines => indices
            .chunks_exact(2)
            .map(|pair| Face {
                indices: pair.to_vec(),
            })
            .collect(),
        Mode::LineStrip | Mode::LineLoop => {
            let mut faces: Vec<Face> = indices
                .windows(2)
                .map(|pair| Face {
                    indices: pair.to_vec(),
                })
                .collect();
            if mode == Mode::LineLoop && indices.len() > 2 {
                faces.push(Face {
                    indices: vec![indices[indices.len() - 1], indices[0]],
                });
            }
            faces
        }
        Mode::Triangles => indices
            .chunks_exact(3)
            .map(|tri| Face::triangle(tri[0], tri[1], tri[2]))
            .collect(),
        Mode::TriangleStrip => indices
            .windows(3)
            .enumerate()
            .map(|(i, tri)| {
                // keep winding consistent on odd triangles
                if i % 2 == 0 {
                    Face::triangle(tri[0], tri[1], tri[2])
                } else {
                    Face::triangle(tri[1], tri[0], tri[2])
                }
            })
            .collect(),
        Mode::TriangleFan => {
            if indices.len() < 3 {
                return Vec::new();
            }
            indices[1..]
                .windows(2)
                .map(|pair| Face::triangle(indices[0], pair[0], pair[1]))
                .collect()
        }
    }
}

fn read_material(material: &gltf::Material) -> SceneMaterial {
    let mut textures = Vec::new();

    let pbr = material.pbr_metallic_roughness();
    if let Some(info) = pbr.base_color_texture() {
        push_texture(&mut textures, TextureSlot::Diffuse, &info.texture());
    }
    if let Some(info) = pbr.metallic_roughness_texture() {
        push_texture(&mut textures, TextureSlot::Specular, &info.texture());
    }
    if let Some(info) = material.emissive_texture() {
        push_texture(&mut textures, TextureSlot::Emissive, &info.texture());
    }
    if let Some(normal) = material.normal_texture() {
        push_texture(&mut textures, TextureSlot::Normals, &normal.texture());
    }

    SceneMaterial {
        name: material.name().unwrap_or_default().to_string(),
        textures,
    }
}

fn push_texture(out: &mut Vec<(TextureSlot, String)>, slot: TextureSlot, texture: &gltf::Texture) {
    let image = texture.source();
    let file = match image.source() {
        gltf::image::Source::Uri { uri, .. } => uri.to_string(),
        gltf::image::Source::View { .. } => match image.name() {
            Some(name) => name.to_string(),
            None => {
                warn!("Embedded texture {} has no name, ignored", image.index());
                return;
            }
        },
    };
    out.push((slot, file));
}
