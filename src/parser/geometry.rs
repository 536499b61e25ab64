use crate::model::{NUM_MODEL_UVCHANNS, Piece, PieceVertex};
use crate::scene::{Scene, SceneNode};
use log::{debug, warn};
use nalgebra_glm as glm;

/// Appends the vertices and triangles of every mesh of `node` to `piece`.
///
/// Each mesh's local vertex indices are remapped onto the piece's combined
/// vertex list. Faces that are not triangles are dropped.
pub(crate) fn load_piece_geometry(piece: &mut Piece, node: &SceneNode, scene: &Scene) {
    for &mesh_index in &node.meshes {
        let Some(mesh) = scene.meshes.get(mesh_index) else {
            warn!(
                "Piece '{}' references missing mesh {} (scene has {})",
                piece.name,
                mesh_index,
                scene.meshes.len()
            );
            continue;
        };

        debug!("Fetching mesh {} from scene", mesh_index);
        debug!(
            "Processing vertices for mesh {} ({} vertices)",
            mesh_index,
            mesh.num_vertices()
        );
        debug!(
            "Normals: {} Tangents/Bitangents: {} TexCoords: {}",
            if mesh.has_normals() { "Y" } else { "N" },
            if mesh.has_tangents_and_bitangents() { "Y" } else { "N" },
            if mesh.has_texture_coords(0) { "Y" } else { "N" }
        );

        piece.vertices.reserve(mesh.num_vertices());
        piece.vertex_draw_indices.reserve(mesh.faces.len() * 3);

        let mut mesh_vertex_mapping = Vec::with_capacity(mesh.num_vertices());

        for (vertex_index, pos) in mesh.positions.iter().enumerate() {
            let mut vertex = PieceVertex {
                pos: *pos,
                ..Default::default()
            };

            // extents over raw, untransformed positions
            let p = glm::make_vec3(pos);
            piece.mins = glm::min2(&piece.mins, &p);
            piece.maxs = glm::max2(&piece.maxs, &p);

            if let Some(normal) = mesh.normals.get(vertex_index) {
                if !normal.iter().any(|c| c.is_nan()) {
                    vertex.normal = *normal;
                }
            }

            if mesh.has_tangents_and_bitangents() {
                if let (Some(s), Some(t)) = (
                    mesh.tangents.get(vertex_index),
                    mesh.bitangents.get(vertex_index),
                ) {
                    vertex.s_tangent = *s;
                    vertex.t_tangent = *t;
                }
            }

            for channel in 0..NUM_MODEL_UVCHANNS {
                if !mesh.has_texture_coords(channel) {
                    break;
                }
                piece.set_num_tex_coord_channels(channel + 1);
                if let Some(uv) = mesh.tex_coords[channel].get(vertex_index) {
                    vertex.tex_coords[channel] = *uv;
                }
            }

            mesh_vertex_mapping.push(piece.vertices.len() as u32);
            piece.vertices.push(vertex);
        }

        debug!(
            "Processing faces for mesh {} ({} faces)",
            mesh_index,
            mesh.faces.len()
        );

        for face in &mesh.faces {
            // lines and points cannot be drawn as part of the triangle list
            if !face.is_triangle() {
                continue;
            }

            let mapped: Option<Vec<u32>> = face
                .indices
                .iter()
                .map(|&i| mesh_vertex_mapping.get(i as usize).copied())
                .collect();
            match mapped {
                Some(indices) => piece.vertex_draw_indices.extend(indices),
                None => warn!(
                    "Mesh {} has a face {:?} outside its {} vertices, skipped",
                    mesh_index,
                    face.indices,
                    mesh.num_vertices()
                ),
            }
        }
    }

    piece.has_geometry_data = !piece.vertices.is_empty();
    if !piece.has_geometry_data {
        piece.mins = glm::Vec3::zeros();
        piece.maxs = glm::Vec3::zeros();
    }
}
