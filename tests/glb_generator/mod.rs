//! Programmatic GLB generation for integration tests.
//!
//! Every generated file carries one indexed triangle mesh (mesh 0); callers
//! provide the node list that references it.

#![allow(dead_code)]

use serde_json::{Value, json};

pub const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]];
pub const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

/// GLB whose default scene lists `scene_nodes` out of `nodes`.
pub fn generate_glb(nodes: Value, scene_nodes: &[usize]) -> Vec<u8> {
    let mut buffer: Vec<u8> = Vec::new();
    buffer.extend_from_slice(bytemuck::cast_slice(&TRIANGLE));
    let index_offset = buffer.len();
    buffer.extend_from_slice(bytemuck::cast_slice(&TRIANGLE_INDICES));

    let root = json!({
        "asset": { "version": "2.0", "generator": "piecevis tests" },
        "scene": 0,
        "scenes": [{ "nodes": scene_nodes }],
        "nodes": nodes,
        "meshes": [{
            "name": "triangle",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "accessors": [
            {
                "bufferView": 0,
                "componentType": 5126,
                "count": TRIANGLE.len(),
                "type": "VEC3",
                "min": [0.0, 0.0, 0.0],
                "max": [1.0, 2.0, 0.0]
            },
            {
                "bufferView": 1,
                "componentType": 5125,
                "count": TRIANGLE_INDICES.len(),
                "type": "SCALAR"
            }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": index_offset, "target": 34962 },
            {
                "buffer": 0,
                "byteOffset": index_offset,
                "byteLength": buffer.len() - index_offset,
                "target": 34963
            }
        ],
        "buffers": [{ "byteLength": buffer.len() }]
    });

    assemble_glb(&root, &buffer)
}

/// Root node plus a "Body" child carrying the triangle.
pub fn body_glb() -> Vec<u8> {
    generate_glb(json!([{ "name": "Body", "mesh": 0 }]), &[0])
}

fn assemble_glb(root: &Value, buffer_data: &[u8]) -> Vec<u8> {
    let json_bytes = serde_json::to_vec(root).unwrap();

    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let buffer_chunk_length = buffer_data.len() + buffer_padding;
    let total_length = 12 + 8 + json_chunk_length + 8 + buffer_chunk_length;

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(&json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    glb.extend_from_slice(&(buffer_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, buffer_padding));

    glb
}
