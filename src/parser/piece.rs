use super::{BuildContext, geometry};
use crate::math;
use crate::meta::MetaTable;
use crate::model::{AxisMapping, Model, Piece, PieceId};
use crate::scene::SceneNode;
use log::{debug, info, warn};
use nalgebra_glm as glm;

pub(crate) const ROOT_PIECE_NAME: &str = "$$root$$";
pub(crate) const UNNAMED_PIECE_NAME: &str = "$$piece$$";

pub(crate) const SPRING_HEIGHT: &str = "SpringHeight";
pub(crate) const SPRING_RADIUS: &str = "SpringRadius";

/// Converts `node` and, recursively, its children. Returns `None` when the
/// node was a sentinel and produced no piece.
///
/// `parent` is the name children record for their parent: the root piece's
/// name below the scene root, the parent node's own name further down. It
/// can differ from the parent's piece name when that one was made unique.
/// `None` marks the scene root.
pub(crate) fn load_piece(
    model: &mut Model,
    ctx: &mut BuildContext,
    node: &SceneNode,
    parent: Option<&str>,
) -> Option<PieceId> {
    model.num_pieces += 1;
    let is_root = parent.is_none();

    let name = resolve_piece_name(model, &node.name, is_root);
    info!(
        "Converting node '{}' to piece '{}' ({} meshes).",
        node.name,
        name,
        node.meshes.len()
    );

    let piece_table = ctx.model_table.sub_table("pieces").sub_table(&name);
    if piece_table.is_valid() {
        info!("Found metadata for piece '{}'", name);
    }

    let mut piece = Piece::new(name);
    load_piece_transformations(&mut piece, model.num_pieces, is_root, node, &piece_table);

    // the root always stays a real piece
    if !is_root && set_model_radius_and_height(model, ctx, &piece, &piece_table) {
        if !node.children.is_empty() {
            warn!(
                "Sentinel node '{}' has {} children; they are ignored",
                piece.name,
                node.children.len()
            );
        }
        return None;
    }

    geometry::load_piece_geometry(&mut piece, node, ctx.scene);
    set_piece_parent_name(&mut piece, parent, &piece_table);

    info!(
        "Loaded model piece: {} with {} meshes",
        piece.name,
        node.meshes.len()
    );
    debug!("piece->name: {}", piece.name);
    debug!("piece->parent: {}", piece.parent_name);

    let id = model.add_piece(piece);
    if is_root {
        model.root = Some(id);
    }

    let child_parent = if is_root {
        model.piece(id).name.clone()
    } else {
        node.name.clone()
    };
    for child in &node.children {
        load_piece(model, ctx, child, Some(&child_parent));
    }

    Some(id)
}

/// Native name, or a placeholder when empty, made unique by appending a
/// two-digit counter.
pub(crate) fn resolve_piece_name(model: &Model, native: &str, is_root: bool) -> String {
    let base = if native.is_empty() {
        if is_root {
            // the root is created first, nothing can clash with it
            return ROOT_PIECE_NAME.to_string();
        }
        UNNAMED_PIECE_NAME
    } else {
        native
    };

    if !model.piece_map.contains_key(base) {
        return base.to_string();
    }

    let mut i = 0u32;
    loop {
        let candidate = format!("{base}{i:02}");
        if !model.piece_map.contains_key(&candidate) {
            return candidate;
        }
        i += 1;
    }
}

fn load_piece_transformations(
    piece: &mut Piece,
    num_pieces: usize,
    is_root: bool,
    node: &SceneNode,
    piece_table: &MetaTable,
) {
    let (scale, rotation, translation) = math::decompose(&node.transform);

    // imported value < vector key < per-axis key
    let mut scales = piece_table.get_float3("scale", scale);
    scales.x = piece_table.get_float("scalex", scales.x);
    scales.y = piece_table.get_float("scaley", scales.y);
    scales.z = piece_table.get_float("scalez", scales.z);
    piece.set_scales(scales);

    let mut offset = piece_table.get_float3("offset", translation);
    offset.x = piece_table.get_float("offsetx", offset.x);
    offset.y = piece_table.get_float("offsety", offset.y);
    offset.z = piece_table.get_float("offsetz", offset.z);
    piece.offset = offset;

    // pose rotation on top of the modelled one, in degrees
    let mut rot_angles = piece_table.get_float3("rotate", glm::Vec3::zeros());
    rot_angles.x = piece_table.get_float("rotatex", rot_angles.x);
    rot_angles.y = piece_table.get_float("rotatey", rot_angles.y);
    rot_angles.z = piece_table.get_float("rotatez", rot_angles.z);
    piece.rot_angles = glm::radians(&rot_angles);

    debug!(
        "({}:{}) Imported offset ({},{},{}), rotate ({},{},{},{}), scale ({},{},{})",
        num_pieces,
        piece.name,
        translation.x,
        translation.y,
        translation.z,
        rotation.w,
        rotation.i,
        rotation.j,
        rotation.k,
        scale.x,
        scale.y,
        scale.z
    );
    debug!(
        "({}:{}) Relative offset ({},{},{}), rotate ({},{},{}), scale ({},{},{})",
        num_pieces,
        piece.name,
        piece.offset.x,
        piece.offset.y,
        piece.offset.z,
        piece.rot_angles.x,
        piece.rot_angles.y,
        piece.rot_angles.z,
        piece.scales().x,
        piece.scales().y,
        piece.scales().z
    );

    piece.baked_rot_matrix = glm::quat_to_mat4(&rotation);

    // Lets the root basis be replaced when the exporter's axes disagree
    // with ours. Only accepted if the three axes have the same length.
    if is_root {
        let xaxis = piece_table.get_float3("xaxis", math::axis(&piece.baked_rot_matrix, 0));
        let yaxis = piece_table.get_float3("yaxis", math::axis(&piece.baked_rot_matrix, 1));
        let zaxis = piece_table.get_float3("zaxis", math::axis(&piece.baked_rot_matrix, 2));

        let (x2, y2, z2) = (
            glm::length2(&xaxis),
            glm::length2(&yaxis),
            glm::length2(&zaxis),
        );
        if (x2 - y2).abs() < 0.01 && (y2 - z2).abs() < 0.01 {
            piece.baked_rot_matrix = math::from_axes(&xaxis, &yaxis, &zaxis);
        } else {
            warn!(
                "Root axes of '{}' differ in length, keeping the imported rotation",
                piece.name
            );
        }
    }

    piece.rot_axis_signs = piece_table.get_float3("rotAxisSigns", glm::vec3(-1.0, -1.0, -1.0));

    let axis_map = piece_table.get_int("rotAxisMap", AxisMapping::Xyz as i32);
    piece.axis_map_type = match AxisMapping::from_int(axis_map) {
        Some(mapping) => mapping,
        None => {
            warn!("Piece '{}': unknown rotAxisMap {}", piece.name, axis_map);
            AxisMapping::Xyz
        }
    };
    if !piece.axis_map_type.is_supported() {
        warn!(
            "Piece '{}': rotAxisMap {:?} has no rotation order, using XYZ",
            piece.name, piece.axis_map_type
        );
    }

    // R(baked) * R(pose); translation and scale stay in offset and scales
    piece.baked_rot_matrix = piece.compose_rotation(&piece.baked_rot_matrix, &piece.rot_angles);
    piece.has_identity_rotation = math::is_identity(&piece.baked_rot_matrix);
}

/// Folds a sentinel piece into the model. Returns true if `piece` was one and
/// must be dropped.
fn set_model_radius_and_height(
    model: &mut Model,
    ctx: &mut BuildContext,
    piece: &Piece,
    piece_table: &MetaTable,
) -> bool {
    match piece.name.as_str() {
        SPRING_HEIGHT => {
            // the node's Y value is the height
            if !piece_table.exists("height") {
                model.height = piece.offset.y;
                ctx.sentinels.height = Some(model.height);
                info!(
                    "Model height of {} set by special node '{}'",
                    model.height, SPRING_HEIGHT
                );
            }
        }
        SPRING_RADIUS => {
            if !piece_table.exists("midpos") {
                model.rel_mid_pos = math::transform_point(&piece.scale_rot_matrix(), &piece.offset);
                info!(
                    "Model midpos of ({},{},{}) set by special node '{}'",
                    model.rel_mid_pos.x, model.rel_mid_pos.y, model.rel_mid_pos.z, SPRING_RADIUS
                );
            }
            if !piece_table.exists("radius") {
                model.radius = piece.scales().x;
                ctx.sentinels.radius = Some(model.radius);
                info!(
                    "Model radius of {} set by special node '{}'",
                    model.radius, SPRING_RADIUS
                );
            }
        }
        _ => return false,
    }

    model.num_pieces -= 1;
    true
}

fn set_piece_parent_name(piece: &mut Piece, parent: Option<&str>, piece_table: &MetaTable) {
    if piece_table.exists("parent") {
        piece.parent_name = piece_table.get_string("parent", "");
    } else if let Some(parent) = parent {
        piece.parent_name = parent.to_string();
    }
}
