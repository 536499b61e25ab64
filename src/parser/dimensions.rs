use super::SentinelValues;
use crate::math;
use crate::meta::MetaTable;
use crate::model::{CollisionVolume, Model, PieceId};
use log::error;
use nalgebra_glm as glm;

/// Global offsets, model extents and collision volumes, parents first.
///
/// The extents combine each piece's global offset with its untransformed
/// local bounds, so rotated or scaled pieces are only approximated.
pub(crate) fn calculate_model_dimensions(model: &mut Model) {
    for (id, _) in model.walk() {
        let parent_goffset = model
            .piece(id)
            .parent
            .map(|p| model.piece(p).goffset)
            .unwrap_or_else(glm::Vec3::zeros);

        let piece = model.piece_mut(id);
        let scale_rot = piece.scale_rot_matrix();
        piece.goffset = math::transform_point(&scale_rot, &piece.offset) + parent_goffset;
        piece.collision_volume = Some(CollisionVolume::new_box(
            piece.maxs - piece.mins,
            (piece.maxs + piece.mins) * 0.5,
        ));

        let (gmins, gmaxs) = (piece.goffset + piece.mins, piece.goffset + piece.maxs);
        model.mins = glm::min2(&model.mins, &gmins);
        model.maxs = glm::max2(&model.maxs, &gmaxs);
    }
}

/// Final model-wide values: computed from the extents unless a sentinel
/// node or the override document provides them.
pub(crate) fn calculate_model_properties(
    model: &mut Model,
    model_table: &MetaTable,
    sentinels: &SentinelValues,
) {
    if model.root.is_some() {
        calculate_model_dimensions(model);
    } else {
        error!("Model '{}' has no root piece", model.name);
        model.mins = glm::Vec3::zeros();
        model.maxs = glm::Vec3::zeros();
    }

    // replaces the vertical midpos a SpringRadius node may have set
    model.rel_mid_pos.y = (model.maxs.y + model.mins.y) * 0.5;

    let extent_radius = glm::length(&glm::max2(&glm::abs(&model.maxs), &glm::abs(&model.mins)));
    model.radius = model_table.get_float("radius", sentinels.radius.unwrap_or(extent_radius));
    model.height = model_table.get_float("height", sentinels.height.unwrap_or(model.maxs.y));
    model.rel_mid_pos = model_table.get_float3("midpos", model.rel_mid_pos);
    model.mins = model_table.get_float3("mins", model.mins);
    model.maxs = model_table.get_float3("maxs", model.maxs);

    model.draw_radius = model.radius;
}
