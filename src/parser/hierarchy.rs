use crate::model::{Model, PieceId};
use log::error;

/// Links every non-root piece to the piece named by its `parent_name`.
///
/// Override documents may re-parent pieces arbitrarily, so this can only run
/// once every piece exists. A piece that names no parent goes under the root;
/// one whose named parent is missing stays an orphan. Declared parent cycles
/// are not detected.
pub(crate) fn build_piece_hierarchy(model: &mut Model) {
    let ids: Vec<PieceId> = model.pieces().map(|(id, _)| id).collect();

    for id in ids {
        if model.is_root(id) {
            debug_assert!(model.piece(id).parent.is_none());
            continue;
        }

        let parent_name = &model.piece(id).parent_name;
        if !parent_name.is_empty() {
            match model.find_piece_id(parent_name) {
                Some(parent) => model.link(id, parent),
                None => error!(
                    "Missing piece '{}' declared as parent of '{}'.",
                    parent_name,
                    model.piece(id).name
                ),
            }
            continue;
        }

        // orphan that isn't the root
        match model.root {
            Some(root) => model.link(id, root),
            None => error!("Missing root piece"),
        }
    }
}
