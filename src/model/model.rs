use crate::math;
use crate::model::piece::{Piece, PieceId};
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Built from an imported scene graph.
    Scene,
}

/// A piece hierarchy plus the model-wide values derived from it.
///
/// Pieces live in an arena; `children` are the owning edges of the tree and
/// `parent` points back up without owning anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub model_type: ModelType,
    pub num_pieces: usize,

    pieces: Vec<Piece>,
    pub piece_map: HashMap<String, PieceId>,
    pub root: Option<PieceId>,

    pub mins: glm::Vec3,
    pub maxs: glm::Vec3,
    pub radius: f32,
    pub height: f32,
    pub rel_mid_pos: glm::Vec3,
    pub draw_radius: f32,

    pub tex1: String,
    pub tex2: String,
    pub invert_tex_y_axis: bool,
    pub invert_tex_alpha: bool,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            name: String::new(),
            model_type: ModelType::Scene,
            num_pieces: 0,
            pieces: Vec::new(),
            piece_map: HashMap::new(),
            root: None,
            mins: math::def_mins(),
            maxs: math::def_maxs(),
            radius: 0.0,
            height: 0.0,
            rel_mid_pos: glm::Vec3::zeros(),
            draw_radius: 0.0,
            tex1: String::new(),
            tex2: String::new(),
            invert_tex_y_axis: true,
            invert_tex_alpha: true,
        }
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Moves `piece` into the model under its (already unique) name.
    pub(crate) fn add_piece(&mut self, piece: Piece) -> PieceId {
        let id = PieceId(self.pieces.len());
        debug_assert!(!self.piece_map.contains_key(&piece.name));
        self.piece_map.insert(piece.name.clone(), id);
        self.pieces.push(piece);
        id
    }

    /// Makes `child` the last child of `parent`.
    pub(crate) fn link(&mut self, child: PieceId, parent: PieceId) {
        self.pieces[child.0].parent = Some(parent);
        self.pieces[parent.0].children.push(child);
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.0]
    }

    pub fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.0]
    }

    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, &Piece)> {
        self.pieces.iter().enumerate().map(|(i, p)| (PieceId(i), p))
    }

    /// True only for the model's root; orphans also have no parent.
    pub fn is_root(&self, id: PieceId) -> bool {
        self.root == Some(id)
    }

    pub fn root_piece(&self) -> Option<&Piece> {
        self.root.map(|id| self.piece(id))
    }

    pub fn find_piece_id(&self, name: &str) -> Option<PieceId> {
        self.piece_map.get(name).copied()
    }

    pub fn find_piece(&self, name: &str) -> Option<&Piece> {
        self.find_piece_id(name).map(|id| self.piece(id))
    }

    /// Pre-order walk from the root, children in stored order, with depth.
    /// Pieces that are not linked below the root are not visited.
    pub fn walk(&self) -> Vec<(PieceId, usize)> {
        let mut order = Vec::with_capacity(self.pieces.len());
        let mut stack: Vec<(PieceId, usize)> = self.root.map(|r| (r, 0)).into_iter().collect();

        while let Some((id, depth)) = stack.pop() {
            order.push((id, depth));
            for &child in self.piece(id).children.iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        order
    }

    pub fn piece_names(&self, ids: &[PieceId]) -> Vec<&str> {
        ids.iter().map(|&id| self.piece(id).name.as_str()).collect()
    }
}
