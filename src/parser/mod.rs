//! Scene graph to piece hierarchy.
//!
//! Three strictly ordered passes: every node becomes a piece (or folds into a
//! model property), pieces are linked by parent name, then offsets and bounds
//! are computed top-down.

mod dimensions;
mod geometry;
mod hierarchy;
mod piece;

use crate::error::ImportError;
use crate::meta::{MetaDocument, MetaTable};
use crate::model::Model;
use crate::scene::{self, Scene};
use crate::settings::ImportSettings;
use crate::texture::TextureResolver;
use log::{debug, info};
use std::path::Path;

/// Values set by sentinel nodes. They serve as defaults when the model's
/// final dimensions are computed.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SentinelValues {
    pub height: Option<f32>,
    pub radius: Option<f32>,
}

pub(crate) struct BuildContext<'a> {
    pub scene: &'a Scene,
    pub model_table: MetaTable<'a>,
    pub sentinels: SentinelValues,
}

/// Builds the piece hierarchy of `scene`. Never fails: bad override data and
/// unusable geometry are logged and replaced by defaults.
pub fn build_model(name: &str, scene: &Scene, model_table: &MetaTable) -> Model {
    let mut model = Model::new(name);
    let mut ctx = BuildContext {
        scene,
        model_table: *model_table,
        sentinels: SentinelValues::default(),
    };

    info!("Loading pieces from root node '{}'", scene.root.name);
    piece::load_piece(&mut model, &mut ctx, &scene.root, None);

    hierarchy::build_piece_hierarchy(&mut model);
    dimensions::calculate_model_properties(&mut model, model_table, &ctx.sentinels);

    debug!("model->name: {}", model.name);
    debug!("model->numobjects: {}", model.num_pieces);
    debug!("model->radius: {}", model.radius);
    debug!("model->height: {}", model.height);
    debug!("model->drawRadius: {}", model.draw_radius);
    debug!("model->mins: {:?}", model.mins.as_slice());
    debug!("model->maxs: {:?}", model.maxs.as_slice());
    model
}

/// Imports the scene file at `path` (relative to the content root) together
/// with its override document and textures.
///
/// Only an unreadable scene is an error.
pub fn load(path: &Path, settings: &ImportSettings) -> Result<Model, ImportError> {
    info!("Loading model: {}", path.display());

    let full_path = settings.content_root.join(path);
    let meta = MetaDocument::load_for_model(&full_path, &settings.meta_extension);
    let model_table = meta.root();

    info!("Importing model file: {}", full_path.display());
    let scene = scene::gltf::load(&full_path)?;
    info!(
        "Processing scene for model: {} ({} meshes / {} materials)",
        path.display(),
        scene.meshes.len(),
        scene.materials.len()
    );

    let name = path.to_string_lossy().replace('\\', "/");
    let mut model = build_model(&name, &scene, &model_table);

    let model_dir = path
        .parent()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default();
    let model_name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    TextureResolver::new(settings).resolve(&mut model, &scene, &model_table, &model_dir, &model_name);
    info!(
        "Loading textures. Tex1: '{}' Tex2: '{}'",
        model.tex1, model.tex2
    );

    info!("Model {} Imported.", model.name);
    Ok(model)
}
