use crate::meta::MetaTable;
use crate::model::Model;
use crate::scene::{Scene, TextureSlot};
use crate::settings::ImportSettings;
use log::debug;
use std::path::PathBuf;

/// Material slots consulted for `tex1`, later ones taking precedence.
const MATERIAL_TEXTURE_SLOTS: [TextureSlot; 3] =
    [TextureSlot::Specular, TextureSlot::Unknown, TextureSlot::Diffuse];

/// Finds the two model textures in the content tree.
///
/// Paths handed in and returned are relative to the content root and use
/// `/` as separator.
pub struct TextureResolver {
    content_root: PathBuf,
    texture_dir: String,
}

impl TextureResolver {
    pub fn new(settings: &ImportSettings) -> Self {
        Self {
            content_root: settings.content_root.clone(),
            texture_dir: settings.texture_dir.clone(),
        }
    }

    /// Fills `tex1`/`tex2` and the texture flags of `model`. Name-based
    /// guesses are overridden by the scene's first material, which is
    /// overridden by the document.
    pub fn resolve(
        &self,
        model: &mut Model,
        scene: &Scene,
        model_table: &MetaTable,
        model_dir: &str,
        model_name: &str,
    ) {
        let texture_dir = self.texture_dir.as_str();

        if model.tex1.is_empty() {
            model.tex1 = self.find_texture_by_prefix(texture_dir, model_name);
        }
        if model.tex1.is_empty() {
            model.tex1 = self.find_texture_by_prefix(texture_dir, &format!("{model_name}1"));
        }
        if model.tex2.is_empty() {
            model.tex2 = self.find_texture_by_prefix(texture_dir, &format!("{model_name}2"));
        }
        if model.tex1.is_empty() {
            model.tex1 = self.find_texture_by_prefix(model_dir, "tex1");
        }
        if model.tex2.is_empty() {
            model.tex2 = self.find_texture_by_prefix(model_dir, "tex2");
        }
        if model.tex1.is_empty() {
            model.tex1 = self.find_texture_by_prefix(model_dir, "diffuse");
        }
        if model.tex2.is_empty() {
            model.tex2 = self.find_texture_by_prefix(model_dir, "glow");
        }

        if let Some(material) = scene.materials.first() {
            for slot in MATERIAL_TEXTURE_SLOTS {
                if let Some(file) = material.texture(slot) {
                    model.tex1 = self.find_texture(file, model_dir, &model.tex1);
                }
            }
        }

        model.tex1 = self.find_texture(&model_table.get_string("tex1", ""), model_dir, &model.tex1);
        model.tex2 = self.find_texture(&model_table.get_string("tex2", ""), model_dir, &model.tex2);

        model.invert_tex_y_axis = model_table.get_bool("fliptextures", true);
        model.invert_tex_alpha = model_table.get_bool("invertteamcolor", true);
    }

    /// First existing location of `name`: as given, inside the texture
    /// directory, then next to the model. Otherwise `fallback`.
    pub fn find_texture(&self, name: &str, model_dir: &str, fallback: &str) -> String {
        if name.is_empty() {
            return fallback.to_string();
        }

        // Blender marks relative paths with a leading "//.."
        let name = name.strip_prefix("//..").unwrap_or(name).trim_start_matches('/');

        let candidates = [
            name.to_string(),
            join(&self.texture_dir, name),
            join(model_dir, name),
        ];
        for candidate in candidates {
            if self.content_root.join(&candidate).is_file() {
                debug!("Texture '{}' found as '{}'", name, candidate);
                return candidate;
            }
        }

        fallback.to_string()
    }

    /// Case-insensitive prefix search in `dir`; first match in name order.
    pub fn find_texture_by_prefix(&self, dir: &str, prefix: &str) -> String {
        let Ok(entries) = std::fs::read_dir(self.content_root.join(dir)) else {
            return String::new();
        };

        let prefix = prefix.to_lowercase();
        let mut matches: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect();
        matches.sort();

        match matches.first() {
            Some(file) => self.find_texture(file, dir, ""),
            None => String::new(),
        }
    }
}

fn join(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}
