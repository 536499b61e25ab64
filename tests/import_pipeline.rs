//! Full imports: scene graph plus override document to piece hierarchy.

mod glb_generator;

use nalgebra_glm as glm;
use piecevis::meta::{MetaDocument, MetaTable};
use piecevis::scene::{Face, Scene, SceneMesh, SceneNode};
use piecevis::settings::ImportSettings;
use piecevis::{Model, build_model, load};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cube_mesh(half: f32) -> SceneMesh {
    let mut positions = Vec::new();
    for &x in &[-half, half] {
        for &y in &[0.0, 2.0 * half] {
            for &z in &[-half, half] {
                positions.push([x, y, z]);
            }
        }
    }
    SceneMesh {
        positions,
        faces: vec![Face::triangle(0, 1, 2), Face::triangle(5, 6, 7)],
        ..Default::default()
    }
}

/// base -> turret -> barrel, plus a SpringRadius marker under the root.
fn tank_scene() -> Scene {
    let barrel = SceneNode::new("barrel")
        .with_translation(glm::vec3(0.0, 0.5, 2.0))
        .with_mesh(1);
    let turret = SceneNode::new("turret")
        .with_translation(glm::vec3(0.0, 2.0, 0.0))
        .with_mesh(1)
        .with_child(barrel);
    let base = SceneNode::new("base").with_mesh(0).with_child(turret);
    let marker = SceneNode::new("SpringRadius")
        .with_transform(glm::scale(&glm::identity(), &glm::vec3(9.0, 9.0, 9.0)));

    Scene {
        root: SceneNode::new("tank").with_child(base).with_child(marker),
        meshes: vec![cube_mesh(2.0), cube_mesh(0.5)],
        materials: Vec::new(),
    }
}

fn doc(text: &str) -> MetaDocument {
    MetaDocument::parse(text, Path::new("tank.json")).unwrap()
}

fn reachable(model: &Model) -> usize {
    model.walk().len()
}

#[test]
fn single_root_and_every_piece_reachable() {
    let model = build_model("tank", &tank_scene(), &MetaTable::empty());

    let roots: Vec<_> = model.pieces().filter(|(_, p)| p.parent.is_none()).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(Some(roots[0].0), model.root);

    assert_eq!(model.num_pieces, 4);
    assert_eq!(model.piece_map.len(), 4);
    assert_eq!(reachable(&model), 4);
    for (name, &id) in &model.piece_map {
        assert_eq!(&model.piece(id).name, name);
    }
}

#[test]
fn sentinel_radius_is_folded_into_the_model() {
    let model = build_model("tank", &tank_scene(), &MetaTable::empty());

    assert!(model.find_piece("SpringRadius").is_none());
    assert!((model.radius - 9.0).abs() < 1e-5);
    assert_eq!(model.draw_radius, model.radius);
    // vertical midpos always comes from the extents
    assert_eq!(model.rel_mid_pos.y, (model.maxs.y + model.mins.y) * 0.5);
}

#[test]
fn bounds_contain_every_piece() {
    let model = build_model("tank", &tank_scene(), &MetaTable::empty());

    for (id, _) in model.walk() {
        let piece = model.piece(id);
        let (gmins, gmaxs) = (piece.goffset + piece.mins, piece.goffset + piece.maxs);
        for axis in 0..3 {
            assert!(model.mins[axis] <= gmins[axis]);
            assert!(model.maxs[axis] >= gmaxs[axis]);
        }
        assert!(piece.collision_volume.is_some());
    }

    let barrel = model.find_piece("barrel").unwrap();
    assert_eq!(barrel.goffset, glm::vec3(0.0, 2.5, 2.0));
    assert_eq!(model.maxs.y, 4.0);
    assert_eq!(model.maxs.z, 2.5);
    assert_eq!(model.mins.y, 0.0);
    assert_eq!(model.height, 4.0);
}

#[test]
fn document_overrides_take_precedence() {
    let overrides = doc(
        r#"{
            "radius": 30,
            "height": 7,
            "pieces": {
                "turret": { "offset": [0, 4, 0], "scale": [1, 3, 5] },
                "barrel": { "parent": "base", "offsety": 1 }
            }
        }"#,
    );
    let model = build_model("tank", &tank_scene(), &overrides.root());

    assert_eq!(model.radius, 30.0);
    assert_eq!(model.height, 7.0);

    let turret = model.find_piece("turret").unwrap();
    assert_eq!(turret.offset, glm::vec3(0.0, 4.0, 0.0));
    // isotropic: every axis takes the x scale
    assert_eq!(turret.scales(), glm::vec3(1.0, 1.0, 1.0));
    assert!(turret.children.is_empty());

    let base = model.find_piece("base").unwrap();
    assert_eq!(model.piece_names(&base.children), vec!["turret", "barrel"]);
    let barrel = model.find_piece("barrel").unwrap();
    assert_eq!(barrel.offset, glm::vec3(0.0, 1.0, 2.0));
    assert_eq!(reachable(&model), 4);
}

#[test]
fn unknown_parent_leaves_an_orphan() {
    let overrides = doc(r#"{"pieces": {"barrel": {"parent": "nowhere"}}}"#);
    let model = build_model("tank", &tank_scene(), &overrides.root());

    let barrel_id = model.find_piece_id("barrel").unwrap();
    assert!(model.piece(barrel_id).parent.is_none());
    assert!(!model.is_root(barrel_id));
    assert!(model.find_piece("turret").unwrap().children.is_empty());

    // still counted and named, but outside the tree and its bounds
    assert_eq!(model.num_pieces, 4);
    assert_eq!(reachable(&model), 3);
    assert!(model.piece(barrel_id).collision_volume.is_none());
    assert_eq!(model.maxs.z, 2.0);
}

#[test]
fn renamed_parent_keeps_children_on_the_native_name() {
    let scene = Scene {
        root: SceneNode::new("tank")
            .with_child(SceneNode::new("wheel").with_mesh(0))
            .with_child(SceneNode::new("wheel").with_child(SceneNode::new("hub"))),
        meshes: vec![cube_mesh(1.0)],
        materials: Vec::new(),
    };
    let model = build_model("tank", &scene, &MetaTable::empty());

    let wheel = model.find_piece_id("wheel").unwrap();
    let hub = model.find_piece_id("hub").unwrap();
    assert_eq!(model.piece(hub).parent, Some(wheel));
    assert!(model.find_piece("wheel00").unwrap().children.is_empty());
    assert_eq!(reachable(&model), 4);
}

#[test]
fn load_reads_model_document_and_textures() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("objects3d")).unwrap();
    fs::create_dir_all(dir.path().join("unittextures")).unwrap();
    fs::write(dir.path().join("objects3d/tank.glb"), glb_generator::body_glb()).unwrap();
    fs::write(
        dir.path().join("objects3d/tank.json"),
        r#"{"radius": 7, "pieces": {"Body": {"offset": [0, 2, 0]}}}"#,
    )
    .unwrap();
    fs::write(dir.path().join("unittextures/tank_color.dds"), b"").unwrap();
    fs::write(dir.path().join("objects3d/glow.png"), b"").unwrap();

    let settings = ImportSettings::default().with_content_root(dir.path());
    let model = load(Path::new("objects3d/tank.glb"), &settings).unwrap();

    assert_eq!(model.name, "objects3d/tank.glb");
    assert_eq!(model.radius, 7.0);
    assert_eq!(model.find_piece("Body").unwrap().offset, glm::vec3(0.0, 2.0, 0.0));
    assert_eq!(model.height, 4.0);
    assert_eq!(model.tex1, "unittextures/tank_color.dds");
    assert_eq!(model.tex2, "objects3d/glow.png");
}

#[test]
fn load_without_document_uses_defaults() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("body.glb"), glb_generator::body_glb()).unwrap();

    let settings = ImportSettings::default().with_content_root(dir.path());
    let model = load(Path::new("body.glb"), &settings).unwrap();

    assert_eq!(model.num_pieces, 2);
    assert!(model.tex1.is_empty());
    assert!(model.invert_tex_y_axis);
    assert!(model.invert_tex_alpha);
}

#[test]
fn unreadable_scene_is_fatal() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.glb"), b"glTF but not really").unwrap();
    let settings = ImportSettings::default().with_content_root(dir.path());

    let err = load(Path::new("broken.glb"), &settings).unwrap_err();
    assert!(err.is_content_error());

    let err = load(Path::new("missing.glb"), &settings).unwrap_err();
    assert!(err.is_content_error());
    assert!(err.arg("path").is_some());
}
