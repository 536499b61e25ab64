use anyhow::{Context, bail};
use piecevis::Model;
use piecevis::settings::Settings;
use std::path::PathBuf;

struct Args {
    model_path: PathBuf,
    content_root: Option<PathBuf>,
    json: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut model_path = None;
    let mut content_root = None;
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--root" => {
                let root = args.next().context("--root expects a directory")?;
                content_root = Some(PathBuf::from(root));
            }
            _ if model_path.is_none() => model_path = Some(PathBuf::from(arg)),
            _ => bail!("Unexpected argument '{}'", arg),
        }
    }

    let Some(model_path) = model_path else {
        bail!("Usage: piecevis-rs [--root <content dir>] [--json] <model>");
    };
    Ok(Args {
        model_path,
        content_root,
        json,
    })
}

fn print_piece_tree(model: &Model) {
    println!(
        "{}: {} pieces, radius {:.3}, height {:.3}",
        model.name, model.num_pieces, model.radius, model.height
    );
    println!(
        "  mins {:?} maxs {:?} midpos {:?}",
        model.mins.as_slice(),
        model.maxs.as_slice(),
        model.rel_mid_pos.as_slice()
    );
    println!("  tex1 '{}' tex2 '{}'", model.tex1, model.tex2);

    for (id, depth) in model.walk() {
        let piece = model.piece(id);
        println!(
            "{}{} verts={} tris={} offset={:?} ({} / {} bytes)",
            "  ".repeat(depth + 1),
            piece.name,
            piece.vertices.len(),
            piece.vertex_draw_indices.len() / 3,
            piece.offset.as_slice(),
            piece.vertex_bytes().len(),
            piece.index_bytes().len()
        );
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let mut settings = Settings::load();
    if let Some(root) = args.content_root {
        settings.import = settings.import.with_content_root(root);
    }

    let model = piecevis::load(&args.model_path, &settings.import)
        .with_context(|| format!("Failed to load model '{}'", args.model_path.display()))?;

    if settings.output.show_piece_tree {
        print_piece_tree(&model);
    }

    if args.json || settings.output.dump_json {
        let text = if settings.output.pretty_json {
            serde_json::to_string_pretty(&model)?
        } else {
            serde_json::to_string(&model)?
        };
        println!("{}", text);
    }

    Ok(())
}
