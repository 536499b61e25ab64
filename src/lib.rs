pub mod error;
pub mod math;
pub mod meta;
pub mod model;
pub mod parser;
pub mod scene;
pub mod settings;
pub mod texture;

pub const CONFY_APP_NAME: &str = "piecevis-rs";

pub use error::ImportError;
pub use model::{Model, Piece, PieceId};
pub use parser::{build_model, load};
