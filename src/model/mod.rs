mod collision;
mod model;
mod piece;

pub use collision::*;
pub use model::*;
pub use piece::*;
