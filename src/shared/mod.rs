pub mod geo;
pub mod text;

pub use geo::*;
pub use text::*;
