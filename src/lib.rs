pub mod backend;
pub mod directions;
pub mod entry;
pub mod map;
pub mod polyline;
pub mod shared;
pub mod trip;
