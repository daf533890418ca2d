mod group;
mod place;

pub use group::*;
pub use place::*;
