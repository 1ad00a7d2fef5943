mod base;
mod edge;
mod entity;
mod salience;
mod types;

pub use base::Memory;
pub use edge::Edge;
pub use entity::Entity;
pub use salience::Salience;
pub use types::{EdgeKind, MemoryStatus, MemoryType, Source};
