mod neighbors;
mod spread;

pub use neighbors::neighbors;
pub use spread::{spread, SpreadConfig};
