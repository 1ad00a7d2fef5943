mod embedder;
mod llm;
mod store;
mod vector_index;

pub use embedder::Embedder;
pub use llm::{CompletionOptions, Llm};
pub use store::{NeighborHit, Store};
pub use vector_index::VectorIndex;
