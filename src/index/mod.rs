pub mod memory;
pub mod sqlite;
pub mod store;

pub use memory::MemoryIndex;
pub use sqlite::SqliteIndex;
pub use store::{Chunk, SearchHit, VectorIndex};
