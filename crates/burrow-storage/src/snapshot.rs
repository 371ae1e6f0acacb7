pub mod json_file;
pub mod memory;

pub use json_file::JsonFileSnapshotStore;
pub use memory::MemorySnapshotStore;
