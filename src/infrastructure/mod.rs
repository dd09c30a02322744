// Infrastructure adapters for ThrowTrace.

pub mod concurrency;
pub mod export;
pub mod project_loader;
pub mod snapshot;

pub use export::{JsonChainExporter, TextChainExporter};
pub use project_loader::{ClassDoc, ClassDocAdapter, ProjectDoc, ProjectLoader};
pub use snapshot::SledSnapshotStore;
