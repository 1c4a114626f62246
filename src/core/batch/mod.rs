//! Batch processing of submission documents
//!
//! Documents are discovered from files and directories, selected by index,
//! and analyzed strictly one after another with an optional minimum cycle time
//! per document.

mod discovery;
mod runner;


// Re-export all public types
pub use discovery::{DOCUMENT_EXTENSION, discover_documents, document_name, select_documents};
pub use runner::{BatchRunner, BatchSummary, DocumentResult};
