//! tallysheet-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{ActionRecord, Document, UndoEntry};
pub use error::{Result, TallyError};

pub use tallysheet_engine::engine::{Cell, Location, Range};
