//! # Card Corrector
//!
//! Spelling and grammar correction for flashcard note fields, backed by an
//! OpenAI-compatible chat completion API, with a single-step undo.
//!
//! ## Core Concepts
//!
//! - **Note**: an ordered set of named fields, owned by the host editor
//! - **Correction Schema**: a JSON schema with one required string per field,
//!   sent as `response_format` so the model answers with structured JSON
//! - **Correction Result**: field name to corrected text; any subset of the
//!   schema's fields, applied field by field
//! - **Snapshot**: the pre-correction values, stored as JSON in the reserved
//!   `OriginalContent` field when the note type defines it
//!
//! ## Example
//!
//! ```rust,ignore
//! use card_corrector::*;
//!
//! let config = CorrectorConfig::from_file("config.json")?.with_env_overrides();
//! let corrector = Corrector::new(CompletionClient::new(config)?);
//!
//! let mut note = Note::from_pairs([
//!     ("Front", "this is a sentance"),
//!     ("Back", "ansewr"),
//!     ("OriginalContent", ""),
//! ]);
//!
//! corrector.check_grammar(&mut note, &mut host).await;
//! corrector.undo(&mut note, &mut host);
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod llm;
pub mod note;
pub mod response;
pub mod schema;
pub mod snapshot;

pub use config::{CorrectorConfig, Provider, DEFAULT_MODEL};
pub use editor::{CorrectionOutcome, Corrector, EditorAction, EditorHost, UndoOutcome};
pub use error::{CorrectionError, ErrorKind, Result};
#[cfg(feature = "client")]
pub use llm::CompletionClient;
pub use llm::{ChatMessage, CompletionBackend, CompletionRequest, Role};
pub use note::{CorrectionResult, Note, SNAPSHOT_FIELD};
pub use response::{parse_correction, strip_code_fence};
pub use schema::CorrectionSchema;
pub use snapshot::{restore, snapshot, RestoreOutcome};
