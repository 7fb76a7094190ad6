//! Academic paper DOCX assembly.
//!
//! Turns paper content, a per-section format configuration and a footnote
//! table into a styled paragraph sequence, then packs it into a `.docx`
//! buffer. The engine holds no state; drafts and the active configuration
//! are persisted through `paper-storage-core` stores by the caller.
//!
//! Pipeline:
//! ```text
//! PaperContent ──sanitize_paper──▶ check_for_export ──▶ DocumentAssembler
//!                                                         │  classify (script, numbering)
//!                                                         │  footnote::splice
//!                                                         │  format::resolve
//!                                                         ▼
//!                                                 AssembledDocument ──render──▶ bytes
//! ```

pub mod assembler;
pub mod classify;
pub mod document;
pub mod docx_writer;
pub mod error;
pub mod export;
pub mod footnote;
pub mod format;
pub mod model;
pub mod persist;
pub mod sanitize;

pub use assembler::DocumentAssembler;
pub use document::{AssembledDocument, Paragraph, Part, Run};
pub use error::{ConfigError, ConfigJsonError, ExportError, FormatError};
pub use export::{export, export_async, ExportedDocument};
pub use format::{ConfigManager, FormatConfig};
pub use model::{Footnote, PaperContent, PersonalInfoItem};
pub use persist::DraftStore;
