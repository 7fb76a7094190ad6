//! Export entry points: assemble, then pack to bytes.

use tracing::{error, info, instrument};

use crate::assembler::DocumentAssembler;
use crate::docx_writer::render;
use crate::error::ExportError;
use crate::format::FormatConfig;
use crate::model::PaperContent;
use crate::sanitize::sanitize_file_name;

/// A finished document, ready to be written wherever the caller likes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Assemble and serialize `paper` with `config`.
///
/// The paper is expected to have passed `check_for_export`; an empty title
/// is still refused here since it would produce a nameless file. On failure
/// no partial buffer is returned.
#[instrument(skip_all, fields(title = %paper.title))]
pub fn export(paper: &PaperContent, config: &FormatConfig) -> Result<ExportedDocument, ExportError> {
    if sanitize_file_name(paper.title.trim()).is_empty() {
        return Err(ExportError::MissingTitle);
    }

    let result = DocumentAssembler::new(paper, config)
        .assemble()
        .map_err(ExportError::from)
        .and_then(|doc| Ok((doc.file_name(), render(&doc)?)));

    match result {
        Ok((file_name, bytes)) => {
            info!("Exported {} ({} bytes)", file_name, bytes.len());
            Ok(ExportedDocument { file_name, bytes })
        }
        Err(e) => {
            error!("Export failed: {}", e);
            Err(e)
        }
    }
}

/// [`export`] on the blocking thread pool.
pub async fn export_async(
    paper: PaperContent,
    config: FormatConfig,
) -> Result<ExportedDocument, ExportError> {
    tokio::task::spawn_blocking(move || export(&paper, &config))
        .await
        .map_err(|e| ExportError::Task(e.to_string()))?
}
