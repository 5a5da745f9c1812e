//! Document Text Extractor — turns a staged resume into plain text.
//!
//! Unsupported formats are not failures: they produce a descriptive string so
//! the rest of the pipeline still runs on the user's other inputs. The staged
//! file is always removed before this module returns.

use thiserror::Error;
use tracing::{info, warn};

use crate::analysis::staging::StagedUpload;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[cfg(not(feature = "docx"))]
pub const DOCX_PLACEHOLDER: &str =
    "Mock DOCX content: Placeholder - DOCX text extraction is not enabled in this build.";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read staged file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode PDF: {0}")]
    Pdf(String),

    #[error("failed to decode DOCX: {0}")]
    Docx(String),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentKind {
    /// Classifies a declared media type, ignoring case and parameters.
    pub fn from_media_type(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MEDIA_TYPE => DocumentKind::Pdf,
            DOCX_MEDIA_TYPE => DocumentKind::Docx,
            _ => DocumentKind::Unsupported,
        }
    }
}

/// Extracts text from a staged upload, then deletes it regardless of outcome.
pub async fn extract_text(upload: StagedUpload) -> Result<String, ExtractionError> {
    info!(
        "Extracting text from '{}' ({})",
        upload.original_name(),
        upload.media_type()
    );

    let result = extract_from_path(&upload).await;
    upload.remove().await;
    result
}

async fn extract_from_path(upload: &StagedUpload) -> Result<String, ExtractionError> {
    match DocumentKind::from_media_type(upload.media_type()) {
        DocumentKind::Pdf => {
            let bytes = tokio::fs::read(upload.path()).await?;
            let text = tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))
            })
            .await??;
            info!("PDF parsed successfully ({} chars)", text.chars().count());
            Ok(text)
        }
        DocumentKind::Docx => extract_docx(upload).await,
        DocumentKind::Unsupported => {
            warn!("Unsupported file type: {}", upload.media_type());
            Ok(format!(
                "Could not parse file type: {}. Supported types: PDF, DOCX.",
                upload.media_type()
            ))
        }
    }
}

#[cfg(feature = "docx")]
async fn extract_docx(upload: &StagedUpload) -> Result<String, ExtractionError> {
    let bytes = tokio::fs::read(upload.path()).await?;
    let text = tokio::task::spawn_blocking(move || docx::extract(&bytes)).await??;
    info!("DOCX parsed successfully ({} chars)", text.chars().count());
    Ok(text)
}

#[cfg(not(feature = "docx"))]
async fn extract_docx(_upload: &StagedUpload) -> Result<String, ExtractionError> {
    info!("DOCX parsing placeholder used");
    Ok(DOCX_PLACEHOLDER.to_string())
}

#[cfg(feature = "docx")]
mod docx {
    use docx_rs::{
        DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
        TableRowChild,
    };

    use super::ExtractionError;

    /// Paragraph and table-cell text, one block per line.
    pub(super) fn extract(content: &[u8]) -> Result<String, ExtractionError> {
        let docx =
            docx_rs::read_docx(content).map_err(|e| ExtractionError::Docx(e.to_string()))?;

        let mut blocks: Vec<String> = Vec::new();

        for child in docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_non_empty(&mut blocks, paragraph_text(&p)),
                DocumentChild::Table(t) => {
                    for row in &t.rows {
                        let TableChild::TableRow(r) = row;
                        let cells: Vec<String> = r
                            .cells
                            .iter()
                            .map(|cell| {
                                let TableRowChild::TableCell(c) = cell;
                                c.children
                                    .iter()
                                    .filter_map(|content| match content {
                                        TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                        _ => None,
                                    })
                                    .collect::<Vec<_>>()
                                    .join(" ")
                            })
                            .filter(|text| !text.trim().is_empty())
                            .collect();
                        push_non_empty(&mut blocks, cells.join(" | "));
                    }
                }
                _ => {}
            }
        }

        Ok(blocks.join("\n"))
    }

    fn push_non_empty(blocks: &mut Vec<String>, text: String) {
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }

    fn paragraph_text(p: &Paragraph) -> String {
        let mut text = String::new();

        for child in &p.children {
            match child {
                ParagraphChild::Run(r) => {
                    for run_child in &r.children {
                        match run_child {
                            RunChild::Text(t) => text.push_str(&t.text),
                            RunChild::Tab(_) => text.push('\t'),
                            RunChild::Break(_) => text.push('\n'),
                            _ => {}
                        }
                    }
                }
                ParagraphChild::Hyperlink(h) => {
                    for child in &h.children {
                        if let ParagraphChild::Run(r) = child {
                            for run_child in &r.children {
                                if let RunChild::Text(t) = run_child {
                                    text.push_str(&t.text);
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        text
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    async fn stage(
        dir: &std::path::Path,
        name: &str,
        media_type: &str,
        body: &[u8],
    ) -> StagedUpload {
        StagedUpload::write(dir, name, media_type, &Bytes::copy_from_slice(body))
            .await
            .unwrap()
    }

    /// One-page PDF drawing `text` in Helvetica, with a correct xref table.
    fn single_page_pdf(text: &str) -> Vec<u8> {
        let content = format!("BT /F1 24 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
        }

        let xref_at = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[tokio::test]
    async fn test_pdf_text_is_decoded_and_file_deleted() {
        let tmp = tempfile::tempdir().unwrap();
        let pdf = single_page_pdf("Kubernetes");
        let upload = stage(tmp.path(), "cv.pdf", PDF_MEDIA_TYPE, &pdf).await;
        let path = upload.path().to_path_buf();

        let text = extract_text(upload).await.unwrap();

        assert!(text.contains("Kubernetes"), "unexpected PDF text: {text:?}");
        assert!(!path.exists());
    }

    #[test]
    fn test_document_kind_classification() {
        assert_eq!(DocumentKind::from_media_type("application/pdf"), DocumentKind::Pdf);
        assert_eq!(
            DocumentKind::from_media_type("Application/PDF; charset=binary"),
            DocumentKind::Pdf
        );
        assert_eq!(DocumentKind::from_media_type(DOCX_MEDIA_TYPE), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::from_media_type("text/plain"),
            DocumentKind::Unsupported
        );
        assert_eq!(DocumentKind::from_media_type(""), DocumentKind::Unsupported);
    }

    #[tokio::test]
    async fn test_unsupported_type_returns_message_and_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = stage(tmp.path(), "cv.txt", "text/plain", b"plain resume").await;
        let path = upload.path().to_path_buf();

        let text = extract_text(upload).await.unwrap();
        assert_eq!(
            text,
            "Could not parse file type: text/plain. Supported types: PDF, DOCX."
        );
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_error_and_file_deleted() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = stage(tmp.path(), "cv.pdf", PDF_MEDIA_TYPE, b"not a pdf").await;
        let path = upload.path().to_path_buf();

        assert!(extract_text(upload).await.is_err());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_corrupt_docx_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = stage(tmp.path(), "cv.docx", DOCX_MEDIA_TYPE, b"not a docx").await;
        let path = upload.path().to_path_buf();

        let _ = extract_text(upload).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let upload = stage(tmp.path(), "cv.pdf", PDF_MEDIA_TYPE, b"%PDF").await;
        std::fs::remove_file(upload.path()).unwrap();

        assert!(matches!(
            extract_text(upload).await,
            Err(ExtractionError::Io(_))
        ));
    }
}
