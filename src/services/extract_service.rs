use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::document::DocumentKind;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl DocumentKind {
    /// MIME type wins; the extension is consulted only for untyped uploads.
    pub fn detect(content_type: Option<&str>, file_name: &str) -> Result<Self> {
        let mime = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");

        if let Some(mime) = mime {
            return match mime.as_str() {
                PDF_MIME => Ok(DocumentKind::Pdf),
                DOCX_MIME => Ok(DocumentKind::Docx),
                TEXT_MIME => Ok(DocumentKind::PlainText),
                other => Err(Error::UnsupportedFileType(other.to_string())),
            };
        }

        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "docx" => Ok(DocumentKind::Docx),
            "txt" => Ok(DocumentKind::PlainText),
            _ => Err(Error::UnsupportedFileType(format!(
                "{} (expected PDF, DOCX or plain text)",
                file_name
            ))),
        }
    }
}

/// Only an unsupported kind is an error. Unreadable content of a supported
/// kind yields whatever text could be recovered, possibly none.
pub async fn extract_text(upload: &UploadedFile) -> Result<(DocumentKind, String)> {
    let kind = DocumentKind::detect(upload.content_type.as_deref(), &upload.file_name)?;
    let data = upload.data.clone();
    let file_name = upload.file_name.clone();

    let joined = tokio::task::spawn_blocking(move || extract_kind(kind, &data)).await;
    let text = match joined {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            tracing::warn!(file = %file_name, ?kind, error = %e, "text extraction failed");
            String::new()
        }
        Err(e) => {
            tracing::error!(file = %file_name, ?kind, error = %e, "text extraction panicked");
            String::new()
        }
    };

    tracing::info!(file = %upload.file_name, ?kind, chars = text.chars().count(), "extracted document text");
    Ok((kind, text))
}

fn extract_kind(kind: DocumentKind, data: &[u8]) -> anyhow::Result<String> {
    match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| anyhow::anyhow!("pdf extraction failed: {}", e)),
        DocumentKind::Docx => extract_docx(data),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(data).into_owned()),
    }
}

fn extract_docx(data: &[u8]) -> anyhow::Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut xml)?;
    Ok(docx_paragraphs(&xml))
}

fn docx_paragraphs(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" | b"w:cr" => current.push('\n'),
                b"w:p" => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => match t.unescape() {
                Ok(text) => current.push_str(&text),
                Err(e) => tracing::debug!(error = %e, "skipping undecodable docx run"),
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "docx body is malformed; keeping text read so far"
                );
                break;
            }
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::FileOptions;

    fn docx_bytes(document_xml: &str) -> Bytes {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", FileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer
            .start_file("word/document.xml", FileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    fn upload(name: &str, content_type: Option<&str>, data: impl Into<Bytes>) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        }
    }

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Cells are the</w:t></w:r><w:r><w:t xml:space="preserve"> basic unit</w:t></w:r></w:p>
    <w:p/>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Role &amp; function</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn detects_by_mime_then_extension() {
        assert_eq!(
            DocumentKind::detect(Some("application/pdf"), "x.bin").unwrap(),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::detect(Some("text/plain; charset=utf-8"), "notes").unwrap(),
            DocumentKind::PlainText
        );
        assert_eq!(DocumentKind::detect(None, "Essay.DOCX").unwrap(), DocumentKind::Docx);
        assert_eq!(
            DocumentKind::detect(Some("application/octet-stream"), "slides.pdf").unwrap(),
            DocumentKind::Pdf
        );
    }

    #[test]
    fn rejects_unsupported_types() {
        assert!(matches!(
            DocumentKind::detect(Some("image/png"), "scan.png"),
            Err(Error::UnsupportedFileType(_))
        ));
        assert!(matches!(
            DocumentKind::detect(None, "legacy.doc"),
            Err(Error::UnsupportedFileType(_))
        ));
    }

    #[test]
    fn docx_paragraphs_keep_runs_tabs_and_entities() {
        assert_eq!(
            docx_paragraphs(BODY),
            "Cells are the basic unit\n\nName\tRole & function"
        );
    }

    #[tokio::test]
    async fn extracts_docx_from_zip_container() {
        let file = upload("biology.docx", Some(DOCX_MIME), docx_bytes(BODY));
        let (kind, text) = extract_text(&file).await.unwrap();
        assert_eq!(kind, DocumentKind::Docx);
        assert!(text.starts_with("Cells are the basic unit"));
    }

    #[tokio::test]
    async fn plain_text_is_decoded_lossily() {
        let file = upload("notes.txt", Some(TEXT_MIME), b"caf\xc3\xa9 \xff end".to_vec());
        let (kind, text) = extract_text(&file).await.unwrap();
        assert_eq!(kind, DocumentKind::PlainText);
        assert_eq!(text, "café \u{fffd} end");
    }

    #[tokio::test]
    async fn corrupt_supported_files_yield_empty_text() {
        let pdf = upload("broken.pdf", Some(PDF_MIME), b"%PDF-1.7 truncated".to_vec());
        assert_eq!(extract_text(&pdf).await.unwrap().1, "");

        let docx = upload("broken.docx", None, b"PK not really a zip".to_vec());
        assert_eq!(extract_text(&docx).await.unwrap().1, "");
    }

    #[tokio::test]
    async fn unsupported_upload_is_an_error() {
        let file = upload("photo.jpg", Some("image/jpeg"), vec![0xFFu8, 0xD8]);
        assert!(matches!(
            extract_text(&file).await,
            Err(Error::UnsupportedFileType(_))
        ));
    }
}
