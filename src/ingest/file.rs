use std::io::Read;
use std::path::Path;

use regex::Regex;

use super::ExtractError;

pub fn is_audio(path: &Path) -> bool {
    matches!(extension(path).as_deref(), Some("mp3" | "wav" | "m4a"))
}

/// Extract text from a document on disk, dispatching on extension.
pub fn extract_document(path: &Path) -> Result<String, ExtractError> {
    let ext = extension(path).unwrap_or_default();
    match ext.as_str() {
        "txt" | "md" => Ok(std::fs::read_to_string(path)?),
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => Err(ExtractError::UnsupportedFormat(other.to_string())),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path)
        .map_err(|e| ExtractError::Parse { format: "pdf", message: e.to_string() })
}

// A .docx is a zip; the body text lives in word/document.xml. Tables and
// headers are intentionally ignored: study text is the paragraph stream.
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| ExtractError::Parse { format: "docx", message: e.to_string() })?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Parse { format: "docx", message: e.to_string() })?
        .read_to_string(&mut xml)?;

    Ok(strip_document_xml(&xml))
}

fn strip_document_xml(xml: &str) -> String {
    // Paragraph ends become newlines before the remaining markup is dropped.
    let with_breaks = xml.replace("</w:p>", "\n");
    let tags = match Regex::new(r"<[^>]+>") {
        Ok(re) => re,
        Err(_) => return with_breaks,
    };
    let stripped = tags.replace_all(&with_breaks, "");
    let text = unescape_xml(&stripped);

    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_extensions_detected() {
        assert!(is_audio(Path::new("lecture.mp3")));
        assert!(is_audio(Path::new("talk.WAV")));
        assert!(!is_audio(Path::new("notes.pdf")));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = extract_document(Path::new("slides.pptx")).unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(ext) if ext == "pptx"));
    }

    #[test]
    fn txt_files_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain notes\nsecond line").unwrap();
        assert_eq!(extract_document(&path).unwrap(), "plain notes\nsecond line");
    }

    #[test]
    fn document_xml_paragraphs_become_lines() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p><w:p><w:r><w:t>Second &amp; third.</w:t></w:r></w:p></w:body></w:document>"#;
        let got = strip_document_xml(xml);
        assert_eq!(got, "First paragraph.\nSecond & third.");
    }
}
