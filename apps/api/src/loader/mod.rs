//! Document loading: resolves the caller's input to text plus a source format.
//!
//! PDF and DOCX go through the rich converter first and fall back once to the
//! basic reader for that format. All reads are blocking and belong on a
//! blocking thread.

pub mod readers;
pub mod rich;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::extraction::TextStructure;
use crate::models::SourceFormat;

pub use readers::{BinaryFormat, DocumentReader, ReadOutput};
pub use rich::{ConversionError, RichConverter};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Error reading file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Unsupported file format: {0}")]
    Unsupported(String),

    #[error("Error parsing {format}: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("Rich conversion and fallback parsing both failed (rich: {rich}; fallback: {fallback})")]
    RecoveryExhausted { rich: String, fallback: String },
}

/// What the caller handed the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvInput {
    Path(PathBuf),
    Text(String),
}

impl CvInput {
    /// Inputs starting with `/` or `./` are paths; anything else is résumé text.
    pub fn detect(input: &str) -> Self {
        if input.starts_with('/') || input.starts_with("./") {
            CvInput::Path(PathBuf::from(input))
        } else {
            CvInput::Text(input.to_string())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CvInput::Path(path) => path.display().to_string(),
            CvInput::Text(text) => text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub text: String,
    pub format: SourceFormat,
    pub structure: TextStructure,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentLoader {
    rich: Option<RichConverter>,
}

impl DocumentLoader {
    pub fn new(rich: Option<RichConverter>) -> Self {
        Self { rich }
    }

    pub fn from_config(config: &Config) -> Self {
        let rich = config.use_rich_converter.then(|| {
            RichConverter::new(config.rich_converter_command.clone())
                .with_timeout(config.rich_converter_timeout)
        });
        if let Some(converter) = &rich {
            info!(
                command = converter.command(),
                timeout_s = config.rich_converter_timeout.as_secs(),
                "rich converter enabled"
            );
        }
        Self::new(rich)
    }

    pub fn load(&self, input: &CvInput) -> Result<LoadedDocument, LoadError> {
        match input {
            CvInput::Text(text) => Ok(LoadedDocument {
                text: text.clone(),
                format: SourceFormat::Txt,
                structure: TextStructure::Plain,
                diagnostics: Vec::new(),
            }),
            CvInput::Path(path) => self.load_path(path),
        }
    }

    fn load_path(&self, path: &Path) -> Result<LoadedDocument, LoadError> {
        let format = format_for_path(path)?;
        let output = match format {
            SourceFormat::Pdf => self.read_binary(BinaryFormat::Pdf, path)?,
            SourceFormat::Docx => self.read_binary(BinaryFormat::Docx, path)?,
            _ => DocumentReader::PlainText.read(path)?,
        };

        info!(
            path = %path.display(),
            format = format.as_str(),
            chars = output.text.len(),
            "document loaded"
        );

        Ok(LoadedDocument {
            text: output.text,
            format,
            structure: output.structure,
            diagnostics: output.diagnostics,
        })
    }

    fn read_binary(&self, format: BinaryFormat, path: &Path) -> Result<ReadOutput, LoadError> {
        let basic = DocumentReader::BasicBinary(format);
        match &self.rich {
            Some(converter) => {
                let rich = DocumentReader::RichConverter(converter.clone());
                read_with_fallback(|| rich.read(path), || basic.read(path))
            }
            None => basic.read(path),
        }
    }
}

/// Maps a path's extension to its source format.
pub fn format_for_path(path: &Path) -> Result<SourceFormat, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(SourceFormat::Pdf),
        "docx" | "doc" => Ok(SourceFormat::Docx),
        "txt" => Ok(SourceFormat::Txt),
        other => Err(LoadError::Unsupported(if other.is_empty() {
            path.display().to_string()
        } else {
            format!(".{other}")
        })),
    }
}

/// Runs `rich`; on failure runs `basic` exactly once. A recovered read carries
/// one diagnostic naming the rich failure.
pub fn read_with_fallback<R, B>(rich: R, basic: B) -> Result<ReadOutput, LoadError>
where
    R: FnOnce() -> Result<ReadOutput, LoadError>,
    B: FnOnce() -> Result<ReadOutput, LoadError>,
{
    let rich_error = match rich() {
        Ok(output) => return Ok(output),
        Err(e) => e,
    };

    warn!("rich conversion failed, falling back to basic reader: {rich_error}");

    match basic() {
        Ok(mut output) => {
            output
                .diagnostics
                .push(format!("Rich conversion failed, used fallback parser: {rich_error}"));
            Ok(output)
        }
        Err(fallback_error) => Err(LoadError::RecoveryExhausted {
            rich: rich_error.to_string(),
            fallback: fallback_error.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const MISSING_CONVERTER: &str = "cv-pipeline-no-such-converter";

    fn write_docx(paragraphs: &[&str]) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let mut writer = zip::ZipWriter::new(file.reopen().unwrap());
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        write!(writer, "<w:document><w:body>{body}</w:body></w:document>").unwrap();
        writer.finish().unwrap();
        file
    }

    /// A one-page PDF with a single Helvetica text run and a correct xref table.
    fn write_pdf(text: &str) -> tempfile::NamedTempFile {
        let content = format!("BT /F1 24 Tf 100 700 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
                .to_string(),
            format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut pdf = String::from("%PDF-1.4\n");
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
        }
        let xref_at = pdf.len();
        pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            pdf.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
            objects.len() + 1
        ));

        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(pdf.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_detect_path_or_text() {
        assert_eq!(
            CvInput::detect("/tmp/cv.pdf"),
            CvInput::Path(PathBuf::from("/tmp/cv.pdf"))
        );
        assert_eq!(
            CvInput::detect("./cv.docx"),
            CvInput::Path(PathBuf::from("./cv.docx"))
        );
        assert!(matches!(CvInput::detect("SUMMARY\nDev."), CvInput::Text(_)));
        assert!(matches!(CvInput::detect("cv.pdf"), CvInput::Text(_)));
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(format_for_path(Path::new("/a/cv.PDF")).unwrap(), SourceFormat::Pdf);
        assert_eq!(format_for_path(Path::new("/a/cv.doc")).unwrap(), SourceFormat::Docx);
        assert_eq!(format_for_path(Path::new("/a/cv.txt")).unwrap(), SourceFormat::Txt);
        let err = format_for_path(Path::new("/a/cv.rtf")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported file format: .rtf");
    }

    #[test]
    fn test_raw_text_input_is_txt() {
        let loader = DocumentLoader::new(None);
        let doc = loader.load(&CvInput::detect("SKILLS\nRust")).unwrap();
        assert_eq!(doc.format, SourceFormat::Txt);
        assert_eq!(doc.text, "SKILLS\nRust");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_fallback_invokes_basic_reader_once() {
        let basic_calls = Cell::new(0);
        let output = read_with_fallback(
            || {
                Err(LoadError::Conversion(ConversionError::Failed(
                    "converter crashed".to_string(),
                )))
            },
            || {
                basic_calls.set(basic_calls.get() + 1);
                Ok(ReadOutput {
                    text: "EXPERIENCE\nBuilt things".to_string(),
                    structure: TextStructure::Plain,
                    diagnostics: Vec::new(),
                })
            },
        )
        .unwrap();

        assert_eq!(basic_calls.get(), 1);
        assert!(!output.text.is_empty());
        assert_eq!(output.diagnostics.len(), 1);
        assert!(output.diagnostics[0].contains("used fallback parser"));
        assert!(output.diagnostics[0].contains("converter crashed"));
    }

    #[test]
    fn test_rich_success_skips_basic_reader() {
        let basic_calls = Cell::new(0);
        let output = read_with_fallback(
            || {
                Ok(ReadOutput {
                    text: "## Skills".to_string(),
                    structure: TextStructure::Markdown,
                    diagnostics: Vec::new(),
                })
            },
            || {
                basic_calls.set(basic_calls.get() + 1);
                Err(LoadError::Unsupported("never".to_string()))
            },
        )
        .unwrap();
        assert_eq!(basic_calls.get(), 0);
        assert_eq!(output.structure, TextStructure::Markdown);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_docx_falls_back_when_converter_missing() {
        let file = write_docx(&["EXPERIENCE", "Built things for 3 years"]);
        let loader = DocumentLoader::new(Some(RichConverter::new(MISSING_CONVERTER)));

        let doc = loader.load(&CvInput::Path(file.path().to_path_buf())).unwrap();

        assert_eq!(doc.format, SourceFormat::Docx);
        assert_eq!(doc.text, "EXPERIENCE\nBuilt things for 3 years");
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(doc.diagnostics[0].contains("not installed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_pdf_falls_back_when_converter_fails() {
        let dir = tempfile::tempdir().unwrap();
        let script = rich::tests::converter_script(dir.path(), "echo 'converter crashed' >&2; exit 3");
        let file = write_pdf("Hello World");
        let loader = DocumentLoader::new(Some(RichConverter::new(script)));

        let doc = loader.load(&CvInput::Path(file.path().to_path_buf())).unwrap();

        assert_eq!(doc.format, SourceFormat::Pdf);
        assert_eq!(doc.structure, TextStructure::Plain);
        assert!(doc.text.contains("Hello"));
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(doc.diagnostics[0].contains("used fallback parser"));
        assert!(doc.diagnostics[0].contains("converter crashed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_converter_falls_back_to_basic_reader() {
        let dir = tempfile::tempdir().unwrap();
        let script = rich::tests::converter_script(dir.path(), "sleep 20");
        let file = write_docx(&["SKILLS", "Rust"]);
        let converter = RichConverter::new(script).with_timeout(std::time::Duration::from_millis(200));
        let loader = DocumentLoader::new(Some(converter));

        let doc = loader.load(&CvInput::Path(file.path().to_path_buf())).unwrap();

        assert_eq!(doc.text, "SKILLS\nRust");
        assert_eq!(doc.diagnostics.len(), 1);
        assert!(doc.diagnostics[0].contains("timed out"));
    }

    #[test]
    fn test_docx_without_rich_converter_has_no_diagnostics() {
        let file = write_docx(&["SKILLS", "Rust, Go"]);
        let loader = DocumentLoader::new(None);
        let doc = loader.load(&CvInput::Path(file.path().to_path_buf())).unwrap();
        assert_eq!(doc.text, "SKILLS\nRust, Go");
        assert!(doc.diagnostics.is_empty());
    }

    #[test]
    fn test_both_readers_failing_is_recovery_exhausted() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"not really a pdf").unwrap();
        let loader = DocumentLoader::new(Some(RichConverter::new(MISSING_CONVERTER)));

        let err = loader
            .load(&CvInput::Path(file.path().to_path_buf()))
            .unwrap_err();
        assert!(matches!(err, LoadError::RecoveryExhausted { .. }));
    }

    #[test]
    fn test_unsupported_extension() {
        let loader = DocumentLoader::new(None);
        let err = loader
            .load(&CvInput::Path(PathBuf::from("/tmp/cv.odt")))
            .unwrap_err();
        assert!(matches!(err, LoadError::Unsupported(_)));
    }
}
