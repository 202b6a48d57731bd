//! Format-specific readers. Each one turns a file into text and reports how
//! that text is structured so the extractor knows which header rules apply.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::TextStructure;
use crate::loader::rich::RichConverter;
use crate::loader::LoadError;

static DOCX_TEXT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>").unwrap());

static XML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(lt|gt|quot|apos|amp|#[0-9]+|#[xX][0-9a-fA-F]+);").unwrap()
});

const DOCX_BODY: &str = "word/document.xml";

/// Binary formats that need a dedicated reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryFormat {
    Pdf,
    Docx,
}

impl BinaryFormat {
    pub fn label(&self) -> &'static str {
        match self {
            BinaryFormat::Pdf => "PDF",
            BinaryFormat::Docx => "DOCX",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReadOutput {
    pub text: String,
    pub structure: TextStructure,
    pub diagnostics: Vec<String>,
}

impl ReadOutput {
    fn new(text: String, structure: TextStructure) -> Self {
        Self {
            text,
            structure,
            diagnostics: Vec::new(),
        }
    }
}

/// The closed set of document readers.
#[derive(Debug, Clone)]
pub enum DocumentReader {
    PlainText,
    BasicBinary(BinaryFormat),
    RichConverter(RichConverter),
}

impl DocumentReader {
    pub fn read(&self, path: &Path) -> Result<ReadOutput, LoadError> {
        match self {
            DocumentReader::PlainText => read_plain(path),
            DocumentReader::BasicBinary(BinaryFormat::Pdf) => read_pdf(path),
            DocumentReader::BasicBinary(BinaryFormat::Docx) => read_docx(path),
            DocumentReader::RichConverter(converter) => {
                let markdown = converter.convert(path)?;
                Ok(ReadOutput::new(markdown, TextStructure::Markdown))
            }
        }
    }
}

fn read_plain(path: &Path) -> Result<ReadOutput, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    Ok(ReadOutput::new(text.trim().to_string(), TextStructure::Plain))
}

fn read_pdf(path: &Path) -> Result<ReadOutput, LoadError> {
    // pdf-extract panics on some malformed documents.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text(path)).map_err(|_| {
        LoadError::Parse {
            format: BinaryFormat::Pdf.label(),
            message: "PDF reader panicked on malformed input".to_string(),
        }
    })?;
    let text = extracted.map_err(|e| LoadError::Parse {
        format: BinaryFormat::Pdf.label(),
        message: e.to_string(),
    })?;
    Ok(ReadOutput::new(text.trim().to_string(), TextStructure::Plain))
}

fn read_docx(path: &Path) -> Result<ReadOutput, LoadError> {
    let parse_error = |message: String| LoadError::Parse {
        format: BinaryFormat::Docx.label(),
        message,
    };

    let file = File::open(path).map_err(|source| LoadError::Unreadable {
        path: path.display().to_string(),
        source,
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| parse_error(e.to_string()))?;
    let mut body = archive
        .by_name(DOCX_BODY)
        .map_err(|e| parse_error(format!("{DOCX_BODY}: {e}")))?;

    let mut xml = String::new();
    body.read_to_string(&mut xml)
        .map_err(|e| parse_error(e.to_string()))?;

    Ok(ReadOutput::new(docx_xml_to_text(&xml), TextStructure::Plain))
}

/// One output line per `<w:p>` paragraph, runs concatenated, empty paragraphs dropped.
pub(crate) fn docx_xml_to_text(xml: &str) -> String {
    xml.split("</w:p>")
        .map(|paragraph| {
            DOCX_TEXT_RUN
                .captures_iter(paragraph)
                .filter_map(|c| c.get(1))
                .map(|m| unescape_xml(m.as_str()))
                .collect::<String>()
        })
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decodes the predefined entities and numeric character references in one
/// pass, so `&amp;#38;` stays `&#38;`. Invalid code points are left as written.
fn unescape_xml(text: &str) -> String {
    XML_ENTITY
        .replace_all(text, |caps: &regex::Captures| {
            let name = &caps[1];
            let decoded = match name {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "amp" => Some('&'),
                _ => {
                    let reference = &name[1..];
                    let code = match reference.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => reference.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}
