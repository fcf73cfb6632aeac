//! Text encodings for the grid tables.
//!
//! The WECC CSV exports are ISO-8859-1 (Latin-1): every byte maps to the
//! Unicode code point of the same value, so decoding never fails and
//! encoding fails only for characters above U+00FF.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const UTF8_BOM: &str = "\u{feff}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("input is not valid UTF-8 (first bad byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
    #[error("character {ch:?} at offset {offset} cannot be written as {encoding}")]
    Unrepresentable {
        ch: char,
        offset: usize,
        encoding: TextEncoding,
    },
    #[error("unknown text encoding '{0}' (expected utf8 or latin1)")]
    Unknown(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextEncoding {
    Utf8,
    #[default]
    Latin1,
}

impl TextEncoding {
    pub fn decode(self, bytes: &[u8]) -> Result<String, EncodingError> {
        match self {
            TextEncoding::Utf8 => {
                let text = std::str::from_utf8(bytes).map_err(|err| EncodingError::InvalidUtf8 {
                    offset: err.valid_up_to(),
                })?;
                Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
            }
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    pub fn encode(self, text: &str) -> Result<Vec<u8>, EncodingError> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text
                .char_indices()
                .map(|(offset, ch)| {
                    u8::try_from(u32::from(ch)).map_err(|_| EncodingError::Unrepresentable {
                        ch,
                        offset,
                        encoding: self,
                    })
                })
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf8"),
            TextEncoding::Latin1 => write!(f, "latin1"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(TextEncoding::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(TextEncoding::Latin1),
            other => Err(EncodingError::Unknown(other.to_string())),
        }
    }
}

pub fn read_text(path: &Path, encoding: TextEncoding) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    encoding
        .decode(&bytes)
        .with_context(|| format!("decoding {} as {}", path.display(), encoding))
}

/// Replace `path` with `text` in the given encoding.
pub fn write_text(path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
    let bytes = encoding
        .encode(text)
        .with_context(|| format!("encoding {} as {}", path.display(), encoding))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
