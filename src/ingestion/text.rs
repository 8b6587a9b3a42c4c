//! Text decoding shared by the text-based readers.

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{LoadError, LoadResult};

/// Resolve an encoding label (`"utf-8"`, `"latin1"`, `"windows-1252"`, ...). `None` means UTF-8.
pub fn resolve_encoding(label: Option<&str>) -> LoadResult<&'static Encoding> {
    match label {
        None => Ok(UTF_8),
        Some(label) => {
            Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| LoadError::UnknownEncoding {
                label: label.to_string(),
            })
        }
    }
}

/// Read a whole file and decode it with the given encoding label.
///
/// Malformed byte sequences are an error rather than being replaced.
pub fn read_text_file(path: impl AsRef<Path>, encoding: Option<&str>) -> LoadResult<String> {
    let path = path.as_ref();
    let encoding = resolve_encoding(encoding)?;
    let bytes = fs::read(path)?;
    decode_bytes(&bytes, encoding).ok_or_else(|| LoadError::Decode {
        path: path.display().to_string(),
        encoding: encoding.name().to_string(),
    })
}

fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}
