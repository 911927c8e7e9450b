//! Codec for Markdown notes carrying a `---` delimited YAML header.

use crate::note::{
    domain::NoteMetadata,
    ports::{NoteStoreError, NoteStoreResult},
};
use camino::Utf8Path;
use serde_json::{Map, Value};

const DELIMITER: &str = "---";

/// Splits a document into its decoded header and body.
///
/// Documents without a leading delimiter have an empty header and keep their
/// full text as the body.
pub(super) fn decode(path: &Utf8Path, text: &str) -> NoteStoreResult<(NoteMetadata, String)> {
    let Some(rest) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return Ok((NoteMetadata::new(), text.to_owned()));
    };

    let mut consumed = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let header = rest.get(..consumed).unwrap_or_default();
            let body = rest.get(consumed + line.len()..).unwrap_or_default();
            let metadata = decode_header(path, header)?;
            return Ok((metadata, body.to_owned()));
        }
        consumed += line.len();
    }

    Err(NoteStoreError::Malformed {
        path: path.to_path_buf(),
        reason: "metadata header is not terminated".to_owned(),
    })
}

fn decode_header(path: &Utf8Path, header: &str) -> NoteStoreResult<NoteMetadata> {
    if header.trim().is_empty() {
        return Ok(NoteMetadata::new());
    }
    let parsed: Option<Map<String, Value>> =
        serde_yaml::from_str(header).map_err(|err| NoteStoreError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    Ok(parsed.map(NoteMetadata::from_map).unwrap_or_default())
}

/// Renders a header and body back into a document.
pub(super) fn encode(
    path: &Utf8Path,
    metadata: &NoteMetadata,
    body: &str,
) -> NoteStoreResult<String> {
    let header = if metadata.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(metadata.as_map()).map_err(|err| NoteStoreError::Malformed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?
    };
    Ok(format!("{DELIMITER}\n{header}{DELIMITER}\n{body}"))
}
