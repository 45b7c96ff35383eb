//! Input loading
//!
//! Reads the integer dataset into memory before any worker is started.
//! Values are whitespace separated (spaces, tabs and newlines are all
//! accepted) and parsed as signed 64-bit integers.

use crate::error::SumError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Read all values from `path`
///
/// The file is read as raw bytes, so a token that is not valid UTF-8 is
/// reported as a parse failure at its position like any other bad token.
///
/// # Errors
///
/// - `InputUnavailable` if the file cannot be opened or read
/// - `InputParse` on the first token that is not an integer
/// - `InputTooLarge` once `max_values` values have been read; a read
///   that hits the cap is treated as truncated rather than complete
pub fn read_values(path: &Path, max_values: usize) -> Result<Vec<i64>, SumError> {
    let unavailable = |source: std::io::Error| SumError::InputUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(unavailable)?;
    let mut reader = BufReader::new(file);

    let mut values = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader.read_until(b'\n', &mut line).map_err(unavailable)?;
        if read == 0 {
            break;
        }
        push_tokens(&line, path, max_values, &mut values)?;
    }

    debug!("read {} values from {}", values.len(), path.display());
    Ok(values)
}

/// Parse values from an in-memory buffer
pub fn parse_values(bytes: &[u8], max_values: usize) -> Result<Vec<i64>, SumError> {
    let mut values = Vec::new();
    push_tokens(bytes, Path::new("<memory>"), max_values, &mut values)?;
    Ok(values)
}

fn push_tokens(
    bytes: &[u8],
    path: &Path,
    max_values: usize,
    values: &mut Vec<i64>,
) -> Result<(), SumError> {
    let tokens = bytes
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty());

    for token in tokens {
        let value = std::str::from_utf8(token)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .ok_or_else(|| SumError::InputParse {
                path: path.to_path_buf(),
                position: values.len() + 1,
                token: String::from_utf8_lossy(token).into_owned(),
            })?;
        values.push(value);

        if values.len() >= max_values {
            return Err(SumError::InputTooLarge { limit: max_values });
        }
    }
    Ok(())
}
