//! Drag sample input format.
//!
//! One sample per line, in any of these forms:
//!
//! ```text
//! 120 45
//! 120,45
//! {"x":120,"y":45}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Coordinates are not
//! range-checked here; the paint client paints every sample and only refuses
//! to send invalid ones.

/// Error for one unparseable input line.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("expected two coordinates, found {0}")]
    WrongArity(usize),
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error(transparent)]
    Json(#[from] frames::CodecError),
}

/// Parse one input line into `(x, y)`, or `None` for a skipped line.
pub fn parse_sample_line(line: &str) -> Result<Option<(f64, f64)>, SampleError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    if trimmed.starts_with('{') {
        let point = frames::decode_point(trimmed)?;
        return Ok(Some((point.x, point.y)));
    }

    let fields: Vec<&str> = trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|field| !field.is_empty())
        .collect();
    let [x, y] = fields.as_slice() else {
        return Err(SampleError::WrongArity(fields.len()));
    };
    Ok(Some((parse_coord(x)?, parse_coord(y)?)))
}

fn parse_coord(raw: &str) -> Result<f64, SampleError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SampleError::NotANumber(raw.to_owned())),
    }
}

#[cfg(test)]
#[path = "samples_test.rs"]
mod tests;
