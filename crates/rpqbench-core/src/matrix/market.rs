//! Matrix Market coordinate reader.
//!
//! Accepts the `%%MatrixMarket matrix coordinate <field> <symmetry>` layout
//! with `pattern`, `real`, `double` or `integer` fields and `general`,
//! `symmetric` or `skew-symmetric` symmetry. Every listed entry becomes a
//! set bit, explicit zeros included.

use std::io::BufRead;

use rpqbench_common::{MatrixError, VertexId};

use super::BoolMatrix;

const BANNER: &str = "%%matrixmarket";

/// Upper bound on entries reserved up front from the declared count.
const RESERVE_LIMIT: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symmetry {
    General,
    Symmetric,
}

/// Reads a boolean matrix from Matrix Market text.
pub fn read_matrix_market<R: BufRead>(reader: R) -> Result<BoolMatrix, MatrixError> {
    let mut lines = reader.lines().enumerate();

    let symmetry = match lines.next() {
        Some((_, line)) => parse_banner(&line?)?,
        None => return Err(MatrixError::MissingBanner),
    };

    let mut size: Option<(u64, u64, u64)> = None;
    let mut entries: Vec<(VertexId, VertexId)> = Vec::new();
    let mut found = 0u64;

    for (idx, line) in lines {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let Some((nrows, ncols, nnz)) = size else {
            let nrows = dimension(&mut fields, line_no, "row count")?;
            let ncols = dimension(&mut fields, line_no, "column count")?;
            let nnz = next_u64(&mut fields, line_no, "entry count")?;
            entries.reserve(nnz.min(RESERVE_LIMIT) as usize);
            size = Some((nrows, ncols, nnz));
            continue;
        };

        let row = next_u64(&mut fields, line_no, "row index")?;
        let col = next_u64(&mut fields, line_no, "column index")?;
        if row == 0 || col == 0 || row > nrows || col > ncols {
            return Err(MatrixError::OutOfBounds {
                line: line_no,
                row,
                col,
                nrows,
                ncols,
            });
        }

        found += 1;
        if found > nnz {
            return Err(MatrixError::EntryCount {
                expected: nnz,
                found,
            });
        }

        entries.push((row - 1, col - 1));
        if symmetry == Symmetry::Symmetric && row != col {
            entries.push((col - 1, row - 1));
        }
    }

    let Some((nrows, ncols, nnz)) = size else {
        return Err(MatrixError::Malformed {
            line: 0,
            reason: "missing size line".to_string(),
        });
    };
    if found != nnz {
        return Err(MatrixError::EntryCount {
            expected: nnz,
            found,
        });
    }

    Ok(BoolMatrix::from_entries(nrows, ncols, entries))
}

fn parse_banner(line: &str) -> Result<Symmetry, MatrixError> {
    let lower = line.trim().to_ascii_lowercase();
    let mut parts = lower.split_whitespace();
    if parts.next() != Some(BANNER) {
        return Err(MatrixError::MissingBanner);
    }

    let object = parts.next().unwrap_or_default();
    let format = parts.next().unwrap_or_default();
    let field = parts.next().unwrap_or_default();
    let symmetry = parts.next().unwrap_or("general");

    if object != "matrix" || format != "coordinate" {
        return Err(MatrixError::Unsupported(format!("{object} {format}")));
    }
    if !matches!(field, "pattern" | "real" | "double" | "integer") {
        return Err(MatrixError::Unsupported(format!("field `{field}`")));
    }

    match symmetry {
        "general" => Ok(Symmetry::General),
        "symmetric" | "skew-symmetric" => Ok(Symmetry::Symmetric),
        other => Err(MatrixError::Unsupported(format!("symmetry `{other}`"))),
    }
}

fn dimension<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<u64, MatrixError> {
    let value = next_u64(fields, line, what)?;
    if value > BoolMatrix::MAX_DIMENSION {
        return Err(MatrixError::Malformed {
            line,
            reason: format!("{what} {value} exceeds {}", BoolMatrix::MAX_DIMENSION),
        });
    }
    Ok(value)
}

fn next_u64<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    line: usize,
    what: &str,
) -> Result<u64, MatrixError> {
    let token = fields.next().ok_or_else(|| MatrixError::Malformed {
        line,
        reason: format!("missing {what}"),
    })?;
    token.parse().map_err(|_| MatrixError::Malformed {
        line,
        reason: format!("invalid {what} `{token}`"),
    })
}
