use ndarray::Array2;

use crate::error::{ChlorosError, Result};

/// Validate that `mask` covers the `expected` (rows, cols) extent and is
/// binary.
///
/// Binary means at most two distinct 8-bit values, so both {0, 1} and
/// {0, 255} encodings pass. Zero marks excluded pixels.
pub fn check_binary_mask(mask: &Array2<u8>, expected: (usize, usize)) -> Result<()> {
    let (actual_rows, actual_cols) = mask.dim();
    if (actual_rows, actual_cols) != expected {
        return Err(ChlorosError::MaskShapeMismatch {
            expected_rows: expected.0,
            expected_cols: expected.1,
            actual_rows,
            actual_cols,
        });
    }

    let mut seen = [false; 256];
    let mut distinct = 0usize;
    for &v in mask.iter() {
        if !seen[v as usize] {
            seen[v as usize] = true;
            distinct += 1;
        }
    }
    if distinct > 2 {
        return Err(ChlorosError::NonBinaryMask(distinct));
    }
    Ok(())
}
