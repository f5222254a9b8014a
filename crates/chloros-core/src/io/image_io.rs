use std::path::Path;

use ndarray::Array2;

use crate::error::Result;

/// Load a grayscale image as f32 intensities in [0.0, 1.0].
///
/// The YII ratio is scale-invariant, so normalized intensities stand in for
/// raw fluorescence counts.
pub fn load_gray(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<f32>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            let pixel = gray.get_pixel(col as u32, row as u32);
            data[[row, col]] = pixel.0[0] as f32 / 65535.0;
        }
    }

    Ok(data)
}

/// Load a mask image as raw 8-bit values, without reinterpreting them.
/// Binarity is checked later by the analyzer.
pub fn load_mask(path: &Path) -> Result<Array2<u8>> {
    let img = image::open(path)?;
    let gray = img.to_luma8();
    let (w, h) = gray.dimensions();
    let mut data = Array2::<u8>::zeros((h as usize, w as usize));

    for row in 0..h as usize {
        for col in 0..w as usize {
            data[[row, col]] = gray.get_pixel(col as u32, row as u32).0[0];
        }
    }

    Ok(data)
}
