use std::path::Path;

use image::imageops::FilterType;

use crate::error::Result;
use crate::math::matrix::Matrix;

/// Decodes image bytes (PNG/JPEG/BMP/GIF), resizes to `width × height`,
/// converts to grayscale and returns the pixels as a column scaled to
/// `[0, 1]`, row by row.
pub fn grayscale_input(bytes: &[u8], width: u32, height: u32) -> Result<Matrix> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    let gray = resized.to_luma8();
    let pixels: Vec<f64> = gray.pixels().map(|p| p.0[0] as f64 / 255.0).collect();
    Ok(Matrix::column(&pixels))
}

pub fn grayscale_input_from_file<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Result<Matrix> {
    grayscale_input(&std::fs::read(path)?, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use image::{DynamicImage, GrayImage, ImageOutputFormat, Luma};
    use std::io::Cursor;

    fn png(img: GrayImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn pixels_are_read_row_by_row() {
        let img = GrayImage::from_fn(28, 28, |_, y| Luma([if y < 14 { 255 } else { 0 }]));
        let input = grayscale_input(&png(img), 28, 28).unwrap();
        let values = input.column_values();
        assert_eq!(values.len(), 784);
        assert!(values[0] > 0.9);
        assert!(values[783] < 0.1);
    }

    #[test]
    fn resizes_to_requested_shape() {
        let img = GrayImage::from_pixel(56, 56, Luma([255]));
        let input = grayscale_input(&png(img), 28, 28).unwrap();
        assert_eq!(input.shape(), (784, 1));
        assert!(input.column_values().iter().all(|&v| v > 0.99));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let err = grayscale_input(b"not an image", 28, 28).unwrap_err();
        assert!(matches!(err, NetworkError::Image(_)));
    }
}
