//! IDX binary datasets (MNIST and its derivatives) as sample streams.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x03        (number of dimensions = 3)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-1:   0x00 0x00   (reserved, must be zero)
//! byte   2:     0x08        (dtype = uint8)
//! byte   3:     0x01        (number of dimensions = 1)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use tracing::info;

use crate::error::{NetworkError, Result};
use crate::math::matrix::Matrix;
use crate::stream::SampleStream;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Class count used for MNIST digits.
pub const MNIST_CLASSES: usize = 10;

/// Images of an IDX3 file, each yielded as a column of `rows * cols` pixels
/// scaled to `[0, 1]` (or left as raw 0-255 bytes, see
/// [`IdxImages::raw_pixels`]).
#[derive(Debug, Clone)]
pub struct IdxImages {
    bytes: Vec<u8>,
    rows: usize,
    cols: usize,
    length: usize,
    position: usize,
    divisor: f64,
}

impl IdxImages {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<IdxImages> {
        if bytes.len() < IMAGE_HEADER_LEN {
            return Err(idx_error(format!(
                "image file too short: expected at least {} header bytes, got {}",
                IMAGE_HEADER_LEN,
                bytes.len()
            )));
        }
        check_magic(&bytes, 0x03, "image")?;

        let n_items = read_u32(&bytes, 4);
        let rows = read_u32(&bytes, 8);
        let cols = read_u32(&bytes, 12);

        let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
            idx_error(format!("rows * cols overflows (rows={}, cols={})", rows, cols))
        })?;
        let required = n_items
            .checked_mul(n_pixels)
            .and_then(|n| n.checked_add(IMAGE_HEADER_LEN))
            .ok_or_else(|| idx_error(format!("{} images of {} pixels overflow", n_items, n_pixels)))?;
        if bytes.len() < required {
            return Err(idx_error(format!(
                "image file too short: header declares {} images of {}x{} pixels \
                 ({} bytes needed), but file is only {} bytes",
                n_items,
                rows,
                cols,
                required,
                bytes.len()
            )));
        }

        Ok(IdxImages { bytes, rows, cols, length: n_items, position: 0, divisor: 255.0 })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<IdxImages> {
        let path = path.as_ref();
        let images = IdxImages::from_bytes(std::fs::read(path)?)?;
        info!(
            path = %path.display(),
            images = images.length,
            rows = images.rows,
            cols = images.cols,
            "opened IDX images"
        );
        Ok(images)
    }

    /// Yields pixels as raw byte values in `[0, 255]`, the input scale of
    /// models trained on unscaled MNIST.
    pub fn raw_pixels(mut self) -> IdxImages {
        self.divisor = 1.0;
        self
    }

    /// Pixel dimensions `(rows, cols)` of every image.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

impl SampleStream for IdxImages {
    fn next_sample(&mut self) -> Option<Matrix> {
        if self.position >= self.length {
            return None;
        }
        let n_pixels = self.rows * self.cols;
        let start = IMAGE_HEADER_LEN + self.position * n_pixels;
        self.position += 1;
        let pixels: Vec<f64> = self.bytes[start..start + n_pixels]
            .iter()
            .map(|&px| px as f64 / self.divisor)
            .collect();
        Some(Matrix::column(&pixels))
    }

    fn len(&self) -> usize {
        self.length
    }

    fn limit(&mut self, limit: usize) {
        if limit < self.length {
            self.length = limit;
        }
    }
}

/// Labels of an IDX1 file, each yielded as a one-hot column of height
/// `n_classes`.
#[derive(Debug, Clone)]
pub struct IdxLabels {
    bytes: Vec<u8>,
    n_classes: usize,
    length: usize,
    position: usize,
}

impl IdxLabels {
    /// Parses the label file and checks every class index up front.
    pub fn from_bytes(bytes: Vec<u8>, n_classes: usize) -> Result<IdxLabels> {
        if bytes.len() < LABEL_HEADER_LEN {
            return Err(idx_error(format!(
                "label file too short: expected at least {} header bytes, got {}",
                LABEL_HEADER_LEN,
                bytes.len()
            )));
        }
        check_magic(&bytes, 0x01, "label")?;
        if n_classes < 2 {
            return Err(idx_error(format!("n_classes must be at least 2, got {}", n_classes)));
        }

        let n_items = read_u32(&bytes, 4);
        let required = LABEL_HEADER_LEN + n_items;
        if bytes.len() < required {
            return Err(idx_error(format!(
                "label file too short: header declares {} labels but file is only {} bytes",
                n_items,
                bytes.len()
            )));
        }
        if let Some((i, &class)) = bytes[LABEL_HEADER_LEN..required]
            .iter()
            .enumerate()
            .find(|&(_, &class)| class as usize >= n_classes)
        {
            return Err(idx_error(format!(
                "label {}: class {} is out of range for {} classes",
                i, class, n_classes
            )));
        }

        Ok(IdxLabels { bytes, n_classes, length: n_items, position: 0 })
    }

    pub fn open<P: AsRef<Path>>(path: P, n_classes: usize) -> Result<IdxLabels> {
        let path = path.as_ref();
        let labels = IdxLabels::from_bytes(std::fs::read(path)?, n_classes)?;
        info!(path = %path.display(), labels = labels.length, "opened IDX labels");
        Ok(labels)
    }
}

impl SampleStream for IdxLabels {
    fn next_sample(&mut self) -> Option<Matrix> {
        if self.position >= self.length {
            return None;
        }
        let class = self.bytes[LABEL_HEADER_LEN + self.position] as usize;
        self.position += 1;
        Some(Matrix::from_fn(self.n_classes, 1, |i, _| if i == class { 1.0 } else { 0.0 }))
    }

    fn len(&self) -> usize {
        self.length
    }

    fn limit(&mut self, limit: usize) {
        if limit < self.length {
            self.length = limit;
        }
    }
}

/// Matching image and label streams.
#[derive(Debug, Clone)]
pub struct MnistSet {
    pub images: IdxImages,
    pub labels: IdxLabels,
}

impl MnistSet {
    /// Caps both streams to the same length.
    pub fn limit(&mut self, limit: usize) {
        self.images.limit(limit);
        self.labels.limit(limit);
    }
}

#[derive(Debug, Clone)]
pub struct MnistDb {
    pub training: MnistSet,
    pub test: MnistSet,
}

/// Opens the four conventionally named MNIST files in `dir`.
pub fn open_mnist<P: AsRef<Path>>(dir: P) -> Result<MnistDb> {
    let dir = dir.as_ref();
    Ok(MnistDb {
        training: open_mnist_training(dir)?,
        test: open_mnist_test(dir)?,
    })
}

/// Opens only `train-images-idx3-ubyte` and `train-labels-idx1-ubyte`.
pub fn open_mnist_training<P: AsRef<Path>>(dir: P) -> Result<MnistSet> {
    open_set(dir.as_ref(), "train-images-idx3-ubyte", "train-labels-idx1-ubyte")
}

/// Opens only `t10k-images-idx3-ubyte` and `t10k-labels-idx1-ubyte`.
pub fn open_mnist_test<P: AsRef<Path>>(dir: P) -> Result<MnistSet> {
    open_set(dir.as_ref(), "t10k-images-idx3-ubyte", "t10k-labels-idx1-ubyte")
}

fn open_set(dir: &Path, images: &str, labels: &str) -> Result<MnistSet> {
    Ok(MnistSet {
        images: IdxImages::open(dir.join(images))?,
        labels: IdxLabels::open(dir.join(labels), MNIST_CLASSES)?,
    })
}

fn check_magic(bytes: &[u8], dimensions: u8, kind: &str) -> Result<()> {
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(idx_error(format!(
            "{} file: bytes 0-1 must be 0x00 0x00, got 0x{:02X} 0x{:02X}",
            kind, bytes[0], bytes[1]
        )));
    }
    if bytes[2] != 0x08 {
        return Err(idx_error(format!(
            "{} file: dtype must be 0x08 (uint8), got 0x{:02X}",
            kind, bytes[2]
        )));
    }
    if bytes[3] != dimensions {
        return Err(idx_error(format!(
            "{} file: expected {} dimensions, got {}",
            kind, dimensions, bytes[3]
        )));
    }
    Ok(())
}

fn read_u32(bytes: &[u8], offset: usize) -> usize {
    u32::from_be_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
        as usize
}

fn idx_error(message: String) -> NetworkError {
    NetworkError::Idx(message)
}
