//! Pixel payload handed to scoring callbacks.
//!
//! Preference scorers consume one image at a time and only ever need RGB8
//! pixels, so the payload is a single owned buffer. Constructors accept
//! imgref images or raw byte slices; alpha channels are dropped on the way
//! in, since no preference model looks at transparency.

use imgref::ImgVec;
use rgb::{RGB8, RGBA8};

/// Owned RGB8 image handed to the scoring callback.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl ImageData {
    /// Wrap raw RGB8 bytes in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height * 3`.
    #[must_use]
    pub fn from_rgb_bytes(data: Vec<u8>, width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height * 3);
        Self { data, width, height }
    }

    /// Wrap raw RGBA8 bytes in row-major order, dropping the alpha channel.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != width * height * 4`.
    #[must_use]
    pub fn from_rgba_bytes(data: &[u8], width: usize, height: usize) -> Self {
        assert_eq!(data.len(), width * height * 4);
        let mut rgb = Vec::with_capacity(width * height * 3);
        for chunk in data.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
        }
        Self { data: rgb, width, height }
    }

    /// Convert an RGB8 imgref image.
    #[must_use]
    pub fn from_rgb8(img: &ImgVec<RGB8>) -> Self {
        let data = img.pixels().flat_map(|p| [p.r, p.g, p.b]).collect();
        Self {
            data,
            width: img.width(),
            height: img.height(),
        }
    }

    /// Convert an RGBA8 imgref image, dropping the alpha channel.
    #[must_use]
    pub fn from_rgba8(img: &ImgVec<RGBA8>) -> Self {
        let data = img.pixels().flat_map(|p| [p.r, p.g, p.b]).collect();
        Self {
            data,
            width: img.width(),
            height: img.height(),
        }
    }

    /// Image width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// RGB8 pixel bytes in row-major order.
    #[must_use]
    pub fn rgb8(&self) -> &[u8] {
        &self.data
    }
}

impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let img = ImageData::from_rgb_bytes(vec![0; 100 * 50 * 3], 100, 50);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.rgb8().len(), 100 * 50 * 3);
    }

    #[test]
    fn test_rgba_bytes_drop_alpha() {
        let data = [10u8, 20, 30, 255, 40, 50, 60, 0];
        let img = ImageData::from_rgba_bytes(&data, 2, 1);
        assert_eq!(img.rgb8(), &[10, 20, 30, 40, 50, 60]);
    }

    #[test]
    fn test_from_imgref() {
        let rgb = ImageData::from_rgb8(&ImgVec::new(
            vec![RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)],
            2,
            1,
        ));
        assert_eq!(rgb.rgb8(), &[1, 2, 3, 4, 5, 6]);

        let rgba = ImageData::from_rgba8(&ImgVec::new(
            vec![RGBA8::new(1, 2, 3, 9), RGBA8::new(4, 5, 6, 9)],
            2,
            1,
        ));
        assert_eq!(rgba, rgb);
    }

    #[test]
    #[should_panic(expected = "assertion")]
    fn test_rgb_bytes_length_checked() {
        let _ = ImageData::from_rgb_bytes(vec![0; 5], 2, 1);
    }
}
