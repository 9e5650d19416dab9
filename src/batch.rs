//! Generation-batch data model.
//!
//! A [`GenerationBatch`] is the ordered output of one generation run: an
//! optional run of grid/preview images first, then the individually seeded
//! output images starting at [`GenerationBatch::index_of_first_image`]. Each
//! output image's seed is derived from the batch base seed and its offset
//! from that index; the seed is the join key between images and their
//! preference scores.

use crate::image::ImageData;

/// Mutable per-image metadata record.
///
/// `parameters` is the caption text persisted alongside the image; the
/// ranking pipeline appends the score suffix to it. `score` is unset until
/// a table entry is attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageInfo {
    /// Caption / generation-parameters text.
    pub parameters: String,

    /// Attached preference score, if any.
    pub score: Option<f64>,
}

impl ImageInfo {
    /// Create a metadata record with the given caption text.
    #[must_use]
    pub fn new(parameters: impl Into<String>) -> Self {
        Self {
            parameters: parameters.into(),
            score: None,
        }
    }
}

/// A single generated image: pixels plus mutable metadata.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// Pixel payload.
    pub data: ImageData,

    /// Metadata record.
    pub info: ImageInfo,
}

impl GeneratedImage {
    /// Create an image from pixels and caption text.
    #[must_use]
    pub fn new(data: ImageData, parameters: impl Into<String>) -> Self {
        Self {
            data,
            info: ImageInfo::new(parameters),
        }
    }
}

/// One generation run's output batch.
#[derive(Debug, Clone)]
pub struct GenerationBatch {
    /// Ordered images; grid/preview entries come first.
    pub images: Vec<GeneratedImage>,

    /// Base seed of the run.
    pub base_seed: i64,

    /// Offset of the first individually seeded output image. Entries before
    /// it are grid/preview images and are never scored.
    pub index_of_first_image: usize,
}

impl GenerationBatch {
    /// Create a batch.
    #[must_use]
    pub fn new(images: Vec<GeneratedImage>, base_seed: i64, index_of_first_image: usize) -> Self {
        Self {
            images,
            base_seed,
            index_of_first_image,
        }
    }

    /// Seed of the image at position `index`.
    ///
    /// Returns `None` for grid/preview images before
    /// [`Self::index_of_first_image`]. For output images the seed is
    /// `base_seed + (index - index_of_first_image)`.
    #[must_use]
    pub fn seed_at(&self, index: usize) -> Option<i64> {
        if index < self.index_of_first_image {
            None
        } else {
            Some(self.base_seed + (index - self.index_of_first_image) as i64)
        }
    }

    /// Number of images in the batch, preview entries included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Post-processed batch: filtered, re-ranked images plus the parallel
/// infotext list.
#[derive(Debug, Clone)]
pub struct RankedBatch {
    /// Images in final order, best score first.
    pub images: Vec<GeneratedImage>,

    /// Caption text per image, parallel to `images`.
    pub infotexts: Vec<String>,

    /// Base seed carried through from the input batch.
    pub base_seed: i64,

    /// First-real-image index carried through from the input batch.
    pub index_of_first_image: usize,
}

impl RankedBatch {
    /// Number of images that survived filtering.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether every image was filtered out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(caption: &str) -> GeneratedImage {
        let data = ImageData::from_rgb_bytes(vec![128; 4 * 4 * 3], 4, 4);
        GeneratedImage::new(data, caption)
    }

    #[test]
    fn test_seed_at_preview_entries() {
        let batch = GenerationBatch::new(
            vec![solid_image("grid"), solid_image("a"), solid_image("b")],
            100,
            1,
        );
        assert_eq!(batch.seed_at(0), None);
        assert_eq!(batch.seed_at(1), Some(100));
        assert_eq!(batch.seed_at(2), Some(101));
    }

    #[test]
    fn test_seed_at_no_preview() {
        let batch = GenerationBatch::new(vec![solid_image("a"), solid_image("b")], 7, 0);
        assert_eq!(batch.seed_at(0), Some(7));
        assert_eq!(batch.seed_at(1), Some(8));
    }

    #[test]
    fn test_info_starts_unscored() {
        let img = solid_image("Seed: 42");
        assert_eq!(img.info.parameters, "Seed: 42");
        assert!(img.info.score.is_none());
    }
}
