//! A library to generate color palettes from sticker sets.
//!
//! Stickers tend to come in themed packs sharing a handful of signature
//! colors. This crate pools the pixels of a whole pack, drops the transparent
//! background, groups similar colors with k-means clustering and filters the
//! result down to the saturated, bright colors that read as the pack's
//! palette.
//!
//! # Quick start
//!
//! ```no_run
//! use sticker_palette::Colors;
//!
//! let palette = Colors::from_paths(["01.png", "02.png", "03.png", "04.png"])?
//!     .filter_transparency(230)
//!     .run_kmeans(8, 64, 256)?
//!     .filter_saturation(35)?
//!     .filter_value(20)?;
//!
//! for (r, g, b) in palette.rgb_colors() {
//!     println!("#{r:02x}{g:02x}{b:02x}");
//! }
//! # Ok::<(), sticker_palette::Error>(())
//! ```
//!
//! Each step consumes the pipeline and returns a new one, so partial results
//! can be kept by cloning before the next call. Colors are ordered from most
//! to least prevalent throughout; filters only remove entries and never
//! reorder the survivors.

mod error;
mod kmeans;
mod swatch;

/// Default alpha threshold for [`Colors::filter_transparency`].
pub const DEFAULT_TRANSPARENCY_THRESHOLD: u8 = 230;
/// Default cluster count for [`Colors::run_kmeans`].
pub const DEFAULT_K_CLUSTERS: usize = 8;
/// Default number of clustering attempts for [`Colors::run_kmeans`].
pub const DEFAULT_KMEANS_RUNS: usize = 64;
/// Default per-attempt iteration cap for [`Colors::run_kmeans`].
pub const DEFAULT_KMEANS_MAX_ITER: usize = 256;
/// Default saturation threshold for [`Colors::filter_saturation`].
pub const DEFAULT_SATURATION_THRESHOLD: u8 = 35;
/// Default value threshold for [`Colors::filter_value`].
pub const DEFAULT_VALUE_THRESHOLD: u8 = 20;

pub use crate::{
    error::{Error, Result},
    swatch::Swatch,
};
pub use image;
pub use palette;

use image::{io::Reader as ImageReader, DynamicImage, Rgba, RgbaImage, RgbImage};
use palette::IntoColor;
use std::{collections::HashMap, path::Path};

/// The color pool of a sticker set, ordered from most to least prevalent.
///
/// This is an immutable pipeline value: every operation consumes `self` and
/// returns a fresh `Colors`, so a chain of calls reads left to right and a
/// failed step leaves nothing half-modified behind.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Colors {
    colors: Vec<Swatch>,
}

impl Colors {
    /// Load every sticker at the given paths and pool their pixels.
    ///
    /// Each image is decoded and converted to RGBA; images without an alpha
    /// channel come out fully opaque. Pixels are counted into one histogram
    /// spanning the whole set, and each image's buffer is dropped as soon as
    /// it has been counted.
    ///
    /// # Errors
    ///
    /// [`Error::ImageLoad`] if a path cannot be read or decoded.
    pub fn from_paths<I, P>(paths: I) -> Result<Colors>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut pool: HashMap<Rgba<u8>, u32> = HashMap::new();

        for path in paths {
            let path = path.as_ref();
            let image = ImageReader::open(path)
                .map_err(|e| Error::ImageLoad {
                    path: path.to_owned(),
                    source: image::ImageError::IoError(e),
                })?
                .decode()
                .map_err(|e| Error::ImageLoad {
                    path: path.to_owned(),
                    source: e,
                })?;

            count_pixels(&image.into_rgba8(), &mut pool);
        }

        Ok(Self::from_pool(pool))
    }

    /// Pool the pixels of already-decoded images.
    pub fn from_images<I>(images: I) -> Colors
    where
        I: IntoIterator<Item = DynamicImage>,
    {
        let mut pool: HashMap<Rgba<u8>, u32> = HashMap::new();

        for image in images {
            count_pixels(&image.into_rgba8(), &mut pool);
        }

        Self::from_pool(pool)
    }

    fn from_pool(pool: HashMap<Rgba<u8>, u32>) -> Colors {
        let mut colors: Vec<Swatch> = pool
            .into_iter()
            .map(|(Rgba([r, g, b, a]), count)| Swatch::new((r, g, b, a), count))
            .collect();

        swatch::sort_by_prevalence(&mut colors);

        Self { colors }
    }

    /// The current colors, most prevalent first.
    pub fn swatches(&self) -> &[Swatch] {
        &self.colors
    }

    /// The current colors as RGB triples, most prevalent first.
    pub fn rgb_colors(&self) -> Vec<(u8, u8, u8)> {
        self.colors.iter().map(|swatch| swatch.rgb()).collect()
    }

    /// The current colors as RGBA quadruples. Stickers without an alpha
    /// channel report `255` for every color.
    pub fn rgba_colors(&self) -> Vec<(u8, u8, u8, u8)> {
        self.colors.iter().map(|swatch| swatch.rgba()).collect()
    }

    /// Per-color pixel counts, in the same order as the color accessors.
    pub fn weights(&self) -> Vec<u32> {
        self.colors.iter().map(|swatch| swatch.population()).collect()
    }

    /// Total number of pixels currently in the pool.
    pub fn pixel_count(&self) -> u64 {
        self.colors
            .iter()
            .map(|swatch| u64::from(swatch.population()))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Remove every color whose alpha is strictly below `threshold`.
    ///
    /// Sticker packs usually carry transparent backgrounds; running this
    /// before [`run_kmeans`](Self::run_kmeans) keeps the background from
    /// dragging cluster centers toward it. A threshold of `0` removes
    /// nothing.
    pub fn filter_transparency(self, threshold: u8) -> Colors {
        self.retain(|swatch| swatch.alpha() >= threshold)
    }

    /// Group the pool into `k_clusters` dominant colors with k-means.
    ///
    /// Runs the algorithm `runs` times from random starting centroids, each
    /// attempt capped at `max_iter` assignment/update passes, and keeps the
    /// attempt with the lowest inertia. The result replaces the pool:
    /// exactly `k_clusters` colors, each weighted by the number of pixels in
    /// its cluster, most prevalent first. Centroid initialization is seeded
    /// from OS entropy; use [`run_kmeans_seeded`](Self::run_kmeans_seeded)
    /// for reproducible output.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any count is zero,
    /// [`Error::InsufficientData`] if the pool has fewer distinct RGB colors
    /// than `k_clusters`.
    pub fn run_kmeans(self, k_clusters: usize, runs: usize, max_iter: usize) -> Result<Colors> {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let seed = StdRng::from_entropy().gen();
        self.run_kmeans_seeded(k_clusters, runs, max_iter, seed)
    }

    /// Like [`run_kmeans`](Self::run_kmeans), but deterministic for a given
    /// `seed`.
    pub fn run_kmeans_seeded(
        self,
        k_clusters: usize,
        runs: usize,
        max_iter: usize,
        seed: u64,
    ) -> Result<Colors> {
        if k_clusters == 0 {
            return Err(Error::invalid_parameter("k_clusters", k_clusters));
        }
        if runs == 0 {
            return Err(Error::invalid_parameter("runs", runs));
        }
        if max_iter == 0 {
            return Err(Error::invalid_parameter("max_iter", max_iter));
        }

        let colors = kmeans::cluster(&self.colors, k_clusters, runs, max_iter, seed)?;

        Ok(Self { colors })
    }

    /// Remove every color whose HSV saturation, on a 0 to 100 scale, is
    /// strictly below `threshold`. Surviving colors keep their order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `threshold` exceeds 100.
    pub fn filter_saturation(self, threshold: u8) -> Result<Colors> {
        if threshold > 100 {
            return Err(Error::invalid_parameter("threshold", threshold));
        }

        Ok(self.retain(|swatch| swatch.hsv().1 >= f32::from(threshold)))
    }

    /// Remove every color whose HSV value, on a 0 to 100 scale, is strictly
    /// below `threshold`. Surviving colors keep their order.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `threshold` exceeds 100.
    pub fn filter_value(self, threshold: u8) -> Result<Colors> {
        if threshold > 100 {
            return Err(Error::invalid_parameter("threshold", threshold));
        }

        Ok(self.retain(|swatch| swatch.hsv().2 >= f32::from(threshold)))
    }

    /// Render the current palette as a horizontal strip of equal-width color
    /// bands, most prevalent color leftmost.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `width` or `height` is zero,
    /// [`Error::InsufficientData`] if the palette is empty.
    pub fn render(&self, width: u32, height: u32) -> Result<RgbImage> {
        if width == 0 {
            return Err(Error::invalid_parameter("width", width));
        }
        if height == 0 {
            return Err(Error::invalid_parameter("height", height));
        }
        if self.colors.is_empty() {
            return Err(Error::InsufficientData {
                available: 0,
                needed: 1,
            });
        }

        let band = (width / self.colors.len() as u32).max(1);

        Ok(RgbImage::from_fn(width, height, |x, _| {
            let index = ((x / band) as usize).min(self.colors.len() - 1);
            let (r, g, b) = self.colors[index].rgb();
            image::Rgb([r, g, b])
        }))
    }

    fn retain<F>(mut self, keep: F) -> Colors
    where
        F: Fn(&Swatch) -> bool,
    {
        self.colors.retain(keep);
        self
    }
}

fn count_pixels(image: &RgbaImage, pool: &mut HashMap<Rgba<u8>, u32>) {
    for pixel in image.pixels() {
        *pool.entry(*pixel).or_insert(0) += 1;
    }
}

/// Convert an RGB color to HSV with hue in degrees and saturation and value
/// as percentages, the scale image editors tend to show.
fn rgb_to_hsv(rgb: (u8, u8, u8)) -> (f32, f32, f32) {
    let raw = palette::Srgb::from_components(rgb);
    let raw_float: palette::Srgb<f32> = raw.into_format();
    let hsv: palette::Hsv = raw_float.into_color();
    let (h, s, v) = hsv.into_components();

    (h.to_positive_degrees(), s * 100.0, v * 100.0)
}
