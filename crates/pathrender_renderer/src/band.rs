//! Row-band parallel rendering.
//!
//! Divides the image into contiguous bands of rows, one per worker thread.
//! Each band writes into its own disjoint slice of the pixel buffer, so
//! workers never share mutable pixel data.

use crate::progress::Progress;
use crate::renderer::{shade_pixel, ImageBuffer, RenderSettings};
use crate::{Camera, Scene};
use pathrender_math::Color;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A contiguous range of image rows, counted from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// Index of this band, also the worker index used for seeding
    pub index: usize,
    /// First row (inclusive)
    pub row_start: u32,
    /// Last row (exclusive)
    pub row_end: u32,
}

impl Band {
    pub fn rows(&self) -> u32 {
        self.row_end - self.row_start
    }

    pub fn pixel_count(&self, width: u32) -> usize {
        self.rows() as usize * width as usize
    }
}

/// Rows per band when splitting `height` rows into at most `count` bands.
fn rows_per_band(height: u32, count: usize) -> u32 {
    let count = count.clamp(1, height.max(1) as usize) as u32;
    height.div_ceil(count).max(1)
}

/// Split `height` rows into at most `count` contiguous bands.
///
/// All bands have the same height except possibly the last one.
pub fn generate_bands(height: u32, count: usize) -> Vec<Band> {
    let step = rows_per_band(height, count);

    (0..height)
        .step_by(step as usize)
        .enumerate()
        .map(|(index, row_start)| Band {
            index,
            row_start,
            row_end: (row_start + step).min(height),
        })
        .collect()
}

/// Seed of the random stream owned by worker `index`.
pub fn worker_seed(master_seed: u64, index: usize) -> u64 {
    master_seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Render every pixel of `band` into `pixels`, the band's slice of the
/// row-major, top-first image buffer.
#[allow(clippy::too_many_arguments)]
pub fn render_band(
    band: &Band,
    pixels: &mut [Color],
    camera: &Camera,
    scene: &Scene,
    width: u32,
    height: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
    progress: &Progress,
) {
    for (local_row, row) in pixels.chunks_mut(width as usize).enumerate() {
        let y = band.row_start + local_row as u32;
        // Camera rows count from the bottom
        let j = height - 1 - y;

        for (i, pixel) in row.iter_mut().enumerate() {
            *pixel = shade_pixel(camera, scene, i as u32, j, width, height, settings, rng);
        }

        progress.advance(row.len());
    }
}

/// Render the whole image in parallel.
///
/// Builds a pool of `settings.threads` workers (rayon's default when 0),
/// gives each one a band and its own seeded `StdRng`, and waits for all
/// of them. With a fixed seed and thread count the output is
/// bit-for-bit reproducible.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    width: u32,
    height: u32,
    settings: &RenderSettings,
) -> Result<ImageBuffer, RenderError> {
    let mut image = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        log::warn!("Empty image {}x{}, nothing to render", width, height);
        return Ok(image);
    }

    let threads = if settings.threads == 0 {
        rayon::current_num_threads()
    } else {
        settings.threads
    };
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("pathrender-band-{i}"))
        .build()?;

    let master_seed = settings.seed.unwrap_or_else(rand::random);
    let bands = generate_bands(height, threads);
    let band_pixels = bands[0].pixel_count(width);

    log::info!(
        "Rendering {}x{} ({:?}, {} spp, depth {}) with {} threads in {} bands, seed {}",
        width,
        height,
        settings.mode,
        settings.samples_per_pixel,
        settings.max_depth,
        threads,
        bands.len(),
        master_seed
    );

    let progress = Progress::new(image.pixels.len(), settings.show_progress);
    let start = Instant::now();

    pool.scope(|s| {
        for (band, pixels) in bands.iter().zip(image.pixels.chunks_mut(band_pixels)) {
            let progress = &progress;
            s.spawn(move |_| {
                let band_start = Instant::now();
                let mut rng = StdRng::seed_from_u64(worker_seed(master_seed, band.index));
                render_band(
                    band, pixels, camera, scene, width, height, settings, &mut rng, progress,
                );
                log::debug!(
                    "Band {} (rows {}..{}) finished in {:.2?}",
                    band.index,
                    band.row_start,
                    band.row_end,
                    band_start.elapsed()
                );
            });
        }
    });

    progress.finish();
    log::info!(
        "Render complete: {} pixels in {:.2?}",
        progress.completed(),
        start.elapsed()
    );

    Ok(image)
}
