//! Tile-parallel render job.

use indicatif::ProgressBar;
use log::{error, info};
use rad_core::common::*;
use rad_core::film::{Film, FilmTile};
use rad_core::geometry::{Bounds2i, Point2f, Point2i};
use rad_core::renderer::{ArcRenderer, Renderer};
use rad_core::sampler::Sampler;
use rad_core::scene::{ArcScene, Scene};
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_COMPLETE: u8 = 2;
const STATE_STOPPED: u8 = 3;

/// Lifecycle of a render job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    /// Created but not started.
    Idle,

    /// Tiles are being rendered.
    Running,

    /// All tiles finished.
    Complete,

    /// Cooperatively stopped; the frame buffer holds a valid partial result.
    Stopped,
}

/// Knobs of the tile loop.
#[derive(Copy, Clone, Debug)]
pub struct RenderOptions {
    /// Camera samples per pixel.
    pub samples_per_pixel: usize,

    /// Square tile edge in pixels.
    pub tile_size: usize,

    /// Worker thread count; 0 uses the available parallelism.
    pub workers: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            tile_size: 16,
            workers: 0,
        }
    }
}

/// A render of one scene into one frame buffer.
///
/// `start` spawns a single supervising thread; the supervisor partitions the
/// frame into square tiles and feeds tile indices through a bounded channel
/// to a scoped worker pool. Each worker clones the prototype sampler with a
/// seed derived from the tile's pixel-space origin, so for a fixed tile size
/// the image is independent of the worker count and of scheduling order.
pub struct RenderJob {
    scene: ArcScene,
    renderer: ArcRenderer,
    film: Arc<Film>,
    sampler: Option<Box<dyn Sampler>>,
    options: RenderOptions,
    state: Arc<AtomicU8>,
    stop: Arc<AtomicBool>,
    tiles_done: Arc<AtomicUsize>,
    handle: Option<JoinHandle<()>>,
}

impl RenderJob {
    /// Create a new `RenderJob` in the idle state.
    ///
    /// * `scene`    - The scene.
    /// * `renderer` - The per-ray estimator.
    /// * `film`     - The frame buffer to render into.
    /// * `sampler`  - Prototype sampler, cloned per tile.
    /// * `options`  - Tile-loop knobs.
    pub fn new(
        scene: ArcScene,
        renderer: ArcRenderer,
        film: Arc<Film>,
        sampler: Box<dyn Sampler>,
        options: RenderOptions,
    ) -> Self {
        Self {
            scene,
            renderer,
            film,
            sampler: Some(sampler),
            options,
            state: Arc::new(AtomicU8::new(STATE_IDLE)),
            stop: Arc::new(AtomicBool::new(false)),
            tiles_done: Arc::new(AtomicUsize::new(0)),
            handle: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> JobState {
        match self.state.load(Ordering::Acquire) {
            STATE_RUNNING => JobState::Running,
            STATE_COMPLETE => JobState::Complete,
            STATE_STOPPED => JobState::Stopped,
            _ => JobState::Idle,
        }
    }

    /// Returns true once every tile has been rendered.
    pub fn is_complete(&self) -> bool {
        self.state() == JobState::Complete
    }

    /// Number of tiles merged so far.
    pub fn tiles_completed(&self) -> usize {
        self.tiles_done.load(Ordering::Relaxed)
    }

    /// Start rendering. Spawns the supervising thread; a second call (or a
    /// call after completion) does nothing.
    pub fn start(&mut self) {
        if self
            .state
            .compare_exchange(
                STATE_IDLE,
                STATE_RUNNING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return;
        }
        let Some(sampler) = self.sampler.take() else {
            return;
        };
        let scene = Arc::clone(&self.scene);
        let renderer = Arc::clone(&self.renderer);
        let film = Arc::clone(&self.film);
        let options = self.options;
        let state = Arc::clone(&self.state);
        let stop = Arc::clone(&self.stop);
        let tiles_done = Arc::clone(&self.tiles_done);
        self.handle = Some(std::thread::spawn(move || {
            supervise(
                scene, renderer, film, sampler, options, state, stop, tiles_done,
            );
        }));
    }

    /// Request a cooperative stop. Workers poll the flag once per camera
    /// sample; already-finished pixels keep their values.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    /// Block until the supervising thread exits.
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Partition a pixel rectangle into square tiles in scanline order.
///
/// * `bounds`    - The full pixel rectangle.
/// * `tile_size` - Square tile edge in pixels.
fn partition_tiles(bounds: Bounds2i, tile_size: usize) -> Vec<Bounds2i> {
    let tile_size = tile_size.max(1) as i32;
    let extent = bounds.diagonal();
    let nx = (extent.x + tile_size - 1) / tile_size;
    let ny = (extent.y + tile_size - 1) / tile_size;
    let mut tiles = Vec::with_capacity((nx * ny).max(0) as usize);
    for ty in 0..ny {
        for tx in 0..nx {
            let x0 = bounds.p_min.x + tx * tile_size;
            let y0 = bounds.p_min.y + ty * tile_size;
            let x1 = (x0 + tile_size).min(bounds.p_max.x);
            let y1 = (y0 + tile_size).min(bounds.p_max.y);
            tiles.push(Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1)));
        }
    }
    tiles
}

/// Seed derived from a tile's pixel-space origin; independent of the tile's
/// position in the work queue.
fn tile_seed(tile: &Bounds2i) -> u64 {
    ((tile.p_min.x as u64) << 32) | (tile.p_min.y as u64 & 0xffff_ffff)
}

#[allow(clippy::too_many_arguments)]
fn supervise(
    scene: ArcScene,
    renderer: ArcRenderer,
    film: Arc<Film>,
    sampler: Box<dyn Sampler>,
    options: RenderOptions,
    state: Arc<AtomicU8>,
    stop: Arc<AtomicBool>,
    tiles_done: Arc<AtomicUsize>,
) {
    let tiles = partition_tiles(film.bounds(), options.tile_size);
    let workers = if options.workers == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        options.workers
    };
    info!(
        "rendering {} tiles of {}px with {} workers, {} spp",
        tiles.len(),
        options.tile_size,
        workers,
        options.samples_per_pixel
    );

    let progress = ProgressBar::new(tiles.len() as u64);
    let scene_ref: &Scene = scene.as_ref();
    let renderer_ref: &dyn Renderer = renderer.as_ref();
    let film_ref: &Film = film.as_ref();
    let sampler_ref: &dyn Sampler = sampler.as_ref();
    let stop_ref: &AtomicBool = stop.as_ref();
    let tiles_done_ref: &AtomicUsize = tiles_done.as_ref();

    std::thread::scope(|s| {
        let (tx, rx) = crossbeam_channel::bounded::<usize>(workers);
        for _ in 0..workers {
            let rx = rx.clone();
            let tiles = &tiles;
            let progress = &progress;
            s.spawn(move || {
                for tile_index in rx.iter() {
                    let bounds = tiles[tile_index];
                    let mut tile_sampler = sampler_ref.clone_sampler(tile_seed(&bounds));
                    let mut tile = film_ref.tile(bounds);
                    render_tile(
                        scene_ref,
                        renderer_ref,
                        &mut tile_sampler,
                        film_ref,
                        &mut tile,
                        options.samples_per_pixel,
                        stop_ref,
                    );
                    film_ref.merge_tile(&tile);
                    tiles_done_ref.fetch_add(1, Ordering::Relaxed);
                    progress.inc(1);
                }
            });
        }
        drop(rx);
        for tile_index in 0..tiles.len() {
            if stop_ref.load(Ordering::Acquire) {
                break;
            }
            if tx.send(tile_index).is_err() {
                break;
            }
        }
    });
    progress.finish_and_clear();

    let terminal = if stop.load(Ordering::Acquire) {
        STATE_STOPPED
    } else {
        STATE_COMPLETE
    };
    state.store(terminal, Ordering::Release);
    info!("render {}", if terminal == STATE_COMPLETE { "complete" } else { "stopped" });
}

fn render_tile(
    scene: &Scene,
    renderer: &dyn Renderer,
    sampler: &mut Box<dyn Sampler>,
    film: &Film,
    tile: &mut FilmTile,
    samples_per_pixel: usize,
    stop: &AtomicBool,
) {
    let width = film.width() as Float;
    let height = film.height() as Float;
    for pixel in tile.bounds {
        let mut taken = 0usize;
        for _ in 0..samples_per_pixel {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let jitter = sampler.next_2d();
            let p_film = Point2f::new(
                (pixel.x as Float + jitter.x) / width,
                (pixel.y as Float + jitter.y) / height,
            );
            let ray = scene.camera.generate_ray(&p_film);
            let l = renderer.li(&ray, scene, sampler);
            taken += 1;
            if !l.is_valid() {
                error!(
                    "invalid radiance sample {:?} at pixel ({}, {}); dropped",
                    l, pixel.x, pixel.y
                );
                continue;
            }
            tile.add_sample(pixel, l);
        }
        if taken > 0 {
            tile.scale_pixel(pixel, 1.0 / taken as Float);
        }
    }
}
