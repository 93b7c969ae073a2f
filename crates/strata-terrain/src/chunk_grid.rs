//! Tiles a square grid of chunks over world space and fills each with fractal heights.
//!
//! Every chunk depends only on its lattice position and the immutable biome and
//! terrain configuration, so chunks are generated as independent tasks on a scoped
//! worker pool and reassembled in row-major order afterwards.

use glam::{DVec2, IVec2, Vec3};
use strata_mesh::GridMesh;
use strata_noise::{FractalSynthesizer, NoiseField};

use crate::biome::Biome;
use crate::chunk::Chunk;
use crate::terrain_config::TerrainConfig;

/// Generate the full chunk collection for `biome` and `config`.
///
/// Returns `chunk_count^2` chunks ordered by `(y, x)` grid position, or nothing when the
/// chunk count or detail level is non-positive.
pub fn generate(biome: &Biome, config: &TerrainConfig) -> Vec<Chunk> {
    ChunkGrid::new(biome, config).generate()
}

/// One generation pass: a normalized biome, a terrain configuration and the noise
/// field they sample.
#[derive(Clone, Debug)]
pub struct ChunkGrid {
    biome: Biome,
    config: TerrainConfig,
    field: NoiseField,
    workers: usize,
}

impl ChunkGrid {
    /// Create a pass over `config`'s grid. The biome is normalized (odd octave counts
    /// become even) before any sampling.
    pub fn new(biome: &Biome, config: &TerrainConfig) -> Self {
        Self {
            biome: biome.clone().normalized(),
            config: config.clone(),
            field: NoiseField::new(config.noise),
            workers: num_cpus::get().max(1),
        }
    }

    /// Override the number of worker threads used by [`generate`](Self::generate).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// The normalized biome in use.
    pub fn biome(&self) -> &Biome {
        &self.biome
    }

    /// The terrain configuration in use.
    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Grid positions of every chunk, row-major (`y` outer, `x` inner).
    pub fn chunk_positions(&self) -> Vec<IVec2> {
        let count = self.config.chunks_per_side() as i32;
        if self.config.is_empty() {
            return Vec::new();
        }
        (0..count)
            .flat_map(|y| (0..count).map(move |x| IVec2::new(x, y)))
            .collect()
    }

    /// Fractal height at world sampling coordinates `(x, z)`.
    pub fn height_at(&self, x: f64, z: f64) -> f64 {
        FractalSynthesizer::new(&self.field, self.biome.fractal).height(x, z)
    }

    /// Build the permutation table now instead of on first sample.
    pub fn prepare(&self) {
        let _ = self.field.table();
    }

    /// Generate a single chunk. This is the independent unit of work.
    pub fn generate_chunk(&self, grid_position: IVec2) -> Chunk {
        let detail = self.config.detail();
        let mut mesh = GridMesh::build_grid(detail);

        let span = detail as i64;
        let origin = DVec2::new(
            (span * grid_position.x as i64) as f64,
            (span * grid_position.y as i64) as f64,
        );
        let sample_origin = origin + self.config.seed;

        // Quads duplicate corner vertices; sample each of the (n + 1)^2 lattice points once.
        let side = detail as usize + 1;
        let synth = FractalSynthesizer::new(&self.field, self.biome.fractal);
        let mut heights = Vec::with_capacity(side * side);
        for lx in 0..side {
            for lz in 0..side {
                let x = lx as f64 + sample_origin.x;
                let z = lz as f64 + sample_origin.y;
                heights.push(synth.height(x, z) as f32);
            }
        }

        for vertex in &mut mesh.vertices {
            let lx = vertex.x as usize;
            let lz = vertex.z as usize;
            vertex.y = heights[lx * side + lz];
        }

        if self.config.recalculate_normals {
            mesh.recalculate_normals();
        }

        Chunk {
            grid_position,
            world_offset: Vec3::new(origin.x as f32, 0.0, origin.y as f32),
            mesh,
        }
    }

    /// Generate every chunk on the calling thread.
    pub fn generate_sequential(&self) -> Vec<Chunk> {
        self.chunk_positions()
            .into_iter()
            .map(|position| self.generate_chunk(position))
            .collect()
    }

    /// Generate every chunk across the worker pool.
    ///
    /// The permutation table is built before any worker starts. Output matches
    /// [`generate_sequential`](Self::generate_sequential) exactly.
    pub fn generate(&self) -> Vec<Chunk> {
        let positions = self.chunk_positions();
        if positions.is_empty() {
            tracing::debug!(
                chunk_count = self.config.chunk_count,
                detail_level = self.config.detail_level,
                "Empty chunk grid, nothing to generate"
            );
            return Vec::new();
        }

        let start = std::time::Instant::now();
        let workers = self.workers.min(positions.len());
        self.prepare();

        let mut chunks = if workers <= 1 {
            self.generate_sequential()
        } else {
            self.generate_parallel(&positions, workers)
        };
        chunks.sort_by_key(|chunk| (chunk.grid_position.y, chunk.grid_position.x));

        tracing::debug!(
            chunks = chunks.len(),
            workers,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Generated chunk grid"
        );
        chunks
    }

    fn generate_parallel(&self, positions: &[IVec2], workers: usize) -> Vec<Chunk> {
        let (task_sender, task_receiver) = crossbeam_channel::unbounded::<IVec2>();
        let (result_sender, result_receiver) = crossbeam_channel::unbounded::<Chunk>();
        for &position in positions {
            let _ = task_sender.send(position);
        }
        drop(task_sender);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let receiver = task_receiver.clone();
                let sender = result_sender.clone();
                let spawned = std::thread::Builder::new()
                    .name("chunk-grid-worker".into())
                    .spawn_scoped(scope, move || {
                        while let Ok(position) = receiver.recv() {
                            let _ = sender.send(self.generate_chunk(position));
                        }
                    });
                if let Err(err) = spawned {
                    tracing::warn!(%err, "Failed to spawn chunk worker");
                }
            }
        });
        drop(result_sender);

        let mut chunks: Vec<Chunk> = result_receiver.try_iter().collect();
        // Anything left over means no worker could be spawned.
        chunks.extend(
            task_receiver
                .try_iter()
                .map(|position| self.generate_chunk(position)),
        );
        chunks
    }
}
