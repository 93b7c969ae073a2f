//! Background chunk generation with a configurable thread pool.
//!
//! Hosts that stream terrain submit chunks one at a time, keep rendering, and
//! drain finished chunks once per frame. A cancelled task is skipped if no worker
//! has picked it up yet and its result is dropped if it finishes after cancellation.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use dashmap::DashMap;
use glam::IVec2;

use crate::chunk::Chunk;
use crate::chunk_grid::ChunkGrid;

/// A request to generate one chunk of a grid.
#[derive(Clone, Debug)]
pub struct ChunkTask {
    /// The generation pass the chunk belongs to.
    pub grid: Arc<ChunkGrid>,
    /// Lattice position of the chunk.
    pub grid_position: IVec2,
    /// Host-chosen pass number. Tasks are keyed by `(generation, grid_position)`.
    pub generation: u64,
}

/// A generated chunk ready for upload.
#[derive(Debug)]
pub struct GeneratedChunk {
    /// The generated chunk.
    pub chunk: Chunk,
    /// Pass number copied from the task.
    pub generation: u64,
    /// Generation time in microseconds.
    pub generation_time_us: u64,
}

type TaskKey = (u64, IVec2);

struct QueuedTask {
    task: ChunkTask,
    cancelled: Arc<AtomicBool>,
}

/// Generates chunks on a pool of background threads.
pub struct AsyncTerrainGenerator {
    task_sender: Sender<QueuedTask>,
    result_receiver: Receiver<GeneratedChunk>,
    /// Cancellation flag per pending task.
    active_tasks: Arc<DashMap<TaskKey, Arc<AtomicBool>>>,
    /// Tasks queued or executing.
    in_flight: Arc<AtomicU64>,
}

impl AsyncTerrainGenerator {
    /// Create a generator.
    ///
    /// - `thread_count`: worker threads, at least one.
    /// - `max_concurrent`: queued tasks beyond twice this are rejected by [`submit`](Self::submit).
    /// - `result_capacity`: bound of the completed chunk channel.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn new(
        thread_count: usize,
        max_concurrent: usize,
        result_capacity: usize,
    ) -> io::Result<Self> {
        let (task_sender, task_receiver) = bounded::<QueuedTask>(max_concurrent.max(1) * 2);
        let (result_sender, result_receiver) = bounded::<GeneratedChunk>(result_capacity.max(1));
        let in_flight = Arc::new(AtomicU64::new(0));

        for _ in 0..thread_count.max(1) {
            let receiver = task_receiver.clone();
            let sender = result_sender.clone();
            let in_flight = Arc::clone(&in_flight);

            std::thread::Builder::new()
                .name("terrain-gen-worker".into())
                .spawn(move || {
                    while let Ok(queued) = receiver.recv() {
                        if queued.cancelled.load(Ordering::Relaxed) {
                            in_flight.fetch_sub(1, Ordering::Relaxed);
                            continue;
                        }

                        let start = std::time::Instant::now();
                        let chunk = queued.task.grid.generate_chunk(queued.task.grid_position);
                        let elapsed = start.elapsed().as_micros() as u64;

                        if !queued.cancelled.load(Ordering::Relaxed) {
                            let _ = sender.send(GeneratedChunk {
                                chunk,
                                generation: queued.task.generation,
                                generation_time_us: elapsed,
                            });
                        }

                        in_flight.fetch_sub(1, Ordering::Relaxed);
                    }
                })?;
        }

        tracing::debug!(
            threads = thread_count.max(1),
            max_concurrent,
            result_capacity,
            "Started terrain generation workers"
        );

        Ok(Self {
            task_sender,
            result_receiver,
            active_tasks: Arc::new(DashMap::new()),
            in_flight,
        })
    }

    /// Create a generator sized to the machine, leaving two cores to the host.
    ///
    /// # Errors
    ///
    /// Returns the OS error if a worker thread cannot be spawned.
    pub fn with_defaults() -> io::Result<Self> {
        let cpus = num_cpus::get().max(2);
        let threads = (cpus - 2).max(1);
        Self::new(threads, 64, 128)
    }

    /// Queue a chunk for background generation.
    ///
    /// Returns `Err(task)` if the queue is full.
    #[allow(clippy::result_large_err)]
    pub fn submit(&self, task: ChunkTask) -> Result<(), ChunkTask> {
        let key = (task.generation, task.grid_position);
        let cancelled = Arc::new(AtomicBool::new(false));
        self.active_tasks.insert(key, Arc::clone(&cancelled));
        self.in_flight.fetch_add(1, Ordering::Relaxed);

        self.task_sender
            .try_send(QueuedTask { task, cancelled })
            .map_err(|e| {
                self.in_flight.fetch_sub(1, Ordering::Relaxed);
                self.active_tasks.remove(&key);
                e.into_inner().task
            })
    }

    /// Queue every chunk of `grid` in row-major order, returning how many were accepted.
    ///
    /// Stops at the first rejection; the remaining positions are not queued.
    pub fn submit_grid(&self, grid: &Arc<ChunkGrid>, generation: u64) -> usize {
        grid.prepare();
        let mut accepted = 0;
        for grid_position in grid.chunk_positions() {
            let task = ChunkTask {
                grid: Arc::clone(grid),
                grid_position,
                generation,
            };
            if self.submit(task).is_err() {
                tracing::debug!(accepted, generation, "Terrain task queue full");
                break;
            }
            accepted += 1;
        }
        accepted
    }

    /// Cancel a pending or in-progress task. No-op if it already completed.
    pub fn cancel(&self, generation: u64, grid_position: IVec2) {
        if let Some((_, cancelled)) = self.active_tasks.remove(&(generation, grid_position)) {
            cancelled.store(true, Ordering::Relaxed);
        }
    }

    /// Cancel every pending task of `generation`.
    pub fn cancel_generation(&self, generation: u64) {
        self.active_tasks.retain(|key, cancelled| {
            if key.0 == generation {
                cancelled.store(true, Ordering::Relaxed);
                false
            } else {
                true
            }
        });
    }

    /// Cancel every pending task.
    pub fn cancel_all(&self) {
        for entry in self.active_tasks.iter() {
            entry.value().store(true, Ordering::Relaxed);
        }
        self.active_tasks.clear();
    }

    /// Drain all completed chunks. Call once per frame on the host thread.
    pub fn drain_results(&self) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        while let Ok(generated) = self.result_receiver.try_recv() {
            let key = (generated.generation, generated.chunk.grid_position);
            self.active_tasks.remove(&key);
            results.push(generated);
        }
        results
    }

    /// Number of tasks currently queued or executing.
    pub fn in_flight_count(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Returns `true` if a task for this key is pending and not cancelled.
    pub fn is_pending(&self, generation: u64, grid_position: IVec2) -> bool {
        self.active_tasks.contains_key(&(generation, grid_position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::Biome;
    use crate::seed::hash_chunk;
    use crate::terrain_config::TerrainConfig;
    use std::time::{Duration, Instant};

    fn grid(chunk_count: i32) -> Arc<ChunkGrid> {
        let config = TerrainConfig {
            chunk_count,
            detail_level: 4,
            ..Default::default()
        };
        Arc::new(ChunkGrid::new(&Biome::new("test"), &config))
    }

    fn collect(generator: &AsyncTerrainGenerator, expected: usize) -> Vec<GeneratedChunk> {
        let mut results = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(30);
        while results.len() < expected && Instant::now() < deadline {
            results.extend(generator.drain_results());
            if results.len() < expected {
                std::thread::sleep(Duration::from_millis(5));
            }
        }
        results
    }

    #[test]
    fn test_concurrent_generation_delivers_all() {
        let generator = AsyncTerrainGenerator::new(4, 32, 64).unwrap();
        let grid = grid(6);
        let submitted = generator.submit_grid(&grid, 1);
        assert!(submitted > 0);

        let received = collect(&generator, submitted);
        assert_eq!(
            received.len(),
            submitted,
            "Should receive all submitted chunks: got {}/{submitted}",
            received.len()
        );
    }

    #[test]
    fn test_background_chunks_match_direct_generation() {
        let generator = AsyncTerrainGenerator::new(2, 16, 16).unwrap();
        let grid = grid(2);
        let submitted = generator.submit_grid(&grid, 7);
        assert_eq!(submitted, 4);

        for generated in collect(&generator, submitted) {
            assert_eq!(generated.generation, 7);
            let direct = grid.generate_chunk(generated.chunk.grid_position);
            assert_eq!(hash_chunk(&generated.chunk), hash_chunk(&direct));
        }
    }

    #[test]
    fn test_cancellation_clears_pending() {
        let generator = AsyncTerrainGenerator::new(1, 64, 64).unwrap();
        let grid = grid(1);
        let _ = generator.submit_grid(&grid, 3);
        generator.cancel(3, IVec2::ZERO);
        assert!(!generator.is_pending(3, IVec2::ZERO));

        // The task may have completed before cancellation; either outcome is valid.
        std::thread::sleep(Duration::from_millis(100));
        let _ = generator.drain_results();
    }

    #[test]
    fn test_cancel_generation_only_touches_that_pass() {
        let generator = AsyncTerrainGenerator::new(1, 64, 64).unwrap();
        let grid = grid(2);
        let _ = generator.submit_grid(&grid, 1);
        let _ = generator.submit_grid(&grid, 2);
        generator.cancel_generation(1);

        for position in grid.chunk_positions() {
            assert!(!generator.is_pending(1, position));
        }
        let mut second_pass = 0;
        let deadline = Instant::now() + Duration::from_secs(30);
        while second_pass < 4 && Instant::now() < deadline {
            second_pass += generator
                .drain_results()
                .iter()
                .filter(|g| g.generation == 2)
                .count();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(second_pass, 4, "Uncancelled pass should deliver every chunk");
    }

    #[test]
    fn test_full_queue_returns_task() {
        let generator = AsyncTerrainGenerator::new(1, 1, 1).unwrap();
        let grid = grid(8);
        let accepted = generator.submit_grid(&grid, 0);
        assert!(accepted < 64, "A two-slot queue cannot take 64 tasks at once");

        generator.cancel_all();
        let deadline = Instant::now() + Duration::from_secs(10);
        while generator.in_flight_count() > 0 && Instant::now() < deadline {
            let _ = generator.drain_results();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(generator.in_flight_count(), 0);
    }

    #[test]
    fn test_in_flight_count() {
        let generator = AsyncTerrainGenerator::new(1, 64, 64).unwrap();
        assert_eq!(generator.in_flight_count(), 0);

        let grid = grid(3);
        let submitted = generator.submit_grid(&grid, 0);
        assert_eq!(submitted, 9);

        let results = collect(&generator, submitted);
        assert_eq!(results.len(), submitted);
        let deadline = Instant::now() + Duration::from_secs(10);
        while generator.in_flight_count() > 0 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(generator.in_flight_count(), 0);
    }
}
