// Read-only world access and a dense in-memory grid world.
//
// `WorldView` is the live-world collaborator interface: the engine reads
// block appearances and chunk-load status through it and never writes.
// The host game adapts its own world type to this trait; `GridWorld` is a
// dense implementation backed by a flat `Vec<BlockState>` (index =
// x + z * size_x + y * size_x * size_z) used by tests and headless runs.
// Out-of-bounds reads return air; out-of-bounds writes are no-ops.
//
// Chunk-load status is tracked per 16x16 column. `GridWorld` starts fully
// loaded and lets tests unload columns through a shared reference, since
// the deferred marker path probes load status from another thread.
//
// **Critical constraint: the engine never mutates real world state.** The
// only world writes in this crate are `GridWorld`'s own test/headless
// setters, which model the *external* mutation the engine must tolerate.

use crate::block::{BlockMaterial, BlockState};
use crate::types::{BlockCoord, WorldId};
use rustc_hash::FxHashSet;
use std::sync::Mutex;

/// Side length of a chunk column in blocks.
const CHUNK_SIZE: i32 = 16;

/// The chunk column containing a coordinate.
fn chunk_of(coord: BlockCoord) -> (i32, i32) {
    (coord.x.div_euclid(CHUNK_SIZE), coord.z.div_euclid(CHUNK_SIZE))
}

/// Read access to a live, externally-mutated world.
///
/// Implementations must be shareable across threads: the deferred marker
/// path checks chunk-load status outside the main simulation context.
pub trait WorldView: Send + Sync {
    /// Appearance of the block at `coord`. Out-of-range coordinates report air.
    fn block_at(&self, coord: BlockCoord) -> BlockState;

    /// Whether the chunk column containing `coord` is currently loaded.
    fn is_chunk_loaded(&self, coord: BlockCoord) -> bool;

    /// Lowest buildable Y coordinate.
    fn min_y(&self) -> i32;

    /// Highest buildable Y coordinate.
    fn max_y(&self) -> i32;

    /// Identity of this world, compared by the marker leak guard.
    fn id(&self) -> WorldId;
}

/// Dense in-memory world grid.
pub struct GridWorld {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    blocks: Vec<BlockState>,
    size_x: u32,
    size_y: u32,
    size_z: u32,
    id: WorldId,
    /// Chunk columns currently unloaded. Interior mutability so tests can
    /// toggle load status through the shared `Arc` the engine holds.
    unloaded: Mutex<FxHashSet<(i32, i32)>>,
}

impl GridWorld {
    /// Create a world of the given size filled with air, fully loaded.
    pub fn new(id: WorldId, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockState::AIR; total],
            size_x,
            size_y,
            size_z,
            id,
            unloaded: Mutex::new(FxHashSet::default()),
        }
    }

    /// Create a world with a solid floor of the given material filling
    /// every column from Y=0 up to and including `floor_y`.
    pub fn with_floor(id: WorldId, size: (u32, u32, u32), floor_y: i32, material: BlockMaterial) -> Self {
        let mut world = Self::new(id, size.0, size.1, size.2);
        for x in 0..size.0 as i32 {
            for z in 0..size.2 as i32 {
                for y in 0..=floor_y {
                    world.set(BlockCoord::new(x, y, z), BlockState::of(material));
                }
            }
        }
        world
    }

    fn index(&self, coord: BlockCoord) -> Option<usize> {
        let in_bounds = coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y
            && (coord.z as u32) < self.size_z;
        if in_bounds {
            let x = coord.x as usize;
            let y = coord.y as usize;
            let z = coord.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Write a block. No-op for out-of-bounds coordinates.
    pub fn set(&mut self, coord: BlockCoord, state: BlockState) {
        if let Some(i) = self.index(coord) {
            self.blocks[i] = state;
        }
    }

    /// Mark the chunk column containing `coord` loaded or unloaded.
    /// Takes `&self` so tests can toggle through a shared reference.
    pub fn set_chunk_loaded(&self, coord: BlockCoord, loaded: bool) {
        let mut unloaded = self.unloaded.lock().expect("chunk set poisoned");
        if loaded {
            unloaded.remove(&chunk_of(coord));
        } else {
            unloaded.insert(chunk_of(coord));
        }
    }
}

impl WorldView for GridWorld {
    fn block_at(&self, coord: BlockCoord) -> BlockState {
        self.index(coord)
            .map(|i| self.blocks[i])
            .unwrap_or(BlockState::AIR)
    }

    fn is_chunk_loaded(&self, coord: BlockCoord) -> bool {
        !self
            .unloaded
            .lock()
            .expect("chunk set poisoned")
            .contains(&chunk_of(coord))
    }

    fn min_y(&self) -> i32 {
        0
    }

    fn max_y(&self) -> i32 {
        self.size_y as i32 - 1
    }

    fn id(&self) -> WorldId {
        self.id
    }
}
