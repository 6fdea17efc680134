// Test-only platform client and stage for overlay integration tests.
//
// Wraps the real engine (`OverlaySessionManager`, `Scheduler`, `GridWorld`)
// with an in-memory `MemoryClient` standing in for the platform's packet
// layer, providing a synchronous, test-friendly API for exercising the
// full overlay pipeline: apply → deferred markers → invalidation → revert.
//
// The only test-specific code here is the `MemoryClient` recording double
// and the `wait_idle` wrapper around the scheduler. All geometry, snapping,
// bookkeeping, and deferred-marker logic uses the same code paths as a
// live embedding.
//
// See also: `tests/full_pipeline.rs` for the integration test scenarios.

use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wardstone_viz::client::{MarkerHandle, OverlayClient};
use wardstone_viz::config::VizConfig;
use wardstone_viz::scheduler::Scheduler;
use wardstone_viz::session::OverlaySessionManager;
use wardstone_world::block::{BlockMaterial, BlockState, MarkerColor};
use wardstone_world::types::{BlockCoord, PlayerId, WorldId};
use wardstone_world::world::{GridWorld, WorldView};

/// Default timeout for draining deferred work.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// MemoryClient — in-memory platform double
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryState {
    online: FxHashSet<PlayerId>,
    worlds: FxHashMap<PlayerId, WorldId>,
    positions: FxHashMap<PlayerId, BlockCoord>,
    /// Last appearance sent per (player, coord).
    displays: FxHashMap<(PlayerId, BlockCoord), BlockState>,
    live_markers: FxHashMap<MarkerHandle, (PlayerId, BlockCoord, MarkerColor)>,
    next_handle: u64,
    failing_spawns: FxHashSet<BlockCoord>,
}

/// Records every client-visible effect so tests can assert on exactly what
/// a player would see. Spawn failures and player state are injectable.
#[derive(Default)]
pub struct MemoryClient {
    state: Mutex<MemoryState>,
}

impl MemoryClient {
    pub fn connect(&self, player: PlayerId, world: WorldId, position: BlockCoord) {
        let mut s = self.state.lock().unwrap();
        s.online.insert(player);
        s.worlds.insert(player, world);
        s.positions.insert(player, position);
    }

    pub fn disconnect(&self, player: PlayerId) {
        let mut s = self.state.lock().unwrap();
        s.online.remove(&player);
        s.worlds.remove(&player);
        s.positions.remove(&player);
    }

    pub fn move_to_world(&self, player: PlayerId, world: WorldId) {
        self.state.lock().unwrap().worlds.insert(player, world);
    }

    pub fn fail_spawn_at(&self, coord: BlockCoord) {
        self.state.lock().unwrap().failing_spawns.insert(coord);
    }

    /// Last appearance displayed to `player` at `coord`, if any was ever sent.
    pub fn displayed(&self, player: PlayerId, coord: BlockCoord) -> Option<BlockState> {
        self.state.lock().unwrap().displays.get(&(player, coord)).copied()
    }

    /// Coordinates currently showing a fake (non-original) appearance of
    /// the given material for `player`.
    pub fn displayed_material_coords(&self, player: PlayerId, material: BlockMaterial) -> Vec<BlockCoord> {
        let s = self.state.lock().unwrap();
        let mut coords: Vec<BlockCoord> = s
            .displays
            .iter()
            .filter(|((p, _), state)| *p == player && state.material == material)
            .map(|((_, c), _)| *c)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Coordinates of live markers visible to `player`, sorted.
    pub fn marker_coords(&self, player: PlayerId) -> Vec<BlockCoord> {
        let s = self.state.lock().unwrap();
        let mut coords: Vec<BlockCoord> = s
            .live_markers
            .values()
            .filter(|(p, _, _)| *p == player)
            .map(|(_, c, _)| *c)
            .collect();
        coords.sort_unstable();
        coords
    }

    /// Colors of live markers visible to `player`.
    pub fn marker_colors(&self, player: PlayerId) -> Vec<MarkerColor> {
        let s = self.state.lock().unwrap();
        s.live_markers
            .values()
            .filter(|(p, _, _)| *p == player)
            .map(|(_, _, color)| *color)
            .collect()
    }

    pub fn live_marker_count(&self) -> usize {
        self.state.lock().unwrap().live_markers.len()
    }
}

impl OverlayClient for MemoryClient {
    fn send_block_display(&self, player: PlayerId, coord: BlockCoord, appearance: &BlockState) {
        self.state
            .lock()
            .unwrap()
            .displays
            .insert((player, coord), *appearance);
    }

    fn spawn_marker(
        &self,
        player: PlayerId,
        coord: BlockCoord,
        _appearance: &BlockState,
        color: MarkerColor,
    ) -> Result<MarkerHandle, String> {
        let mut s = self.state.lock().unwrap();
        if s.failing_spawns.contains(&coord) {
            return Err("platform rejected marker".into());
        }
        s.next_handle += 1;
        let handle = MarkerHandle(s.next_handle);
        s.live_markers.insert(handle, (player, coord, color));
        Ok(handle)
    }

    fn remove_marker(&self, _player: PlayerId, handle: MarkerHandle) {
        self.state.lock().unwrap().live_markers.remove(&handle);
    }

    fn is_online(&self, player: PlayerId) -> bool {
        self.state.lock().unwrap().online.contains(&player)
    }

    fn player_world(&self, player: PlayerId) -> Option<WorldId> {
        self.state.lock().unwrap().worlds.get(&player).copied()
    }

    fn player_position(&self, player: PlayerId) -> Option<BlockCoord> {
        self.state.lock().unwrap().positions.get(&player).copied()
    }
}

// ---------------------------------------------------------------------------
// TestStage — the full engine wired to the in-memory platform
// ---------------------------------------------------------------------------

/// A complete engine instance on an in-memory world and platform client.
pub struct TestStage {
    pub manager: OverlaySessionManager,
    pub client: Arc<MemoryClient>,
    pub world: Arc<dyn WorldView>,
    pub grid: Arc<GridWorld>,
    scheduler: Option<Scheduler>,
}

impl TestStage {
    /// Wire the engine to a flat grass world of the given id. The tick is
    /// shortened so deferred work drains quickly in tests.
    pub fn new(world_id: WorldId, mut config: VizConfig) -> Self {
        config.tick_duration_ms = 1;
        let grid = Arc::new(GridWorld::with_floor(
            world_id,
            (256, 128, 256),
            10,
            BlockMaterial::GrassBlock,
        ));
        let client = Arc::new(MemoryClient::default());
        let scheduler = Scheduler::start(Duration::from_millis(config.tick_duration_ms));
        let manager = OverlaySessionManager::new(config, client.clone(), scheduler.handle());
        Self {
            manager,
            client,
            world: grid.clone(),
            grid,
            scheduler: Some(scheduler),
        }
    }

    /// Block until all deferred marker work has run.
    pub fn drain(&self) {
        let handle = self
            .scheduler
            .as_ref()
            .expect("stage already stopped")
            .handle();
        assert!(handle.wait_idle(DRAIN_TIMEOUT), "deferred work did not drain");
    }

    /// Shut the scheduler thread down.
    pub fn stop(mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }
}
