// Enhanced overlay renderer: glowing markers layered over fake blocks.
//
// `GlowRenderer` wraps the base renderer by composition: it holds the base,
// forwards rendering to it, and observes every produced element through the
// hook — it never alters placements. For each observed element it records
// the fake appearance (and, for administrative-claim corners, a color
// override for emphasis), then spawns one client-local glowing marker per
// coordinate on a deferred schedule.
//
// Timing matters here. Marker creation is delayed by one scheduler tick so
// a rapid refresh replaces its markers without visible flicker; a second,
// later job re-checks the player's world and removes markers that would
// otherwise leak after a world change. Both jobs own a snapshot of what
// they need (player, pass number, coordinates, appearances, colors) and
// validate liveness at *execution* time — a pass superseded or reverted in
// the meantime turns them into no-ops.
//
// **Critical constraint: shared-state discipline.** The tracked-marker and
// override maps are written by the immediate calling thread and by the
// deferred jobs. Every access goes through the single `Mutex` around
// `GlowBook`; nothing holds the lock across a client call that could
// block.
//
// See also: `render.rs` for the hook contract, `scheduler.rs` for the
// deferred execution model, `session.rs` for who calls apply/revert.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use wardstone_world::block::{BlockMaterial, BlockState, MarkerColor};
use wardstone_world::types::{BlockCoord, PlayerId};
use wardstone_world::world::WorldView;

use crate::client::{MarkerHandle, OverlayClient};
use crate::config::VizConfig;
use crate::outline::{Boundary, VisualizationType};
use crate::render::{ElementHook, FakeBlockRenderer, OverlayElement};
use crate::scheduler::SchedulerHandle;

/// Marker color emphasis for administrative-claim corner blocks.
const ADMIN_CORNER_COLOR: MarkerColor = MarkerColor::Gold;

/// Tracked glow state, shared between the synchronous path and deferred
/// jobs. One coarse lock per renderer instance; contention is bounded by
/// per-player render frequency.
#[derive(Default)]
struct GlowBook {
    /// Monotonic render-pass counter per player. Deferred jobs carry the
    /// pass they were scheduled for and bail out when it is no longer
    /// current.
    passes: FxHashMap<PlayerId, u64>,
    /// Fake appearance per displayed coordinate, per player.
    fake_blocks: FxHashMap<PlayerId, FxHashMap<BlockCoord, BlockState>>,
    /// Style overrides for coordinates needing color emphasis.
    color_overrides: FxHashMap<PlayerId, FxHashMap<BlockCoord, MarkerColor>>,
    /// Handles of spawned markers, per player, keyed by coordinate.
    markers: FxHashMap<PlayerId, FxHashMap<BlockCoord, MarkerHandle>>,
}

/// Decorator over `FakeBlockRenderer` adding per-player glowing markers.
pub struct GlowRenderer {
    base: FakeBlockRenderer,
    client: Arc<dyn OverlayClient>,
    scheduler: SchedulerHandle,
    config: Arc<VizConfig>,
    book: Arc<Mutex<GlowBook>>,
}

impl GlowRenderer {
    pub fn new(
        base: FakeBlockRenderer,
        client: Arc<dyn OverlayClient>,
        scheduler: SchedulerHandle,
        config: Arc<VizConfig>,
    ) -> Self {
        Self {
            base,
            client,
            scheduler,
            config,
            book: Arc::new(Mutex::new(GlowBook::default())),
        }
    }

    /// Render one boundary for `player`: clear the player's previous
    /// markers immediately, delegate to the base render, send the fake
    /// blocks, and schedule marker creation. Returns the element list so
    /// the session can keep its revert bookkeeping.
    pub fn apply(
        &self,
        world: &Arc<dyn WorldView>,
        player: PlayerId,
        boundary: &Boundary,
        anchor: BlockCoord,
    ) -> Vec<OverlayElement> {
        // Synchronous clear: rapid repeated calls must never show two
        // marker sets at once. Also bumps the pass counter, turning any
        // still-scheduled job from the previous pass into a no-op.
        self.clear_markers(player);

        let mut recorder = GlowRecorder::new(boundary.kind);
        let elements = self
            .base
            .render_with_hook(world.as_ref(), boundary, anchor, &mut recorder);

        for element in &elements {
            self.client
                .send_block_display(player, element.coord, &element.replacement);
        }

        // The element list is fully sent before any deferred work is
        // scheduled, so no marker can exist for an unsent coordinate.
        let placements = self.record_pass(player, recorder);
        if !placements.is_empty() {
            self.schedule_marker_creation(world, player, placements);
        }

        elements
    }

    /// Remove all tracked markers for `player`, then optionally sweep other
    /// players' markers near them (config-gated hardening against platform
    /// races; only ever removes, never creates).
    pub fn revert(&self, player: PlayerId) {
        self.clear_markers(player);
        if self.config.cross_player_sweep {
            self.sweep_near(player);
        }
    }

    /// Incremental invalidation: the real block at `broken` changed under
    /// an active overlay. Removes exactly the coinciding marker and
    /// tracking entries — the exact coordinate or the one-block vertical
    /// offset some platforms render markers at to avoid z-fighting.
    pub fn handle_block_break(&self, player: PlayerId, broken: BlockCoord) {
        let candidates = [broken, broken.up(1)];
        let removed: Vec<MarkerHandle> = {
            let mut book = self.book.lock().expect("glow book poisoned");
            let mut removed = Vec::new();
            for coord in candidates {
                if let Some(markers) = book.markers.get_mut(&player)
                    && let Some(handle) = markers.remove(&coord)
                {
                    removed.push(handle);
                }
                if let Some(fakes) = book.fake_blocks.get_mut(&player) {
                    fakes.remove(&coord);
                }
                if let Some(overrides) = book.color_overrides.get_mut(&player) {
                    overrides.remove(&coord);
                }
            }
            removed
        };
        for handle in removed {
            self.client.remove_marker(player, handle);
        }
    }

    /// Number of live tracked markers for `player`.
    pub fn marker_count(&self, player: PlayerId) -> usize {
        self.book
            .lock()
            .expect("glow book poisoned")
            .markers
            .get(&player)
            .map_or(0, FxHashMap::len)
    }

    /// Drop all tracking for `player` and remove their markers. Removal is
    /// idempotent, so calling this for an already-disconnected player is
    /// harmless.
    fn clear_markers(&self, player: PlayerId) {
        let handles: Vec<MarkerHandle> = {
            let mut book = self.book.lock().expect("glow book poisoned");
            *book.passes.entry(player).or_insert(0) += 1;
            book.fake_blocks.remove(&player);
            book.color_overrides.remove(&player);
            book.markers
                .remove(&player)
                .map(|markers| markers.into_values().collect())
                .unwrap_or_default()
        };
        for handle in handles {
            self.client.remove_marker(player, handle);
        }
    }

    /// Store the recorder's observations under the player's current pass
    /// and return the marker placement snapshot for the deferred job.
    fn record_pass(&self, player: PlayerId, recorder: GlowRecorder) -> Vec<MarkerPlacement> {
        let mut book = self.book.lock().expect("glow book poisoned");
        let fakes = book.fake_blocks.entry(player).or_default();
        for (coord, state) in &recorder.placements {
            fakes.insert(*coord, *state);
        }
        let overrides = book.color_overrides.entry(player).or_default();
        for (coord, color) in &recorder.overrides {
            overrides.insert(*coord, *color);
        }

        recorder
            .placements
            .iter()
            .map(|(coord, state)| MarkerPlacement {
                coord: *coord,
                appearance: *state,
                color: overrides
                    .get(coord)
                    .copied()
                    .unwrap_or_else(|| state.material.marker_color()),
            })
            .collect()
    }

    fn schedule_marker_creation(
        &self,
        world: &Arc<dyn WorldView>,
        player: PlayerId,
        placements: Vec<MarkerPlacement>,
    ) {
        let pass = self.current_pass(player);
        let client = self.client.clone();
        let book = self.book.clone();
        let world = world.clone();
        let scheduler = self.scheduler.clone();
        let leak_guard_delay = self.config.leak_guard_delay_ticks;

        self.scheduler.run_later(self.config.marker_delay_ticks, move || {
            create_markers(&client, &book, &world, player, pass, &placements);

            // Follow-up leak guard: a player who changed world between
            // scheduling and now would otherwise keep phantom markers.
            let world_id = world.id();
            let guard_client = client.clone();
            let guard_book = book.clone();
            scheduler.run_later(leak_guard_delay, move || {
                if !pass_is_current(&guard_book, player, pass) {
                    return;
                }
                if guard_client.player_world(player) == Some(world_id) {
                    return;
                }
                let handles: Vec<MarkerHandle> = {
                    let mut book = guard_book.lock().expect("glow book poisoned");
                    book.markers
                        .remove(&player)
                        .map(|markers| markers.into_values().collect())
                        .unwrap_or_default()
                };
                if !handles.is_empty() {
                    log::debug!(
                        "leak guard removed {} markers for {player} after world change",
                        handles.len()
                    );
                }
                for handle in handles {
                    guard_client.remove_marker(player, handle);
                }
            });
        });
    }

    fn current_pass(&self, player: PlayerId) -> u64 {
        self.book
            .lock()
            .expect("glow book poisoned")
            .passes
            .get(&player)
            .copied()
            .unwrap_or(0)
    }

    /// Best-effort removal of *other* players' markers within the sweep
    /// radius of `player`'s position.
    fn sweep_near(&self, player: PlayerId) {
        let Some(center) = self.client.player_position(player) else {
            return;
        };
        let radius_sq = i64::from(self.config.sweep_radius).pow(2);
        let removals: Vec<(PlayerId, MarkerHandle)> = {
            let mut book = self.book.lock().expect("glow book poisoned");
            let mut removals = Vec::new();
            for (&other, markers) in book.markers.iter_mut() {
                if other == player {
                    continue;
                }
                let close: Vec<BlockCoord> = markers
                    .keys()
                    .filter(|coord| coord.distance_squared(center) <= radius_sq)
                    .copied()
                    .collect();
                for coord in close {
                    if let Some(handle) = markers.remove(&coord) {
                        removals.push((other, handle));
                    }
                }
            }
            removals
        };
        if !removals.is_empty() {
            log::debug!(
                "cross-player sweep removed {} markers near {player}",
                removals.len()
            );
        }
        for (other, handle) in removals {
            self.client.remove_marker(other, handle);
        }
    }
}

/// One marker the deferred job should create: an owned snapshot, no live
/// references back into engine state.
struct MarkerPlacement {
    coord: BlockCoord,
    appearance: BlockState,
    color: MarkerColor,
}

fn pass_is_current(book: &Arc<Mutex<GlowBook>>, player: PlayerId, pass: u64) -> bool {
    book.lock()
        .expect("glow book poisoned")
        .passes
        .get(&player)
        .copied()
        == Some(pass)
}

/// The deferred creation step. Liveness is checked here, at execution
/// time: a superseded pass or an offline player is a clean no-op.
fn create_markers(
    client: &Arc<dyn OverlayClient>,
    book: &Arc<Mutex<GlowBook>>,
    world: &Arc<dyn WorldView>,
    player: PlayerId,
    pass: u64,
    placements: &[MarkerPlacement],
) {
    if !pass_is_current(book, player, pass) {
        return;
    }
    if !client.is_online(player) {
        return;
    }

    for placement in placements {
        if !world.is_chunk_loaded(placement.coord) {
            log::debug!("skipping glow marker at {}: chunk not loaded", placement.coord);
            continue;
        }
        match client.spawn_marker(player, placement.coord, &placement.appearance, placement.color) {
            Ok(handle) => {
                let stale = {
                    let mut book = book.lock().expect("glow book poisoned");
                    if book.passes.get(&player).copied() == Some(pass) {
                        book.markers.entry(player).or_default().insert(placement.coord, handle);
                        false
                    } else {
                        true
                    }
                };
                // A newer pass started while we were spawning: this marker
                // belongs to a dead pass, take it straight back down.
                if stale {
                    client.remove_marker(player, handle);
                }
            }
            Err(cause) => {
                log::warn!(
                    "glow marker creation failed for {player} at {}: {cause}",
                    placement.coord
                );
            }
        }
    }
}

/// Hook recording element placements and admin-corner color overrides.
struct GlowRecorder {
    kind: VisualizationType,
    placements: Vec<(BlockCoord, BlockState)>,
    overrides: Vec<(BlockCoord, MarkerColor)>,
}

impl GlowRecorder {
    fn new(kind: VisualizationType) -> Self {
        Self {
            kind,
            placements: Vec::new(),
            overrides: Vec::new(),
        }
    }
}

impl ElementHook for GlowRecorder {
    fn on_element(&mut self, element: &OverlayElement) {
        self.placements.push((element.coord, element.replacement));
        // Administrative-claim corners need extra emphasis: glowstone's
        // default yellow reads poorly against the glow outline.
        if self.kind == VisualizationType::AdminClaim
            && element.replacement.material == BlockMaterial::Glowstone
        {
            self.overrides.push((element.coord, ADMIN_CORNER_COLOR));
        }
    }
}
