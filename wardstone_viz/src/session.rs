// Per-player overlay session lifecycle.
//
// `OverlaySessionManager` is the entry point the platform's event plumbing
// drives. It tracks, per player, the authoritative set of currently
// displayed overlay elements and walks the session state machine:
//
//   Idle   --apply-->   Active    (elements computed, sent, recorded)
//   Active --apply-->   Active    (supersede: stale coordinates restored)
//   Active --break-->   Active    (that one element forgotten)
//   Active --revert-->  Idle      (every element restored, markers gone)
//
// Re-entering `apply` while Active never leaks: the element map is swapped
// atomically under the book lock, and anything from the previous pass that
// the new pass does not cover is restored to its original appearance.
// Applying a boundary that resolves to an empty outline (too far from the
// viewer) tears the previous overlay down and returns the player to Idle.
//
// The manager is shared behind `Arc` between the main simulation context
// and disconnect/mutation event handlers, so the element book sits behind
// the same coarse per-instance locking the glow layer uses.
//
// Failures local to one element never propagate; only session-level
// preconditions (player offline) short-circuit an `apply`. Nothing here is
// surfaced to the end user — callers get a `Result` and decide.
//
// See also: `render.rs` for element production, `glow.rs` for the marker
// layer driven from here.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wardstone_world::types::{BlockCoord, PlayerId};
use wardstone_world::world::WorldView;

use crate::client::OverlayClient;
use crate::config::{MarkerSupport, VizConfig};
use crate::glow::GlowRenderer;
use crate::outline::Boundary;
use crate::render::{FakeBlockRenderer, OverlayElement};
use crate::scheduler::SchedulerHandle;

#[derive(Default)]
struct SessionBook {
    /// Authoritative per-player element set for the current render pass.
    active: FxHashMap<PlayerId, BTreeMap<BlockCoord, OverlayElement>>,
}

/// Lifecycle controller for all per-player boundary overlays.
pub struct OverlaySessionManager {
    renderer: FakeBlockRenderer,
    glow: Option<GlowRenderer>,
    client: Arc<dyn OverlayClient>,
    book: Arc<Mutex<SessionBook>>,
}

impl OverlaySessionManager {
    /// Build a manager from config. The glow layer is attached only when
    /// the platform reported marker support at startup.
    pub fn new(
        config: VizConfig,
        client: Arc<dyn OverlayClient>,
        scheduler: SchedulerHandle,
    ) -> Self {
        let config = Arc::new(config);
        let glow = match config.marker_support {
            MarkerSupport::Supported => Some(GlowRenderer::new(
                FakeBlockRenderer::new(&config),
                client.clone(),
                scheduler,
                config.clone(),
            )),
            MarkerSupport::Unsupported => None,
        };
        Self {
            renderer: FakeBlockRenderer::new(&config),
            glow,
            client,
            book: Arc::new(Mutex::new(SessionBook::default())),
        }
    }

    /// Visualize `boundary` for `player` as seen from `anchor`. Returns
    /// the number of elements now displayed; zero means the boundary is
    /// out of display range and the player is Idle.
    pub fn apply(
        &self,
        world: &Arc<dyn WorldView>,
        player: PlayerId,
        boundary: &Boundary,
        anchor: BlockCoord,
    ) -> Result<usize, String> {
        if !self.client.is_online(player) {
            return Err(format!("{player} is not online"));
        }

        let elements = match &self.glow {
            Some(glow) => glow.apply(world, player, boundary, anchor),
            None => {
                let elements = self.renderer.render(world.as_ref(), boundary, anchor);
                for element in &elements {
                    self.client
                        .send_block_display(player, element.coord, &element.replacement);
                }
                elements
            }
        };
        let shown = elements.len();

        // Atomic supersession: swap the element map in one lock scope, then
        // restore whatever the new pass no longer covers. The two sets are
        // disjoint, so restore order relative to the new sends is
        // unobservable.
        let stale: Vec<OverlayElement> = {
            let mut book = self.book.lock().expect("session book poisoned");
            let new_map: BTreeMap<BlockCoord, OverlayElement> =
                elements.into_iter().map(|e| (e.coord, e)).collect();
            let old = book.active.remove(&player).unwrap_or_default();
            let stale = old
                .into_values()
                .filter(|e| !new_map.contains_key(&e.coord))
                .collect();
            if !new_map.is_empty() {
                book.active.insert(player, new_map);
            }
            stale
        };
        for element in &stale {
            self.client
                .send_block_display(player, element.coord, &element.original);
        }

        Ok(shown)
    }

    /// Tear the player's overlay down: restore every displayed coordinate
    /// to its original appearance and remove every marker.
    pub fn revert(&self, player: PlayerId) {
        if let Some(glow) = &self.glow {
            glow.revert(player);
        }
        let restored = self.take_active(player);
        if self.client.is_online(player) {
            for element in restored.values() {
                self.client
                    .send_block_display(player, element.coord, &element.original);
            }
        }
    }

    /// External signal: the player disconnected. Clears all bookkeeping
    /// without sending restores — there is no client to restore.
    pub fn handle_disconnect(&self, player: PlayerId) {
        if let Some(glow) = &self.glow {
            glow.revert(player);
        }
        self.take_active(player);
    }

    /// External signal: the real block at `broken` changed. If it was part
    /// of an active overlay, forget exactly that element (the world change
    /// is already visible client-side) and drop its marker.
    pub fn handle_block_break(&self, player: PlayerId, broken: BlockCoord) {
        {
            let mut book = self.book.lock().expect("session book poisoned");
            if let Some(elements) = book.active.get_mut(&player) {
                elements.remove(&broken);
            }
        }
        if let Some(glow) = &self.glow {
            glow.handle_block_break(player, broken);
        }
    }

    /// Whether the player currently has an active overlay.
    pub fn is_active(&self, player: PlayerId) -> bool {
        self.book
            .lock()
            .expect("session book poisoned")
            .active
            .contains_key(&player)
    }

    /// Number of elements currently displayed to the player.
    pub fn active_element_count(&self, player: PlayerId) -> usize {
        self.book
            .lock()
            .expect("session book poisoned")
            .active
            .get(&player)
            .map_or(0, BTreeMap::len)
    }

    fn take_active(&self, player: PlayerId) -> BTreeMap<BlockCoord, OverlayElement> {
        self.book
            .lock()
            .expect("session book poisoned")
            .active
            .remove(&player)
            .unwrap_or_default()
    }
}
