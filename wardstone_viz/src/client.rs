// Platform send/marker collaborator interface.
//
// The engine never talks to the game's network layer directly. Everything
// client-visible goes through `OverlayClient`: per-player fake block
// displays and per-player glowing marker objects, both removable later.
// Implementations adapt the host platform's packet layer; every effect is
// client-local and nothing persists in shared world state.
//
// Implementations must be shareable across threads — the deferred marker
// path spawns and removes markers outside the main simulation context.

use wardstone_world::block::{BlockState, MarkerColor};
use wardstone_world::types::{BlockCoord, PlayerId, WorldId};

/// Opaque handle to one spawned glow-marker object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

/// Client-local display operations supplied by the platform layer.
pub trait OverlayClient: Send + Sync {
    /// Show `appearance` at `coord` for `player` only. Re-sending the
    /// block's real appearance reverts the substitution.
    fn send_block_display(&self, player: PlayerId, coord: BlockCoord, appearance: &BlockState);

    /// Spawn a client-local glowing marker at `coord`, visible to `player`
    /// only. Errors are per-marker and non-fatal to the caller.
    fn spawn_marker(
        &self,
        player: PlayerId,
        coord: BlockCoord,
        appearance: &BlockState,
        color: MarkerColor,
    ) -> Result<MarkerHandle, String>;

    /// Remove a previously spawned marker. Idempotent: removing a handle
    /// twice, or after the player left, is a no-op.
    fn remove_marker(&self, player: PlayerId, handle: MarkerHandle);

    /// Whether the player is currently connected.
    fn is_online(&self, player: PlayerId) -> bool;

    /// The world the player is currently in, if online.
    fn player_world(&self, player: PlayerId) -> Option<WorldId>;

    /// The player's current block position, if online.
    fn player_position(&self, player: PlayerId) -> Option<BlockCoord>;
}
