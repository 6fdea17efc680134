// Data-driven engine configuration.
//
// All tunable visualization parameters live here in `VizConfig`, loaded
// from JSON at startup and never mutated at runtime. The engine never uses
// magic numbers — it reads from the config.
//
// `marker_support` deserves a note: whether the platform can spawn glowing
// marker objects is a process-wide fact resolved *once* by the embedder at
// startup (probing its display API) and stored here immutably, rather than
// being detected lazily behind a mutable static. Components receive it by
// reference through the config.
//
// See also: `session.rs` which owns the config, `glow.rs` for the
// deferred-marker timings, `scheduler.rs` for the tick clock driven by
// `tick_duration_ms`.

use serde::{Deserialize, Serialize};

/// Whether the platform supports spawning client-local glowing markers.
/// Resolved once at startup by the embedder; `Unsupported` limits the
/// engine to the fake-block layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerSupport {
    Supported,
    Unsupported,
}

/// Top-level engine configuration. Loaded from JSON, never mutated at runtime.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VizConfig {
    /// Half-width, in blocks, of the square display zone centered on the
    /// viewer's anchor point. Caps element count for very large claims.
    pub display_radius: i32,

    /// Delay, in scheduler ticks, before deferred marker creation runs.
    /// One tick is the minimum the platform allows and avoids visible
    /// flicker when an overlay is refreshed rapidly.
    pub marker_delay_ticks: u64,

    /// Delay, in scheduler ticks, between marker creation and the follow-up
    /// check that removes markers if the player has changed world.
    pub leak_guard_delay_ticks: u64,

    /// Number of real-world milliseconds per scheduler tick.
    pub tick_duration_ms: u64,

    /// Whether glowing markers are available on this platform.
    pub marker_support: MarkerSupport,

    /// Whether `revert` additionally sweeps other players' markers near the
    /// reverting player. Off by default: the per-pass liveness checks make
    /// cross-session leakage unreachable in normal operation, so this is
    /// hardening against platform races only.
    pub cross_player_sweep: bool,

    /// Radius, in blocks, of the cross-player sweep.
    pub sweep_radius: i32,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            display_radius: 75,
            marker_delay_ticks: 1,
            leak_guard_delay_ticks: 4,
            tick_duration_ms: 50,
            marker_support: MarkerSupport::Supported,
            cross_player_sweep: false,
            sweep_radius: 100,
        }
    }
}

impl VizConfig {
    /// Load a config from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid config JSON: {e}"))
    }
}
