// wardstone_viz — claim boundary visualization engine.
//
// Renders an otherwise invisible claim boundary as temporary, player-local
// fake terrain: a base layer of per-player block substitutions, optionally
// decorated with client-local glowing markers. The engine never mutates
// real, shared world state — every effect is scoped to one observing
// player and fully reversible.
//
// Module overview:
// - `config.rs`:    VizConfig — all tunables, loaded from JSON at startup.
// - `snap.rs`:      SnapDecision + terrain snapping / visibility search.
// - `outline.rs`:   Boundary, VisualizationType, outline generation.
// - `style.rs`:     Per-type fake block palette (exhaustive, no fallthrough).
// - `client.rs`:    OverlayClient — the platform send/marker collaborator.
// - `render.rs`:    FakeBlockRenderer + OverlayElement + decorator hook.
// - `scheduler.rs`: Deferred-task scheduler for the glow layer.
// - `glow.rs`:      GlowRenderer — marker decorator over the base renderer.
// - `session.rs`:   OverlaySessionManager — per-player overlay lifecycle.
//
// The companion crate `wardstone_world` supplies the spatial primitives
// and the read-only `WorldView` the engine observes the live world
// through. Claim data, permissions, commands, and event plumbing live
// outside this workspace entirely; the engine receives finished
// `Boundary` snapshots and a viewer anchor, nothing more.

pub mod client;
pub mod config;
pub mod glow;
pub mod outline;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod snap;
pub mod style;
