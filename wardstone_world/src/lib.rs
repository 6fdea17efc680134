// wardstone_world — spatial primitives and world access for Wardstone.
//
// This crate is the leaf of the workspace: block coordinates, bounding
// boxes, block materials/states, and the read-only `WorldView` abstraction
// the visualization engine reads the live world through. It has no
// dependency on the engine and can be tested headless.
//
// Module overview:
// - `types.rs`: BlockCoord, BoundingBox, Direction, PlayerId, WorldId.
// - `block.rs`: BlockMaterial (+ shape predicates), BlockState, MarkerColor.
// - `world.rs`: WorldView trait + GridWorld dense in-memory implementation.
//
// The companion crate `wardstone_viz` builds the boundary visualization
// engine on top of these types. That boundary is enforced at the compiler
// level — this crate knows nothing about claims, overlays, or rendering.

pub mod block;
pub mod types;
pub mod world;
