// Terrain snap resolution: where should an overlay block actually appear?
//
// Outline coordinates are geometric — they mark where a claim edge *is*,
// not where a fake block is *visible*. This module relocates each candidate
// coordinate to the nearest visually sensible surface in two stages:
//
// 1. `resolve()` inspects the material/shape currently occupying the
//    candidate and returns a `SnapDecision` from a fixed rule table.
//    Deterministic: same state + same submerged hint, same decision.
// 2. `display_location()` applies the decision against the live world,
//    falling through to `visible_location()` — the general search that
//    walks up or down until the overlay block would cling to a visible
//    surface.
//
// The `submerged` hint is computed once per render pass from the viewer's
// own anchor point. It decides whether water counts as see-through: a
// diver's outline stays inside the water body, a surface viewer's outline
// sits on top of it.
//
// See also: `block.rs` in wardstone_world for the material predicates,
// `render.rs` for the per-element call site.

use wardstone_world::block::{BlockHalf, BlockMaterial, BlockState};
use wardstone_world::types::BlockCoord;
use wardstone_world::world::WorldView;

/// Where to project an overlay element relative to its candidate coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapDecision {
    /// Display exactly at the candidate.
    Keep,
    /// Display one block above the candidate.
    Above,
    /// Display two blocks above the candidate.
    TwoAbove,
    /// Search upward through the liquid column to its surface.
    ColumnSurface,
    /// Search downward through the water column to the seabed.
    ColumnSeabed,
    /// No material-specific override: run the general visibility search.
    Search,
}

/// Material-driven snap rules, in priority order.
pub fn resolve(state: &BlockState, submerged: bool) -> SnapDecision {
    let material = state.material;

    // Bisected shapes: land the marker on the half actually touching the
    // ground. A missing half property is treated conservatively: clear the
    // tallest possible shape.
    if material.is_bisected() {
        return match state.half {
            Some(BlockHalf::Lower) => SnapDecision::Keep,
            Some(BlockHalf::Upper) => SnapDecision::Above,
            None => SnapDecision::TwoAbove,
        };
    }

    // Thin, decorative, or functional shapes: the general search would walk
    // straight past them.
    if material.snaps_to_self() {
        return SnapDecision::Keep;
    }

    if material == BlockMaterial::Lava {
        return SnapDecision::ColumnSurface;
    }

    // Underwater: a submerged viewer keeps the outline inside the water
    // body; a surface viewer gets flora snapped down onto the seabed.
    if submerged && (material.is_underwater_flora() || material == BlockMaterial::Water) {
        return SnapDecision::Keep;
    }
    if material.is_underwater_flora() {
        return SnapDecision::ColumnSeabed;
    }

    SnapDecision::Search
}

/// Resolve a candidate coordinate to the coordinate where the overlay
/// element should be displayed.
pub fn display_location(world: &dyn WorldView, candidate: BlockCoord, submerged: bool) -> BlockCoord {
    let state = world.block_at(candidate);
    match resolve(&state, submerged) {
        SnapDecision::Keep => candidate,
        SnapDecision::Above => candidate.up(1),
        SnapDecision::TwoAbove => candidate.up(2),
        SnapDecision::ColumnSurface => column_surface(world, candidate),
        SnapDecision::ColumnSeabed => column_seabed(world, candidate),
        SnapDecision::Search => visible_location(world, candidate, submerged),
    }
}

/// First non-liquid coordinate above a liquid column, bounded by world height.
fn column_surface(world: &dyn WorldView, start: BlockCoord) -> BlockCoord {
    let mut cur = start;
    while cur.y < world.max_y() && world.block_at(cur).material.is_liquid() {
        cur = cur.up(1);
    }
    cur
}

/// Lowest flora/liquid coordinate of a water column — the block resting on
/// the seabed — bounded by world depth.
fn column_seabed(world: &dyn WorldView, start: BlockCoord) -> BlockCoord {
    let mut cur = start;
    loop {
        if cur.y <= world.min_y() {
            return cur;
        }
        let below = world.block_at(cur.down(1)).material;
        if below.is_liquid() || below.is_underwater_flora() {
            cur = cur.down(1);
        } else {
            return cur;
        }
    }
}

/// General visibility search: walk vertically until the overlay block would
/// cling to a visible surface.
///
/// Direction is chosen by the starting block: transparent means the surface
/// is below us, opaque means we are inside terrain and must climb out. The
/// walk continues while the current position is transparent or the block
/// above it is opaque, i.e. it terminates at the first position that is
/// itself solid with open sky directly above — or at a world boundary.
pub fn visible_location(world: &dyn WorldView, start: BlockCoord, water_transparent: bool) -> BlockCoord {
    let step = if world.block_at(start).material.is_transparent(water_transparent) {
        -1
    } else {
        1
    };

    let mut cur = start;
    while cur.y > world.min_y()
        && cur.y < world.max_y() - 1
        && (!world
            .block_at(cur.up(1))
            .material
            .is_transparent(water_transparent)
            || world.block_at(cur).material.is_transparent(water_transparent))
    {
        cur = cur.offset(0, step, 0);
    }
    cur
}
