// Base overlay renderer: the "fake block" layer.
//
// Composes the outline generator, the style palette, and the snap resolver
// into a list of `OverlayElement`s — one client-visible block substitution
// each. The renderer is pure: it produces the element list and fires the
// per-element hook, nothing else. Sending elements to the player and
// remembering original states for revert is the session's job, in
// cooperation with the platform client.
//
// The hook exists for decorators: the glow layer observes every placement
// through it without being able to alter the elements.
//
// See also: `outline.rs`, `style.rs`, `snap.rs` for the composed parts,
// `glow.rs` for the decorator, `session.rs` for send/revert bookkeeping.

use rustc_hash::FxHashSet;
use wardstone_world::block::{BlockMaterial, BlockState};
use wardstone_world::types::BlockCoord;
use wardstone_world::world::WorldView;

use crate::config::VizConfig;
use crate::outline::{self, Boundary, OutlineMarker};
use crate::snap;
use crate::style;

/// One client-visible block substitution: the fake appearance shown at a
/// coordinate, paired with the original so it can be restored on revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayElement {
    pub coord: BlockCoord,
    pub original: BlockState,
    pub replacement: BlockState,
}

/// Observer for element placements. Fired once per element, after the
/// element is final; observers cannot alter placements.
pub trait ElementHook {
    fn on_element(&mut self, element: &OverlayElement);
}

/// Hook that ignores everything, for undecorated rendering.
pub struct NoopHook;

impl ElementHook for NoopHook {
    fn on_element(&mut self, _element: &OverlayElement) {}
}

/// The base renderer. Stateless between passes; all tunables come from the
/// config it was built with.
pub struct FakeBlockRenderer {
    display_radius: i32,
}

impl FakeBlockRenderer {
    pub fn new(config: &VizConfig) -> Self {
        Self {
            display_radius: config.display_radius,
        }
    }

    /// Render one boundary as seen from `anchor` into overlay elements.
    pub fn render(
        &self,
        world: &dyn WorldView,
        boundary: &Boundary,
        anchor: BlockCoord,
    ) -> Vec<OverlayElement> {
        self.render_with_hook(world, boundary, anchor, &mut NoopHook)
    }

    /// Render, firing `hook` once per produced element.
    pub fn render_with_hook(
        &self,
        world: &dyn WorldView,
        boundary: &Boundary,
        anchor: BlockCoord,
        hook: &mut dyn ElementHook,
    ) -> Vec<OverlayElement> {
        // The submerged hint is computed once per pass from the viewer's
        // own anchor point, not per element.
        let submerged = world.block_at(anchor).material == BlockMaterial::Water;

        let outline = outline::outline(world, boundary, anchor, self.display_radius);

        let mut elements = Vec::with_capacity(outline.corners.len() + outline.sides.len());
        let mut occupied: FxHashSet<BlockCoord> = FxHashSet::default();
        let mut emit = |marker: &OutlineMarker, replacement: BlockState| {
            let coord = if boundary.kind.exact_placement() {
                marker.coord
            } else {
                snap::display_location(world, marker.coord, submerged)
            };
            // Two markers may snap onto the same surface block; the first
            // (a corner, given emission order) wins.
            if !occupied.insert(coord) {
                return;
            }
            let element = OverlayElement {
                coord,
                original: world.block_at(coord),
                replacement,
            };
            hook.on_element(&element);
            elements.push(element);
        };

        for marker in &outline.corners {
            emit(marker, style::corner_block(boundary.kind, marker.facing));
        }
        for marker in &outline.sides {
            emit(marker, style::side_block(boundary.kind));
        }

        elements
    }
}
