// Boundary outline generation: from a claim region to marker coordinates.
//
// Given a `Boundary` (region + visualization type) and the viewer's anchor
// point, produce the candidate coordinates for corner and side markers.
// Everything is capped by the *display zone* — a square of half-width
// `display_radius` centered on the anchor, spanning full world height —
// so a gigantic claim never produces more than a screenful of markers.
//
// The display-zone intersection is computed before any marker placement,
// and every generated coordinate outside the resolved zone is dropped
// here, never reaching the renderer.
//
// Height-bounded (3D) types draw their rings at both vertical extremes of
// the region, plus a vertical indicator one block above the bottom ring
// and one below the top ring at each corner — enough to convey "this is a
// volume" without drawing full columns. The restore-nature type speaks a
// different visual language: four quadrant-facing corners and four inward
// stubs, no ring markers.
//
// See also: `render.rs` which styles and snaps these coordinates,
// `style.rs` for the per-type block palette.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use wardstone_world::types::{BlockCoord, BoundingBox, Direction};
use wardstone_world::world::WorldView;

// ---------------------------------------------------------------------------
// Boundary model
// ---------------------------------------------------------------------------

/// The kind of boundary being visualized. Purely a style selector: carries
/// no geometry or permission meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualizationType {
    /// Ordinary subdivision inside a parent claim.
    Subdivision,
    /// Subdivision with its own vertical extent.
    Subdivision3D,
    /// Administrative claim.
    AdminClaim,
    /// Zone being initialized by a claim tool drag.
    InitializeZone,
    /// Overlap conflict with another claim.
    ConflictZone,
    /// Overlap conflict with its own vertical extent.
    ConflictZone3D,
    /// Restore-nature working area.
    RestoreNature,
}

impl VisualizationType {
    /// Every variant, for exhaustiveness tests and style-table iteration.
    pub const ALL: [VisualizationType; 7] = [
        Self::Subdivision,
        Self::Subdivision3D,
        Self::AdminClaim,
        Self::InitializeZone,
        Self::ConflictZone,
        Self::ConflictZone3D,
        Self::RestoreNature,
    ];

    /// Whether this type's region has a vertical extent that is a strict
    /// subset of world height, requiring top/bottom-specific rendering.
    pub fn height_bounded(self) -> bool {
        matches!(self, Self::Subdivision3D | Self::ConflictZone3D)
    }

    /// Height-bounded types must stay visible even mid-air, so their
    /// markers are placed exactly, bypassing terrain snapping.
    pub fn exact_placement(self) -> bool {
        self.height_bounded()
    }
}

/// Opaque reference into the external claim store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub u64);

/// One boundary to visualize: an immutable snapshot supplied by the caller
/// for a single visualization pass, never retained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub region: BoundingBox,
    pub kind: VisualizationType,
    /// The claim this boundary belongs to, if any. The engine never queries
    /// claim data itself; the reference only travels back out to callers.
    pub owning_claim: Option<ClaimId>,
}

impl Boundary {
    pub fn new(region: BoundingBox, kind: VisualizationType, owning_claim: Option<ClaimId>) -> Self {
        Self {
            region,
            kind,
            owning_claim,
        }
    }
}

// ---------------------------------------------------------------------------
// Outline output
// ---------------------------------------------------------------------------

/// One candidate marker coordinate, with an optional facing for
/// directional corner blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutlineMarker {
    pub coord: BlockCoord,
    pub facing: Option<Direction>,
}

impl OutlineMarker {
    fn at(coord: BlockCoord) -> Self {
        Self {
            coord,
            facing: None,
        }
    }

    fn facing(coord: BlockCoord, facing: Direction) -> Self {
        Self {
            coord,
            facing: Some(facing),
        }
    }
}

/// The generated outline: corner markers and side markers, deduplicated,
/// all inside the resolved display zone.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    pub corners: Vec<OutlineMarker>,
    pub sides: Vec<OutlineMarker>,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty() && self.sides.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate the outline for one boundary as seen from `anchor`.
///
/// Returns an empty outline when the display zone around the anchor does
/// not intersect the boundary's region — the boundary is simply too far
/// away to show anything.
pub fn outline(
    world: &dyn WorldView,
    boundary: &Boundary,
    anchor: BlockCoord,
    display_radius: i32,
) -> Outline {
    let display_zone = BoundingBox::new(
        BlockCoord::new(anchor.x - display_radius, world.min_y(), anchor.z - display_radius),
        BlockCoord::new(anchor.x + display_radius, world.max_y(), anchor.z + display_radius),
    );
    let Some(zone) = display_zone.intersection(&boundary.region) else {
        return Outline::default();
    };

    let region = boundary.region;
    // Reference height for single-ring types, clamped into the zone so a
    // viewer far above or below the region still gets a valid ring.
    let reference_y = anchor.y.clamp(zone.min().y, zone.max().y);

    let mut builder = OutlineBuilder::new(zone);

    if boundary.kind == VisualizationType::RestoreNature {
        generate_restore_nature(&region, reference_y, &mut builder);
        return builder.finish();
    }

    let heights: SmallVec<[i32; 2]> = if boundary.kind.height_bounded() {
        SmallVec::from_slice(&[region.min().y, region.max().y])
    } else {
        SmallVec::from_slice(&[reference_y])
    };

    for &h in &heights {
        generate_ring(&region, h, &mut builder);
    }

    if boundary.kind.height_bounded() && region.height() > 2 {
        // Vertical indicators: one above the bottom ring, one below the top
        // ring, at each corner.
        for (x, z) in horizontal_corners(&region) {
            builder.side(OutlineMarker::at(BlockCoord::new(x, region.min().y + 1, z)));
            builder.side(OutlineMarker::at(BlockCoord::new(x, region.max().y - 1, z)));
        }
    }

    builder.finish()
}

/// The four horizontal extremes of a region: NW, NE, SE, SW.
fn horizontal_corners(region: &BoundingBox) -> [(i32, i32); 4] {
    let (min, max) = (region.min(), region.max());
    [
        (min.x, min.z),
        (max.x, min.z),
        (max.x, max.z),
        (min.x, max.z),
    ]
}

/// One ring of corner + side markers at height `h`.
fn generate_ring(region: &BoundingBox, h: i32, builder: &mut OutlineBuilder) {
    let (min, max) = (region.min(), region.max());

    for (x, z) in horizontal_corners(region) {
        builder.corner(OutlineMarker::at(BlockCoord::new(x, h, z)));
    }

    // Side markers sit one block inward from each corner, per axis, and
    // only when that axis spans more than two blocks — otherwise they would
    // overlap the opposite corner.
    if region.width() > 2 {
        for z in [min.z, max.z] {
            builder.side(OutlineMarker::at(BlockCoord::new(min.x + 1, h, z)));
            builder.side(OutlineMarker::at(BlockCoord::new(max.x - 1, h, z)));
        }
    }
    if region.length() > 2 {
        for x in [min.x, max.x] {
            builder.side(OutlineMarker::at(BlockCoord::new(x, h, min.z + 1)));
            builder.side(OutlineMarker::at(BlockCoord::new(x, h, max.z - 1)));
        }
    }
}

/// The restore-nature visual language: four corners facing outward from
/// their quadrant, four inward stubs, no ring markers.
fn generate_restore_nature(region: &BoundingBox, h: i32, builder: &mut OutlineBuilder) {
    let (min, max) = (region.min(), region.max());

    builder.corner(OutlineMarker::facing(
        BlockCoord::new(min.x, h, min.z),
        Direction::North,
    ));
    builder.corner(OutlineMarker::facing(
        BlockCoord::new(max.x, h, min.z),
        Direction::East,
    ));
    builder.corner(OutlineMarker::facing(
        BlockCoord::new(max.x, h, max.z),
        Direction::South,
    ));
    builder.corner(OutlineMarker::facing(
        BlockCoord::new(min.x, h, max.z),
        Direction::West,
    ));

    if region.width() > 2 && region.length() > 2 {
        builder.side(OutlineMarker::at(BlockCoord::new(min.x + 1, h, min.z + 1)));
        builder.side(OutlineMarker::at(BlockCoord::new(max.x - 1, h, min.z + 1)));
        builder.side(OutlineMarker::at(BlockCoord::new(max.x - 1, h, max.z - 1)));
        builder.side(OutlineMarker::at(BlockCoord::new(min.x + 1, h, max.z - 1)));
    }
}

/// Collects markers, dropping anything outside the display zone and any
/// coordinate already emitted (corners win over sides).
struct OutlineBuilder {
    zone: BoundingBox,
    seen: FxHashSet<BlockCoord>,
    outline: Outline,
}

impl OutlineBuilder {
    fn new(zone: BoundingBox) -> Self {
        Self {
            zone,
            seen: FxHashSet::default(),
            outline: Outline::default(),
        }
    }

    fn corner(&mut self, marker: OutlineMarker) {
        if self.zone.contains(marker.coord) && self.seen.insert(marker.coord) {
            self.outline.corners.push(marker);
        }
    }

    fn side(&mut self, marker: OutlineMarker) {
        if self.zone.contains(marker.coord) && self.seen.insert(marker.coord) {
            self.outline.sides.push(marker);
        }
    }

    fn finish(self) -> Outline {
        self.outline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wardstone_world::types::WorldId;
    use wardstone_world::world::GridWorld;

    fn world() -> GridWorld {
        GridWorld::new(WorldId(0), 256, 128, 256)
    }

    fn full_height_region(world: &GridWorld, x1: i32, z1: i32, x2: i32, z2: i32) -> BoundingBox {
        BoundingBox::new(
            BlockCoord::new(x1, world.min_y(), z1),
            BlockCoord::new(x2, world.max_y(), z2),
        )
    }

    #[test]
    fn ten_by_ten_claim_from_center() {
        let world = world();
        let region = full_height_region(&world, 100, 100, 109, 109);
        let boundary = Boundary::new(region, VisualizationType::Subdivision, None);
        let anchor = BlockCoord::new(104, 64, 104);

        let outline = outline(&world, &boundary, anchor, 75);
        assert_eq!(outline.corners.len(), 4);
        // Width and length both exceed 2: two side markers per corner.
        assert_eq!(outline.sides.len(), 8);
        for marker in outline.corners.iter().chain(&outline.sides) {
            assert!(region.contains(marker.coord), "{} outside region", marker.coord);
            assert_eq!(marker.coord.y, 64);
        }
    }

    #[test]
    fn boundary_out_of_display_range_is_empty() {
        let world = world();
        // Claim edge 150 blocks from a viewer with radius 75.
        let region = full_height_region(&world, 200, 200, 220, 220);
        let boundary = Boundary::new(region, VisualizationType::Subdivision, None);
        let anchor = BlockCoord::new(50, 64, 50);

        let outline = outline(&world, &boundary, anchor, 75);
        assert!(outline.is_empty());
    }

    #[test]
    fn no_coordinate_escapes_the_display_zone() {
        let world = world();
        // Region much larger than the display zone.
        let region = full_height_region(&world, 0, 0, 255, 255);
        let boundary = Boundary::new(region, VisualizationType::AdminClaim, None);
        let anchor = BlockCoord::new(128, 64, 128);
        let radius = 20;

        let outline = outline(&world, &boundary, anchor, radius);
        for marker in outline.corners.iter().chain(&outline.sides) {
            assert!((marker.coord.x - anchor.x).abs() <= radius);
            assert!((marker.coord.z - anchor.z).abs() <= radius);
        }
    }

    #[test]
    fn height_bounded_rings_at_both_extremes() {
        let world = world();
        let region = BoundingBox::new(BlockCoord::new(100, 60, 100), BlockCoord::new(109, 70, 109));
        let boundary = Boundary::new(region, VisualizationType::Subdivision3D, None);
        let anchor = BlockCoord::new(104, 64, 104);

        let outline = outline(&world, &boundary, anchor, 75);

        // Corner/side markers only at Y=60 and Y=70, vertical indicators
        // only at Y=61 and Y=69.
        let mut ring_levels: Vec<i32> = outline.corners.iter().map(|m| m.coord.y).collect();
        ring_levels.sort_unstable();
        ring_levels.dedup();
        assert_eq!(ring_levels, vec![60, 70]);

        let indicator_count = outline
            .sides
            .iter()
            .filter(|m| m.coord.y == 61 || m.coord.y == 69)
            .count();
        assert_eq!(indicator_count, 8, "one indicator per corner per extreme");

        for marker in &outline.sides {
            assert!(
                matches!(marker.coord.y, 60 | 61 | 69 | 70),
                "unexpected side Y {}",
                marker.coord.y
            );
        }
        assert_eq!(outline.corners.len(), 8);
    }

    #[test]
    fn restore_nature_language() {
        let world = world();
        let region = full_height_region(&world, 100, 100, 109, 109);
        let boundary = Boundary::new(region, VisualizationType::RestoreNature, None);
        let anchor = BlockCoord::new(104, 64, 104);

        let outline = outline(&world, &boundary, anchor, 75);

        assert_eq!(outline.corners.len(), 4);
        let facings: FxHashSet<Direction> =
            outline.corners.iter().filter_map(|m| m.facing).collect();
        assert_eq!(facings.len(), 4, "each corner faces its own quadrant");

        // SE corner faces south, NW corner faces north.
        let se = outline
            .corners
            .iter()
            .find(|m| m.coord.x == 109 && m.coord.z == 109)
            .unwrap();
        assert_eq!(se.facing, Some(Direction::South));
        let nw = outline
            .corners
            .iter()
            .find(|m| m.coord.x == 100 && m.coord.z == 100)
            .unwrap();
        assert_eq!(nw.facing, Some(Direction::North));

        // No ring side markers — only the four diagonal stubs.
        assert_eq!(outline.sides.len(), 4);
        for stub in &outline.sides {
            assert!(matches!(stub.coord.x, 101 | 108));
            assert!(matches!(stub.coord.z, 101 | 108));
        }
    }

    #[test]
    fn narrow_region_suppresses_sides_on_that_axis_only() {
        let world = world();
        // 2 wide on X, 10 long on Z.
        let region = full_height_region(&world, 100, 100, 101, 109);
        let boundary = Boundary::new(region, VisualizationType::Subdivision, None);
        let anchor = BlockCoord::new(100, 64, 104);

        let outline = outline(&world, &boundary, anchor, 75);
        assert_eq!(outline.corners.len(), 4);
        // Only the Z-axis sides survive.
        assert_eq!(outline.sides.len(), 4);
        for marker in &outline.sides {
            assert!(matches!(marker.coord.z, 101 | 108));
        }
    }

    #[test]
    fn tiny_region_deduplicates_overlapping_markers() {
        let world = world();
        // 3x3: the inward side markers from opposite corners coincide.
        let region = full_height_region(&world, 100, 100, 102, 102);
        let boundary = Boundary::new(region, VisualizationType::Subdivision, None);
        let anchor = BlockCoord::new(101, 64, 101);

        let outline = outline(&world, &boundary, anchor, 75);
        let mut coords: Vec<BlockCoord> = outline
            .corners
            .iter()
            .chain(&outline.sides)
            .map(|m| m.coord)
            .collect();
        let total = coords.len();
        coords.sort_unstable();
        coords.dedup();
        assert_eq!(coords.len(), total, "no coordinate may appear twice");
    }

    #[test]
    fn partial_zone_clips_far_corners() {
        let world = world();
        let region = full_height_region(&world, 100, 100, 160, 160);
        let boundary = Boundary::new(region, VisualizationType::Subdivision, None);
        // Viewer near the NW corner; the SE corner is out of range.
        let anchor = BlockCoord::new(102, 64, 102);

        let outline = outline(&world, &boundary, anchor, 20);
        assert!(!outline.is_empty());
        for marker in outline.corners.iter().chain(&outline.sides) {
            assert!((marker.coord.x - anchor.x).abs() <= 20);
            assert!((marker.coord.z - anchor.z).abs() <= 20);
        }
        // The NW corner itself is visible.
        assert!(
            outline
                .corners
                .iter()
                .any(|m| m.coord.x == 100 && m.coord.z == 100)
        );
    }
}
