// End-to-end integration tests for the overlay pipeline.
//
// Each test wires the real engine (session manager, glow layer, scheduler
// thread, grid world) to the in-memory platform client and verifies the
// full path: apply → fake blocks sent → deferred markers created →
// invalidation/revert → everything restored. These exercise the same code
// paths as a live embedding — the only test-specific code is MemoryClient
// and the synchronous drain wrapper in TestStage.

use visualization_tests::TestStage;
use wardstone_viz::config::{MarkerSupport, VizConfig};
use wardstone_viz::outline::{Boundary, VisualizationType};
use wardstone_world::block::{BlockMaterial, BlockState, MarkerColor};
use wardstone_world::types::{BlockCoord, BoundingBox, PlayerId, WorldId};

const WORLD: WorldId = WorldId(1);
const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);

fn stage() -> TestStage {
    let stage = TestStage::new(WORLD, VizConfig::default());
    stage
        .client
        .connect(ALICE, WORLD, BlockCoord::new(104, 11, 104));
    stage
}

fn full_height_boundary(x1: i32, z1: i32, x2: i32, z2: i32, kind: VisualizationType) -> Boundary {
    Boundary::new(
        BoundingBox::new(BlockCoord::new(x1, 0, z1), BlockCoord::new(x2, 127, z2)),
        kind,
        None,
    )
}

fn anchor() -> BlockCoord {
    BlockCoord::new(104, 11, 104)
}

// ---------------------------------------------------------------------------
// Test scenarios
// ---------------------------------------------------------------------------

/// Apply a claim overlay, break one visualized block, revert. The player's
/// view must end exactly where it started, minus the broken coordinate's
/// restore (the real block changed, nothing to restore there).
#[test]
fn full_lifecycle_apply_break_revert() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);

    let shown = stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    assert_eq!(shown, 12);
    stage.drain();
    assert_eq!(stage.client.live_marker_count(), 12);

    // Mine through the boundary at the NW corner.
    let broken = BlockCoord::new(100, 10, 100);
    stage.manager.handle_block_break(ALICE, broken);
    assert_eq!(stage.client.live_marker_count(), 11);
    assert_eq!(stage.manager.active_element_count(ALICE), 11);

    stage.manager.revert(ALICE);
    assert!(!stage.manager.is_active(ALICE));
    assert_eq!(stage.client.live_marker_count(), 0);
    // A surviving side coordinate was restored to grass.
    assert_eq!(
        stage.client.displayed(ALICE, BlockCoord::new(101, 10, 100)),
        Some(BlockState::of(BlockMaterial::GrassBlock))
    );
    stage.stop();
}

/// Two players with overlapping overlays never interfere: each sees their
/// own markers, and one player's revert leaves the other's overlay intact.
#[test]
fn two_players_see_independent_overlays() {
    let stage = stage();
    stage
        .client
        .connect(BOB, WORLD, BlockCoord::new(110, 11, 110));

    let alice_boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);
    let bob_boundary = full_height_boundary(105, 105, 114, 114, VisualizationType::AdminClaim);

    stage
        .manager
        .apply(&stage.world, ALICE, &alice_boundary, anchor())
        .unwrap();
    stage
        .manager
        .apply(&stage.world, BOB, &bob_boundary, BlockCoord::new(110, 11, 110))
        .unwrap();
    stage.drain();

    assert_eq!(stage.client.marker_coords(ALICE).len(), 12);
    assert_eq!(stage.client.marker_coords(BOB).len(), 12);

    stage.manager.revert(ALICE);
    assert!(stage.client.marker_coords(ALICE).is_empty());
    assert_eq!(
        stage.client.marker_coords(BOB).len(),
        12,
        "Bob's overlay must survive Alice's revert"
    );
    // Bob still sees his glowstone corner even where the regions overlap.
    assert_eq!(
        stage.client.displayed(BOB, BlockCoord::new(105, 10, 105)),
        Some(BlockState::of(BlockMaterial::Glowstone))
    );
    stage.stop();
}

/// Spec scenario: a height-bounded subdivision from Y=60 to Y=70 draws its
/// rings only at the extremes, with vertical indicators one block inside.
#[test]
fn height_bounded_subdivision_marks_only_the_extremes() {
    let stage = stage();
    let boundary = Boundary::new(
        BoundingBox::new(BlockCoord::new(100, 60, 100), BlockCoord::new(109, 70, 109)),
        VisualizationType::Subdivision3D,
        None,
    );

    stage
        .manager
        .apply(&stage.world, ALICE, &boundary, BlockCoord::new(104, 64, 104))
        .unwrap();
    stage.drain();

    let iron = stage.client.displayed_material_coords(ALICE, BlockMaterial::IronBlock);
    let wool = stage.client.displayed_material_coords(ALICE, BlockMaterial::WhiteWool);
    assert_eq!(iron.len(), 8, "four corners per extreme");
    assert!(iron.iter().all(|c| c.y == 60 || c.y == 70));
    assert!(wool.iter().all(|c| matches!(c.y, 60 | 61 | 69 | 70)));
    assert!(
        wool.iter().any(|c| c.y == 61) && wool.iter().any(|c| c.y == 69),
        "vertical indicators must appear one block inside the extremes"
    );
    stage.stop();
}

/// Spec scenario: a viewer 200 blocks from a claim whose edge is 150 blocks
/// away sees nothing at radius 75 — and no markers are ever scheduled.
#[test]
fn distant_boundary_shows_nothing() {
    let stage = stage();
    let boundary = full_height_boundary(200, 200, 220, 220, VisualizationType::Subdivision);

    let shown = stage
        .manager
        .apply(&stage.world, ALICE, &boundary, BlockCoord::new(20, 11, 20))
        .unwrap();
    stage.drain();

    assert_eq!(shown, 0);
    assert!(!stage.manager.is_active(ALICE));
    assert_eq!(stage.client.live_marker_count(), 0);
    stage.stop();
}

/// Spec scenario: restore-nature boundaries speak their own language —
/// four quadrant-facing terracotta corners, no ring side markers.
#[test]
fn restore_nature_end_to_end() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::RestoreNature);

    stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();

    let corners = stage
        .client
        .displayed_material_coords(ALICE, BlockMaterial::GlazedTerracotta);
    assert_eq!(corners.len(), 4);
    let stubs = stage
        .client
        .displayed_material_coords(ALICE, BlockMaterial::EmeraldBlock);
    assert_eq!(stubs.len(), 4);
    // Stubs sit diagonally inward, never on the ring.
    for stub in &stubs {
        assert!(matches!(stub.x, 101 | 108));
        assert!(matches!(stub.z, 101 | 108));
    }
    stage.stop();
}

/// Administrative-claim corners get the emphasized marker color.
#[test]
fn admin_corners_get_emphasized_markers() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::AdminClaim);

    stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();

    let colors = stage.client.marker_colors(ALICE);
    let gold = colors.iter().filter(|c| **c == MarkerColor::Gold).count();
    // 4 glowstone corners emphasized gold; 8 pumpkin sides are gold by the
    // material table as well.
    assert_eq!(gold, 12);
    stage.stop();
}

/// A refresh storm — repeated applies of the same boundary without waiting
/// for deferred work — must leave exactly one marker set and one element set.
#[test]
fn refresh_storm_leaves_a_single_overlay() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);

    let mut shown = 0;
    for _ in 0..5 {
        shown = stage
            .manager
            .apply(&stage.world, ALICE, &boundary, anchor())
            .unwrap();
    }
    stage.drain();

    assert_eq!(stage.manager.active_element_count(ALICE), shown);
    assert_eq!(stage.client.live_marker_count(), shown);
    stage.stop();
}

/// Disconnect tears everything down without sending display traffic to the
/// gone player.
#[test]
fn disconnect_clears_all_session_state() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);

    stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();

    stage.client.disconnect(ALICE);
    stage.manager.handle_disconnect(ALICE);

    assert!(!stage.manager.is_active(ALICE));
    assert_eq!(stage.client.live_marker_count(), 0);
    // No restore was sent: the last display for the corner is still the
    // fake block (the client is gone; its view no longer matters).
    assert_eq!(
        stage.client.displayed(ALICE, BlockCoord::new(100, 10, 100)),
        Some(BlockState::of(BlockMaterial::IronBlock))
    );
    // A fresh apply after reconnect starts a clean session.
    stage
        .client
        .connect(ALICE, WORLD, BlockCoord::new(104, 11, 104));
    let shown = stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();
    assert_eq!(shown, 12);
    assert_eq!(stage.client.live_marker_count(), 12);
    stage.stop();
}

/// Platforms without marker support still get the full fake-block layer.
#[test]
fn unsupported_marker_platform_runs_base_layer_only() {
    let config = VizConfig {
        marker_support: MarkerSupport::Unsupported,
        ..VizConfig::default()
    };
    let stage = TestStage::new(WORLD, config);
    stage
        .client
        .connect(ALICE, WORLD, BlockCoord::new(104, 11, 104));
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);

    let shown = stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();

    assert_eq!(shown, 12);
    assert_eq!(stage.client.live_marker_count(), 0);
    assert_eq!(
        stage.client.displayed(ALICE, BlockCoord::new(100, 10, 100)),
        Some(BlockState::of(BlockMaterial::IronBlock))
    );

    stage.manager.revert(ALICE);
    assert_eq!(
        stage.client.displayed(ALICE, BlockCoord::new(100, 10, 100)),
        Some(BlockState::of(BlockMaterial::GrassBlock))
    );
    stage.stop();
}

/// Per-marker platform rejections skip that marker and keep its siblings.
#[test]
fn marker_rejection_spares_siblings() {
    let stage = stage();
    let boundary = full_height_boundary(100, 100, 109, 109, VisualizationType::Subdivision);
    stage.client.fail_spawn_at(BlockCoord::new(100, 10, 100));

    let shown = stage
        .manager
        .apply(&stage.world, ALICE, &boundary, anchor())
        .unwrap();
    stage.drain();

    assert_eq!(shown, 12);
    assert_eq!(stage.client.live_marker_count(), 11);
    stage.stop();
}
