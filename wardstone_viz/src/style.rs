// Per-type block styles for fake corner and side blocks.
//
// `VisualizationType` is a closed enumeration and both lookups match it
// exhaustively — adding a new type is a compile error here until a style
// row exists, so nothing can silently fall through to a default look.
// The height-bounded variants share their flat counterpart's palette.

use wardstone_world::block::{BlockMaterial, BlockState};
use wardstone_world::types::Direction;

use crate::outline::VisualizationType;

/// The fake block displayed at a corner of the given boundary type.
///
/// `facing` is honored only by styles with a directional corner block
/// (restore-nature's glazed terracotta); everything else ignores it.
pub fn corner_block(kind: VisualizationType, facing: Option<Direction>) -> BlockState {
    match kind {
        VisualizationType::Subdivision | VisualizationType::Subdivision3D => {
            BlockState::of(BlockMaterial::IronBlock)
        }
        VisualizationType::AdminClaim => BlockState::of(BlockMaterial::Glowstone),
        VisualizationType::InitializeZone => BlockState::of(BlockMaterial::DiamondBlock),
        VisualizationType::ConflictZone | VisualizationType::ConflictZone3D => {
            BlockState::of(BlockMaterial::RedstoneOre)
        }
        VisualizationType::RestoreNature => match facing {
            Some(facing) => BlockState::facing(BlockMaterial::GlazedTerracotta, facing),
            None => BlockState::of(BlockMaterial::GlazedTerracotta),
        },
    }
}

/// The fake block displayed along the sides of the given boundary type.
pub fn side_block(kind: VisualizationType) -> BlockState {
    match kind {
        VisualizationType::Subdivision | VisualizationType::Subdivision3D => {
            BlockState::of(BlockMaterial::WhiteWool)
        }
        VisualizationType::AdminClaim => BlockState::of(BlockMaterial::Pumpkin),
        VisualizationType::InitializeZone => BlockState::of(BlockMaterial::DiamondBlock),
        VisualizationType::ConflictZone | VisualizationType::ConflictZone3D => {
            BlockState::of(BlockMaterial::Netherrack)
        }
        VisualizationType::RestoreNature => BlockState::of(BlockMaterial::EmeraldBlock),
    }
}
