// Block materials, appearance snapshots, and marker colors.
//
// `BlockMaterial` is a closed enumeration of every material the engine
// distinguishes. The snap resolver only cares about a handful of shape
// categories, so the predicate methods here (`snaps_to_self`,
// `is_transparent`, `is_bisected`, ...) are the single source of truth for
// material classification — the resolver never matches on raw variants.
//
// `BlockState` is the opaque appearance snapshot carried by overlay
// elements: material plus the optional half/facing properties the display
// layer needs to reproduce the block faithfully.
//
// See also: `wardstone_viz`'s snap resolver for the rules driven by these
// predicates, and its style palette for the display materials.

use crate::types::Direction;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// Every block material the visualization engine distinguishes.
///
/// This is not the full material registry of the host game — only the
/// categories the snap resolver, the visibility search, and the style
/// palette need to tell apart. Anything else the host world reports is
/// mapped to the closest entry here by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockMaterial {
    // Terrain and generic solids.
    Air,
    Stone,
    Dirt,
    GrassBlock,
    Sand,

    // Liquids.
    Water,
    Lava,

    // Underwater flora.
    Seagrass,
    TallSeagrass,
    Kelp,

    // See-through structural shapes. The visibility search walks past these.
    Fence,
    FenceGate,
    Sign,
    WallSign,
    Wall,
    Glass,

    // Bisected shapes occupying two vertical blocks.
    Door,
    TallPlant,

    // Thin, decorative, or functional shapes that always display in place:
    // the ground search would walk past them incorrectly.
    Bed,
    Bell,
    Lantern,
    Campfire,
    EndPortalFrame,
    PointedDripstone,
    Candle,
    AmethystCluster,
    GlassPane,
    Anvil,
    Chest,
    Trapdoor,
    PressurePlate,
    IronBars,
    Scaffolding,
    FlowerPot,
    SweetBerryBush,
    Chain,
    Composter,
    Cauldron,
    Cake,
    Carpet,
    Banner,
    TurtleEgg,
    SculkSensor,
    Cactus,
    Bamboo,
    DaylightDetector,
    Grindstone,
    Lectern,
    EnchantingTable,
    Stonecutter,

    // Display materials used by the style palette for fake blocks.
    Glowstone,
    IronBlock,
    WhiteWool,
    Pumpkin,
    DiamondBlock,
    RedstoneOre,
    Netherrack,
    GlazedTerracotta,
    EmeraldBlock,
    GoldBlock,
}

impl BlockMaterial {
    /// Whether the visibility search may walk through this material.
    ///
    /// Water only counts as transparent when the viewer's own anchor point
    /// was submerged at visualization start (`water_counts`), so an outline
    /// viewed from underwater stays inside the water body instead of
    /// snapping to the surface.
    pub fn is_transparent(self, water_counts: bool) -> bool {
        match self {
            Self::Air
            | Self::Fence
            | Self::FenceGate
            | Self::Sign
            | Self::WallSign
            | Self::Wall
            | Self::Glass
            | Self::TallPlant
            | Self::Seagrass
            | Self::TallSeagrass
            | Self::Kelp => true,
            Self::Water => water_counts,
            _ => false,
        }
    }

    pub fn is_liquid(self) -> bool {
        matches!(self, Self::Water | Self::Lava)
    }

    /// Shapes occupying two vertical blocks with a lower and an upper half.
    pub fn is_bisected(self) -> bool {
        matches!(self, Self::Door | Self::TallPlant)
    }

    /// Plants that only exist inside a water column.
    pub fn is_underwater_flora(self) -> bool {
        matches!(self, Self::Seagrass | Self::TallSeagrass | Self::Kelp)
    }

    /// The fixed catalog of thin, decorative, or functional shapes that
    /// always display exactly where they are. These are visually too small
    /// for the ground search, which would walk past them.
    pub fn snaps_to_self(self) -> bool {
        matches!(
            self,
            Self::Bed
                | Self::Bell
                | Self::Lantern
                | Self::Campfire
                | Self::EndPortalFrame
                | Self::PointedDripstone
                | Self::Candle
                | Self::AmethystCluster
                | Self::GlassPane
                | Self::Anvil
                | Self::Chest
                | Self::Trapdoor
                | Self::PressurePlate
                | Self::IronBars
                | Self::Scaffolding
                | Self::FlowerPot
                | Self::SweetBerryBush
                | Self::Chain
                | Self::Composter
                | Self::Cauldron
                | Self::Cake
                | Self::Carpet
                | Self::Banner
                | Self::TurtleEgg
                | Self::SculkSensor
                | Self::Cactus
                | Self::Bamboo
                | Self::DaylightDetector
                | Self::Grindstone
                | Self::Lectern
                | Self::EnchantingTable
                | Self::Stonecutter
        )
    }

    /// Glow color for markers layered on a fake block of this material.
    /// Only display materials have a specific color; everything else takes
    /// the default.
    pub fn marker_color(self) -> MarkerColor {
        match self {
            Self::Glowstone => MarkerColor::Yellow,
            Self::IronBlock | Self::WhiteWool => MarkerColor::White,
            Self::Pumpkin | Self::GoldBlock => MarkerColor::Gold,
            Self::DiamondBlock => MarkerColor::Aqua,
            Self::RedstoneOre | Self::Netherrack => MarkerColor::Red,
            Self::EmeraldBlock => MarkerColor::Green,
            Self::GlazedTerracotta => MarkerColor::Orange,
            _ => MarkerColor::White,
        }
    }
}

// ---------------------------------------------------------------------------
// Block states
// ---------------------------------------------------------------------------

/// Which half of a bisected shape a block occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockHalf {
    Lower,
    Upper,
}

/// An appearance snapshot: material plus the properties the display layer
/// needs to reproduce it. Cheap to copy; equality by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub material: BlockMaterial,
    /// Set for bisected shapes, `None` otherwise.
    pub half: Option<BlockHalf>,
    /// Set for directional display blocks, `None` otherwise.
    pub facing: Option<Direction>,
}

impl BlockState {
    pub const fn of(material: BlockMaterial) -> Self {
        Self {
            material,
            half: None,
            facing: None,
        }
    }

    pub const fn with_half(material: BlockMaterial, half: BlockHalf) -> Self {
        Self {
            material,
            half: Some(half),
            facing: None,
        }
    }

    pub const fn facing(material: BlockMaterial, facing: Direction) -> Self {
        Self {
            material,
            half: None,
            facing: Some(facing),
        }
    }

    pub const AIR: BlockState = BlockState::of(BlockMaterial::Air);
}

// ---------------------------------------------------------------------------
// Marker colors
// ---------------------------------------------------------------------------

/// Glow color for client-local marker objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerColor {
    White,
    Yellow,
    Gold,
    Orange,
    Red,
    Green,
    Aqua,
}
