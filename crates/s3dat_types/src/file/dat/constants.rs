//! DAT container format constants.
//!
//! This module contains the fixed byte literals and identifier values of the
//! container layout: the constant header prefix, the per-category index tags,
//! and the sequence header marker.

/// First fixed run of the file header (offset 0, 33 bytes).
///
/// Followed by the pixel-format magic of the concrete
/// [`DatFileType`](super::DatFileType), then [`FILE_START2`].
pub const FILE_START1: [u8; 33] = [
	0x04, 0x13, 0x04, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x54, 0x00, 0x00,
	0x00, 0x20, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00,
	0x00, 0x00, 0x00,
];

/// Second fixed run of the file header, directly before the file-size field (10 bytes)
pub const FILE_START2: [u8; 10] = [0x00, 0x00, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Fixed run closing the header, after the eight category-table offsets (12 bytes)
pub const FILE_HEADER_END: [u8; 12] =
	[0x04, 0x19, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Marker every sequence header starts with (7 bytes, followed by the `u8` frame count)
pub const SEQUENCE_START: [u8; 7] = [0x02, 0x14, 0x00, 0x00, 0x08, 0x00, 0x00];

/// Number of category-table offset slots in the file header
pub const SEQUENCE_TYPE_COUNT: usize = 8;

/// Size of one animation record on disk (12 little-endian 16-bit fields)
pub const ANIMATION_RECORD_SIZE: usize = 24;

/// Index tag for an unused header slot (skipped without error)
pub const ID_NONE: u32 = 0x1904;

/// Index tag for the palette block (not an image category, skipped)
pub const ID_PALETTE: u32 = 0x2607;

/// Index tag for settler (body) sequences
pub const ID_SETTLERS: u32 = 0x106;

/// Index tag for torso overlay sequences
pub const ID_TORSOS: u32 = 0x3112;

/// Index tag for landscape tile images
pub const ID_LANDSCAPE: u32 = 0x2412;

/// Index tag for shadow overlay sequences
pub const ID_SHADOWS: u32 = 0x5982;

/// Index tag for fullscreen GUI images
pub const ID_GUIS: u32 = 0x11306;

/// Index tag for animation scripts
pub const ID_ANIMATIONINFO: u32 = 0x21702;
