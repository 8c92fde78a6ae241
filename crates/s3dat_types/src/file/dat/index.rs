//! Category index tables.
//!
//! The file header names eight index-table offsets. Each table starts with a
//! `u32` category tag, a `u16` byte count, a `u16` pointer count, and then
//! `pointer_count` absolute `u32` sequence offsets. The tag, not the header
//! slot position, decides which category a table belongs to.

use log::warn;

use super::constants;
use super::cursor::ByteCursor;
use crate::file::DatError;

/// Image and script categories a container can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceCategory {
	/// Actor body sprite sequences
	Settlers,
	/// Torso overlay sequences (player-colored parts)
	Torsos,
	/// Drop-shadow overlay sequences
	Shadows,
	/// Terrain tile images
	Landscape,
	/// Fullscreen GUI images
	Gui,
	/// Animation scripts referencing other containers
	AnimationInfo,
}

impl SequenceCategory {
	/// On-disk tag of this category.
	pub const fn tag(self) -> u32 {
		match self {
			SequenceCategory::Settlers => constants::ID_SETTLERS,
			SequenceCategory::Torsos => constants::ID_TORSOS,
			SequenceCategory::Shadows => constants::ID_SHADOWS,
			SequenceCategory::Landscape => constants::ID_LANDSCAPE,
			SequenceCategory::Gui => constants::ID_GUIS,
			SequenceCategory::AnimationInfo => constants::ID_ANIMATIONINFO,
		}
	}

	/// Maps an on-disk tag to its category, if the tag is known.
	pub fn from_tag(tag: u32) -> Option<Self> {
		match tag {
			constants::ID_SETTLERS => Some(SequenceCategory::Settlers),
			constants::ID_TORSOS => Some(SequenceCategory::Torsos),
			constants::ID_SHADOWS => Some(SequenceCategory::Shadows),
			constants::ID_LANDSCAPE => Some(SequenceCategory::Landscape),
			constants::ID_GUIS => Some(SequenceCategory::Gui),
			constants::ID_ANIMATIONINFO => Some(SequenceCategory::AnimationInfo),
			_ => None,
		}
	}
}

impl std::fmt::Display for SequenceCategory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			SequenceCategory::Settlers => write!(f, "settler"),
			SequenceCategory::Torsos => write!(f, "torso"),
			SequenceCategory::Shadows => write!(f, "shadow"),
			SequenceCategory::Landscape => write!(f, "landscape"),
			SequenceCategory::Gui => write!(f, "gui"),
			SequenceCategory::AnimationInfo => write!(f, "animation info"),
		}
	}
}

/// A parsed index table: its raw tag and the per-sequence offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexBlock {
	pub tag: u32,
	pub pointers: Vec<u32>,
}

/// Reads the index table at `offset`.
///
/// Returns `None` for the none/palette tags, which occupy header slots
/// without carrying image sequences.
///
/// # Errors
///
/// Returns [`DatError::FormatMismatch`] when the byte count does not equal
/// `4 * pointer_count + 8`, or a read error for a truncated table.
pub(crate) fn read_index_block(
	cursor: &mut ByteCursor,
	offset: u32,
) -> Result<Option<IndexBlock>, DatError> {
	cursor.seek(u64::from(offset))?;

	let tag = cursor.read_u32()?;
	if tag == constants::ID_NONE || tag == constants::ID_PALETTE {
		return Ok(None);
	}

	let count_offset = cursor.position();
	let byte_count = cursor.read_u16()?;
	let pointer_count = cursor.read_u16()?;

	if u32::from(byte_count) != u32::from(pointer_count) * 4 + 8 {
		return Err(DatError::inconsistent_index_block(count_offset, byte_count, pointer_count));
	}

	let mut pointers = Vec::with_capacity(usize::from(pointer_count));
	for _ in 0..pointer_count {
		pointers.push(cursor.read_u32()?);
	}

	if SequenceCategory::from_tag(tag).is_none() {
		warn!(
			"unknown sequence category tag {:#x} at offset {:#x} ({} pointers), ignoring",
			tag,
			offset,
			pointers.len()
		);
	}

	Ok(Some(IndexBlock {
		tag,
		pointers,
	}))
}
