//! Animation scripts and cross-container composition.
//!
//! The animation-info category stores scripts instead of images. A script is
//! a `u32` record count followed by fixed 24-byte records; the records sit in
//! the file in reverse playback order and are flipped on load, so index 0 of
//! a decoded script is the first frame to draw.
//!
//! A record does not reference images in its own container. It names a
//! numeric container file id per part (body, torso, shadow), which is why
//! composing a script needs a [`DatFileResolver`] mapping file ids to open
//! containers.

use std::collections::HashMap;

use log::warn;

use super::DatFile;
use super::cursor::ByteCursor;
use super::image::SettlerFrame;
use super::sequence::Sequence;
use crate::file::DatError;

/// Torso id marking "no torso" in animation records.
const TORSO_NONE: u16 = 0xFFFF;

/// One frame of an animation script.
///
/// All fields come straight from the 24-byte wire record: two signed
/// position words, eight unsigned reference words, two signed sound flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrameInfo {
	/// Horizontal draw position of the composed frame
	pub pos_x: i16,
	/// Vertical draw position of the composed frame
	pub pos_y: i16,
	/// Settler sequence index of the body
	pub object_id: u16,
	/// Container file id holding the body
	pub object_file: u16,
	/// Torso sequence index, `0`/`0xFFFF` for none
	pub torso_id: u16,
	/// Container file id holding the torso
	pub torso_file: u16,
	/// Shadow sequence index, `0` for none
	pub shadow_id: u16,
	/// Container file id holding the shadow
	pub shadow_file: u16,
	/// Frame index within the body sequence (also used for the shadow)
	pub object_frame: u16,
	/// Frame index within the torso sequence
	pub torso_frame: u16,
	/// First sound trigger flag
	pub sound_flag1: i16,
	/// Second sound trigger flag
	pub sound_flag2: i16,
}

impl AnimationFrameInfo {
	/// Reads one record at the cursor position.
	pub(crate) fn read(cursor: &mut ByteCursor) -> Result<Self, DatError> {
		Ok(Self {
			pos_x: cursor.read_i16()?,
			pos_y: cursor.read_i16()?,
			object_id: cursor.read_u16()?,
			object_file: cursor.read_u16()?,
			torso_id: cursor.read_u16()?,
			torso_file: cursor.read_u16()?,
			shadow_id: cursor.read_u16()?,
			shadow_file: cursor.read_u16()?,
			object_frame: cursor.read_u16()?,
			torso_frame: cursor.read_u16()?,
			sound_flag1: cursor.read_i16()?,
			sound_flag2: cursor.read_i16()?,
		})
	}

	/// Returns true when the record asks for a torso overlay.
	pub fn wants_torso(&self) -> bool {
		self.torso_id > 0 && self.torso_id != TORSO_NONE
	}

	/// Returns true when the record asks for a shadow overlay.
	pub fn wants_shadow(&self) -> bool {
		self.shadow_id > 0
	}
}

impl std::fmt::Display for AnimationFrameInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"pos ({}, {}), object {}:{} frame {}, torso {}:{} frame {}, shadow {}:{}, sound ({}, {})",
			self.pos_x,
			self.pos_y,
			self.object_file,
			self.object_id,
			self.object_frame,
			self.torso_file,
			self.torso_id,
			self.torso_frame,
			self.shadow_file,
			self.shadow_id,
			self.sound_flag1,
			self.sound_flag2
		)
	}
}

/// Maps the numeric container file ids of animation records to open containers.
///
/// Keeping the map and its lifecycle outside the containers avoids every
/// container transitively opening every other one.
pub trait DatFileResolver {
	/// Returns the container for `file_id`, if the caller has it open.
	fn dat_file(&self, file_id: u16) -> Option<&DatFile>;
}

impl DatFileResolver for HashMap<u16, DatFile> {
	fn dat_file(&self, file_id: u16) -> Option<&DatFile> {
		self.get(&file_id)
	}
}

/// Composes an animation script into drawable frames.
///
/// Every record becomes one [`SettlerFrame`]: the body is mandatory and a
/// missing body container or sequence fails the whole call with
/// [`DatError::CrossReferenceMissing`]; torso and shadow overlays are
/// attached when their references resolve and dropped otherwise, with a
/// `warn!` recording each dropped overlay.
///
/// The shadow overlay is looked up at the **object** frame index; the
/// scripts carry no usable shadow frame field and shipped content relies on
/// shadows tracking the body frame.
pub fn compose_animation(
	records: &[AnimationFrameInfo],
	resolver: &dyn DatFileResolver,
) -> Result<Sequence<SettlerFrame>, DatError> {
	let mut frames = Vec::with_capacity(records.len());
	for record in records {
		frames.push(compose_record(record, resolver)?);
	}
	Ok(Sequence::new(frames))
}

fn compose_record(
	record: &AnimationFrameInfo,
	resolver: &dyn DatFileResolver,
) -> Result<SettlerFrame, DatError> {
	let object = resolver.dat_file(record.object_file).ok_or_else(|| {
		DatError::CrossReferenceMissing {
			file: record.object_file,
			detail: format!("container for object sequence {} is not open", record.object_id),
		}
	})?;

	let mut frame = object
		.settler_frame(usize::from(record.object_id), usize::from(record.object_frame))
		.map_err(|err| match err {
			DatError::IndexOutOfRange {
				..
			} => DatError::CrossReferenceMissing {
				file: record.object_file,
				detail: format!(
					"object sequence {} frame {} does not exist",
					record.object_id, record.object_frame
				),
			},
			other => other,
		})?;

	if record.wants_torso() {
		match resolver.dat_file(record.torso_file) {
			Some(torso_container) => {
				if let Some(torso) = torso_container
					.torso_overlay(usize::from(record.torso_id), usize::from(record.torso_frame))?
				{
					frame.set_torso(torso);
				}
			}
			None => warn!(
				"torso container {} is not open, composing without torso",
				record.torso_file
			),
		}
	}

	if record.wants_shadow() {
		match resolver.dat_file(record.shadow_file) {
			Some(shadow_container) => {
				if let Some(shadow) = shadow_container
					.shadow_overlay(usize::from(record.shadow_id), usize::from(record.object_frame))?
				{
					frame.set_shadow(shadow);
				}
			}
			None => warn!(
				"shadow container {} is not open, composing without shadow",
				record.shadow_file
			),
		}
	}

	Ok(frame)
}
