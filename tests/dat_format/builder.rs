//! Synthetic DAT container builder.
//!
//! Assembles byte-exact containers from a declarative description: which
//! categories exist, their sequences and payloads, and a few corruption
//! knobs for the failure-path tests. Categories left at `None` occupy their
//! header slots with the no-content tag, exactly like real files pad unused
//! slots.

use s3dat_rs::prelude::{AnimationFrameInfo, DatFileType};
use s3dat_rs::prelude::file::dat::constants::{
	FILE_HEADER_END, FILE_START1, FILE_START2, ID_ANIMATIONINFO, ID_GUIS, ID_LANDSCAPE, ID_NONE,
	ID_SETTLERS, ID_SHADOWS, ID_TORSOS, SEQUENCE_START, SEQUENCE_TYPE_COUNT,
};

/// Header length: two fixed runs, the 5-byte magic, size field, 8 slots,
/// closing run.
const HEADER_LEN: usize = 96;

/// Frame payloads of one sequence.
pub type Frames = Vec<Vec<u8>>;

/// One animation record, serialized into the 24-byte wire layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordSpec {
	pub pos_x: i16,
	pub pos_y: i16,
	pub object_id: u16,
	pub object_file: u16,
	pub torso_id: u16,
	pub torso_file: u16,
	pub shadow_id: u16,
	pub shadow_file: u16,
	pub object_frame: u16,
	pub torso_frame: u16,
	pub sound_flag1: i16,
	pub sound_flag2: i16,
}

impl RecordSpec {
	pub fn to_bytes(self) -> [u8; 24] {
		let mut bytes = [0u8; 24];
		let fields = [
			self.pos_x as u16,
			self.pos_y as u16,
			self.object_id,
			self.object_file,
			self.torso_id,
			self.torso_file,
			self.shadow_id,
			self.shadow_file,
			self.object_frame,
			self.torso_frame,
			self.sound_flag1 as u16,
			self.sound_flag2 as u16,
		];
		for (slot, value) in bytes.chunks_exact_mut(2).zip(fields) {
			slot.copy_from_slice(&value.to_le_bytes());
		}
		bytes
	}
}

impl From<RecordSpec> for AnimationFrameInfo {
	fn from(spec: RecordSpec) -> Self {
		Self {
			pos_x: spec.pos_x,
			pos_y: spec.pos_y,
			object_id: spec.object_id,
			object_file: spec.object_file,
			torso_id: spec.torso_id,
			torso_file: spec.torso_file,
			shadow_id: spec.shadow_id,
			shadow_file: spec.shadow_file,
			object_frame: spec.object_frame,
			torso_frame: spec.torso_frame,
			sound_flag1: spec.sound_flag1,
			sound_flag2: spec.sound_flag2,
		}
	}
}

/// Declarative description of a synthetic container.
pub struct TestContainer {
	pub file_type: DatFileType,
	pub settlers: Option<Vec<Frames>>,
	pub torsos: Option<Vec<Frames>>,
	pub shadows: Option<Vec<Frames>>,
	pub landscapes: Option<Vec<Vec<u8>>>,
	pub guis: Option<Vec<Vec<u8>>>,
	pub animations: Option<Vec<Vec<RecordSpec>>>,

	/// Shrink the byte-count field of this category's index table by 4
	pub corrupt_byte_count_tag: Option<u32>,
	/// Emit an extra index table with an unassigned tag
	pub unknown_block: bool,
	/// Write 0 instead of the real offsets into the shadow index table
	pub zero_shadow_entries: bool,
}

impl Default for TestContainer {
	fn default() -> Self {
		Self {
			file_type: DatFileType::Rgb565,
			settlers: None,
			torsos: None,
			shadows: None,
			landscapes: None,
			guis: None,
			animations: None,
			corrupt_byte_count_tag: None,
			unknown_block: false,
			zero_shadow_entries: false,
		}
	}
}

impl TestContainer {
	/// Serializes the container into its on-disk byte form.
	pub fn build(&self) -> Vec<u8> {
		let mut body: Vec<u8> = Vec::new();

		let none_offset = offset_of(&body);
		body.extend_from_slice(&ID_NONE.to_le_bytes());

		let mut slots: Vec<u32> = Vec::new();

		for (tag, sequences) in [
			(ID_SETTLERS, &self.settlers),
			(ID_TORSOS, &self.torsos),
			(ID_SHADOWS, &self.shadows),
		] {
			if let Some(sequences) = sequences {
				let mut pointers: Vec<u32> =
					sequences.iter().map(|frames| write_sequence(&mut body, frames)).collect();
				if tag == ID_SHADOWS && self.zero_shadow_entries {
					pointers.iter_mut().for_each(|pointer| *pointer = 0);
				}
				slots.push(self.write_index_table(&mut body, tag, &pointers));
			}
		}

		for (tag, images) in [(ID_LANDSCAPE, &self.landscapes), (ID_GUIS, &self.guis)] {
			if let Some(images) = images {
				let mut pointers = Vec::with_capacity(images.len());
				for image in images {
					pointers.push(offset_of(&body));
					body.extend_from_slice(image);
				}
				slots.push(self.write_index_table(&mut body, tag, &pointers));
			}
		}

		if let Some(scripts) = &self.animations {
			let mut pointers = Vec::with_capacity(scripts.len());
			for records in scripts {
				pointers.push(offset_of(&body));
				body.extend_from_slice(&(records.len() as u32).to_le_bytes());
				for record in records {
					body.extend_from_slice(&record.to_bytes());
				}
			}
			slots.push(self.write_index_table(&mut body, ID_ANIMATIONINFO, &pointers));
		}

		if self.unknown_block {
			slots.push(self.write_index_table(&mut body, 0x4242, &[12, 34]));
		}

		assert!(slots.len() <= SEQUENCE_TYPE_COUNT, "too many category blocks for one header");
		while slots.len() < SEQUENCE_TYPE_COUNT {
			slots.push(none_offset);
		}

		let total = (HEADER_LEN + body.len()) as u32;
		let mut data = Vec::with_capacity(total as usize);
		data.extend_from_slice(&FILE_START1);
		data.extend_from_slice(self.file_type.start_magic());
		data.extend_from_slice(&FILE_START2);
		data.extend_from_slice(&total.to_le_bytes());
		for slot in &slots {
			data.extend_from_slice(&slot.to_le_bytes());
		}
		data.extend_from_slice(&FILE_HEADER_END);
		assert_eq!(data.len(), HEADER_LEN);
		data.extend_from_slice(&body);
		data
	}

	fn write_index_table(&self, body: &mut Vec<u8>, tag: u32, pointers: &[u32]) -> u32 {
		let offset = offset_of(body);
		body.extend_from_slice(&tag.to_le_bytes());

		let mut byte_count = (4 * pointers.len() + 8) as u16;
		if self.corrupt_byte_count_tag == Some(tag) {
			byte_count -= 4;
		}
		body.extend_from_slice(&byte_count.to_le_bytes());
		body.extend_from_slice(&(pointers.len() as u16).to_le_bytes());
		for pointer in pointers {
			body.extend_from_slice(&pointer.to_le_bytes());
		}
		offset
	}
}

fn offset_of(body: &[u8]) -> u32 {
	(HEADER_LEN + body.len()) as u32
}

fn write_sequence(body: &mut Vec<u8>, frames: &[Vec<u8>]) -> u32 {
	let offset = offset_of(body);
	body.extend_from_slice(&SEQUENCE_START);
	body.push(frames.len() as u8);

	let mut delta = (SEQUENCE_START.len() + 1 + 4 * frames.len()) as u32;
	for frame in frames {
		body.extend_from_slice(&delta.to_le_bytes());
		delta += frame.len() as u32;
	}
	for frame in frames {
		body.extend_from_slice(frame);
	}
	offset
}
