//! DAT graphics container support.
//!
//! A DAT container is a monolithic binary bundle carrying every sprite
//! category the game needs: settler (body) animation sequences, their torso
//! and shadow overlays, landscape tiles, fullscreen GUI images, a palette
//! block, and animation scripts referencing other containers. [`DatFile`]
//! opens such a container, validates the directory, and decodes individual
//! images and sequences on demand; nothing but the header and the index
//! tables is read up front.
//!
//! # File Structure
//!
//! All numbers are little-endian.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  ------------------------------------------------------
//! 0       33    constant run (FILE_START1)
//! 33      5     pixel-format magic (RGB channel masks, see DatFileType)
//! 38      10    constant run (FILE_START2)
//! 48      4     declared file size, must equal the real length
//! 52      32    eight u32 index-table offsets
//! 84      12    constant run (FILE_HEADER_END)
//! ```
//!
//! Each index table declares its own `u32` category tag (the header slot
//! position is meaningless), a `u16` byte count, a `u16` pointer count, and
//! `pointer_count` absolute sequence offsets. A sequence header is the
//! 7-byte start marker, a `u8` frame count, and per-frame `u32` offsets
//! relative to the sequence header.
//!
//! # Lazy loading
//!
//! Construction parses the header and the eight index tables. Images and
//! sequences are decoded on first access through the per-category
//! [`DatBitmapTranslator`]s and cached; each slot is materialized at most
//! once, and a slot whose decode failed is pinned to the null image or the
//! empty sequence so the failure is not retried. All cursor access and cache
//! bookkeeping happens under one internal lock, so a shared [`DatFile`] can
//! be used from several threads.
//!
//! # Examples
//!
//! ```no_run
//! use s3dat_types::file::dat::{
//!     ByteCursor, DatBitmapTranslator, DatFile, DatFileType, SequenceCategory, TranslatorSet,
//! };
//! use s3dat_types::file::{Bitmap, DatError};
//!
//! /// Payload decoder for the demo: `u16` width, `u16` height, raw RGBA.
//! #[derive(Clone)]
//! struct RawRgba;
//!
//! impl DatBitmapTranslator for RawRgba {
//!     fn decode(&self, cursor: &mut ByteCursor, _: DatFileType) -> Result<Bitmap, DatError> {
//!         let width = cursor.read_u16()?;
//!         let height = cursor.read_u16()?;
//!         let mut pixels = vec![0u8; usize::from(width) * usize::from(height) * 4];
//!         cursor.read_exact(&mut pixels)?;
//!         Ok(Bitmap::new(width, height, 0, 0, pixels))
//!     }
//! }
//!
//! # fn main() -> Result<(), DatError> {
//! let dat = DatFile::open(
//!     "siedler3_15.f8007e01f.dat",
//!     DatFileType::Rgb565,
//!     TranslatorSet::uniform(RawRgba),
//!     true,
//! )?;
//!
//! println!("{} settler sequences", dat.sequence_count(SequenceCategory::Settlers));
//!
//! let sequence = dat.settler_sequence(0)?;
//! for frame in &sequence {
//!     println!("{}", frame);
//! }
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{error, info, warn};

use crate::file::DatError;

pub mod animation;
pub mod constants;
pub mod cursor;
pub mod file_type;
mod header;
pub mod image;
pub mod index;
pub mod sequence;
pub mod translator;

pub use animation::{AnimationFrameInfo, DatFileResolver, compose_animation};
pub use cursor::ByteCursor;
pub use file_type::DatFileType;
pub use image::{Bitmap, Image, SettlerFrame};
pub use index::SequenceCategory;
pub use sequence::Sequence;
pub use translator::{DatBitmapTranslator, TranslatorSet};

/// Lazily loaded DAT graphics container.
///
/// See the [module documentation](self) for the file layout and the loading
/// model.
#[derive(Debug)]
pub struct DatFile {
	path: Option<PathBuf>,
	file_type: DatFileType,
	translators: TranslatorSet,

	settler_starts: Vec<u32>,
	torso_starts: Vec<i64>,
	shadow_starts: Vec<i64>,
	landscape_starts: Vec<u32>,
	gui_starts: Vec<u32>,
	animation_starts: Vec<u32>,

	state: Mutex<ReaderState>,
}

/// Cursor and caches, guarded by one lock so a seek + read + decode + cache
/// insert is a single atomic step.
#[derive(Debug)]
struct ReaderState {
	cursor: ByteCursor,
	settler_sequences: Vec<Option<Sequence<SettlerFrame>>>,
	landscape_images: Vec<Option<Image>>,
	gui_images: Vec<Option<Image>>,
}

/// Index tables as assigned by tag, before absent ones collapse to empty.
#[derive(Default)]
struct RawTables {
	settlers: Option<Vec<u32>>,
	torsos: Option<Vec<u32>>,
	shadows: Option<Vec<u32>>,
	landscape: Option<Vec<u32>>,
	gui: Option<Vec<u32>>,
	animation_info: Option<Vec<u32>>,
}

impl RawTables {
	fn assign(&mut self, block: index::IndexBlock) {
		match SequenceCategory::from_tag(block.tag) {
			Some(SequenceCategory::Settlers) => self.settlers = Some(block.pointers),
			Some(SequenceCategory::Torsos) => self.torsos = Some(block.pointers),
			Some(SequenceCategory::Shadows) => self.shadows = Some(block.pointers),
			Some(SequenceCategory::Landscape) => self.landscape = Some(block.pointers),
			Some(SequenceCategory::Gui) => self.gui = Some(block.pointers),
			Some(SequenceCategory::AnimationInfo) => self.animation_info = Some(block.pointers),
			// unknown tags are logged by the index parser and dropped here
			None => {}
		}
	}
}

impl DatFile {
	/// Opens a container file.
	///
	/// `override_differences` enables the overlay-table alignment described
	/// in [`Self::settler_sequence`]: torso/shadow tables shorter than the
	/// settler table are right-aligned against it, with leading entries
	/// marked absent. Files authored by appending settler sequences without
	/// extending the overlay tables need this.
	///
	/// # Errors
	///
	/// Header validation errors are fatal ([`DatError::FormatMismatch`],
	/// [`DatError::LengthMismatch`], [`DatError::Truncated`]). A parse error
	/// in a single index table is not: the affected category stays empty and
	/// the error is logged.
	pub fn open(
		path: impl AsRef<Path>,
		file_type: DatFileType,
		translators: TranslatorSet,
		override_differences: bool,
	) -> Result<Self, DatError> {
		let path = path.as_ref();
		info!("loading DAT container {}", path.display());
		let cursor = ByteCursor::open(path)?;
		Self::from_cursor(cursor, Some(path.to_owned()), file_type, translators, override_differences)
	}

	/// Opens a container from an in-memory buffer.
	///
	/// Same semantics as [`Self::open`], without the file on disk.
	pub fn from_bytes(
		data: Vec<u8>,
		file_type: DatFileType,
		translators: TranslatorSet,
		override_differences: bool,
	) -> Result<Self, DatError> {
		Self::from_cursor(ByteCursor::from_bytes(data), None, file_type, translators, override_differences)
	}

	fn from_cursor(
		mut cursor: ByteCursor,
		path: Option<PathBuf>,
		file_type: DatFileType,
		translators: TranslatorSet,
		override_differences: bool,
	) -> Result<Self, DatError> {
		let offsets = header::read_category_offsets(&mut cursor, file_type)?;

		let mut tables = RawTables::default();
		for offset in offsets {
			match index::read_index_block(&mut cursor, offset) {
				Ok(Some(block)) => tables.assign(block),
				Ok(None) => {}
				Err(err) => {
					error!("error while loading sequence index at offset {offset:#x}: {err}");
				}
			}
		}

		let settler_starts = tables.settlers.unwrap_or_default();
		let landscape_starts = tables.landscape.unwrap_or_default();
		let gui_starts = tables.gui.unwrap_or_default();
		let animation_starts = tables.animation_info.unwrap_or_default();
		let mut torso_starts = widen(tables.torsos.unwrap_or_default());
		let mut shadow_starts = widen(tables.shadows.unwrap_or_default());

		info!("found {} settler sequences", settler_starts.len());
		info!("found {} torso sequences", torso_starts.len());
		info!("found {} shadow sequences", shadow_starts.len());
		info!("found {} landscape images", landscape_starts.len());
		info!("found {} gui images", gui_starts.len());
		info!("found {} animation scripts", animation_starts.len());

		if override_differences {
			torso_starts = right_aligned(torso_starts, settler_starts.len());
			if shadow_starts.len() < settler_starts.len() {
				// The shipped reader padded the torso table in this branch;
				// the shadow table is what is actually misaligned.
				warn!(
					"shadow table shorter than settler table by {}, marking leading entries absent",
					settler_starts.len() - shadow_starts.len()
				);
				shadow_starts = right_aligned(shadow_starts, settler_starts.len());
			}
		}

		let state = ReaderState {
			cursor,
			settler_sequences: vec![None; settler_starts.len()],
			landscape_images: vec![None; landscape_starts.len()],
			gui_images: vec![None; gui_starts.len()],
		};

		Ok(Self {
			path,
			file_type,
			translators,
			settler_starts,
			torso_starts,
			shadow_starts,
			landscape_starts,
			gui_starts,
			animation_starts,
			state: Mutex::new(state),
		})
	}

	/// Path the container was opened from, if it came from disk.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Pixel layout of this container.
	pub fn file_type(&self) -> DatFileType {
		self.file_type
	}

	/// Number of sequences (or images, or scripts) in a category.
	///
	/// Categories absent from the file report zero.
	pub fn sequence_count(&self, category: SequenceCategory) -> usize {
		match category {
			SequenceCategory::Settlers => self.settler_starts.len(),
			SequenceCategory::Torsos => self.torso_starts.len(),
			SequenceCategory::Shadows => self.shadow_starts.len(),
			SequenceCategory::Landscape => self.landscape_starts.len(),
			SequenceCategory::Gui => self.gui_starts.len(),
			SequenceCategory::AnimationInfo => self.animation_starts.len(),
		}
	}

	/// Returns the landscape image at `index`, decoding it on first access.
	///
	/// A payload the translator rejects is cached and returned as
	/// [`Image::Null`]; the failure is logged once and not retried.
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] when `index` is past the table.
	pub fn landscape(&self, index: usize) -> Result<Image, DatError> {
		if index >= self.landscape_starts.len() {
			return Err(DatError::IndexOutOfRange {
				category: SequenceCategory::Landscape,
				index,
				len: self.landscape_starts.len(),
			});
		}
		Ok(self.landscape_image(index))
	}

	/// Like [`Self::landscape`], but returns [`Image::Null`] for a bad index.
	pub fn landscape_safe(&self, index: usize) -> Image {
		if index >= self.landscape_starts.len() {
			return Image::Null;
		}
		self.landscape_image(index)
	}

	/// Returns the GUI image at `index`, decoding it on first access.
	///
	/// Caching and failure behavior match [`Self::landscape`].
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] when `index` is past the table.
	pub fn gui(&self, index: usize) -> Result<Image, DatError> {
		if index >= self.gui_starts.len() {
			return Err(DatError::IndexOutOfRange {
				category: SequenceCategory::Gui,
				index,
				len: self.gui_starts.len(),
			});
		}
		Ok(self.gui_image(index))
	}

	/// Like [`Self::gui`], but returns [`Image::Null`] for a bad index.
	pub fn gui_safe(&self, index: usize) -> Image {
		if index >= self.gui_starts.len() {
			return Image::Null;
		}
		self.gui_image(index)
	}

	/// Returns the composite settler sequence at `index`.
	///
	/// The first access decodes every body frame and attaches torso and
	/// shadow overlays from the sequences sharing the index; later accesses
	/// return the cached sequence. Overlay tables shorter than the body
	/// frame list simply leave the trailing frames bare. A sequence that
	/// fails to build is cached as the empty sequence.
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] when `index` is past the settler table.
	pub fn settler_sequence(&self, index: usize) -> Result<Sequence<SettlerFrame>, DatError> {
		if index >= self.settler_starts.len() {
			return Err(DatError::IndexOutOfRange {
				category: SequenceCategory::Settlers,
				index,
				len: self.settler_starts.len(),
			});
		}
		Ok(self.settler_sequence_at(index))
	}

	/// Like [`Self::settler_sequence`], but returns the empty sequence for a
	/// bad index.
	pub fn settler_sequence_safe(&self, index: usize) -> Sequence<SettlerFrame> {
		if index >= self.settler_starts.len() {
			return Sequence::empty();
		}
		self.settler_sequence_at(index)
	}

	/// Absolute frame offsets of the settler sequence at `index`.
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] for a bad index, or a parse error when
	/// the sequence header is damaged.
	pub fn settler_frame_offsets(&self, index: usize) -> Result<Vec<u64>, DatError> {
		let position = self.settler_starts.get(index).copied().ok_or(DatError::IndexOutOfRange {
			category: SequenceCategory::Settlers,
			index,
			len: self.settler_starts.len(),
		})?;
		let mut state = self.lock_state();
		sequence::read_frame_offsets(&mut state.cursor, u64::from(position))
	}

	/// Absolute frame offsets of the torso sequence at `index`, or `None`
	/// when the aligned table marks the entry absent.
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] for a bad index, or a parse error when
	/// the sequence header is damaged.
	pub fn torso_frame_offsets(&self, index: usize) -> Result<Option<Vec<u64>>, DatError> {
		let position = self.torso_starts.get(index).copied().ok_or(DatError::IndexOutOfRange {
			category: SequenceCategory::Torsos,
			index,
			len: self.torso_starts.len(),
		})?;
		if position < 0 {
			return Ok(None);
		}
		let mut state = self.lock_state();
		sequence::read_frame_offsets(&mut state.cursor, position as u64).map(Some)
	}

	/// Absolute frame offsets of the shadow sequence at `index`, or `None`
	/// when the entry is absent (sentinel or zero offset).
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] for a bad index, or a parse error when
	/// the sequence header is damaged.
	pub fn shadow_frame_offsets(&self, index: usize) -> Result<Option<Vec<u64>>, DatError> {
		let position = self.shadow_starts.get(index).copied().ok_or(DatError::IndexOutOfRange {
			category: SequenceCategory::Shadows,
			index,
			len: self.shadow_starts.len(),
		})?;
		if position <= 0 {
			return Ok(None);
		}
		let mut state = self.lock_state();
		sequence::read_frame_offsets(&mut state.cursor, position as u64).map(Some)
	}

	/// Decodes the animation script at `index`.
	///
	/// Scripts are stored in reverse playback order; the returned records
	/// are flipped into playback order.
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] for a bad index, or a read error when
	/// the script is truncated.
	pub fn animation(&self, index: usize) -> Result<Vec<AnimationFrameInfo>, DatError> {
		let position = self.animation_starts.get(index).copied().ok_or(DatError::IndexOutOfRange {
			category: SequenceCategory::AnimationInfo,
			index,
			len: self.animation_starts.len(),
		})?;

		let mut state = self.lock_state();
		let cursor = &mut state.cursor;
		cursor.seek(u64::from(position))?;

		let frame_count = cursor.read_u32()?;
		let mut records = Vec::with_capacity(frame_count as usize);
		for _ in 0..frame_count {
			records.push(AnimationFrameInfo::read(cursor)?);
		}
		records.reverse();
		Ok(records)
	}

	/// Decodes every animation script in the container.
	///
	/// # Errors
	///
	/// Fails on the first script that cannot be read.
	pub fn animations(&self) -> Result<Vec<Vec<AnimationFrameInfo>>, DatError> {
		(0..self.animation_starts.len()).map(|index| self.animation(index)).collect()
	}

	/// Decodes a single body frame, without overlays and without caching.
	///
	/// This is the entry point animation composition uses to pick one frame
	/// out of a sequence; drawing whole sequences goes through
	/// [`Self::settler_sequence`].
	///
	/// # Errors
	///
	/// [`DatError::IndexOutOfRange`] when the sequence or frame does not
	/// exist, otherwise parse and translator errors pass through.
	pub fn settler_frame(&self, sequence: usize, frame: usize) -> Result<SettlerFrame, DatError> {
		let position = self.settler_starts.get(sequence).copied().ok_or(DatError::IndexOutOfRange {
			category: SequenceCategory::Settlers,
			index: sequence,
			len: self.settler_starts.len(),
		})?;

		let mut state = self.lock_state();
		let frame_positions = sequence::read_frame_offsets(&mut state.cursor, u64::from(position))?;
		let frame_position =
			frame_positions.get(frame).copied().ok_or(DatError::IndexOutOfRange {
				category: SequenceCategory::Settlers,
				index: frame,
				len: frame_positions.len(),
			})?;

		state.cursor.seek(frame_position)?;
		let bitmap = self.translators.settler().decode(&mut state.cursor, self.file_type)?;
		Ok(SettlerFrame::new(bitmap))
	}

	/// Decodes one torso overlay frame, or `None` when the reference cannot
	/// be satisfied (absent table entry, unknown sequence, missing frame).
	///
	/// Dropped references are logged at `warn`; they are an expected
	/// property of shipped content, not an error.
	///
	/// # Errors
	///
	/// Parse and translator errors pass through.
	pub fn torso_overlay(&self, sequence: usize, frame: usize) -> Result<Option<Bitmap>, DatError> {
		let Some(position) = self.torso_starts.get(sequence).copied() else {
			warn!(
				"torso sequence {sequence} not present (table length {})",
				self.torso_starts.len()
			);
			return Ok(None);
		};
		if position < 0 {
			return Ok(None);
		}

		let mut state = self.lock_state();
		let frame_positions = sequence::read_frame_offsets(&mut state.cursor, position as u64)?;
		let Some(frame_position) = frame_positions.get(frame).copied() else {
			warn!(
				"torso frame {frame} not found in sequence {sequence} ({} frames)",
				frame_positions.len()
			);
			return Ok(None);
		};

		state.cursor.seek(frame_position)?;
		self.translators.torso().decode(&mut state.cursor, self.file_type).map(Some)
	}

	/// Decodes one shadow overlay frame, or `None` when the reference cannot
	/// be satisfied.
	///
	/// Same drop semantics as [`Self::torso_overlay`]; a zero table entry
	/// also counts as absent.
	///
	/// # Errors
	///
	/// Parse and translator errors pass through.
	pub fn shadow_overlay(&self, sequence: usize, frame: usize) -> Result<Option<Bitmap>, DatError> {
		let Some(position) = self.shadow_starts.get(sequence).copied() else {
			warn!(
				"shadow sequence {sequence} not present (table length {})",
				self.shadow_starts.len()
			);
			return Ok(None);
		};
		if position <= 0 {
			return Ok(None);
		}

		let mut state = self.lock_state();
		let frame_positions = sequence::read_frame_offsets(&mut state.cursor, position as u64)?;
		let Some(frame_position) = frame_positions.get(frame).copied() else {
			warn!(
				"shadow frame {frame} not found in sequence {sequence} ({} frames)",
				frame_positions.len()
			);
			return Ok(None);
		};

		state.cursor.seek(frame_position)?;
		self.translators.shadow().decode(&mut state.cursor, self.file_type).map(Some)
	}

	fn landscape_image(&self, index: usize) -> Image {
		let mut state = self.lock_state();
		if let Some(image) = &state.landscape_images[index] {
			return image.clone();
		}

		let position = u64::from(self.landscape_starts[index]);
		let image = match decode_at(
			&mut state.cursor,
			self.translators.landscape(),
			self.file_type,
			position,
		) {
			Ok(bitmap) => Image::from(bitmap),
			Err(err) => {
				warn!("landscape image {index} could not be decoded: {err}");
				Image::Null
			}
		};
		state.landscape_images[index] = Some(image.clone());
		image
	}

	fn gui_image(&self, index: usize) -> Image {
		let mut state = self.lock_state();
		if let Some(image) = &state.gui_images[index] {
			return image.clone();
		}

		let position = u64::from(self.gui_starts[index]);
		let image =
			match decode_at(&mut state.cursor, self.translators.gui(), self.file_type, position) {
				Ok(bitmap) => Image::from(bitmap),
				Err(err) => {
					warn!("gui image {index} could not be decoded: {err}");
					Image::Null
				}
			};
		state.gui_images[index] = Some(image.clone());
		image
	}

	fn settler_sequence_at(&self, index: usize) -> Sequence<SettlerFrame> {
		let mut state = self.lock_state();
		if let Some(sequence) = &state.settler_sequences[index] {
			return sequence.clone();
		}

		let sequence = match self.load_settler_sequence(&mut state.cursor, index) {
			Ok(sequence) => sequence,
			Err(err) => {
				warn!("settler sequence {index} could not be loaded: {err}");
				Sequence::empty()
			}
		};
		state.settler_sequences[index] = Some(sequence.clone());
		sequence
	}

	fn load_settler_sequence(
		&self,
		cursor: &mut ByteCursor,
		index: usize,
	) -> Result<Sequence<SettlerFrame>, DatError> {
		let position = u64::from(self.settler_starts[index]);
		let frame_positions = sequence::read_frame_offsets(cursor, position)?;

		let mut frames = Vec::with_capacity(frame_positions.len());
		for &frame_position in &frame_positions {
			cursor.seek(frame_position)?;
			frames.push(SettlerFrame::new(self.translators.settler().decode(cursor, self.file_type)?));
		}

		let torso_position = self.torso_starts.get(index).copied().unwrap_or(-1);
		if torso_position >= 0 {
			let torso_positions = sequence::read_frame_offsets(cursor, torso_position as u64)?;
			for (frame, &torso_position) in frames.iter_mut().zip(&torso_positions) {
				cursor.seek(torso_position)?;
				frame.set_torso(self.translators.torso().decode(cursor, self.file_type)?);
			}
		}

		let shadow_position = self.shadow_starts.get(index).copied().unwrap_or(0);
		if shadow_position > 0 {
			let shadow_positions = sequence::read_frame_offsets(cursor, shadow_position as u64)?;
			for (frame, &shadow_position) in frames.iter_mut().zip(&shadow_positions) {
				cursor.seek(shadow_position)?;
				frame.set_shadow(self.translators.shadow().decode(cursor, self.file_type)?);
			}
		}

		Ok(Sequence::new(frames))
	}

	fn lock_state(&self) -> std::sync::MutexGuard<'_, ReaderState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl std::fmt::Display for DatFile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"DAT container ({}): {} settler, {} torso, {} shadow, {} landscape, {} gui, {} animation",
			self.file_type,
			self.settler_starts.len(),
			self.torso_starts.len(),
			self.shadow_starts.len(),
			self.landscape_starts.len(),
			self.gui_starts.len(),
			self.animation_starts.len()
		)
	}
}

fn decode_at(
	cursor: &mut ByteCursor,
	translator: &dyn DatBitmapTranslator,
	file_type: DatFileType,
	position: u64,
) -> Result<Bitmap, DatError> {
	cursor.seek(position)?;
	translator.decode(cursor, file_type)
}

fn widen(starts: Vec<u32>) -> Vec<i64> {
	starts.into_iter().map(i64::from).collect()
}

/// Right-aligns an overlay table against a body table of `body_len` entries,
/// marking the prepended slots absent.
fn right_aligned(starts: Vec<i64>, body_len: usize) -> Vec<i64> {
	if starts.len() >= body_len {
		return starts;
	}
	let shift = body_len - starts.len();
	let mut aligned = vec![-1i64; body_len];
	aligned[shift..].copy_from_slice(&starts);
	aligned
}
