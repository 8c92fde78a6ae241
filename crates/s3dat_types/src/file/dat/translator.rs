//! Pluggable bitmap translators.
//!
//! The pixel codecs for the individual image categories live outside the
//! container core. A [`DatBitmapTranslator`] is handed a cursor positioned at
//! a frame payload together with the container's pixel format and returns the
//! decoded [`Bitmap`]; the catalog decides where payloads start, caches what
//! comes back, and turns decode failures into null/empty sentinels.
//!
//! Translators are stateless. One instance may serve any number of frames and
//! containers concurrently, which is why the trait requires `Send + Sync`.

use super::cursor::ByteCursor;
use super::file_type::DatFileType;
use super::image::Bitmap;
use crate::file::DatError;

/// Decodes one frame payload into a bitmap.
pub trait DatBitmapTranslator: Send + Sync {
	/// Decodes the payload the cursor is positioned at.
	///
	/// `format` is the pixel layout of the surrounding container.
	///
	/// # Errors
	///
	/// Implementations should return [`DatError::TranslatorFailure`] for
	/// payloads they cannot decode and may pass through cursor errors.
	fn decode(&self, cursor: &mut ByteCursor, format: DatFileType) -> Result<Bitmap, DatError>;
}

/// The five per-category translator instances of one container.
pub struct TranslatorSet {
	settler: Box<dyn DatBitmapTranslator>,
	torso: Box<dyn DatBitmapTranslator>,
	shadow: Box<dyn DatBitmapTranslator>,
	landscape: Box<dyn DatBitmapTranslator>,
	gui: Box<dyn DatBitmapTranslator>,
}

impl TranslatorSet {
	/// Creates a set from five category translators.
	pub fn new(
		settler: Box<dyn DatBitmapTranslator>,
		torso: Box<dyn DatBitmapTranslator>,
		shadow: Box<dyn DatBitmapTranslator>,
		landscape: Box<dyn DatBitmapTranslator>,
		gui: Box<dyn DatBitmapTranslator>,
	) -> Self {
		Self {
			settler,
			torso,
			shadow,
			landscape,
			gui,
		}
	}

	/// Fills all five category slots with clones of one translator.
	///
	/// Handy for tools and tests that treat every category the same way.
	pub fn uniform<T>(translator: T) -> Self
	where
		T: DatBitmapTranslator + Clone + 'static,
	{
		Self {
			settler: Box::new(translator.clone()),
			torso: Box::new(translator.clone()),
			shadow: Box::new(translator.clone()),
			landscape: Box::new(translator.clone()),
			gui: Box::new(translator),
		}
	}

	pub(crate) fn settler(&self) -> &dyn DatBitmapTranslator {
		self.settler.as_ref()
	}

	pub(crate) fn torso(&self) -> &dyn DatBitmapTranslator {
		self.torso.as_ref()
	}

	pub(crate) fn shadow(&self) -> &dyn DatBitmapTranslator {
		self.shadow.as_ref()
	}

	pub(crate) fn landscape(&self) -> &dyn DatBitmapTranslator {
		self.landscape.as_ref()
	}

	pub(crate) fn gui(&self) -> &dyn DatBitmapTranslator {
		self.gui.as_ref()
	}
}

impl std::fmt::Debug for TranslatorSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TranslatorSet").finish_non_exhaustive()
	}
}
