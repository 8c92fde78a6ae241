//! DAT container inspection utility.
//!
//! Opens a graphics container and reports what the directory describes
//! without decoding any pixels: category counts, per-sequence frame offsets,
//! and animation scripts (as text or JSON).
//!
//! # Usage
//!
//! ```bash
//! # Summarize a container (pixel format is inferred from the suffix)
//! cargo run --example dat_info -- info siedler3_15.f8007e01f.dat
//!
//! # Frame offsets of settler sequence 12
//! cargo run --example dat_info -- offsets siedler3_00.f8007e01f.dat 12
//!
//! # Dump animation script 3 as JSON
//! cargo run --example dat_info -- animations siedler3_15.f8007e01f.dat -s 3 --json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use s3dat_rs::prelude::*;
use serde::Serialize;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Info(opts) => run_info(opts),
		Command::Offsets(opts) => run_offsets(opts),
		Command::Animations(opts) => run_animations(opts),
	}
}

#[derive(Parser)]
#[command(name = "dat_info")]
#[command(author = "s3dat-rs project")]
#[command(version)]
#[command(about = "Inspect graphics DAT containers", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Print the category summary of a container
	Info(FileArgs),
	/// Print the frame offsets of one settler sequence and its overlays
	Offsets(OffsetArgs),
	/// Dump animation scripts
	Animations(AnimationArgs),
}

#[derive(Args)]
struct FileArgs {
	/// Path to the container
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Pixel format (inferred from the file suffix when omitted)
	#[arg(short, long, value_enum)]
	format: Option<Format>,
}

#[derive(Args)]
struct OffsetArgs {
	#[command(flatten)]
	file: FileArgs,

	/// Settler sequence index
	#[arg(value_name = "INDEX")]
	index: usize,
}

#[derive(Args)]
struct AnimationArgs {
	#[command(flatten)]
	file: FileArgs,

	/// Only dump the script at this index
	#[arg(short, long, value_name = "SCRIPT")]
	script: Option<usize>,

	/// Emit JSON instead of text
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
	Rgb555,
	Rgb565,
}

impl From<Format> for DatFileType {
	fn from(format: Format) -> Self {
		match format {
			Format::Rgb555 => DatFileType::Rgb555,
			Format::Rgb565 => DatFileType::Rgb565,
		}
	}
}

/// Placeholder translator: this tool only reads the container directory.
#[derive(Clone)]
struct Opaque;

impl DatBitmapTranslator for Opaque {
	fn decode(&self, _: &mut ByteCursor, _: DatFileType) -> Result<Bitmap, DatError> {
		Err(DatError::TranslatorFailure {
			message: "pixel decoding is not wired into dat_info".to_string(),
		})
	}
}

fn open_container(args: &FileArgs) -> Result<DatFile> {
	let file_type = match args.format {
		Some(format) => format.into(),
		None => infer_type(&args.file)?,
	};
	DatFile::open(&args.file, file_type, TranslatorSet::uniform(Opaque), true)
		.with_context(|| format!("cannot open container {}", args.file.display()))
}

fn infer_type(path: &Path) -> Result<DatFileType> {
	let name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
	for file_type in [DatFileType::Rgb555, DatFileType::Rgb565] {
		if name.to_ascii_lowercase().ends_with(file_type.file_suffix()) {
			return Ok(file_type);
		}
	}
	bail!("cannot infer the pixel format from {name:?}, pass --format");
}

fn run_info(args: FileArgs) -> Result<()> {
	let dat = open_container(&args)?;
	println!("{dat}");

	for category in [
		SequenceCategory::Settlers,
		SequenceCategory::Torsos,
		SequenceCategory::Shadows,
		SequenceCategory::Landscape,
		SequenceCategory::Gui,
		SequenceCategory::AnimationInfo,
	] {
		println!("  {:>14}: {}", category.to_string(), dat.sequence_count(category));
	}
	Ok(())
}

fn run_offsets(args: OffsetArgs) -> Result<()> {
	let dat = open_container(&args.file)?;
	let index = args.index;

	let body = dat.settler_frame_offsets(index)?;
	println!("settler sequence {index}: {} frames", body.len());
	for (frame, offset) in body.iter().enumerate() {
		println!("  frame {frame:>3}: {offset:#x}");
	}

	match dat.torso_frame_offsets(index)? {
		Some(offsets) => println!("torso sequence: {} frames", offsets.len()),
		None => println!("torso sequence: absent"),
	}
	match dat.shadow_frame_offsets(index)? {
		Some(offsets) => println!("shadow sequence: {} frames", offsets.len()),
		None => println!("shadow sequence: absent"),
	}
	Ok(())
}

/// JSON shape of one animation record.
#[derive(Serialize)]
struct RecordJson {
	pos_x: i16,
	pos_y: i16,
	object_id: u16,
	object_file: u16,
	torso_id: u16,
	torso_file: u16,
	shadow_id: u16,
	shadow_file: u16,
	object_frame: u16,
	torso_frame: u16,
	sound_flag1: i16,
	sound_flag2: i16,
}

impl From<&AnimationFrameInfo> for RecordJson {
	fn from(info: &AnimationFrameInfo) -> Self {
		Self {
			pos_x: info.pos_x,
			pos_y: info.pos_y,
			object_id: info.object_id,
			object_file: info.object_file,
			torso_id: info.torso_id,
			torso_file: info.torso_file,
			shadow_id: info.shadow_id,
			shadow_file: info.shadow_file,
			object_frame: info.object_frame,
			torso_frame: info.torso_frame,
			sound_flag1: info.sound_flag1,
			sound_flag2: info.sound_flag2,
		}
	}
}

#[derive(Serialize)]
struct ScriptJson {
	script: usize,
	records: Vec<RecordJson>,
}

fn run_animations(args: AnimationArgs) -> Result<()> {
	let dat = open_container(&args.file)?;
	let script_count = dat.sequence_count(SequenceCategory::AnimationInfo);

	let indices: Vec<usize> = match args.script {
		Some(script) => {
			if script >= script_count {
				bail!("script {script} out of range ({script_count} scripts)");
			}
			vec![script]
		}
		None => (0..script_count).collect(),
	};

	if args.json {
		let scripts: Vec<ScriptJson> = indices
			.into_iter()
			.map(|script| {
				dat.animation(script).map(|records| ScriptJson {
					script,
					records: records.iter().map(RecordJson::from).collect(),
				})
			})
			.collect::<Result<_, _>>()?;
		println!("{}", serde_json::to_string_pretty(&scripts)?);
		return Ok(());
	}

	for script in indices {
		let records = dat.animation(script)?;
		println!("script {script}: {} records", records.len());
		for (frame, record) in records.iter().enumerate() {
			println!("  [{frame:>3}] {record}");
		}
	}
	Ok(())
}
