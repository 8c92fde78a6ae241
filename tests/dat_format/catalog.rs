//! Lazy catalog behavior: composite assembly, alignment, caching, sentinels.

use std::sync::Arc;

use s3dat_rs::prelude::*;

use crate::builder::TestContainer;
use crate::translators::{Counting, RawRgba, payload};

fn open(container: &TestContainer, override_differences: bool) -> DatFile {
	DatFile::from_bytes(
		container.build(),
		container.file_type,
		TranslatorSet::uniform(RawRgba),
		override_differences,
	)
	.unwrap()
}

fn three_frame_bodies() -> Vec<Vec<u8>> {
	vec![payload(2, 2, 1), payload(2, 2, 2), payload(2, 2, 3)]
}

#[test]
fn composite_attaches_matching_torsos_and_no_shadow() {
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies()]),
		torsos: Some(vec![vec![payload(1, 1, 4), payload(1, 1, 5), payload(1, 1, 6)]]),
		..Default::default()
	};
	let dat = open(&container, true);

	let sequence = dat.settler_sequence(0).unwrap();
	assert_eq!(sequence.len(), 3);
	for frame in &sequence {
		assert_eq!(frame.body().width(), 2);
		assert_eq!(frame.torso().unwrap().width(), 1);
		assert!(frame.shadow().is_none());
	}
}

#[test]
fn composite_attaches_shadows_from_the_parallel_table() {
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies()]),
		shadows: Some(vec![vec![payload(3, 1, 7), payload(3, 1, 8), payload(3, 1, 9)]]),
		..Default::default()
	};
	let dat = open(&container, true);

	let sequence = dat.settler_sequence(0).unwrap();
	for frame in &sequence {
		assert_eq!(frame.shadow().unwrap().width(), 3);
		assert!(frame.torso().is_none());
	}
}

#[test]
fn shorter_torso_sequence_covers_only_the_overlap() {
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies()]),
		torsos: Some(vec![vec![payload(1, 1, 4), payload(1, 1, 5)]]),
		..Default::default()
	};

	for override_differences in [false, true] {
		let dat = open(&container, override_differences);
		let sequence = dat.settler_sequence(0).unwrap();
		assert_eq!(sequence.len(), 3);
		assert!(sequence.get(0).unwrap().torso().is_some());
		assert!(sequence.get(1).unwrap().torso().is_some());
		assert!(sequence.get(2).unwrap().torso().is_none());
	}
}

#[test]
fn alignment_right_aligns_a_short_torso_table() {
	let container = TestContainer {
		settlers: Some(vec![
			vec![payload(2, 2, 1)],
			vec![payload(2, 2, 2)],
			vec![payload(2, 2, 3)],
		]),
		torsos: Some(vec![vec![payload(5, 1, 4)]]),
		..Default::default()
	};

	// aligned: the single torso sequence belongs to the last settler sequence
	let dat = open(&container, true);
	assert!(dat.settler_sequence(0).unwrap().get(0).unwrap().torso().is_none());
	assert!(dat.settler_sequence(1).unwrap().get(0).unwrap().torso().is_none());
	let aligned = dat.settler_sequence(2).unwrap();
	assert_eq!(aligned.get(0).unwrap().torso().unwrap().width(), 5);

	// unaligned: the torso table is indexed as-is
	let dat = open(&container, false);
	assert_eq!(dat.settler_sequence(0).unwrap().get(0).unwrap().torso().unwrap().width(), 5);
	assert!(dat.settler_sequence(1).unwrap().get(0).unwrap().torso().is_none());
	assert!(dat.settler_sequence(2).unwrap().get(0).unwrap().torso().is_none());
}

#[test]
fn alignment_right_aligns_a_short_shadow_table() {
	crate::init_logs();
	let container = TestContainer {
		settlers: Some(vec![vec![payload(2, 2, 1)], vec![payload(2, 2, 2)]]),
		shadows: Some(vec![vec![payload(4, 1, 6)]]),
		..Default::default()
	};

	let dat = open(&container, true);
	assert!(dat.settler_sequence(0).unwrap().get(0).unwrap().shadow().is_none());
	assert_eq!(dat.settler_sequence(1).unwrap().get(0).unwrap().shadow().unwrap().width(), 4);

	assert_eq!(dat.shadow_frame_offsets(0).unwrap(), None);
	assert_eq!(dat.shadow_frame_offsets(1).unwrap().unwrap().len(), 1);
}

#[test]
fn zero_shadow_entries_mean_no_shadow() {
	let container = TestContainer {
		settlers: Some(vec![vec![payload(2, 2, 1)]]),
		shadows: Some(vec![vec![payload(4, 1, 6)]]),
		zero_shadow_entries: true,
		..Default::default()
	};
	let dat = open(&container, true);

	let sequence = dat.settler_sequence(0).unwrap();
	assert!(sequence.get(0).unwrap().shadow().is_none());
	assert_eq!(dat.shadow_frame_offsets(0).unwrap(), None);
}

#[test]
fn zero_frame_sequence_loads_empty() {
	let container = TestContainer {
		settlers: Some(vec![Vec::new()]),
		..Default::default()
	};
	let dat = open(&container, true);

	let sequence = dat.settler_sequence(0).unwrap();
	assert_eq!(sequence.len(), 0);
}

#[test]
fn settler_sequences_are_materialized_once() {
	let counting = Counting::new();
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies()]),
		..Default::default()
	};
	let dat = DatFile::from_bytes(
		container.build(),
		DatFileType::Rgb565,
		TranslatorSet::new(
			Box::new(counting.clone()),
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(RawRgba),
		),
		true,
	)
	.unwrap();

	let first = dat.settler_sequence(0).unwrap();
	let second = dat.settler_sequence(0).unwrap();
	assert!(Sequence::ptr_eq(&first, &second));
	assert_eq!(counting.count(), 3, "each body frame decodes exactly once");
}

#[test]
fn concurrent_access_still_decodes_each_frame_once() {
	let counting = Counting::new();
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies()]),
		landscapes: Some(vec![payload(2, 2, 9)]),
		..Default::default()
	};
	let dat = Arc::new(
		DatFile::from_bytes(
			container.build(),
			DatFileType::Rgb565,
			TranslatorSet::new(
				Box::new(counting.clone()),
				Box::new(RawRgba),
				Box::new(RawRgba),
				Box::new(RawRgba),
				Box::new(RawRgba),
			),
			true,
		)
		.unwrap(),
	);

	std::thread::scope(|scope| {
		for _ in 0..4 {
			let dat = Arc::clone(&dat);
			scope.spawn(move || {
				let sequence = dat.settler_sequence(0).unwrap();
				assert_eq!(sequence.len(), 3);
				assert!(!dat.landscape_safe(0).is_null());
			});
		}
	});

	assert_eq!(counting.count(), 3);
}

#[test]
fn landscape_translator_failure_is_cached_as_null() {
	crate::init_logs();
	let failing = Counting::failing();
	let container = TestContainer {
		landscapes: Some(vec![payload(2, 2, 1)]),
		..Default::default()
	};
	let dat = DatFile::from_bytes(
		container.build(),
		DatFileType::Rgb565,
		TranslatorSet::new(
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(failing.clone()),
			Box::new(RawRgba),
		),
		true,
	)
	.unwrap();

	assert!(dat.landscape(0).unwrap().is_null());
	assert!(dat.landscape(0).unwrap().is_null());
	assert_eq!(failing.count(), 1, "failed decode must not be retried");
}

#[test]
fn failed_settler_build_is_cached_as_the_empty_sequence() {
	crate::init_logs();
	let failing = Counting::failing();
	let container = TestContainer {
		settlers: Some(vec![vec![payload(2, 2, 1)]]),
		..Default::default()
	};
	let dat = DatFile::from_bytes(
		container.build(),
		DatFileType::Rgb565,
		TranslatorSet::new(
			Box::new(failing.clone()),
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(RawRgba),
			Box::new(RawRgba),
		),
		true,
	)
	.unwrap();

	assert!(dat.settler_sequence(0).unwrap().is_empty());
	assert!(dat.settler_sequence(0).unwrap().is_empty());
	assert_eq!(failing.count(), 1);
}

#[test]
fn gui_images_load_and_cache() {
	let container = TestContainer {
		guis: Some(vec![payload(6, 2, 2), payload(3, 3, 4)]),
		..Default::default()
	};
	let dat = open(&container, true);

	assert_eq!(dat.sequence_count(SequenceCategory::Gui), 2);
	assert_eq!(dat.gui(1).unwrap().bitmap().unwrap().width(), 3);
	assert_eq!(dat.gui_safe(0).bitmap().unwrap().width(), 6);
	assert!(dat.gui_safe(2).is_null());
	assert!(dat.gui(2).unwrap_err().is_index_out_of_range());
}

#[test]
fn safe_getters_swallow_bad_indices() {
	let container = TestContainer {
		settlers: Some(vec![vec![payload(2, 2, 1)]]),
		..Default::default()
	};
	let dat = open(&container, true);

	assert!(dat.settler_sequence_safe(9).is_empty());
	assert!(dat.landscape_safe(0).is_null());
	assert!(dat.settler_sequence(9).unwrap_err().is_index_out_of_range());
}

#[test]
fn frame_offsets_stay_inside_the_file() {
	let container = TestContainer {
		settlers: Some(vec![three_frame_bodies(), vec![payload(4, 4, 8)]]),
		torsos: Some(vec![vec![payload(1, 1, 2)], vec![payload(1, 1, 3)]]),
		..Default::default()
	};
	let bytes = container.build();
	let file_len = bytes.len() as u64;
	let dat =
		DatFile::from_bytes(bytes, DatFileType::Rgb565, TranslatorSet::uniform(RawRgba), true)
			.unwrap();

	for sequence in 0..dat.sequence_count(SequenceCategory::Settlers) {
		for offset in dat.settler_frame_offsets(sequence).unwrap() {
			assert!(offset < file_len);
		}
		for offset in dat.torso_frame_offsets(sequence).unwrap().unwrap() {
			assert!(offset < file_len);
		}
	}
	assert!(dat.settler_frame_offsets(2).unwrap_err().is_index_out_of_range());
}
