#![allow(missing_docs)]

use vaultdoc::asset::{AssetError, PositionTracker};

#[test]
fn nested_saved_positions_unwind_in_order() {
	let bytes: Vec<u8> = (0..32).collect();
	let mut tracker = PositionTracker::new(&bytes);
	tracker.seek(4).expect("seek");

	let (outer, inner) = tracker
		.with_saved_position(|outer| {
			outer.seek(16)?;
			let inner = outer.with_saved_position(|inner| {
				inner.seek(28)?;
				inner.read_u8()
			})?;
			assert_eq!(outer.pos(), 16);
			Ok((outer.read_u8()?, inner))
		})
		.expect("nested reads");

	assert_eq!((outer, inner), (16, 28));
	assert_eq!(tracker.pos(), 4);
}

#[test]
fn failing_action_still_restores_cursor() {
	let bytes = [0_u8; 10];
	let mut tracker = PositionTracker::new(&bytes);
	tracker.seek(3).expect("seek");

	let err = tracker
		.with_saved_position(|inner| {
			inner.seek(8)?;
			inner.read_u64()
		})
		.expect_err("truncated read");

	assert!(matches!(err, AssetError::TruncatedData { at: 8, need: 8, rem: 2 }));
	assert_eq!(tracker.pos(), 3);
}

#[test]
fn failing_seek_inside_scope_restores_cursor() {
	let bytes = [0_u8; 10];
	let mut tracker = PositionTracker::new(&bytes);
	tracker.seek(6).expect("seek");

	let err = tracker.with_saved_position(|inner| inner.seek(11)).expect_err("seek past end");
	assert!(matches!(err, AssetError::OutOfBounds { offset: 11, len: 10 }));
	assert_eq!(tracker.pos(), 6);
}

#[test]
fn panicking_action_restores_cursor() {
	let bytes = [0_u8; 10];
	let mut tracker = PositionTracker::new(&bytes);
	tracker.seek(2).expect("seek");

	let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
		let _ = tracker.with_saved_position(|inner| -> vaultdoc::asset::Result<()> {
			inner.seek(9)?;
			panic!("decoder bug");
		});
	}));

	assert!(outcome.is_err());
	assert_eq!(tracker.pos(), 2);
}
