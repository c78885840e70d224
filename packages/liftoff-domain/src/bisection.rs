//! Launch-frame bisection over an inclusive frame range.
//!
//! The predicate being searched is "the event is visible at this frame". Answers are assumed to be
//! monotone along the frame axis, so the boundary is the smallest frame answered as launched.
//! Every function here is pure.

use crate::{Error, Result};

/// Inclusive frame range that may still contain the launch frame. `low <= high` always holds.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Bounds {
	pub low: u64,
	pub high: u64,
}
impl Bounds {
	pub fn width(&self) -> u64 {
		self.high - self.low + 1
	}

	pub fn contains(&self, frame: u64) -> bool {
		(self.low..=self.high).contains(&frame)
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
	/// The range shrank and is still non-empty.
	Narrowed(Bounds),
	/// The range emptied. `boundary` is the first frame past every "not yet" answer and equals the
	/// frame count when nothing was ever answered as launched.
	Settled { boundary: u64 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
	Found(u64),
	Exhausted,
}

pub fn initial_bounds(total_frames: u64) -> Result<Bounds> {
	if total_frames < 1 {
		return Err(Error::InvalidRange { total_frames });
	}

	Ok(Bounds { low: 0, high: total_frames - 1 })
}

pub fn next_probe(bounds: Bounds) -> u64 {
	bounds.low + (bounds.high - bounds.low) / 2
}

pub fn apply_answer(bounds: Bounds, probe: u64, launched: bool) -> Transition {
	debug_assert!(bounds.contains(probe), "probe {probe} outside {bounds:?}");

	if launched {
		// New high would be probe - 1, which is below low exactly when probe == low.
		if probe <= bounds.low {
			return Transition::Settled { boundary: bounds.low };
		}

		Transition::Narrowed(Bounds { low: bounds.low, high: probe - 1 })
	} else {
		if probe >= bounds.high {
			return Transition::Settled { boundary: bounds.high + 1 };
		}

		Transition::Narrowed(Bounds { low: probe + 1, high: bounds.high })
	}
}

/// A settled boundary inside the sequence is the launch frame; one past the end means every probe
/// was answered "not yet".
pub fn resolve(boundary: u64, total_frames: u64) -> Resolution {
	if boundary < total_frames { Resolution::Found(boundary) } else { Resolution::Exhausted }
}

/// `ceil(log2(width))` for the remaining range.
pub fn estimated_remaining_steps(bounds: Bounds) -> u32 {
	ceil_log2(bounds.width())
}

/// Upper bound on answers needed to settle a sequence of `total_frames`.
pub fn max_steps(total_frames: u64) -> u32 {
	ceil_log2(total_frames.max(1)) + 1
}

pub fn progress_percent(steps_taken: u32, remaining_steps: u32) -> u8 {
	let planned = u64::from(steps_taken) + u64::from(remaining_steps);

	if planned == 0 {
		return 0;
	}

	(u64::from(steps_taken) * 100 / planned) as u8
}

fn ceil_log2(value: u64) -> u32 {
	if value <= 1 { 0 } else { u64::BITS - (value - 1).leading_zeros() }
}
