use std::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;

use bitvec::vec::BitVec;
use cgmath::{InnerSpace, Vector2};

use crate::reformat::frame::PlanarFrame;
use crate::reformat::grid::RasterGrid;
use crate::reformat::plane::EPSILON;
use crate::reformat::rect::PlanarBounds;
use crate::reformat::volume::Volume;

/// Linear intensity window mapping a scalar range onto 0..=255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
	pub low: f32,
	pub high: f32,
}

impl Window {
	/// Requires `low < high`.
	pub fn new(low: f32, high: f32) -> Option<Self> {
		if low < high {
			Some(Self { low, high })
		} else {
			None
		}
	}

	/// Values at or below `low` map to 0, at or above `high` to 255,
	/// linearly in between.
	#[inline]
	pub fn apply(&self, value: f32) -> f32 {
		(255.0 * (value - self.low) / (self.high - self.low)).clamp(0.0, 255.0)
	}
}

/// Reformatted 2D slice: one scalar per pixel plus an inside-polygon mask.
///
/// In windowed mode the values are already display-ready (0..=255); in raw
/// mode they are untouched volume scalars. Outside pixels carry value 0 and
/// a cleared mask bit.
#[derive(Clone)]
pub struct SliceImage {
	pub width: usize,
	pub height: usize,
	pub pitch_u: f32,
	pub pitch_v: f32,
	pub windowed: bool,
	pub values: Vec<f32>,
	pub inside: BitVec,
}

impl SliceImage {
	#[inline]
	pub fn value(&self, px: usize, py: usize) -> f32 {
		self.values[py * self.width + px]
	}

	#[inline]
	pub fn is_inside(&self, px: usize, py: usize) -> bool {
		self.inside[py * self.width + px]
	}

	/// Fraction of pixels inside the cross-section polygon.
	pub fn coverage(&self) -> f64 {
		if self.values.is_empty() {
			return 0.0;
		}
		self.inside.count_ones() as f64 / self.values.len() as f64
	}

	/// Flatten to one gray byte per pixel; outside pixels become black.
	/// Raw-mode values are min-max normalized over the inside pixels.
	pub fn to_gray_bytes(&self) -> Vec<u8> {
		let (lo, hi) = if self.windowed {
			(0.0, 255.0)
		} else {
			let mut lo = f32::MAX;
			let mut hi = f32::MIN;
			for (index, &value) in self.values.iter().enumerate() {
				if self.inside[index] {
					lo = lo.min(value);
					hi = hi.max(value);
				}
			}
			if lo >= hi {
				(0.0, 1.0)
			} else {
				(lo, hi)
			}
		};

		let scale = 255.0 / (hi - lo);
		self.values
			.iter()
			.enumerate()
			.map(|(index, &value)| {
				if self.inside[index] {
					((value - lo) * scale).clamp(0.0, 255.0).round() as u8
				} else {
					0
				}
			})
			.collect()
	}
}

/// Even-odd ray-cast containment test against an ordered polygon.
///
/// Points within `EPSILON` of a polygon edge follow the `inclusive` policy,
/// keeping boundary pixels deterministic across planes.
pub fn point_in_polygon(point: Vector2<f32>, polygon: &[Vector2<f32>], inclusive: bool) -> bool {
	if polygon.len() < 3 {
		return false;
	}

	for (index, &a) in polygon.iter().enumerate() {
		let b = polygon[(index + 1) % polygon.len()];
		if distance_to_segment(point, a, b) <= EPSILON {
			return inclusive;
		}
	}

	// Horizontal ray toward +u, counting edge crossings.
	let mut inside = false;
	for (index, &a) in polygon.iter().enumerate() {
		let b = polygon[(index + 1) % polygon.len()];
		let crosses = (a.y > point.y) != (b.y > point.y);
		if !crosses {
			continue;
		}
		let intersect_u = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
		if point.x < intersect_u {
			inside = !inside;
		}
	}
	inside
}

fn distance_to_segment(point: Vector2<f32>, a: Vector2<f32>, b: Vector2<f32>) -> f32 {
	let edge = b - a;
	let length2 = edge.magnitude2();
	if length2 <= EPSILON * EPSILON {
		return (point - a).magnitude();
	}
	let t = ((point - a).dot(edge) / length2).clamp(0.0, 1.0);
	(point - (a + edge * t)).magnitude()
}

/// Sample the volume at every raster pixel inside the polygon, in parallel.
///
/// Pixels partition into row bands handled by scoped worker threads; each
/// pixel is a pure function of the inputs, so the output is byte-identical
/// regardless of thread count. Workers poll `cancel` once per row and a
/// cancelled pass returns `None` so a torn buffer is never handed out.
pub fn rasterize(
	volume: &Volume,
	polygon_2d: &[Vector2<f32>],
	frame: &PlanarFrame,
	bounds: &PlanarBounds,
	grid: &RasterGrid,
	window: Option<Window>,
	inclusive: bool,
	cancel: &AtomicBool,
) -> Option<SliceImage> {
	let width = grid.width;
	let height = grid.height;
	let total_pixels = width * height;

	// Thread-friendly backing buffers; values carry f32 bit patterns.
	let value_backing: Arc<Vec<AtomicU32>> = Arc::new(
		(0..total_pixels)
			.map(|_| AtomicU32::new(0.0_f32.to_bits()))
			.collect(),
	);
	let mask_backing: Arc<Vec<AtomicU8>> = Arc::new(
		(0..total_pixels)
			.map(|_| AtomicU8::new(0))
			.collect(),
	);

	let threads = thread::available_parallelism()
		.map(|n| n.get())
		.unwrap_or(1);
	let chunk_rows = (height + threads - 1) / threads.max(1);

	thread::scope(|scope| {
		for band_start in (0..height).step_by(chunk_rows.max(1)) {
			let values = Arc::clone(&value_backing);
			let masks = Arc::clone(&mask_backing);
			let band_end = (band_start + chunk_rows).min(height);
			scope.spawn(move || {
				for py in band_start..band_end {
					if cancel.load(Ordering::Relaxed) {
						return;
					}
					let v = grid.pixel_to_v(py, bounds);
					for px in 0..width {
						let u = grid.pixel_to_u(px, bounds);
						if !point_in_polygon(Vector2::new(u, v), polygon_2d, inclusive) {
							continue;
						}
						// Containment passed, so an index outside the box is
						// boundary rounding; clamp instead of failing.
						let world = frame.to_3d(u, v);
						let (i, j, k) = volume.voxel_at_clamped(world);
						let sample = volume.get(i, j, k);
						let value = match window {
							Some(window) => window.apply(sample),
							None => sample,
						};
						let index = py * width + px;
						values[index].store(value.to_bits(), Ordering::Relaxed);
						masks[index].store(1, Ordering::Relaxed);
					}
				}
			});
		}
	});

	if cancel.load(Ordering::Relaxed) {
		return None;
	}

	// Consolidate into the final buffers.
	let mut values = Vec::with_capacity(total_pixels);
	let mut inside = BitVec::with_capacity(total_pixels);
	for index in 0..total_pixels {
		values.push(f32::from_bits(value_backing[index].load(Ordering::Relaxed)));
		inside.push(mask_backing[index].load(Ordering::Relaxed) != 0);
	}

	Some(SliceImage {
		width,
		height,
		pitch_u: grid.pitch_u,
		pitch_v: grid.pitch_v,
		windowed: window.is_some(),
		values,
		inside,
	})
}
