use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cgmath::{Vector2, Vector3};

use crate::reformat::error::InvalidFrame;
use crate::reformat::frame::PlanarFrame;
use crate::reformat::grid::RasterGrid;
use crate::reformat::intersect::cross_section;
use crate::reformat::plane::Plane;
use crate::reformat::raster::{rasterize, SliceImage, Window};
use crate::reformat::rect::PlanarBounds;
use crate::reformat::volume::Volume;

/// Caller-facing knobs for a reformat pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReformatConfig {
	/// Integer >= 1; trades resolution for speed.
	pub downscale: usize,
	/// Intensity window, or `None` for raw scalar passthrough.
	pub window: Option<Window>,
	/// Whether pixels exactly on the polygon boundary count as inside.
	pub inclusive_boundary: bool,
}

impl Default for ReformatConfig {
	fn default() -> Self {
		Self {
			downscale: 1,
			window: None,
			inclusive_boundary: true,
		}
	}
}

/// Oriented 3D rectangle telling a renderer where the slice image sits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePlacement {
	pub center: Vector3<f32>,
	pub x_axis: Vector3<f32>,
	pub y_axis: Vector3<f32>,
	/// Physical size of the imaged rectangle, in volume length units.
	pub width: f32,
	pub height: f32,
}

/// Everything one successful reformat pass produces.
pub struct ReformatOutput {
	/// Ordered plane-box intersection polygon, for outline rendering.
	pub polygon: Vec<Vector3<f32>>,
	pub polygon_2d: Vec<Vector2<f32>>,
	pub frame: PlanarFrame,
	pub bounds: PlanarBounds,
	pub grid: RasterGrid,
	pub image: SliceImage,
	pub placement: SlicePlacement,
}

/// Outcome of a completed pass: a slice, or nothing to show because the
/// plane misses (or merely grazes) the volume box.
pub enum SliceOutcome {
	Slice(ReformatOutput),
	Empty,
}

/// How `recompute_if_changed` satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
	/// A full pass ran and replaced the cached outcome.
	Computed,
	/// The plane matched the last computed one; cached outcome still valid.
	Cached,
	/// The pass was cancelled mid-raster; previous outcome left in place.
	Cancelled,
}

/// Run one full reformat pass: intersect, build the frame, project bounds,
/// resolve the grid, rasterize. `None` means the pass observed `cancel`.
pub fn reformat_pass(
	volume: &Volume,
	plane: &Plane,
	config: &ReformatConfig,
	cancel: &AtomicBool,
) -> Result<Option<SliceOutcome>, InvalidFrame> {
	let polygon = cross_section(plane, volume.extent());
	// 1-2 points is a tangent plane: no area to sample.
	if polygon.len() < 3 {
		return Ok(Some(SliceOutcome::Empty));
	}

	let frame = PlanarFrame::build(plane.normal(), &polygon)?;
	let polygon_2d: Vec<Vector2<f32>> = polygon.iter().map(|&p| frame.to_2d(p)).collect();
	let bounds = PlanarBounds::from_points(&polygon_2d);
	let grid = RasterGrid::resolve(&bounds, &frame, volume.spacing, config.downscale)?;

	let Some(image) = rasterize(
		volume,
		&polygon_2d,
		&frame,
		&bounds,
		&grid,
		config.window,
		config.inclusive_boundary,
		cancel,
	) else {
		return Ok(None);
	};

	let placement = SlicePlacement {
		center: bounds.center_3d(&frame),
		x_axis: frame.x_axis,
		y_axis: frame.y_axis,
		width: bounds.length_u(),
		height: bounds.length_v(),
	};

	Ok(Some(SliceOutcome::Slice(ReformatOutput {
		polygon,
		polygon_2d,
		frame,
		bounds,
		grid,
		image,
		placement,
	})))
}

/// Owns the volume, configuration, and the last computed slice.
///
/// Recomputation is gated on plane equality: the reformat pass is the
/// dominant cost of the system, so callers driven by a render loop call
/// `recompute_if_changed` every frame and pay only when the plane moved.
/// While a pass is in flight another thread may flip the cancel token;
/// the in-flight result is then discarded and the previous slice stays
/// current (last plane wins, never a torn raster).
pub struct ReformatSession {
	volume: Arc<Volume>,
	config: ReformatConfig,
	last_plane: Option<Plane>,
	outcome: Option<SliceOutcome>,
	cancel: Arc<AtomicBool>,
}

impl ReformatSession {
	pub fn new(volume: Arc<Volume>, config: ReformatConfig) -> Self {
		Self {
			volume,
			config,
			last_plane: None,
			outcome: None,
			cancel: Arc::new(AtomicBool::new(false)),
		}
	}

	#[inline]
	pub fn volume(&self) -> &Volume {
		&self.volume
	}

	#[inline]
	pub fn config(&self) -> &ReformatConfig {
		&self.config
	}

	/// Last successful outcome, if any pass has completed.
	#[inline]
	pub fn current(&self) -> Option<&SliceOutcome> {
		self.outcome.as_ref()
	}

	/// Token a controller thread may set to abandon the in-flight pass.
	pub fn cancel_token(&self) -> Arc<AtomicBool> {
		Arc::clone(&self.cancel)
	}

	/// Recompute the slice if `plane` differs from the last computed plane.
	/// Errors and cancellations leave the previously cached outcome valid.
	pub fn recompute_if_changed(&mut self, plane: Plane) -> Result<PassStatus, InvalidFrame> {
		if let Some(last) = &self.last_plane {
			if last.approx_eq(&plane) && self.outcome.is_some() {
				return Ok(PassStatus::Cached);
			}
		}

		self.cancel.store(false, Ordering::Relaxed);
		match reformat_pass(&self.volume, &plane, &self.config, &self.cancel)? {
			Some(outcome) => {
				self.outcome = Some(outcome);
				self.last_plane = Some(plane);
				Ok(PassStatus::Computed)
			}
			None => Ok(PassStatus::Cancelled),
		}
	}
}
