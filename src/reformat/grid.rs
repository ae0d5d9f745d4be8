use cgmath::Vector3;

use crate::reformat::error::{InvalidFrame, PlaneAxis};
use crate::reformat::frame::PlanarFrame;
use crate::reformat::plane::EPSILON;
use crate::reformat::rect::PlanarBounds;

/// Output raster resolution and the physical pitch behind each pixel step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterGrid {
	pub width: usize,
	pub height: usize,
	pub pitch_u: f32,
	pub pitch_v: f32,
	pub downscale: usize,
}

/// Physical length one unit step along an in-plane axis represents, given
/// the volume's per-axis voxel spacing.
///
/// The spacing is generally anisotropic and the axis arbitrary, so the
/// effective pitch is neither of the cardinal spacings: each cardinal
/// component of the axis is weighted by that axis's spacing and the
/// magnitudes summed.
pub fn pitch(axis: Vector3<f32>, spacing: Vector3<f32>) -> f32 {
	axis.x.abs() * spacing.x + axis.y.abs() * spacing.y + axis.z.abs() * spacing.z
}

impl RasterGrid {
	/// Convert the physical rectangle into pixel counts, honoring the
	/// anisotropic pitch along each frame axis and the caller's downscale
	/// factor (integer >= 1).
	pub fn resolve(
		bounds: &PlanarBounds,
		frame: &PlanarFrame,
		spacing: Vector3<f32>,
		downscale: usize,
	) -> Result<Self, InvalidFrame> {
		let pitch_u = pitch(frame.x_axis, spacing);
		let pitch_v = pitch(frame.y_axis, spacing);
		// A unit in-plane axis always picks up spacing from some cardinal
		// axis, but a malformed basis would not; never divide by zero.
		if pitch_u <= EPSILON {
			return Err(InvalidFrame::ZeroPitch { axis: PlaneAxis::U });
		}
		if pitch_v <= EPSILON {
			return Err(InvalidFrame::ZeroPitch { axis: PlaneAxis::V });
		}

		let downscale = downscale.max(1);
		let width = (bounds.length_u() / pitch_u / downscale as f32).ceil() as usize;
		let height = (bounds.length_v() / pitch_v / downscale as f32).ceil() as usize;

		Ok(Self {
			width,
			height,
			pitch_u,
			pitch_v,
			downscale,
		})
	}

	/// Frame-space u coordinate of pixel column `px`.
	#[inline]
	pub fn pixel_to_u(&self, px: usize, bounds: &PlanarBounds) -> f32 {
		px as f32 * self.pitch_u * self.downscale as f32 + bounds.min_u
	}

	/// Frame-space v coordinate of pixel row `py`.
	#[inline]
	pub fn pixel_to_v(&self, py: usize, bounds: &PlanarBounds) -> f32 {
		py as f32 * self.pitch_v * self.downscale as f32 + bounds.min_v
	}
}
