use cgmath::{InnerSpace, Vector2, Vector3};

use crate::reformat::error::InvalidFrame;
use crate::reformat::plane::EPSILON;

/// Orthonormal 2D coordinate system embedded in the cutting plane.
///
/// The origin is the first polygon vertex and the x-axis points along the
/// polygon's first edge, so the frame is fully determined by the
/// intersector's ordering contract. A different vertex order would place
/// every output pixel differently even though the slice geometry is the
/// same, which is why the ordering is a tested contract and not an accident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarFrame {
	pub origin: Vector3<f32>,
	pub x_axis: Vector3<f32>,
	pub y_axis: Vector3<f32>,
}

impl PlanarFrame {
	/// Build the frame from the plane normal and the ordered polygon.
	/// Needs at least two distinct leading points.
	pub fn build(normal: Vector3<f32>, polygon: &[Vector3<f32>]) -> Result<Self, InvalidFrame> {
		if polygon.len() < 2 {
			return Err(InvalidFrame::DegenerateBasis);
		}
		let origin = polygon[0];
		let first_edge = polygon[1] - origin;
		if first_edge.magnitude() <= EPSILON {
			return Err(InvalidFrame::DegenerateBasis);
		}
		let x_axis = first_edge.normalize();
		let cross = normal.cross(x_axis);
		if cross.magnitude() <= EPSILON {
			// Normal parallel to the first edge; no in-plane y-axis exists.
			return Err(InvalidFrame::DegenerateBasis);
		}
		let y_axis = cross.normalize();
		Ok(Self { origin, x_axis, y_axis })
	}

	/// Project a 3D point on the plane into frame coordinates.
	#[inline]
	pub fn to_2d(&self, point: Vector3<f32>) -> Vector2<f32> {
		let offset = point - self.origin;
		Vector2::new(offset.dot(self.x_axis), offset.dot(self.y_axis))
	}

	/// Lift frame coordinates back onto the plane in 3D.
	#[inline]
	pub fn to_3d(&self, u: f32, v: f32) -> Vector3<f32> {
		self.origin + self.x_axis * u + self.y_axis * v
	}
}
