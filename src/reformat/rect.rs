use cgmath::{Vector2, Vector3};

use crate::reformat::frame::PlanarFrame;

/// Axis-aligned bounding rectangle of the cross-section in frame space.
///
/// Tightest rectangle (in the frame's own u/v axes) containing every polygon
/// vertex; since the polygon is rarely rectangular, the rectangle usually
/// extends past the polygon itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBounds {
	pub min_u: f32,
	pub max_u: f32,
	pub min_v: f32,
	pub max_v: f32,
}

impl PlanarBounds {
	/// Per-axis min/max over the projected polygon vertices.
	/// Needs a non-empty slice.
	pub fn from_points(points: &[Vector2<f32>]) -> Self {
		let mut bounds = Self {
			min_u: f32::MAX,
			max_u: f32::MIN,
			min_v: f32::MAX,
			max_v: f32::MIN,
		};
		for point in points {
			bounds.min_u = bounds.min_u.min(point.x);
			bounds.max_u = bounds.max_u.max(point.x);
			bounds.min_v = bounds.min_v.min(point.y);
			bounds.max_v = bounds.max_v.max(point.y);
		}
		bounds
	}

	#[inline]
	pub fn length_u(&self) -> f32 {
		self.max_u - self.min_u
	}

	#[inline]
	pub fn length_v(&self) -> f32 {
		self.max_v - self.min_v
	}

	/// Rectangle corners in frame space, fixed winding:
	/// bottom-left, top-left, top-right, bottom-right.
	pub fn corners_2d(&self) -> [Vector2<f32>; 4] {
		[
			Vector2::new(self.min_u, self.min_v),
			Vector2::new(self.min_u, self.max_v),
			Vector2::new(self.max_u, self.max_v),
			Vector2::new(self.max_u, self.min_v),
		]
	}

	/// The same corners lifted back to 3D through the frame.
	pub fn corners_3d(&self, frame: &PlanarFrame) -> [Vector3<f32>; 4] {
		self.corners_2d().map(|c| frame.to_3d(c.x, c.y))
	}

	/// World-space center of the rectangle.
	pub fn center_3d(&self, frame: &PlanarFrame) -> Vector3<f32> {
		frame.to_3d(
			(self.min_u + self.max_u) / 2.0,
			(self.min_v + self.max_v) / 2.0,
		)
	}
}
