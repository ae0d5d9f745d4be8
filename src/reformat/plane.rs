use std::str::FromStr;

use cgmath::{InnerSpace, Vector3};
use regex::Regex;

/// Absolute tolerance for geometric comparisons throughout the engine.
pub const EPSILON: f32 = 1e-6;

/// Cutting plane in Hesse normal form: the set of points `p` with
/// `normal . p == constant`. The normal is kept at unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
	normal: Vector3<f32>,
	constant: f32,
}

impl Plane {
	/// Build a plane from any non-zero normal, re-normalizing both the
	/// normal and the constant. Returns `None` for a near-zero normal.
	pub fn new(normal: Vector3<f32>, constant: f32) -> Option<Self> {
		let magnitude = normal.magnitude();
		if magnitude <= EPSILON {
			return None;
		}
		Some(Self {
			normal: normal / magnitude,
			constant: constant / magnitude,
		})
	}

	#[inline]
	pub fn normal(&self) -> Vector3<f32> {
		self.normal
	}

	#[inline]
	pub fn constant(&self) -> f32 {
		self.constant
	}

	/// Signed distance from `point` to the plane (positive on the normal side).
	#[inline]
	pub fn signed_distance(&self, point: Vector3<f32>) -> f32 {
		self.normal.dot(point) - self.constant
	}

	/// Equality within `EPSILON`, used by the session's change gate.
	pub fn approx_eq(&self, other: &Plane) -> bool {
		(self.normal - other.normal).magnitude() <= EPSILON
			&& (self.constant - other.constant).abs() <= EPSILON
	}
}

/// Parse errors for the compact `nx,ny,nz:d` plane syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaneParseError(String);

impl std::fmt::Display for PlaneParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "invalid plane '{}': expected nx,ny,nz:d with a non-zero normal", self.0)
	}
}

impl std::error::Error for PlaneParseError {}

impl FromStr for Plane {
	type Err = PlaneParseError;

	/// Accepts `nx,ny,nz:d`, e.g. `0,0,1:0` or `1,-1,0.5:12.5`.
	fn from_str(text: &str) -> Result<Self, Self::Err> {
		let float = r"[+-]?\d+(?:\.\d+)?";
		let pattern = format!(r"^\s*({f})\s*,\s*({f})\s*,\s*({f})\s*:\s*({f})\s*$", f = float);
		let re = Regex::new(&pattern).expect("plane syntax regex");
		let caps = re.captures(text).ok_or_else(|| PlaneParseError(text.to_string()))?;
		let mut parts = [0.0_f32; 4];
		for (slot, cap) in parts.iter_mut().zip(caps.iter().skip(1)) {
			let cap = cap.ok_or_else(|| PlaneParseError(text.to_string()))?;
			*slot = cap
				.as_str()
				.parse()
				.map_err(|_| PlaneParseError(text.to_string()))?;
		}
		Plane::new(Vector3::new(parts[0], parts[1], parts[2]), parts[3])
			.ok_or_else(|| PlaneParseError(text.to_string()))
	}
}
