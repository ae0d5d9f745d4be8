use std::error::Error;
use std::fmt;

/// Failure modes of a single reformat pass.
///
/// A plane that simply misses the volume is not an error (the pass reports an
/// empty outcome instead); `InvalidFrame` covers the cases where a slice
/// exists but no well-formed 2D frame or sampling grid can be built on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidFrame {
	/// The first two polygon points coincide, so no in-plane x-axis exists.
	DegenerateBasis,
	/// The physical pitch along a plane axis collapsed to zero.
	ZeroPitch { axis: PlaneAxis },
}

/// The two in-plane axes of the planar frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneAxis {
	U,
	V,
}

impl fmt::Display for PlaneAxis {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PlaneAxis::U => write!(f, "u"),
			PlaneAxis::V => write!(f, "v"),
		}
	}
}

impl fmt::Display for InvalidFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			InvalidFrame::DegenerateBasis => {
				write!(f, "degenerate planar basis: leading polygon points coincide")
			}
			InvalidFrame::ZeroPitch { axis } => {
				write!(f, "zero sampling pitch along plane {}-axis", axis)
			}
		}
	}
}

impl Error for InvalidFrame {}
