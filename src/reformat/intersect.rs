use cgmath::{InnerSpace, Vector3};

use crate::reformat::plane::{Plane, EPSILON};

/// Merge radius for coincident intersection points. Wider than `EPSILON`:
/// a plane through a box corner hits up to three edges whose computed
/// points differ by accumulated f32 rounding, not by geometry.
const DEDUP_EPSILON: f32 = 1e-4;

/// Indices into the 8 box corners for each of the 12 box edges.
const EDGE_TOPOLOGY: [(usize, usize); 12] = [
	(0, 1),
	(1, 3),
	(3, 2),
	(2, 0),
	(4, 5),
	(5, 7),
	(7, 6),
	(6, 4),
	(0, 4),
	(1, 5),
	(3, 7),
	(2, 6),
];

/// The 8 corners of a box of the given physical extent, centered at the
/// world origin. Corner `c` has bit 0 -> +x, bit 1 -> +y, bit 2 -> +z.
pub fn box_corners(extent: Vector3<f32>) -> [Vector3<f32>; 8] {
	let half = extent / 2.0;
	let mut corners = [Vector3::new(0.0, 0.0, 0.0); 8];
	for (c, corner) in corners.iter_mut().enumerate() {
		corner.x = if c & 1 != 0 { half.x } else { -half.x };
		corner.y = if c & 2 != 0 { half.y } else { -half.y };
		corner.z = if c & 4 != 0 { half.z } else { -half.z };
	}
	corners
}

/// The 12 edges of the origin-centered box as corner pairs.
pub fn box_edges(extent: Vector3<f32>) -> [[Vector3<f32>; 2]; 12] {
	let corners = box_corners(extent);
	EDGE_TOPOLOGY.map(|(a, b)| [corners[a], corners[b]])
}

/// Compute the ordered polygon where `plane` crosses the origin-centered box
/// of the given extent.
///
/// Returns 0 points when the plane misses the box, 1-2 when it only grazes a
/// corner or an edge, and 3..=6 ordered vertices otherwise. A plane can cross
/// at most 6 of the 12 edges of a convex hexahedron, so the polygon never has
/// more than 6 vertices.
pub fn cross_section(plane: &Plane, extent: Vector3<f32>) -> Vec<Vector3<f32>> {
	let mut points: Vec<Vector3<f32>> = Vec::with_capacity(6);

	for [a, b] in box_edges(extent) {
		let Some(point) = intersect_segment(plane, a, b) else {
			continue;
		};
		// Coincident hits happen where the plane passes exactly through a
		// box corner shared by several edges; keep the first.
		let duplicate = points
			.iter()
			.any(|existing| (*existing - point).magnitude() <= DEDUP_EPSILON);
		if !duplicate {
			points.push(point);
		}
	}

	if points.len() >= 3 {
		sort_convex(plane.normal(), &mut points);
	}
	points
}

/// Parametric segment-plane intersection. `None` when the segment is
/// parallel to the plane or crosses it outside `[0, 1]`.
fn intersect_segment(plane: &Plane, a: Vector3<f32>, b: Vector3<f32>) -> Option<Vector3<f32>> {
	let direction = b - a;
	let denominator = plane.normal().dot(direction);
	if denominator.abs() <= EPSILON {
		return None;
	}
	let t = (plane.constant() - plane.normal().dot(a)) / denominator;
	if !(0.0..=1.0).contains(&t) {
		return None;
	}
	Some(a + direction * t)
}

/// Order the vertices of a convex cross-section counter-clockwise.
///
/// The points are flattened by dropping the cardinal axis with the largest
/// normal component (the projection along which the polygon is widest), then
/// sorted by `atan2` around their centroid. The centroid of a convex polygon
/// is always interior, so the angular order is well defined for any plane;
/// ties keep insertion order (stable sort).
fn sort_convex(normal: Vector3<f32>, points: &mut [Vector3<f32>]) {
	let drop_axis = dominant_axis(normal);
	let flatten = |p: &Vector3<f32>| -> (f32, f32) {
		match drop_axis {
			0 => (p.y, p.z),
			1 => (p.z, p.x),
			_ => (p.x, p.y),
		}
	};

	let mut center = (0.0, 0.0);
	for point in points.iter() {
		let (a, b) = flatten(point);
		center.0 += a;
		center.1 += b;
	}
	center.0 /= points.len() as f32;
	center.1 /= points.len() as f32;

	points.sort_by(|p, q| {
		let (pa, pb) = flatten(p);
		let (qa, qb) = flatten(q);
		let angle_p = (pb - center.1).atan2(pa - center.0);
		let angle_q = (qb - center.1).atan2(qa - center.0);
		angle_p.partial_cmp(&angle_q).unwrap_or(std::cmp::Ordering::Equal)
	});
}

fn dominant_axis(normal: Vector3<f32>) -> usize {
	let components = [normal.x.abs(), normal.y.abs(), normal.z.abs()];
	let mut max_idx = 0;
	for i in 1..3 {
		if components[i] > components[max_idx] {
			max_idx = i;
		}
	}
	max_idx
}
