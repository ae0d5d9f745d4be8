use std::mem::size_of;

use cgmath::Vector3;

/// 3D scalar volume with anisotropic voxel spacing.
///
/// Data is stored row-major with `i` fastest. The volume's bounding box is
/// centered at the world origin, so world coordinates convert to voxel
/// indices through `(world + extent/2) / spacing`, floored.
#[derive(Clone)]
pub struct Volume {
	pub len_i: usize, // Number of voxels along I
	pub len_j: usize, // Number of voxels along J
	pub len_k: usize, // Number of voxels along K
	pub total_voxels: usize, // Total number of voxels IxJxK
	pub spacing: Vector3<f32>, // Physical units per voxel along each axis
	data: Vec<f32>, // One scalar per voxel
}

impl Volume {
	/// Create a new volume, fully allocated with all voxels set to `0.0`.
	pub fn new(len_i: usize, len_j: usize, len_k: usize, spacing: Vector3<f32>) -> Self {
		let total_voxels = len_i * len_j * len_k;

		Self {
			len_i,
			len_j,
			len_k,
			total_voxels,
			spacing,
			data: vec![0.0; total_voxels],
		}
	}

	/// Wrap scalar data supplied by an external loader. Returns `None` when
	/// the buffer length does not match the dimensions.
	pub fn from_data(
		len_i: usize,
		len_j: usize,
		len_k: usize,
		spacing: Vector3<f32>,
		data: Vec<f32>,
	) -> Option<Self> {
		if data.len() != len_i * len_j * len_k {
			return None;
		}
		Some(Self {
			len_i,
			len_j,
			len_k,
			total_voxels: data.len(),
			spacing,
			data,
		})
	}

	/// Physical size of the volume along each axis.
	#[inline]
	pub fn extent(&self) -> Vector3<f32> {
		Vector3::new(
			self.len_i as f32 * self.spacing.x,
			self.len_j as f32 * self.spacing.y,
			self.len_k as f32 * self.spacing.z,
		)
	}

	/// Convert (i, j, k) to a linear index
	#[inline]
	pub fn ijk_to_index(&self, i: usize, j: usize, k: usize) -> usize {
		i + j * self.len_i + k * self.len_i * self.len_j
	}

	/// Convert a linear index back to (i, j, k)
	#[inline]
	pub fn index_to_ijk(&self, index: usize) -> (usize, usize, usize) {
		let k = index / (self.len_i * self.len_j);
		let j = (index % (self.len_i * self.len_j)) / self.len_i;
		let i = index % self.len_i;
		(i, j, k)
	}

	/// Get a voxel value using (i, j, k) coordinates (panics if out of bounds)
	#[inline]
	pub fn get(&self, i: usize, j: usize, k: usize) -> f32 {
		self.data[self.ijk_to_index(i, j, k)]
	}

	/// Set a voxel value using (i, j, k) coordinates (panics if out of bounds)
	#[inline]
	pub fn set(&mut self, i: usize, j: usize, k: usize, value: f32) {
		let index = self.ijk_to_index(i, j, k);
		self.data[index] = value;
	}

	/// Voxel index for a world-space point, `None` outside the volume.
	#[inline]
	pub fn voxel_at(&self, world: Vector3<f32>) -> Option<(usize, usize, usize)> {
		let half = self.extent() / 2.0;
		let i = ((world.x + half.x) / self.spacing.x).floor();
		let j = ((world.y + half.y) / self.spacing.y).floor();
		let k = ((world.z + half.z) / self.spacing.z).floor();
		if i < 0.0 || j < 0.0 || k < 0.0 {
			return None;
		}
		let (i, j, k) = (i as usize, j as usize, k as usize);
		if i >= self.len_i || j >= self.len_j || k >= self.len_k {
			return None;
		}
		Some((i, j, k))
	}

	/// Voxel index for a world-space point, clamped to the nearest valid
	/// index. Used at polygon boundaries where rounding can land one voxel
	/// outside the box after the geometric containment test passed.
	#[inline]
	pub fn voxel_at_clamped(&self, world: Vector3<f32>) -> (usize, usize, usize) {
		let half = self.extent() / 2.0;
		let clamp_axis = |value: f32, len: usize| -> usize {
			let floored = value.floor();
			if floored < 0.0 {
				0
			} else {
				(floored as usize).min(len - 1)
			}
		};
		(
			clamp_axis((world.x + half.x) / self.spacing.x, self.len_i),
			clamp_axis((world.y + half.y) / self.spacing.y, self.len_j),
			clamp_axis((world.z + half.z) / self.spacing.z, self.len_k),
		)
	}

	/// Minimum and maximum scalar over the whole volume.
	pub fn value_range(&self) -> (f32, f32) {
		let mut lo = f32::MAX;
		let mut hi = f32::MIN;
		for &value in &self.data {
			if value < lo {
				lo = value;
			}
			if value > hi {
				hi = value;
			}
		}
		(lo, hi)
	}

	/// Report memory usage and print a detailed breakdown
	pub fn report_memory(&self) {
		let struct_overhead = size_of::<Self>() - size_of::<Vec<f32>>();
		let data_bytes = self.data.capacity() * size_of::<f32>();
		let total_memory = struct_overhead + data_bytes;

		eprintln!("Volume Memory Report:");
		eprintln!("-------------------------");
		eprintln!("  Dimensions: {} x {} x {}", self.len_i, self.len_j, self.len_k);
		eprintln!("  Total Voxels: {:e}", self.total_voxels as f64);
		eprintln!(
			"  Spacing: {:.3} x {:.3} x {:.3}",
			self.spacing.x, self.spacing.y, self.spacing.z
		);
		eprintln!("  Scalar Data: {}", format_bytes(data_bytes));
		eprintln!("  Total Memory Used: {}", format_bytes(total_memory));
		eprintln!("-------------------------");
	}
}

/// Format large numbers with KB, MB, GB, TB suffixes
fn format_bytes(bytes: usize) -> String {
	const KB: usize = 1024;
	const MB: usize = KB * 1024;
	const GB: usize = MB * 1024;
	const TB: usize = GB * 1024;

	if bytes >= TB {
		format!("{:.2} TB", bytes as f64 / TB as f64)
	} else if bytes >= GB {
		format!("{:.2} GB", bytes as f64 / GB as f64)
	} else if bytes >= MB {
		format!("{:.2} MB", bytes as f64 / MB as f64)
	} else if bytes >= KB {
		format!("{:.2} KB", bytes as f64 / KB as f64)
	} else {
		format!("{} bytes", bytes)
	}
}
