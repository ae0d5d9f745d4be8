use cgmath::Vector3;
use indicatif::{ProgressBar, ProgressStyle};

use crate::reformat::volume::Volume;

/// Synthetic volume fills used by the CLI demo and the test suite.
impl Volume {
	/// Paint a solid sphere of `value`, centered at a world-space point,
	/// with a physical radius. Spacing-aware: the sphere stays round even
	/// when voxels are anisotropic.
	pub fn add_sphere(&mut self, center: Vector3<f32>, radius: f32, value: f32) {
		if radius <= 0.0 {
			return;
		}
		let half = self.extent() / 2.0;
		let local = center + half;
		let cutoff = radius * radius;

		// Bounding box in voxel coordinates, clamped to the volume.
		let lo = |c: f32, s: f32, len: usize| {
			(((c - radius) / s).floor().max(0.0) as usize).min(len - 1)
		};
		let hi = |c: f32, s: f32, len: usize| {
			(((c + radius) / s).ceil().max(0.0) as usize).min(len - 1)
		};
		let imin = lo(local.x, self.spacing.x, self.len_i);
		let imax = hi(local.x, self.spacing.x, self.len_i);
		let jmin = lo(local.y, self.spacing.y, self.len_j);
		let jmax = hi(local.y, self.spacing.y, self.len_j);
		let kmin = lo(local.z, self.spacing.z, self.len_k);
		let kmax = hi(local.z, self.spacing.z, self.len_k);

		for k in kmin..=kmax {
			let dz = (k as f32 + 0.5) * self.spacing.z - local.z;
			let dz2 = dz * dz;
			for j in jmin..=jmax {
				let dy = (j as f32 + 0.5) * self.spacing.y - local.y;
				let dy2 = dy * dy;
				for i in imin..=imax {
					let dx = (i as f32 + 0.5) * self.spacing.x - local.x;
					if dx * dx + dy2 + dz2 < cutoff {
						self.set(i, j, k, value);
					}
				}
			}
		}
	}

	/// Fill with a linear intensity ramp along the `k` axis: voxel value is
	/// its k index. Cheap way to make windowing effects visible.
	pub fn fill_axis_gradient(&mut self) {
		for k in 0..self.len_k {
			let value = k as f32;
			for j in 0..self.len_j {
				for i in 0..self.len_i {
					self.set(i, j, k, value);
				}
			}
		}
	}

	/// Standard demo phantom: three overlapping spheres of distinct
	/// intensities inside an otherwise empty volume, with progress bar.
	pub fn fill_sphere_phantom(&mut self) {
		let extent = self.extent();
		let radius = extent.x.min(extent.y).min(extent.z) * 0.3;
		let offset = radius * 0.6;
		let spheres = [
			(Vector3::new(0.0, 0.0, 0.0), radius, 80.0),
			(Vector3::new(offset, offset, 0.0), radius * 0.7, 160.0),
			(Vector3::new(-offset, 0.0, offset), radius * 0.5, 255.0),
		];

		// Setup progress bar
		let pb = ProgressBar::new(spheres.len() as u64);
		pb.set_style(
			ProgressStyle::default_bar()
			.template("Painting Phantom: [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
			.unwrap()
			.progress_chars("#>-"),
		);

		for (center, radius, value) in spheres {
			self.add_sphere(center, radius, value);
			pb.inc(1);
		}

		pb.finish_with_message("Phantom complete!");
	}
}
