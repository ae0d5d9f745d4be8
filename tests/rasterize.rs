use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use cgmath::{Vector2, Vector3};

use oblique_mpr::reformat::plane::Plane;
use oblique_mpr::reformat::raster::{point_in_polygon, Window};
use oblique_mpr::reformat::session::{
	reformat_pass, PassStatus, ReformatConfig, ReformatSession, SliceOutcome,
};
use oblique_mpr::reformat::volume::Volume;

fn plane(nx: f32, ny: f32, nz: f32, d: f32) -> Plane {
	Plane::new(Vector3::new(nx, ny, nz), d).expect("non-zero normal")
}

fn unit_spacing() -> Vector3<f32> {
	Vector3::new(1.0, 1.0, 1.0)
}

fn gradient_volume() -> Volume {
	let mut volume = Volume::new(10, 10, 10, unit_spacing());
	volume.fill_axis_gradient();
	volume
}

fn run_pass(volume: &Volume, cut: &Plane, config: &ReformatConfig) -> SliceOutcome {
	let cancel = AtomicBool::new(false);
	reformat_pass(volume, cut, config, &cancel)
		.expect("valid pass")
		.expect("not cancelled")
}

#[test]
fn volume_addressing() {
	let mut volume = Volume::new(4, 5, 6, Vector3::new(1.0, 2.0, 0.5));
	assert_eq!(volume.total_voxels, 120);
	assert_eq!(volume.extent(), Vector3::new(4.0, 10.0, 3.0));

	volume.set(3, 4, 5, 42.0);
	assert_eq!(volume.get(3, 4, 5), 42.0);
	let index = volume.ijk_to_index(3, 4, 5);
	assert_eq!(volume.index_to_ijk(index), (3, 4, 5));

	// World origin sits at the volume center.
	assert_eq!(volume.voxel_at(Vector3::new(0.0, 0.0, 0.0)), Some((2, 2, 3)));
	assert_eq!(volume.voxel_at(Vector3::new(99.0, 0.0, 0.0)), None);
	assert_eq!(volume.voxel_at_clamped(Vector3::new(99.0, -99.0, 0.0)), (3, 0, 3));

	assert!(Volume::from_data(2, 2, 2, unit_spacing(), vec![0.0; 7]).is_none());
	assert!(Volume::from_data(2, 2, 2, unit_spacing(), vec![0.0; 8]).is_some());
}

#[test]
fn containment_boundary_policy() {
	let square = [
		Vector2::new(0.0, 0.0),
		Vector2::new(10.0, 0.0),
		Vector2::new(10.0, 10.0),
		Vector2::new(0.0, 10.0),
	];

	assert!(point_in_polygon(Vector2::new(5.0, 5.0), &square, false));
	assert!(!point_in_polygon(Vector2::new(15.0, 5.0), &square, false));
	assert!(!point_in_polygon(Vector2::new(5.0, -0.1), &square, true));

	// Boundary points follow the configured policy.
	assert!(point_in_polygon(Vector2::new(0.0, 5.0), &square, true));
	assert!(!point_in_polygon(Vector2::new(0.0, 5.0), &square, false));
	assert!(point_in_polygon(Vector2::new(3.0, 10.0), &square, true));
	assert!(!point_in_polygon(Vector2::new(3.0, 10.0), &square, false));
}

#[test]
fn windowing_maps_range_to_bytes() {
	let window = Window::new(0.0, 100.0).expect("valid window");
	assert_eq!(window.apply(-50.0), 0.0);
	assert_eq!(window.apply(0.0), 0.0);
	assert_eq!(window.apply(100.0), 255.0);
	assert_eq!(window.apply(250.0), 255.0);
	assert!((window.apply(50.0) - 127.5).abs() < 1e-3);

	assert!(Window::new(10.0, 10.0).is_none());
	assert!(Window::new(10.0, 5.0).is_none());
}

#[test]
fn axial_cut_samples_one_k_layer() {
	let volume = gradient_volume();
	let outcome = run_pass(&volume, &plane(0.0, 0.0, 1.0, 0.0), &ReformatConfig::default());
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};

	assert_eq!(output.polygon.len(), 4);
	assert_eq!((output.grid.width, output.grid.height), (10, 10));
	assert!((output.image.coverage() - 1.0).abs() < 1e-6);

	// The z=0 plane lands in the k=5 layer everywhere, so every sampled
	// value is the gradient value of that layer.
	for py in 0..output.image.height {
		for px in 0..output.image.width {
			assert!(output.image.is_inside(px, py));
			assert_eq!(output.image.value(px, py), 5.0);
		}
	}
}

#[test]
fn anisotropic_spacing_shapes_the_raster() {
	// 2mm slices along z: the volume is physically 10 x 10 x 20.
	let mut volume = Volume::new(10, 10, 10, Vector3::new(1.0, 1.0, 2.0));
	volume.fill_axis_gradient();

	// An axial cut is unaffected by z spacing: still 10x10 pixels.
	let outcome = run_pass(&volume, &plane(0.0, 0.0, 1.0, 0.0), &ReformatConfig::default());
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};
	assert_eq!((output.grid.width, output.grid.height), (10, 10));

	// A coronal cut spans 10 x 20 physical units, but the pitch along the
	// z-aligned frame axis is 2, so the raster stays 10x10 pixels.
	let outcome = run_pass(&volume, &plane(0.0, 1.0, 0.0, 0.0), &ReformatConfig::default());
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};
	assert_eq!((output.grid.width, output.grid.height), (10, 10));
	let mut physical = [
		output.grid.width as f32 * output.grid.pitch_u,
		output.grid.height as f32 * output.grid.pitch_v,
	];
	physical.sort_by(|a, b| a.partial_cmp(b).unwrap());
	assert!((physical[0] - 10.0).abs() < 1e-4);
	assert!((physical[1] - 20.0).abs() < 1e-4);
}

#[test]
fn missed_plane_reports_empty() {
	let volume = gradient_volume();
	let outcome = run_pass(&volume, &plane(0.0, 0.0, 1.0, 50.0), &ReformatConfig::default());
	assert!(matches!(outcome, SliceOutcome::Empty));
}

#[test]
fn windowed_pass_produces_display_values() {
	let volume = gradient_volume();
	let config = ReformatConfig {
		window: Window::new(0.0, 9.0),
		..ReformatConfig::default()
	};

	// Sagittal cut: every k layer appears as one pixel row/column, so the
	// windowed output spans the full 0..=255 range.
	let outcome = run_pass(&volume, &plane(1.0, 0.0, 0.0, 0.0), &config);
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};
	assert!(output.image.windowed);

	let bytes = output.image.to_gray_bytes();
	assert!(bytes.contains(&0));
	assert!(bytes.contains(&255));
}

#[test]
fn passes_are_deterministic() {
	let volume = gradient_volume();
	let cut = plane(0.3, -0.7, 0.65, 1.0);
	let config = ReformatConfig::default();

	let first = run_pass(&volume, &cut, &config);
	let second = run_pass(&volume, &cut, &config);
	let (SliceOutcome::Slice(first), SliceOutcome::Slice(second)) = (first, second) else {
		panic!("expected slices");
	};

	assert_eq!(first.image.width, second.image.width);
	assert_eq!(first.image.height, second.image.height);
	let first_bits: Vec<u32> = first.image.values.iter().map(|v| v.to_bits()).collect();
	let second_bits: Vec<u32> = second.image.values.iter().map(|v| v.to_bits()).collect();
	assert_eq!(first_bits, second_bits);
	assert_eq!(first.image.inside, second.image.inside);
}

#[test]
fn cancelled_pass_returns_nothing() {
	let volume = gradient_volume();
	let cancel = AtomicBool::new(true);
	let result = reformat_pass(
		&volume,
		&plane(0.0, 0.0, 1.0, 0.0),
		&ReformatConfig::default(),
		&cancel,
	);
	assert!(matches!(result, Ok(None)));
}

#[test]
fn session_gates_on_plane_change() {
	let volume = Arc::new(gradient_volume());
	let mut session = ReformatSession::new(volume, ReformatConfig::default());
	assert!(session.current().is_none());

	let axial = plane(0.0, 0.0, 1.0, 0.0);
	assert_eq!(session.recompute_if_changed(axial), Ok(PassStatus::Computed));
	assert!(matches!(session.current(), Some(SliceOutcome::Slice(_))));

	// Same plane again: served from cache.
	assert_eq!(session.recompute_if_changed(axial), Ok(PassStatus::Cached));

	// A moved plane recomputes; a missing plane caches the empty outcome.
	let missed = plane(0.0, 0.0, 1.0, 50.0);
	assert_eq!(session.recompute_if_changed(missed), Ok(PassStatus::Computed));
	assert!(matches!(session.current(), Some(SliceOutcome::Empty)));
	assert_eq!(session.recompute_if_changed(missed), Ok(PassStatus::Cached));
}

#[test]
fn slice_placement_describes_the_rectangle() {
	let volume = gradient_volume();
	let outcome = run_pass(&volume, &plane(0.0, 0.0, 1.0, 2.0), &ReformatConfig::default());
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};

	let placement = output.placement;
	assert!((placement.width - 10.0).abs() < 1e-4);
	assert!((placement.height - 10.0).abs() < 1e-4);
	// The rectangle sits on the cutting plane, z = 2.
	assert!((placement.center.z - 2.0).abs() < 1e-4);
	assert_eq!(placement.x_axis, output.frame.x_axis);
	assert_eq!(placement.y_axis, output.frame.y_axis);
}

#[test]
fn pgm_writer_emits_header_and_payload() {
	let volume = gradient_volume();
	let config = ReformatConfig {
		window: Window::new(0.0, 9.0),
		..ReformatConfig::default()
	};
	let outcome = run_pass(&volume, &plane(0.0, 0.0, 1.0, 0.0), &config);
	let SliceOutcome::Slice(output) = outcome else {
		panic!("expected a slice");
	};

	let dir = tempfile::tempdir().expect("temp dir");
	let path = dir.path().join("slice.pgm");
	let path_text = path.to_str().expect("utf-8 path");
	output.image.write_to_pgm_file(path_text).expect("write pgm");

	let bytes = fs::read(&path).expect("read pgm");
	let header = format!("P5\n{} {}\n255\n", output.image.width, output.image.height);
	assert!(bytes.starts_with(header.as_bytes()));
	assert_eq!(bytes.len(), header.len() + output.image.width * output.image.height);
}
