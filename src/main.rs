use std::sync::Arc;

use anyhow::{bail, Context, Result};
use cgmath::Vector3;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use oblique_mpr::reformat::info;
use oblique_mpr::reformat::plane::Plane;
use oblique_mpr::reformat::raster::Window;
use oblique_mpr::reformat::session::{ReformatConfig, ReformatSession, SliceOutcome};
use oblique_mpr::reformat::volume::Volume;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Phantom {
	/// Three overlapping spheres of distinct intensities.
	Spheres,
	/// Linear intensity ramp along the k axis.
	Gradient,
}

/// Cut a synthetic scalar volume along an arbitrary plane and write the
/// reformatted slice as a PGM image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Volume dimensions in voxels, as i,j,k
	#[arg(long, default_value = "64,64,64")]
	dims: String,

	/// Physical voxel spacing per axis, as x,y,z
	#[arg(long, default_value = "1,1,1")]
	spacing: String,

	/// Synthetic volume to cut
	#[arg(long, value_enum, default_value_t = Phantom::Spheres)]
	phantom: Phantom,

	/// Cutting plane as nx,ny,nz:d (normal and signed distance)
	#[arg(long, default_value = "0,1,1:0")]
	plane: Plane,

	/// Intensity window as lo:hi; omit for raw passthrough
	#[arg(long)]
	window: Option<String>,

	/// Downscale factor (integer >= 1) trading resolution for speed
	#[arg(long, default_value_t = 1)]
	downscale: usize,

	/// Treat pixels exactly on the polygon boundary as outside
	#[arg(long)]
	boundary_exclusive: bool,

	/// Output PGM path (sweeps append an index before the extension)
	#[arg(long, default_value = "slice.pgm")]
	output: String,

	/// Write this many slices, marching the plane constant across the sweep span
	#[arg(long)]
	sweep: Option<usize>,

	/// Physical span covered by --sweep, centered on the plane constant
	#[arg(long, default_value_t = 40.0)]
	sweep_span: f32,

	/// Print a volume memory report before slicing
	#[arg(long)]
	report_memory: bool,
}

fn main() -> Result<()> {
	let args = Args::parse();

	info::print_banner();
	info::print_compile_info();

	let (len_i, len_j, len_k) = parse_dims(&args.dims)?;
	let spacing = parse_spacing(&args.spacing)?;
	if args.downscale < 1 {
		bail!("--downscale must be >= 1");
	}

	let mut volume = Volume::new(len_i, len_j, len_k, spacing);
	match args.phantom {
		Phantom::Spheres => volume.fill_sphere_phantom(),
		Phantom::Gradient => volume.fill_axis_gradient(),
	}
	if args.report_memory {
		volume.report_memory();
	}
	let (value_lo, value_hi) = volume.value_range();
	eprintln!("Volume intensity range: {:.1} ..= {:.1}", value_lo, value_hi);

	let window = args
		.window
		.as_deref()
		.map(parse_window)
		.transpose()?;
	let config = ReformatConfig {
		downscale: args.downscale,
		window,
		inclusive_boundary: !args.boundary_exclusive,
	};
	let mut session = ReformatSession::new(Arc::new(volume), config);

	match args.sweep {
		None => {
			session
				.recompute_if_changed(args.plane)
				.context("reformat pass failed")?;
			report_and_write(&session, &args.output)?;
		}
		Some(count) => {
			if count == 0 {
				bail!("--sweep must be >= 1");
			}
			let pb = ProgressBar::new(count as u64);
			pb.set_style(
				ProgressStyle::default_bar()
				.template("Sweeping Slices: [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
				.unwrap()
				.progress_chars("#>-"),
			);
			for step in 0..count {
				let fraction = if count == 1 {
					0.5
				} else {
					step as f32 / (count - 1) as f32
				};
				let constant = args.plane.constant() + (fraction - 0.5) * args.sweep_span;
				let plane = Plane::new(args.plane.normal(), constant)
					.context("sweep produced an invalid plane")?;
				session
					.recompute_if_changed(plane)
					.with_context(|| format!("reformat pass {} failed", step))?;
				report_and_write(&session, &sweep_filename(&args.output, step))?;
				pb.inc(1);
			}
			pb.finish_with_message("Sweep complete!");
		}
	}

	Ok(())
}

fn report_and_write(session: &ReformatSession, filename: &str) -> Result<()> {
	match session.current() {
		Some(SliceOutcome::Slice(output)) => {
			eprintln!(
				"Slice: {} polygon vertices, {}x{} pixels, pitch {:.3}x{:.3}, {:.1}% coverage",
				output.polygon.len(),
				output.grid.width,
				output.grid.height,
				output.grid.pitch_u,
				output.grid.pitch_v,
				output.image.coverage() * 100.0
			);
			let p = output.placement;
			eprintln!(
				"Placement: center ({:.2}, {:.2}, {:.2}), physical {:.2} x {:.2}",
				p.center.x, p.center.y, p.center.z, p.width, p.height
			);
			output
				.image
				.write_to_pgm_file(filename)
				.with_context(|| format!("writing {}", filename))?;
		}
		Some(SliceOutcome::Empty) => {
			eprintln!("Plane misses the volume; no slice written for {}", filename);
		}
		None => bail!("no reformat pass has completed"),
	}
	Ok(())
}

fn sweep_filename(output: &str, step: usize) -> String {
	match output.rsplit_once('.') {
		Some((stem, extension)) => format!("{}_{:03}.{}", stem, step, extension),
		None => format!("{}_{:03}", output, step),
	}
}

fn parse_triple(text: &str) -> Option<(f32, f32, f32)> {
	let float = r"[+-]?\d+(?:\.\d+)?";
	let pattern = format!(r"^\s*({f})\s*,\s*({f})\s*,\s*({f})\s*$", f = float);
	let re = Regex::new(&pattern).expect("triple syntax regex");
	let caps = re.captures(text)?;
	Some((
		caps[1].parse().ok()?,
		caps[2].parse().ok()?,
		caps[3].parse().ok()?,
	))
}

fn parse_dims(text: &str) -> Result<(usize, usize, usize)> {
	let (i, j, k) = parse_triple(text)
		.with_context(|| format!("invalid --dims '{}': expected i,j,k", text))?;
	if i < 1.0 || j < 1.0 || k < 1.0 || i.fract() != 0.0 || j.fract() != 0.0 || k.fract() != 0.0 {
		bail!("invalid --dims '{}': expected positive integers", text);
	}
	Ok((i as usize, j as usize, k as usize))
}

fn parse_spacing(text: &str) -> Result<Vector3<f32>> {
	let (x, y, z) = parse_triple(text)
		.with_context(|| format!("invalid --spacing '{}': expected x,y,z", text))?;
	if x <= 0.0 || y <= 0.0 || z <= 0.0 {
		bail!("invalid --spacing '{}': spacings must be positive", text);
	}
	Ok(Vector3::new(x, y, z))
}

fn parse_window(text: &str) -> Result<Window> {
	let float = r"[+-]?\d+(?:\.\d+)?";
	let pattern = format!(r"^\s*({f})\s*:\s*({f})\s*$", f = float);
	let re = Regex::new(&pattern).expect("window syntax regex");
	let caps = re
		.captures(text)
		.with_context(|| format!("invalid --window '{}': expected lo:hi", text))?;
	let low: f32 = caps[1].parse()?;
	let high: f32 = caps[2].parse()?;
	Window::new(low, high).with_context(|| format!("invalid --window '{}': need lo < hi", text))
}
