pub mod reformat {
	pub mod error;
	pub mod plane;
	pub mod volume;
	pub mod phantom;
	pub mod intersect;
	pub mod frame;
	pub mod rect;
	pub mod grid;
	pub mod raster;
	pub mod session;
	pub mod info;
	pub mod pgm_output;
}
