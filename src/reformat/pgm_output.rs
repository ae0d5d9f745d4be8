use std::fs::File;
use std::io::{Result, Write};
use std::time::Instant;

use crate::reformat::raster::SliceImage;

impl SliceImage {
	/// Save the slice as a binary PGM (P5) image and report save time.
	///
	/// Outside-polygon pixels are written black; raw-mode scalars are
	/// min-max normalized by `to_gray_bytes`. The placement rectangle is
	/// not embedded (PGM carries no geometry); callers report it alongside.
	pub fn write_to_pgm_file(&self, filename: &str) -> Result<()> {
		let start_time = Instant::now();

		let mut file = File::create(filename)?;
		write!(file, "P5\n{} {}\n255\n", self.width, self.height)?;
		file.write_all(&self.to_gray_bytes())?;

		let elapsed_time = start_time.elapsed();
		eprintln!("PGM file saved: {}", filename);
		eprintln!("Save Time: {:.3} seconds", elapsed_time.as_secs_f64());
		Ok(())
	}
}
