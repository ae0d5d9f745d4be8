use std::env;
use std::sync::Once;

/// Print the tool banner (only prints once)
pub fn print_banner() {
	static PRINT_BANNER_ONCE: Once = Once::new();
	PRINT_BANNER_ONCE.call_once(|| {
		eprintln!("oblique_mpr: oblique multi-planar reconstruction of scalar volumes");
		eprintln!("Cuts an anisotropic voxel volume along an arbitrary plane and");
		eprintln!("rasterizes the cross-section with nearest-neighbor sampling.\n");
	});
}

/// Print compilation information (only prints once)
pub fn print_compile_info() {
	static PRINT_COMPILE_ONCE: Once = Once::new();
	PRINT_COMPILE_ONCE.call_once(|| {
		// Get the executable name
		let program_name = env::current_exe()
		.ok()
		.as_ref()
		.and_then(|path| path.file_name())
		.and_then(|name| name.to_str())
		.unwrap_or("Unknown Program")
		.to_string();

		eprintln!("Program: {}", program_name);
		eprintln!(
			"Compiled on: {} at {}",
			env!("COMPILE_DATE"),
			env!("COMPILE_TIME")
		);
		eprintln!("Crate version: {}", env!("CARGO_PKG_VERSION"));
	});
}
