use std::process::Command;

fn date_stamp(format: &str) -> String {
	match Command::new("date").arg(format).output() {
		Ok(output) => String::from_utf8_lossy(&output.stdout).trim().to_string(),
		Err(_) => "unknown".to_string(),
	}
}

fn main() {
	println!("cargo:rustc-env=COMPILE_DATE={}", date_stamp("+%Y-%m-%d"));
	println!("cargo:rustc-env=COMPILE_TIME={}", date_stamp("+%H:%M:%S"));
}
