use std::{
	path::Path, //
	process::ExitCode,
};

use clap::{Arg, Command};

use mkgen::{
	generator, //
	loader::StarlarkLoader,
	toolchain::{read_toolchain, Toolchain},
	DEFAULT_OUTPUT,
	TOOLCHAIN_FILE,
};

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().filter_or("MKGEN_LOG", "warn"))
		.format_timestamp(None)
		.init();

	const OUTPUT: &str = "output";

	let matches = Command::new("mkgen")
		.about("Generates a Makefile from the build.mkgen in the current directory")
		.version(env!("CARGO_PKG_VERSION"))
		.arg(Arg::new(OUTPUT).value_name("OUTPUT").default_value(DEFAULT_OUTPUT).help("Path of the Makefile to write"))
		.get_matches();

	let output = match matches.get_one::<String>(OUTPUT) {
		Some(x) => x.clone(),
		None => DEFAULT_OUTPUT.to_owned(),
	};

	let toolchain_path = Path::new(TOOLCHAIN_FILE);
	let toolchain = if toolchain_path.exists() {
		match read_toolchain(toolchain_path) {
			Ok(x) => x,
			Err(e) => {
				eprintln!("{}", e);
				return ExitCode::FAILURE;
			}
		}
	} else {
		Toolchain::default()
	};

	let loader = StarlarkLoader::new(".");
	let makefile = match mkgen::generate_makefile(&loader, &toolchain) {
		Ok(x) => x,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::FAILURE;
		}
	};

	match generator::write_makefile(Path::new(&output), &makefile) {
		Ok(x) => x,
		Err(e) => {
			eprintln!("{}", e);
			return ExitCode::FAILURE;
		}
	};

	ExitCode::SUCCESS
}
