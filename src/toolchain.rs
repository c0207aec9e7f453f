use std::{fs, path::Path};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolchainFile {
	cc: Option<String>,
	cxx: Option<String>,
	ar: Option<String>,
	c_flags: Option<Vec<String>>,
	cxx_flags: Option<Vec<String>>,
	debug_flags: Option<Vec<String>>,
	release_flags: Option<Vec<String>>,
}

/// Tools and flags written into the toolchain stanzas of the Makefile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toolchain {
	pub cc: String,
	pub cxx: String,
	pub ar: String,
	pub c_flags: Vec<String>,
	pub cxx_flags: Vec<String>,
	pub debug_flags: Vec<String>,
	pub release_flags: Vec<String>,
}

fn to_vec_strs(flags: &[&str]) -> Vec<String> {
	flags.iter().copied().map(String::from).collect()
}

impl Default for Toolchain {
	fn default() -> Self {
		let common = ["-Wall", "-Werror", "-Wextra", "-fPIC"];
		Toolchain {
			cc: "gcc".to_owned(),
			cxx: "g++".to_owned(),
			ar: "ar".to_owned(),
			c_flags: to_vec_strs(&common),
			cxx_flags: to_vec_strs(&common),
			debug_flags: to_vec_strs(&["-g"]),
			release_flags: to_vec_strs(&["-O2", "-DNDEBUG"]),
		}
	}
}

impl Toolchain {
	fn with_overrides(file: ToolchainFile) -> Toolchain {
		let default = Toolchain::default();
		Toolchain {
			cc: file.cc.unwrap_or(default.cc),
			cxx: file.cxx.unwrap_or(default.cxx),
			ar: file.ar.unwrap_or(default.ar),
			c_flags: file.c_flags.unwrap_or(default.c_flags),
			cxx_flags: file.cxx_flags.unwrap_or(default.cxx_flags),
			debug_flags: file.debug_flags.unwrap_or(default.debug_flags),
			release_flags: file.release_flags.unwrap_or(default.release_flags),
		}
	}
}

pub fn parse_toolchain(toolchain_toml: &str) -> Result<Toolchain, String> {
	match toml::from_str::<ToolchainFile>(toolchain_toml) {
		Ok(x) => Ok(Toolchain::with_overrides(x)),
		Err(e) => Err(e.to_string()),
	}
}

pub fn read_toolchain(toolchain_path: &Path) -> Result<Toolchain, String> {
	let toolchain_toml = match fs::read_to_string(toolchain_path) {
		Ok(x) => x,
		Err(e) => return Err(format!("Error opening toolchain file \"{}\": {}", toolchain_path.display(), e)),
	};

	let toolchain = match parse_toolchain(&toolchain_toml) {
		Ok(x) => x,
		Err(e) => return Err(format!("Error reading toolchain file \"{}\": {}", toolchain_path.display(), e)),
	};

	if toolchain.cc.is_empty() || toolchain.cxx.is_empty() || toolchain.ar.is_empty() {
		return Err(format!("Toolchain file \"{}\" names an empty tool", toolchain_path.display()));
	}
	log::debug!("Toolchain from {}: {:?}", toolchain_path.display(), toolchain);

	Ok(toolchain)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_file_gives_defaults() {
		assert_eq!(parse_toolchain("").unwrap(), Toolchain::default());
	}

	#[test]
	fn overrides() {
		let toolchain = parse_toolchain(
			r#"
cc = "clang"
cxx_flags = ["-Wall", "-std=c++17"]
release_flags = ["-O3"]
"#,
		)
		.unwrap();
		assert_eq!(toolchain.cc, "clang");
		assert_eq!(toolchain.cxx, "g++");
		assert_eq!(toolchain.cxx_flags, ["-Wall", "-std=c++17"]);
		assert_eq!(toolchain.release_flags, ["-O3"]);
		assert_eq!(toolchain.debug_flags, ["-g"]);
	}

	#[test]
	fn unknown_keys_are_errors() {
		assert!(parse_toolchain("linker = \"ld\"").is_err());
		assert!(parse_toolchain("cc = [1]").is_err());
	}
}
