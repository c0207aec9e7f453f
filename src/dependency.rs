use core::fmt;
use std::path::Path;

use crate::{
	library::LibraryRef,
	misc::{is_c_source, is_cpp_source, list_files_with_suffix, normalize},
};

/// A named bundle of compile flags, sources, include directories and
/// libraries. Every collection rejects exact duplicates with a warning.
#[derive(Clone, Debug, Default)]
pub struct Dependency {
	name: String,
	flags: Vec<String>,
	c_sources: Vec<String>,
	cpp_sources: Vec<String>,
	include_dirs: Vec<String>,
	libraries: Vec<LibraryRef>,
}

impl fmt::Display for Dependency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			r#"Dependency{{
   name: {},
   flags: [{}],
   c_sources: [{}],
   cpp_sources: [{}],
   include_dirs: [{}],
   libraries: [{}],
}}"#,
			self.name,
			self.flags.join(", "),
			self.c_sources.join(", "),
			self.cpp_sources.join(", "),
			self.include_dirs.join(", "),
			self.libraries.iter().map(|x| x.to_string()).collect::<Vec<String>>().join(", "),
		)
	}
}

fn push_unique(items: &mut Vec<String>, item: String, what: &str, owner: &str) -> bool {
	if items.contains(&item) {
		log::warn!("{}: duplicated {} [{}]", owner, what, item);
		return false;
	}
	items.push(item);
	true
}

impl Dependency {
	pub fn new(name: &str) -> Self {
		Dependency { name: name.to_owned(), ..Default::default() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}
	pub fn flags(&self) -> &[String] {
		&self.flags
	}
	pub fn c_sources(&self) -> &[String] {
		&self.c_sources
	}
	pub fn cpp_sources(&self) -> &[String] {
		&self.cpp_sources
	}
	pub fn include_dirs(&self) -> &[String] {
		&self.include_dirs
	}
	pub fn libraries(&self) -> &[LibraryRef] {
		&self.libraries
	}

	pub fn has_c_source(&self) -> bool {
		!self.c_sources.is_empty()
	}
	pub fn has_cpp_source(&self) -> bool {
		!self.cpp_sources.is_empty()
	}
	pub fn has_sources(&self) -> bool {
		self.has_c_source() || self.has_cpp_source()
	}

	pub fn add_flag(&mut self, flag: &str) -> bool {
		push_unique(&mut self.flags, flag.to_owned(), "flag", &self.name)
	}

	/// Registers a source file, or every matching file when the file name is
	/// one of the `*.c`, `*.cc`, `*.cpp` sentinels. Sentinels are expanded
	/// against `base_dir`, the directory of the owning configuration.
	/// Returns the number of sources added.
	pub fn add_source_files(&mut self, base_dir: &Path, pattern: &str) -> usize {
		let (parent, file_name) = match pattern.rsplit_once('/') {
			Some((parent, file_name)) => (if parent.is_empty() { "/" } else { parent }, file_name),
			None => (".", pattern),
		};

		let suffix = match file_name {
			"*.c" => ".c",
			"*.cc" => ".cc",
			"*.cpp" => ".cpp",
			_ => return usize::from(self.add_source_file(pattern)),
		};

		let mut added = 0;
		for name in list_files_with_suffix(&base_dir.join(parent), suffix) {
			if self.add_source_file(&format!("{}/{}", parent, name)) {
				added += 1;
			}
		}
		if added == 0 {
			log::warn!("{}: no source files match \"{}\"", self.name, pattern);
		}
		added
	}

	pub fn add_source_file(&mut self, path: &str) -> bool {
		let path = normalize(path);
		if is_cpp_source(&path) {
			push_unique(&mut self.cpp_sources, path, "source file", &self.name)
		} else if is_c_source(&path) {
			push_unique(&mut self.c_sources, path, "source file", &self.name)
		} else {
			log::warn!("{}: unknown source type: {}", self.name, path);
			false
		}
	}

	pub fn add_include_dir(&mut self, dir: &str) -> bool {
		push_unique(&mut self.include_dirs, normalize(dir), "include directory", &self.name)
	}

	pub fn add_library(&mut self, lib: LibraryRef) -> bool {
		if self.libraries.contains(&lib) {
			log::warn!("{}: duplicated library [{}]", self.name, lib);
			return false;
		}
		self.libraries.push(lib);
		true
	}
}
