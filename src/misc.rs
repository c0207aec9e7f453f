use std::{fs, path::Path};

/// Collapses `.` and `..` segments without touching the filesystem.
///
/// A leading `/` is kept. `..` at the root of an absolute path is dropped,
/// leading `..` of a relative path are kept. An empty input stays empty
/// (it denotes a system library), while a relative path that collapses to
/// nothing becomes `.`.
pub fn normalize(path: &str) -> String {
	if path.is_empty() {
		return String::new();
	}

	let absolute = path.starts_with('/');
	let mut stack: Vec<&str> = Vec::new();
	for segment in path.split('/') {
		match segment {
			"" | "." => {}
			".." => match stack.last() {
				Some(&"..") | None if !absolute => stack.push(".."),
				None => {}
				Some(_) => {
					stack.pop();
				}
			},
			x => stack.push(x),
		}
	}

	let joined = stack.join("/");
	if absolute {
		"/".to_owned() + &joined
	} else if joined.is_empty() {
		".".to_owned()
	} else {
		joined
	}
}

/// Resolves `path` against `base` unless it is absolute.
pub fn join_relative(base: &str, path: &str) -> String {
	if path.starts_with('/') {
		normalize(path)
	} else {
		normalize(&format!("{}/{}", base, path))
	}
}

pub fn parent_dir(path: &str) -> String {
	join_relative(path, "..")
}

pub(crate) fn is_c_source(src_filename: &str) -> bool {
	src_filename.ends_with(".c")
}

pub(crate) fn is_cpp_source(src_filename: &str) -> bool {
	src_filename.ends_with(".cpp") || src_filename.ends_with(".cc")
}

/// Lists the names of regular files in `dir` ending with `suffix`, sorted.
/// An unreadable directory is logged and yields nothing.
pub(crate) fn list_files_with_suffix(dir: &Path, suffix: &str) -> Vec<String> {
	let entries = match fs::read_dir(dir) {
		Ok(x) => x,
		Err(e) => {
			log::warn!("Could not read directory \"{}\": {}", dir.display(), e);
			return Vec::new();
		}
	};

	let mut files = Vec::new();
	for entry in entries {
		let entry = match entry {
			Ok(x) => x,
			Err(e) => {
				log::warn!("Could not read entry in \"{}\": {}", dir.display(), e);
				continue;
			}
		};
		if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
			continue;
		}
		let name = entry.file_name().to_string_lossy().into_owned();
		if name.ends_with(suffix) {
			files.push(name);
		}
	}
	files.sort();
	files
}
