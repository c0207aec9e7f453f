use std::{
	fs,
	path::{Path, PathBuf},
};

use crate::{parse_module, project::Project, starlark_api::err_msg, BUILD_FILE};

/// Turns a directory into a [`Project`]. Directories are given relative to
/// the directory the Makefile is generated in, the same form library paths
/// take.
pub trait ProjectLoader {
	/// Whether `dir` holds a configuration file, without evaluating it.
	fn has_config(&self, dir: &str) -> bool;

	fn load(&self, dir: &str) -> anyhow::Result<Project>;

	/// Physical location of `dir`, `None` if it cannot be resolved.
	fn canonical_dir(&self, dir: &str) -> Option<PathBuf>;
}

/// Evaluates `build.mkgen` files found under `root`.
#[derive(Debug)]
pub struct StarlarkLoader {
	root: PathBuf,
}

impl StarlarkLoader {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		StarlarkLoader { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	fn dir_path(&self, dir: &str) -> PathBuf {
		// An absolute `dir` replaces the root.
		self.root.join(dir)
	}
}

impl ProjectLoader for StarlarkLoader {
	fn has_config(&self, dir: &str) -> bool {
		self.dir_path(dir).join(BUILD_FILE).is_file()
	}

	fn load(&self, dir: &str) -> anyhow::Result<Project> {
		let project_dir = self.dir_path(dir);
		let build_file = project_dir.join(BUILD_FILE);
		let starlark_code = match fs::read_to_string(&build_file) {
			Ok(x) => x,
			Err(e) => return err_msg(format!("Error reading {}: {}", build_file.display(), e)),
		};
		log::debug!("Evaluating {}", build_file.display());
		parse_module(&project_dir, starlark_code)
	}

	fn canonical_dir(&self, dir: &str) -> Option<PathBuf> {
		self.dir_path(dir).canonicalize().ok()
	}
}
