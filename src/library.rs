use core::fmt;

use crate::misc::{join_relative, normalize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkKind {
	Static,
	Shared,
}

/// Identifies a library by the directory it lives in, its name and how it
/// is linked. An empty path is a system library, `.` is a library built by
/// the same configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LibraryRef {
	path: String,
	name: String,
	kind: LinkKind,
}

impl fmt::Display for LibraryRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let kind = match self.kind {
			LinkKind::Static => "static",
			LinkKind::Shared => "shared",
		};
		if self.is_system() {
			write!(f, "{} (system)", self.name)
		} else {
			write!(f, "{}:{} ({})", self.path, self.name, kind)
		}
	}
}

impl LibraryRef {
	pub fn new(path: &str, name: &str, kind: LinkKind) -> Self {
		LibraryRef { path: normalize(path), name: name.to_owned(), kind }
	}

	pub fn system(name: &str) -> Self {
		LibraryRef { path: String::new(), name: name.to_owned(), kind: LinkKind::Shared }
	}

	/// Parses a `<path>:<name>` label. An empty path refers to the local directory.
	pub fn from_label(label: &str, kind: LinkKind) -> Result<Self, String> {
		let (path, name) = match label.rsplit_once(':') {
			Some(x) => x,
			None => return Err(format!("Library label \"{}\" must have the form \"<path>:<name>\"", label)),
		};
		if name.is_empty() {
			return Err(format!("Library label \"{}\" has an empty name", label));
		}
		let path = if path.is_empty() { "." } else { path };
		Ok(LibraryRef::new(path, name, kind))
	}

	pub fn path(&self) -> &str {
		&self.path
	}
	pub fn name(&self) -> &str {
		&self.name
	}
	pub fn kind(&self) -> LinkKind {
		self.kind
	}

	pub fn is_system(&self) -> bool {
		self.path.is_empty()
	}
	pub fn is_local(&self) -> bool {
		self.path == "."
	}

	/// Re-expresses a reference declared by the project in `base` relative to
	/// the directory `base` itself is relative to.
	pub fn relocated(&self, base: &str) -> Self {
		if self.is_system() {
			return self.clone();
		}
		LibraryRef { path: join_relative(base, &self.path), name: self.name.clone(), kind: self.kind }
	}

	/// File name produced when building this library.
	pub fn artifact_name(&self) -> String {
		match self.kind {
			LinkKind::Static => format!("lib{}.a", self.name),
			LinkKind::Shared => format!("lib{}.so", self.name),
		}
	}
}
