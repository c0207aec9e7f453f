use core::fmt;

use crate::dependency::Dependency;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
	Binary,
	StaticLib,
	SharedLib,
}

impl TargetKind {
	/// Name of the file produced for a target called `name`.
	pub fn artifact_name(&self, name: &str) -> String {
		match self {
			TargetKind::Binary => name.to_owned(),
			TargetKind::StaticLib => format!("lib{}.a", name),
			TargetKind::SharedLib => format!("lib{}.so", name),
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			TargetKind::Binary => "binary",
			TargetKind::StaticLib => "static_library",
			TargetKind::SharedLib => "shared_library",
		}
	}
}

/// A build product. Its sources and libraries are the union of the default
/// dependency (named after the target) and the attached dependencies,
/// default first, then in attachment order.
#[derive(Clone, Debug)]
pub struct Target {
	name: String,
	kind: TargetKind,
	default_dependency: Dependency,
	attached: Vec<String>,
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			r#"Target{{
   name: {},
   kind: {},
   dependencies: [{}],
}}"#,
			self.name,
			self.kind.as_str(),
			self.dependency_names().collect::<Vec<&str>>().join(", "),
		)
	}
}

impl Target {
	pub(crate) fn new(name: &str, kind: TargetKind) -> Self {
		Target { name: name.to_owned(), kind, default_dependency: Dependency::new(name), attached: Vec::new() }
	}

	pub fn name(&self) -> &str {
		&self.name
	}
	pub fn kind(&self) -> TargetKind {
		self.kind
	}
	pub fn artifact_name(&self) -> String {
		self.kind.artifact_name(&self.name)
	}

	pub fn default_dependency(&self) -> &Dependency {
		&self.default_dependency
	}
	pub fn default_dependency_mut(&mut self) -> &mut Dependency {
		&mut self.default_dependency
	}

	pub fn attached_dependencies(&self) -> &[String] {
		&self.attached
	}

	pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
		core::iter::once(self.default_dependency.name()).chain(self.attached.iter().map(String::as_str))
	}

	pub(crate) fn attach(&mut self, dependency: &str) -> bool {
		if dependency == self.default_dependency.name() || self.attached.iter().any(|x| x == dependency) {
			log::warn!("{}: duplicated dependency [{}]", self.name, dependency);
			return false;
		}
		self.attached.push(dependency.to_owned());
		true
	}
}
