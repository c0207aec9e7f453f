use std::collections::BTreeMap;

use crate::{
	dependency::Dependency,
	target::{Target, TargetKind},
};

/// Everything one configuration file declares. Targets and dependencies
/// share a single namespace, since a target's default dependency carries
/// the target's name.
#[derive(Clone, Debug, Default)]
pub struct Project {
	targets: BTreeMap<String, Target>,
	dependencies: BTreeMap<String, Dependency>,
	dependency_counter: u64,
}

impl Project {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn create_binary(&mut self, name: &str) -> Option<&mut Target> {
		self.create_target(name, TargetKind::Binary)
	}
	pub fn create_static_library(&mut self, name: &str) -> Option<&mut Target> {
		self.create_target(name, TargetKind::StaticLib)
	}
	pub fn create_shared_library(&mut self, name: &str) -> Option<&mut Target> {
		self.create_target(name, TargetKind::SharedLib)
	}

	pub fn create_target(&mut self, name: &str, kind: TargetKind) -> Option<&mut Target> {
		if name.is_empty() {
			log::error!("Target name must not be empty");
			return None;
		}
		if self.name_in_use(name) {
			log::error!("Cannot create {} \"{}\": name already in use", kind.as_str(), name);
			return None;
		}
		Some(self.targets.entry(name.to_owned()).or_insert(Target::new(name, kind)))
	}

	/// Creates an empty dependency, auto-named when `name` is `None`.
	pub fn create_dependency(&mut self, name: Option<&str>) -> Option<&mut Dependency> {
		let name = match name {
			Some(x) if x.is_empty() => {
				log::error!("Dependency name must not be empty");
				return None;
			}
			Some(x) if self.name_in_use(x) => {
				log::error!("Cannot create dependency \"{}\": name already in use", x);
				return None;
			}
			Some(x) => x.to_owned(),
			None => loop {
				let candidate = format!("dep{}", self.dependency_counter);
				self.dependency_counter += 1;
				if !self.name_in_use(&candidate) {
					break candidate;
				}
			},
		};
		Some(self.dependencies.entry(name.clone()).or_insert(Dependency::new(&name)))
	}

	/// Attaches a previously created dependency to a target.
	pub fn attach_dependency(&mut self, target: &str, dependency: &str) -> bool {
		if !self.dependencies.contains_key(dependency) {
			log::error!("{}: unknown dependency [{}]", target, dependency);
			return false;
		}
		match self.targets.get_mut(target) {
			Some(x) => x.attach(dependency),
			None => {
				log::error!("Cannot attach [{}]: unknown target \"{}\"", dependency, target);
				false
			}
		}
	}

	pub fn find_target(&self, name: &str) -> Option<&Target> {
		self.targets.get(name)
	}
	pub fn find_target_mut(&mut self, name: &str) -> Option<&mut Target> {
		self.targets.get_mut(name)
	}
	pub fn find_dependency(&self, name: &str) -> Option<&Dependency> {
		self.dependencies.get(name)
	}
	pub fn find_dependency_mut(&mut self, name: &str) -> Option<&mut Dependency> {
		self.dependencies.get_mut(name)
	}

	/// Targets ordered by name.
	pub fn targets(&self) -> impl Iterator<Item = &Target> {
		self.targets.values()
	}

	/// The default dependency of `target` followed by its attached ones.
	pub fn dependencies_of<'a>(&'a self, target: &'a Target) -> impl Iterator<Item = &'a Dependency> {
		core::iter::once(target.default_dependency())
			.chain(target.attached_dependencies().iter().filter_map(move |x| self.dependencies.get(x)))
	}

	pub fn target_has_c_source(&self, target: &Target) -> bool {
		self.dependencies_of(target).any(Dependency::has_c_source)
	}
	pub fn target_has_cpp_source(&self, target: &Target) -> bool {
		self.dependencies_of(target).any(Dependency::has_cpp_source)
	}

	pub fn has_c_source(&self) -> bool {
		self.targets().any(|x| self.target_has_c_source(x))
	}
	pub fn has_cpp_source(&self) -> bool {
		self.targets().any(|x| self.target_has_cpp_source(x))
	}

	fn name_in_use(&self, name: &str) -> bool {
		self.targets.contains_key(name) || self.dependencies.contains_key(name)
	}
}
