use std::{
	collections::{HashMap, HashSet, VecDeque},
	path::PathBuf,
	rc::Rc,
};

use crate::{
	library::{LibraryRef, LinkKind},
	loader::ProjectLoader,
	misc::join_relative,
	project::Project,
	target::{Target, TargetKind},
};

pub type NodeId = usize;

const LABEL_PREFIX: &str = "__mkgen_dep_";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LibClass {
	/// Found through the linker's search path.
	System,
	/// Built by the same configuration file.
	Local,
	/// A directory without a configuration file: a prebuilt leaf.
	ThirdParty,
	/// A directory with its own configuration file.
	SubProject,
}

#[derive(Debug)]
pub struct DepNode {
	pub lib: LibraryRef,
	pub class: LibClass,
	/// Phony rule name that builds this library, sub-projects only.
	pub label: Option<String>,
	/// Include directories contributed by the library's own configuration,
	/// relative to the generation directory.
	pub include_dirs: Vec<String>,
	/// Libraries this one links against, in declaration order.
	pub deps: Vec<NodeId>,
}

/// Library nodes keyed by structural [`LibraryRef`] equality, kept in
/// insertion order. Grown across all targets of one generation run.
#[derive(Debug, Default)]
pub struct DepGraph {
	nodes: Vec<DepNode>,
	map: HashMap<LibraryRef, NodeId>,
}

impl DepGraph {
	pub fn new() -> Self {
		Self::default()
	}
	pub fn len(&self) -> usize {
		self.nodes.len()
	}
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
	pub fn get(&self, lib: &LibraryRef) -> Option<NodeId> {
		self.map.get(lib).copied()
	}
	pub fn node(&self, id: NodeId) -> &DepNode {
		&self.nodes[id]
	}
	pub fn find(&self, lib: &LibraryRef) -> Option<&DepNode> {
		self.get(lib).map(|id| &self.nodes[id])
	}
	pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DepNode)> {
		self.nodes.iter().enumerate()
	}

	fn insert(&mut self, lib: LibraryRef, class: LibClass) -> NodeId {
		let id = self.nodes.len();
		let label = match class {
			LibClass::SubProject => Some(format!("{}{}", LABEL_PREFIX, id)),
			_ => None,
		};
		self.map.insert(lib.clone(), id);
		self.nodes.push(DepNode { lib, class, label, include_dirs: Vec::new(), deps: Vec::new() });
		id
	}

	fn add_edge(&mut self, from: NodeId, to: NodeId) {
		let deps = &mut self.nodes[from].deps;
		if !deps.contains(&to) {
			deps.push(to);
		}
	}

	fn add_include_dir(&mut self, id: NodeId, dir: String) {
		let include_dirs = &mut self.nodes[id].include_dirs;
		if !include_dirs.contains(&dir) {
			include_dirs.push(dir);
		}
	}
}

/// Builds the library graph of targets, loading sub-project configurations
/// through `loader` as they are reached.
pub struct Resolver<'a> {
	loader: &'a dyn ProjectLoader,
	loaded: HashMap<String, Option<Rc<Project>>>,
	expanded: HashSet<(PathBuf, String, LinkKind)>,
}

impl<'a> Resolver<'a> {
	pub fn new(loader: &'a dyn ProjectLoader) -> Self {
		Resolver { loader, loaded: HashMap::new(), expanded: HashSet::new() }
	}

	/// Adds every library reachable from `target` to `graph`. Safe to call
	/// once per target on the same graph.
	pub fn resolve(&mut self, project: &Project, target: &Target, graph: &mut DepGraph) {
		let mut queue = VecDeque::new();
		for dep in project.dependencies_of(target) {
			for lib in dep.libraries() {
				self.visit(lib.clone(), graph, &mut queue);
			}
		}

		while let Some(id) = queue.pop_front() {
			self.expand(id, graph, &mut queue);
		}
	}

	fn classify(&self, lib: &LibraryRef) -> LibClass {
		if lib.is_system() {
			LibClass::System
		} else if lib.is_local() {
			LibClass::Local
		} else if self.loader.has_config(lib.path()) {
			LibClass::SubProject
		} else {
			if self.loader.canonical_dir(lib.path()).is_none() {
				log::warn!("Library directory \"{}\" for [{}] does not exist", lib.path(), lib.name());
			}
			LibClass::ThirdParty
		}
	}

	fn visit(&mut self, lib: LibraryRef, graph: &mut DepGraph, queue: &mut VecDeque<NodeId>) -> NodeId {
		if let Some(id) = graph.get(&lib) {
			return id;
		}

		let class = self.classify(&lib);
		log::debug!("New library node [{}]: {:?}", lib, class);
		let id = graph.insert(lib, class);
		if class == LibClass::SubProject && self.first_expansion(&graph.node(id).lib) {
			queue.push_back(id);
		}
		id
	}

	/// Textual paths can differ while naming the same directory; only the
	/// first path that reaches a physical library gets expanded.
	fn first_expansion(&mut self, lib: &LibraryRef) -> bool {
		let dir = self
			.loader
			.canonical_dir(lib.path())
			.unwrap_or_else(|| PathBuf::from(lib.path()));
		if self.expanded.insert((dir, lib.name().to_owned(), lib.kind())) {
			true
		} else {
			log::warn!("[{}] was already expanded through another path, treating it as a leaf", lib);
			false
		}
	}

	fn load(&mut self, dir: &str) -> Option<Rc<Project>> {
		if let Some(project) = self.loaded.get(dir) {
			return project.clone();
		}
		let project = match self.loader.load(dir) {
			Ok(x) => Some(Rc::new(x)),
			Err(e) => {
				log::error!("Loading sub-project \"{}\" failed: {}", dir, e);
				None
			}
		};
		self.loaded.insert(dir.to_owned(), project.clone());
		project
	}

	fn expand(&mut self, id: NodeId, graph: &mut DepGraph, queue: &mut VecDeque<NodeId>) {
		let lib = graph.node(id).lib.clone();
		let project = match self.load(lib.path()) {
			Some(x) => x,
			None => return,
		};
		let target = match project.find_target(lib.name()) {
			Some(x) => x,
			None => {
				log::debug!("Sub-project \"{}\" does not define [{}]", lib.path(), lib.name());
				return;
			}
		};
		let expected = match lib.kind() {
			LinkKind::Static => TargetKind::StaticLib,
			LinkKind::Shared => TargetKind::SharedLib,
		};
		if target.kind() != expected {
			log::warn!("[{}] refers to a {} in \"{}\"", lib, target.kind().as_str(), lib.path());
		}

		for dep in project.dependencies_of(target) {
			for sub_lib in dep.libraries() {
				let sub_id = self.visit(sub_lib.relocated(lib.path()), graph, queue);
				graph.add_edge(id, sub_id);
			}
			for inc in dep.include_dirs() {
				graph.add_include_dir(id, join_relative(lib.path(), inc));
			}
		}
	}
}
