pub mod dep_graph;
pub mod link_order;
mod make;

use std::{fs, path::Path};

use crate::{loader::ProjectLoader, project::Project, toolchain::Toolchain};

use dep_graph::{DepGraph, Resolver};
use make::Make;

/// Resolves the libraries of every target of `project` into one graph.
pub fn resolve_graph(project: &Project, loader: &dyn ProjectLoader) -> DepGraph {
	let mut graph = DepGraph::new();
	let mut resolver = Resolver::new(loader);
	for target in project.targets() {
		resolver.resolve(project, target, &mut graph);
	}
	graph
}

/// Makefile text for `project`, using `loader` to reach sub-projects.
pub fn generate(project: &Project, loader: &dyn ProjectLoader, toolchain: &Toolchain) -> String {
	let graph = resolve_graph(project, loader);
	log::debug!("Resolved {} libraries", graph.len());
	Make::new(project, &graph, toolchain).render()
}

pub fn write_makefile(path: &Path, content: &str) -> Result<(), String> {
	match fs::write(path, content) {
		Ok(x) => Ok(x),
		Err(e) => Err(format!("Error writing {}: {}", path.display(), e)),
	}
}
