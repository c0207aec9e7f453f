use std::collections::{HashMap, HashSet, VecDeque};

use super::dep_graph::{DepGraph, LibClass, NodeId};
use crate::{project::Project, target::Target};

/// Nodes referenced directly by the target's dependencies, in declaration
/// order, each once.
pub fn direct_nodes(project: &Project, target: &Target, graph: &DepGraph) -> Vec<NodeId> {
	let mut nodes = Vec::new();
	for lib in project.dependencies_of(target).flat_map(|x| x.libraries()) {
		match graph.get(lib) {
			Some(id) if !nodes.contains(&id) => nodes.push(id),
			Some(_) => {}
			None => log::debug!("{}: [{}] was never resolved", target.name(), lib),
		}
	}
	nodes
}

/// Counts, for every node reachable from `direct`, the edges pointing at it
/// from the target or from other reachable nodes. A count above one means
/// the node is shared by several paths.
pub fn in_degree(direct: &[NodeId], graph: &DepGraph) -> HashMap<NodeId, usize> {
	let mut degrees = HashMap::new();
	let mut seen = HashSet::new();
	let mut queue = VecDeque::new();
	for id in direct {
		*degrees.entry(*id).or_insert(0) += 1;
		if seen.insert(*id) {
			queue.push_back(*id);
		}
	}

	while let Some(id) = queue.pop_front() {
		for dep in &graph.node(id).deps {
			*degrees.entry(*dep).or_insert(0) += 1;
			if seen.insert(*dep) {
				queue.push_back(*dep);
			}
		}
	}
	degrees
}

/// Orders the reachable nodes so that every library comes before the
/// libraries it needs symbols from. Nodes on a cycle are appended after the
/// others, system libraries come last.
pub fn topo_order(direct: &[NodeId], graph: &DepGraph, in_degree: &HashMap<NodeId, usize>) -> Vec<NodeId> {
	let mut remaining = in_degree.clone();
	let mut queue = VecDeque::new();
	let mut consume = |id: NodeId, queue: &mut VecDeque<NodeId>| {
		if let Some(degree) = remaining.get_mut(&id) {
			*degree -= 1;
			if *degree == 0 {
				queue.push_back(id);
			}
		}
	};

	for id in direct {
		consume(*id, &mut queue);
	}

	let mut order = Vec::with_capacity(in_degree.len());
	while let Some(id) = queue.pop_front() {
		order.push(id);
		for dep in &graph.node(id).deps {
			consume(*dep, &mut queue);
		}
	}

	if order.len() < in_degree.len() {
		let mut emitted = order.iter().copied().collect::<HashSet<_>>();
		for id in discovery_order(direct, graph) {
			if emitted.insert(id) {
				log::warn!("[{}] is part of a dependency cycle, link order is not guaranteed", graph.node(id).lib);
				order.push(id);
			}
		}
	}

	let (mut order, system): (Vec<_>, Vec<_>) =
		order.into_iter().partition(|x| graph.node(*x).class != LibClass::System);
	order.extend(system);
	order
}

fn discovery_order(direct: &[NodeId], graph: &DepGraph) -> Vec<NodeId> {
	let mut order = Vec::new();
	let mut seen = HashSet::new();
	let mut queue = direct.iter().copied().collect::<VecDeque<_>>();
	while let Some(id) = queue.pop_front() {
		if seen.insert(id) {
			order.push(id);
			queue.extend(graph.node(id).deps.iter().copied());
		}
	}
	order
}

/// Link order of `target`: the in-degree and emission order are computed
/// against this target alone.
pub fn link_order(project: &Project, target: &Target, graph: &DepGraph) -> Vec<NodeId> {
	let direct = direct_nodes(project, target, graph);
	let degrees = in_degree(&direct, graph);
	topo_order(&direct, graph, &degrees)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		generator::dep_graph::Resolver,
		library::{LibraryRef, LinkKind},
		loader::memory::MemoryLoader,
		target::TargetKind,
	};

	fn static_(path: &str, name: &str) -> LibraryRef {
		LibraryRef::new(path, name, LinkKind::Static)
	}

	fn lib_project(name: &str, libs: &[LibraryRef]) -> Project {
		let mut project = Project::new();
		let dep = project.create_target(name, TargetKind::StaticLib).unwrap().default_dependency_mut();
		for lib in libs {
			dep.add_library(lib.clone());
		}
		project
	}

	/// app -> a, b, base; a -> base, c; b -> c; c -> pthread
	fn diamond() -> (Project, DepGraph) {
		let mut loader = MemoryLoader::new();
		loader.add_project("../a", lib_project("a", &[static_("../base", "base"), static_("../c", "c")]));
		loader.add_project("../b", lib_project("b", &[static_("../c", "c")]));
		loader.add_project("../c", lib_project("c", &[LibraryRef::system("pthread")]));
		loader.add_project("../base", lib_project("base", &[]));

		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_library(static_("../a", "a"));
		dep.add_library(static_("../b", "b"));
		dep.add_library(static_("../base", "base"));

		let mut graph = DepGraph::new();
		let mut resolver = Resolver::new(&loader);
		for target in project.targets() {
			resolver.resolve(&project, target, &mut graph);
		}
		(project, graph)
	}

	fn names(graph: &DepGraph, order: &[NodeId]) -> Vec<String> {
		order.iter().map(|x| graph.node(*x).lib.name().to_owned()).collect()
	}

	#[test]
	fn in_degree_counts_every_path() {
		let (project, graph) = diamond();
		let app = project.find_target("app").unwrap();
		let direct = direct_nodes(&project, app, &graph);
		let degrees = in_degree(&direct, &graph);
		let degree_of = |name: &str| {
			let (id, _) = graph.iter().find(|(_, node)| node.lib.name() == name).unwrap();
			degrees[&id]
		};
		assert_eq!(degree_of("a"), 1);
		assert_eq!(degree_of("b"), 1);
		assert_eq!(degree_of("base"), 2);
		assert_eq!(degree_of("c"), 2);
		assert_eq!(degree_of("pthread"), 1);
	}

	#[test]
	fn dependents_precede_dependencies() {
		let (project, graph) = diamond();
		let app = project.find_target("app").unwrap();
		let order = link_order(&project, app, &graph);
		assert_eq!(names(&graph, &order), ["a", "b", "base", "c", "pthread"]);

		let position = |id: NodeId| order.iter().position(|x| *x == id).unwrap();
		for id in &order {
			for dep in &graph.node(*id).deps {
				assert!(position(*id) < position(*dep));
			}
		}
	}

	#[test]
	fn shared_nodes_are_emitted_once() {
		let (project, graph) = diamond();
		let app = project.find_target("app").unwrap();
		let order = link_order(&project, app, &graph);
		let unique = order.iter().collect::<HashSet<_>>();
		assert_eq!(unique.len(), order.len());
		assert_eq!(order.len(), graph.len());
	}

	#[test]
	fn order_is_scoped_per_target() {
		let (mut project, mut graph) = diamond();
		project.create_binary("tool").unwrap().default_dependency_mut().add_library(static_("../c", "c"));
		let loader = MemoryLoader::new();
		let mut resolver = Resolver::new(&loader);
		let tool = project.find_target("tool").unwrap();
		resolver.resolve(&project, tool, &mut graph);

		let order = link_order(&project, tool, &graph);
		assert_eq!(names(&graph, &order), ["c", "pthread"]);
	}

	#[test]
	fn system_libraries_come_last() {
		let mut loader = MemoryLoader::new();
		loader.add_project("../a", lib_project("a", &[LibraryRef::system("m"), static_("../b", "b")]));
		loader.add_project("../b", lib_project("b", &[]));

		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_library(LibraryRef::system("pthread"));
		dep.add_library(static_("../a", "a"));
		let mut graph = DepGraph::new();
		let mut resolver = Resolver::new(&loader);
		let app = project.find_target("app").unwrap();
		resolver.resolve(&project, app, &mut graph);

		let order = link_order(&project, app, &graph);
		assert_eq!(names(&graph, &order), ["a", "b", "pthread", "m"]);
	}

	#[test]
	fn cycles_do_not_drop_libraries() {
		let mut loader = MemoryLoader::new();
		loader.add_project("../a", lib_project("a", &[static_("../b", "b")]));
		loader.add_project("../b", lib_project("b", &[static_("../a", "a")]));

		let mut project = Project::new();
		project.create_binary("app").unwrap().default_dependency_mut().add_library(static_("../a", "a"));
		let mut graph = DepGraph::new();
		let mut resolver = Resolver::new(&loader);
		let app = project.find_target("app").unwrap();
		resolver.resolve(&project, app, &mut graph);

		let order = link_order(&project, app, &graph);
		assert_eq!(names(&graph, &order), ["a", "b"]);
	}
}
