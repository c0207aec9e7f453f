use std::collections::{HashSet, VecDeque};

use super::{
	dep_graph::{DepGraph, LibClass, NodeId},
	link_order::{direct_nodes, in_degree, topo_order},
};
use crate::{
	dependency::Dependency,
	library::LinkKind,
	misc::parent_dir,
	project::Project,
	target::{Target, TargetKind},
	toolchain::Toolchain,
};

const HEADER: &str = "# This Makefile is generated by mkgen\n\n";

struct MakeVar {
	name: String,
	values: Vec<String>,
}

impl MakeVar {
	fn new(name: impl Into<String>, values: Vec<String>) -> Self {
		MakeVar { name: name.into(), values }
	}

	fn as_string(&self) -> String {
		let mut ret = self.name.clone() + " :=";
		for value in &self.values {
			ret += " ";
			ret += value;
		}
		ret += "\n";
		ret
	}
}

#[derive(Default)]
struct MakeRule {
	targets: Vec<String>,
	prerequisites: Vec<String>,
	order_only: Vec<String>,
	recipe: Vec<String>,
}

impl MakeRule {
	fn as_string(&self) -> String {
		let mut ret = self.targets.join(" ") + ":";
		for prerequisite in &self.prerequisites {
			ret += " ";
			ret += prerequisite;
		}
		if !self.order_only.is_empty() {
			ret += " |";
			for prerequisite in &self.order_only {
				ret += " ";
				ret += prerequisite;
			}
		}
		ret += "\n";
		for line in &self.recipe {
			ret += "\t";
			ret += line;
			ret += "\n";
		}
		ret += "\n";
		ret
	}
}

fn phony(names: &[String]) -> String {
	format!(".PHONY: {}\n\n", names.join(" "))
}

fn compiler_stanza(tool_var: &str, tool: &str, flags_var: &str, flags: &[String], toolchain: &Toolchain) -> String {
	let mut ret = MakeVar::new(tool_var, vec![tool.to_owned()]).as_string();
	ret += "\nifeq ($(debug), y)\n\t";
	ret += &MakeVar::new(flags_var, toolchain.debug_flags.clone()).as_string();
	ret += "else\n\t";
	ret += &MakeVar::new(flags_var, toolchain.release_flags.clone()).as_string();
	ret += "endif\n";
	let mut all_flags = vec![format!("$({})", flags_var)];
	all_flags.extend_from_slice(flags);
	ret += &MakeVar::new(flags_var, all_flags).as_string();
	ret += "\n";
	ret
}

fn push_unique(items: &mut Vec<String>, item: String) {
	if !items.contains(&item) {
		items.push(item);
	}
}

/// Joins the non-empty parts of a command line.
fn command(parts: &[&str]) -> String {
	parts
		.iter()
		.copied()
		.filter(|x| !x.is_empty())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Dependency and target variables live under separate prefixes, and no
/// suffix used under one prefix ends another, so two owners never share a
/// variable.
fn dep_var(dep: &str, suffix: &str) -> String {
	format!("DEP_{}_{}", dep, suffix)
}

fn target_var(target: &str, suffix: &str) -> String {
	format!("TARGET_{}_{}", target, suffix)
}

fn var_ref(name: &str) -> String {
	format!("$({})", name)
}

fn link_command(kind: TargetKind, linker: &str, objects: &str, link_flags: &str, libs: &str) -> String {
	match kind {
		TargetKind::Binary => command(&[linker, "-o", "$@", objects, link_flags, libs]),
		TargetKind::SharedLib => command(&[linker, "-shared", "-o", "$@", objects, link_flags, libs]),
		TargetKind::StaticLib => command(&["$(AR)", "rc", "$@", objects]),
	}
}

/// Renders a Makefile from a project and the graph resolved for all of its
/// targets.
pub struct Make<'a> {
	project: &'a Project,
	graph: &'a DepGraph,
	toolchain: &'a Toolchain,
	phony_nodes: HashSet<NodeId>,
	sub_project_dirs: Vec<String>,
	rendered_dependencies: Vec<String>,
	object_names: HashSet<String>,
}

impl<'a> Make<'a> {
	pub fn new(project: &'a Project, graph: &'a DepGraph, toolchain: &'a Toolchain) -> Self {
		Make {
			project,
			graph,
			toolchain,
			phony_nodes: HashSet::new(),
			sub_project_dirs: Vec::new(),
			rendered_dependencies: Vec::new(),
			object_names: HashSet::new(),
		}
	}

	pub fn render(mut self) -> String {
		let project = self.project;
		let toolchain = self.toolchain;

		let mut content = HEADER.to_owned();
		if project.targets().any(|x| x.kind() == TargetKind::StaticLib) {
			content += &MakeVar::new("AR", vec![toolchain.ar.clone()]).as_string();
			content += "\n";
		}
		if project.has_c_source() {
			content += &compiler_stanza("CC", &toolchain.cc, "CFLAGS", &toolchain.c_flags, toolchain);
		}
		if project.has_cpp_source() {
			content += &compiler_stanza("CXX", &toolchain.cxx, "CXXFLAGS", &toolchain.cxx_flags, toolchain);
		}

		content += &MakeVar::new("TARGET", project.targets().map(Target::artifact_name).collect()).as_string();
		content += "\n";
		content += &phony(&["all".to_owned(), "clean".to_owned(), "distclean".to_owned()]);
		content += &MakeRule { targets: vec!["all".to_owned()], prerequisites: vec![var_ref("TARGET")], ..Default::default() }
			.as_string();

		for target in project.targets() {
			content += &self.target_section(target);
		}

		let mut clean = vec!["rm".to_owned(), "-f".to_owned(), var_ref("TARGET")];
		clean.extend(self.rendered_dependencies.iter().map(|x| var_ref(&dep_var(x, "OBJS"))));
		content += &MakeRule { targets: vec!["clean".to_owned()], recipe: vec![clean.join(" ")], ..Default::default() }
			.as_string();
		content += &MakeRule {
			targets: vec!["distclean".to_owned()],
			prerequisites: vec!["clean".to_owned()],
			recipe: self
				.sub_project_dirs
				.iter()
				.map(|x| format!("$(MAKE) -C {} distclean", x))
				.collect(),
			..Default::default()
		}
		.as_string();
		content
	}

	fn target_section(&mut self, target: &Target) -> String {
		let project = self.project;
		let graph = self.graph;
		let mut content = String::new();

		let direct = direct_nodes(project, target, graph);
		let degrees = in_degree(&direct, graph);

		// Sub-projects this target reaches first-hand get a recursive build rule.
		let mut labels = Vec::new();
		let mut new_rules = Vec::new();
		for id in &direct {
			let node = graph.node(*id);
			let label = match &node.label {
				Some(x) if node.class == LibClass::SubProject && degrees.get(id) == Some(&1) => x,
				_ => continue,
			};
			labels.push(label.clone());
			if self.phony_nodes.insert(*id) {
				new_rules.push(MakeRule {
					targets: vec![label.clone()],
					recipe: vec![format!(
						"$(MAKE) debug=$(debug) {} -C {}",
						node.lib.artifact_name(),
						node.lib.path()
					)],
					..Default::default()
				});
				push_unique(&mut self.sub_project_dirs, node.lib.path().to_owned());
			}
		}
		if !new_rules.is_empty() {
			content += &phony(&new_rules.iter().flat_map(|x| x.targets.clone()).collect::<Vec<_>>());
			for rule in &new_rules {
				content += &rule.as_string();
			}
		}

		let mut object_vars = Vec::new();
		let mut link_flags = Vec::new();
		for dep in project.dependencies_of(target) {
			for flag in dep.flags() {
				push_unique(&mut link_flags, flag.clone());
			}
			if !dep.has_sources() {
				continue;
			}
			object_vars.push(var_ref(&dep_var(dep.name(), "OBJS")));
			if !self.rendered_dependencies.iter().any(|x| x == dep.name()) {
				self.rendered_dependencies.push(dep.name().to_owned());
				content += &self.dependency_section(dep);
			}
		}
		if object_vars.is_empty() {
			log::warn!("{}: target has no source files", target.name());
		}

		let objects_var = target_var(target.name(), "OBJS");
		let link_flags_var = target_var(target.name(), "LINK_FLAGS");
		let libs_var = target_var(target.name(), "LIBS");
		let mut vars = Vec::new();
		let mut prerequisites = Vec::new();
		let (mut objects, mut flags, mut libs) = (String::new(), String::new(), String::new());
		if !object_vars.is_empty() {
			vars.push(MakeVar::new(&objects_var, object_vars));
			objects = var_ref(&objects_var);
			prerequisites.push(objects.clone());
		}
		if target.kind() != TargetKind::StaticLib {
			let order = topo_order(&direct, graph, &degrees);
			if !link_flags.is_empty() {
				vars.push(MakeVar::new(&link_flags_var, link_flags));
				flags = var_ref(&link_flags_var);
			}
			let link_libs = self.link_libraries(&order);
			if !link_libs.is_empty() {
				vars.push(MakeVar::new(&libs_var, link_libs));
				libs = var_ref(&libs_var);
			}
			prerequisites.extend(self.local_artifacts(target, &order));
		}
		if !vars.is_empty() {
			for var in &vars {
				content += &var.as_string();
			}
			content += "\n";
		}

		let linker = if project.target_has_cpp_source(target) {
			"$(CXX)"
		} else {
			"$(CC)"
		};
		content += &MakeRule {
			targets: vec![target.artifact_name()],
			prerequisites,
			order_only: labels,
			recipe: vec![link_command(target.kind(), linker, &objects, &flags, &libs)],
		}
		.as_string();
		content
	}

	fn dependency_section(&mut self, dep: &Dependency) -> String {
		let mut content = String::new();
		let include_var = dep_var(dep.name(), "INCLUDE");
		let flags_var = dep_var(dep.name(), "FLAGS");
		let objects_var = dep_var(dep.name(), "OBJS");

		let includes = self.include_dirs(dep);
		let (mut include, mut flags) = (String::new(), String::new());
		if !includes.is_empty() {
			content += &MakeVar::new(&include_var, includes.iter().map(|x| "-I".to_owned() + x).collect())
				.as_string();
			include = var_ref(&include_var);
		}
		if !dep.flags().is_empty() {
			content += &MakeVar::new(&flags_var, dep.flags().to_vec()).as_string();
			flags = var_ref(&flags_var);
		}

		let mut rules = Vec::new();
		let mut objects = Vec::new();
		let sources = dep
			.cpp_sources()
			.iter()
			.map(|x| (x, "$(CXX)", "$(CXXFLAGS)"))
			.chain(dep.c_sources().iter().map(|x| (x, "$(CC)", "$(CFLAGS)")));
		for (src, compiler, compiler_flags) in sources {
			let object = self.object_name(src, dep.name());
			objects.push(object.clone());
			rules.push(MakeRule {
				targets: vec![object],
				prerequisites: vec![src.clone()],
				recipe: vec![command(&[compiler, compiler_flags, &include, &flags, "-c", "$<", "-o", "$@"])],
				..Default::default()
			});
		}
		content += &MakeVar::new(&objects_var, objects).as_string();
		content += "\n";
		for rule in &rules {
			content += &rule.as_string();
		}
		content
	}

	/// The dependency's own include directories, then those inferred from
	/// every library reachable from it.
	fn include_dirs(&self, dep: &Dependency) -> Vec<String> {
		let mut dirs = dep.include_dirs().to_vec();
		let mut seen = HashSet::new();
		let mut queue = VecDeque::new();
		for lib in dep.libraries() {
			if let Some(id) = self.graph.get(lib) {
				if seen.insert(id) {
					queue.push_back(id);
				}
			}
		}

		while let Some(id) = queue.pop_front() {
			let node = self.graph.node(id);
			if matches!(node.class, LibClass::ThirdParty | LibClass::SubProject) {
				push_unique(&mut dirs, parent_dir(node.lib.path()));
			}
			for inc in &node.include_dirs {
				push_unique(&mut dirs, inc.clone());
			}
			for sub in &node.deps {
				if seen.insert(*sub) {
					queue.push_back(*sub);
				}
			}
		}
		dirs
	}

	/// Object file next to the source, tagged with the dependency name and,
	/// when that name is already taken anywhere in the Makefile, a sequence
	/// number.
	fn object_name(&mut self, src: &str, dep_name: &str) -> String {
		let (dir, file) = match src.rsplit_once('/') {
			Some((dir, file)) => (Some(dir), file),
			None => (None, src),
		};
		let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
		let base = match dir {
			Some(dir) => format!("{}/{}.{}", dir, stem, dep_name),
			None => format!("{}.{}", stem, dep_name),
		};

		let mut name = base.clone() + ".o";
		let mut sequence = 1;
		while !self.object_names.insert(name.clone()) {
			name = format!("{}.{}.o", base, sequence);
			sequence += 1;
		}
		name
	}

	fn link_libraries(&self, order: &[NodeId]) -> Vec<String> {
		let mut libs = Vec::new();
		let mut lib_dirs = HashSet::new();
		for id in order {
			let lib = &self.graph.node(*id).lib;
			if lib.is_system() {
				libs.push(format!("-l{}", lib.name()));
				continue;
			}
			match lib.kind() {
				LinkKind::Static if lib.is_local() => libs.push(lib.artifact_name()),
				LinkKind::Static => libs.push(format!("{}/{}", lib.path(), lib.artifact_name())),
				LinkKind::Shared => {
					if lib_dirs.insert(lib.path()) {
						libs.push(format!("-L{}", lib.path()));
					}
					libs.push(format!("-l{}", lib.name()));
				}
			}
		}
		libs
	}

	/// Artifacts of local libraries built by this same Makefile.
	fn local_artifacts(&self, target: &Target, order: &[NodeId]) -> Vec<String> {
		let mut artifacts = Vec::new();
		for id in order {
			let node = self.graph.node(*id);
			if node.class != LibClass::Local || node.lib.name() == target.name() {
				continue;
			}
			match self.project.find_target(node.lib.name()) {
				Some(x) if x.artifact_name() == node.lib.artifact_name() => artifacts.push(x.artifact_name()),
				_ => log::warn!("{}: local library [{}] is not built by this project", target.name(), node.lib),
			}
		}
		artifacts
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		generator::resolve_graph,
		library::LibraryRef,
		loader::{memory::MemoryLoader, ProjectLoader},
	};

	fn render(project: &Project, loader: &dyn ProjectLoader) -> String {
		let graph = resolve_graph(project, loader);
		Make::new(project, &graph, &Toolchain::default()).render()
	}

	fn shared_lib_project(name: &str) -> Project {
		let mut project = Project::new();
		project
			.create_shared_library(name)
			.unwrap()
			.default_dependency_mut()
			.add_source_file(&format!("{}.cpp", name));
		project
	}

	#[test]
	fn binary_with_sub_project() {
		let mut loader = MemoryLoader::new();
		loader.add_project("../libfoo", shared_lib_project("foo"));

		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_source_file("main.cpp");
		dep.add_library(LibraryRef::new("../libfoo", "foo", LinkKind::Shared));

		let expected = r#"# This Makefile is generated by mkgen

CXX := g++

ifeq ($(debug), y)
	CXXFLAGS := -g
else
	CXXFLAGS := -O2 -DNDEBUG
endif
CXXFLAGS := $(CXXFLAGS) -Wall -Werror -Wextra -fPIC

TARGET := app

.PHONY: all clean distclean

all: $(TARGET)

.PHONY: __mkgen_dep_0

__mkgen_dep_0:
	$(MAKE) debug=$(debug) libfoo.so -C ../libfoo

DEP_app_INCLUDE := -I..
DEP_app_OBJS := main.app.o

main.app.o: main.cpp
	$(CXX) $(CXXFLAGS) $(DEP_app_INCLUDE) -c $< -o $@

TARGET_app_OBJS := $(DEP_app_OBJS)
TARGET_app_LIBS := -L../libfoo -lfoo

app: $(TARGET_app_OBJS) | __mkgen_dep_0
	$(CXX) -o $@ $(TARGET_app_OBJS) $(TARGET_app_LIBS)

clean:
	rm -f $(TARGET) $(DEP_app_OBJS)

distclean: clean
	$(MAKE) -C ../libfoo distclean

"#;
		assert_eq!(render(&project, &loader), expected);
	}

	#[test]
	fn phony_rule_once_per_sub_project() {
		let mut loader = MemoryLoader::new();
		loader.add_project("../libfoo", shared_lib_project("foo"));

		let mut project = Project::new();
		for name in ["a", "b", "c"] {
			let dep = project.create_binary(name).unwrap().default_dependency_mut();
			dep.add_source_file(&format!("{}.c", name));
			dep.add_library(LibraryRef::new("../libfoo", "foo", LinkKind::Shared));
		}

		let makefile = render(&project, &loader);
		assert_eq!(makefile.matches("\n__mkgen_dep_0:\n").count(), 1);
		assert_eq!(makefile.matches(".PHONY: __mkgen_dep_0\n").count(), 1);
		assert_eq!(makefile.matches("| __mkgen_dep_0\n").count(), 3);
		assert_eq!(makefile.matches("$(MAKE) -C ../libfoo distclean").count(), 1);
		assert!(makefile.contains("CC := gcc\n"));
		assert!(!makefile.contains("CXX := g++"));
		assert!(makefile.contains("\t$(CC) -o $@ $(TARGET_a_OBJS) $(TARGET_a_LIBS)\n"));
	}

	#[test]
	fn object_names_do_not_collide() {
		let mut project = Project::new();
		project
			.create_dependency(Some("net"))
			.unwrap()
			.add_source_file("src/util.c");
		let dep = project.create_static_library("core").unwrap().default_dependency_mut();
		dep.add_source_file("src/util.c");
		dep.add_source_file("src/util.cpp");
		project.attach_dependency("core", "net");

		let makefile = render(&project, &MemoryLoader::new());
		assert!(makefile.contains("DEP_core_OBJS := src/util.core.o src/util.core.1.o\n"));
		assert!(makefile.contains("DEP_net_OBJS := src/util.net.o\n"));
		assert!(makefile.contains("src/util.core.o: src/util.cpp\n\t$(CXX) $(CXXFLAGS) -c $< -o $@\n"));
		assert!(makefile.contains("src/util.core.1.o: src/util.c\n\t$(CC) $(CFLAGS) -c $< -o $@\n"));
		assert!(makefile.contains("src/util.net.o: src/util.c\n"));
		assert!(makefile.contains("TARGET_core_OBJS := $(DEP_core_OBJS) $(DEP_net_OBJS)\n"));
		assert!(makefile.contains("libcore.a: $(TARGET_core_OBJS)\n\t$(AR) rc $@ $(TARGET_core_OBJS)\n"));
		assert!(makefile.contains("AR := ar\n"));
		assert!(makefile.contains("\trm -f $(TARGET) $(DEP_core_OBJS) $(DEP_net_OBJS)\n"));
	}

	#[test]
	fn shared_object_sequence_is_global() {
		let mut project = Project::new();
		let a = project.create_binary("x").unwrap().default_dependency_mut();
		a.add_source_file("main.c");
		a.add_source_file("main.cc");
		let b = project.create_dependency(Some("x.1")).unwrap();
		b.add_source_file("main.c");
		project.attach_dependency("x", "x.1");

		let makefile = render(&project, &MemoryLoader::new());
		let objects = makefile
			.lines()
			.filter(|x| x.ends_with(": main.c") || x.ends_with(": main.cc"))
			.map(|x| x.split(':').next().unwrap().to_owned())
			.collect::<Vec<_>>();
		assert_eq!(objects.len(), 3);
		assert_eq!(objects.iter().collect::<HashSet<_>>().len(), 3);
	}

	#[test]
	fn include_dirs_are_deduplicated() {
		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_source_file("main.c");
		dep.add_include_dir("./inc");
		dep.add_include_dir("inc");
		dep.add_flag("-DX");

		let makefile = render(&project, &MemoryLoader::new());
		assert!(makefile.contains("DEP_app_INCLUDE := -Iinc\n"));
		assert_eq!(makefile.matches("-Iinc").count(), 1);
		assert!(makefile.contains("DEP_app_FLAGS := -DX\n"));
		assert!(makefile.contains("\t$(CC) $(CFLAGS) $(DEP_app_INCLUDE) $(DEP_app_FLAGS) -c $< -o $@\n"));
		assert!(makefile.contains("TARGET_app_LINK_FLAGS := -DX\n"));
	}

	#[test]
	fn link_libraries_follow_link_order() {
		let mut loader = MemoryLoader::new();
		let mut foo = shared_lib_project("foo");
		let foo_dep = foo.find_target_mut("foo").unwrap().default_dependency_mut();
		foo_dep.add_library(LibraryRef::new("../libbar", "bar", LinkKind::Static));
		foo_dep.add_library(LibraryRef::new("../libfoo", "extra", LinkKind::Shared));
		foo_dep.add_library(LibraryRef::system("pthread"));
		foo_dep.add_include_dir("include");
		loader.add_project("../libfoo", foo);
		loader.add_dir("../libbar");

		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_source_file("main.c");
		dep.add_library(LibraryRef::system("pthread"));
		dep.add_library(LibraryRef::new("../libfoo", "foo", LinkKind::Shared));
		dep.add_library(LibraryRef::new(".", "util", LinkKind::Static));
		project.create_static_library("util").unwrap().default_dependency_mut().add_source_file("util.c");

		let makefile = render(&project, &loader);
		assert!(makefile.contains("TARGET_app_LIBS := -L../libfoo -lfoo libutil.a ../libbar/libbar.a -lextra -lpthread\n"));
		assert!(makefile.contains("DEP_app_INCLUDE := -I.. -I../libfoo/include\n"));
		assert!(makefile.contains("app: $(TARGET_app_OBJS) libutil.a | __mkgen_dep_1\n"));
		assert!(makefile.contains("TARGET := app libutil.a\n"));
	}

	#[test]
	fn indirectly_reached_sub_projects_get_no_phony_rule() {
		let mut loader = MemoryLoader::new();
		let mut foo = shared_lib_project("foo");
		foo.find_target_mut("foo")
			.unwrap()
			.default_dependency_mut()
			.add_library(LibraryRef::new("../libbar", "bar", LinkKind::Shared));
		loader.add_project("../libfoo", foo);
		loader.add_project("../libbar", shared_lib_project("bar"));

		let mut project = Project::new();
		let dep = project.create_binary("app").unwrap().default_dependency_mut();
		dep.add_source_file("main.cpp");
		dep.add_library(LibraryRef::new("../libfoo", "foo", LinkKind::Shared));
		dep.add_library(LibraryRef::new("../libbar", "bar", LinkKind::Shared));

		let makefile = render(&project, &loader);
		assert!(makefile.contains("app: $(TARGET_app_OBJS) | __mkgen_dep_0\n"));
		assert!(!makefile.contains("__mkgen_dep_1:"));
		assert!(makefile.contains("TARGET_app_LIBS := -L../libfoo -lfoo -L../libbar -lbar\n"));
	}

	#[test]
	fn shared_library_link_command() {
		let mut project = Project::new();
		let dep = project.create_shared_library("z").unwrap().default_dependency_mut();
		dep.add_source_file("z.c");
		dep.add_library(LibraryRef::system("m"));

		let makefile = render(&project, &MemoryLoader::new());
		assert!(!makefile.contains("AR :="));
		assert!(makefile.contains("libz.so: $(TARGET_z_OBJS)\n\t$(CC) -shared -o $@ $(TARGET_z_OBJS) $(TARGET_z_LIBS)\n"));
		assert!(makefile.contains("TARGET_z_LIBS := -lm\n"));
		assert!(makefile.contains("distclean: clean\n\n"));
	}

	fn defined_variables(makefile: &str) -> Vec<&str> {
		makefile
			.lines()
			.filter(|x| !x.starts_with('\t'))
			.filter_map(|x| x.split_once(" :=").map(|(name, _)| name))
			.collect()
	}

	#[test]
	fn variables_do_not_collide() {
		let mut project = Project::new();
		for (name, source, flag) in
			[("app", "app.c", "-DAPP"), ("app_LINK", "tool.c", "-DTOOL"), ("x", "x.c", "-DX"), ("x_TARGET", "y.c", "-DY")]
		{
			let dep = project.create_binary(name).unwrap().default_dependency_mut();
			dep.add_source_file(source);
			dep.add_flag(flag);
		}

		let makefile = render(&project, &MemoryLoader::new());
		let variables = defined_variables(&makefile);
		assert_eq!(variables.iter().collect::<HashSet<_>>().len(), variables.len());
		assert!(makefile.contains("TARGET_app_LINK_FLAGS := -DAPP\n"));
		assert!(makefile.contains("TARGET_app_LINK_LINK_FLAGS := -DTOOL\n"));
		assert!(makefile.contains("DEP_app_FLAGS := -DAPP\n"));
		assert!(makefile.contains("DEP_app_LINK_FLAGS := -DTOOL\n"));
		assert!(makefile.contains("TARGET_x_OBJS := $(DEP_x_OBJS)\n"));
		assert!(makefile.contains("TARGET_x_TARGET_OBJS := $(DEP_x_TARGET_OBJS)\n"));
	}

	#[test]
	fn dependency_without_sources_has_no_stanza() {
		let mut project = Project::new();
		let headers = project.create_dependency(Some("headers")).unwrap();
		headers.add_include_dir("include");
		headers.add_flag("-DHEADERS");
		project.create_binary("app").unwrap().default_dependency_mut().add_source_file("main.c");
		project.attach_dependency("app", "headers");

		let makefile = render(&project, &MemoryLoader::new());
		assert!(!makefile.contains("DEP_headers_"));
		assert!(makefile.contains("TARGET_app_OBJS := $(DEP_app_OBJS)\n"));
		assert!(makefile.contains("TARGET_app_LINK_FLAGS := -DHEADERS\n"));
		assert!(makefile.contains("\trm -f $(TARGET) $(DEP_app_OBJS)\n"));
	}
}
