use std::{
	cell::RefCell,
	path::{Path, PathBuf},
};

use starlark::{
	environment::GlobalsBuilder,
	eval::Evaluator,
	starlark_module,
	values::{list::UnpackList, ProvidesStaticType, Value},
};

use crate::{
	dependency::Dependency,
	library::{LibraryRef, LinkKind},
	project::Project,
	starlark_dependency::StarDependency,
	starlark_target::StarTarget,
	target::TargetKind,
};

pub(crate) fn err_msg<T>(msg: String) -> Result<T, anyhow::Error> {
	Err(anyhow::Error::msg(msg))
}

/// State shared by the global functions while one configuration file is
/// evaluated. `dir` is the directory holding that file.
#[derive(ProvidesStaticType)]
pub(crate) struct ScriptContext {
	dir: PathBuf,
	project: RefCell<Project>,
}

impl ScriptContext {
	pub(crate) fn new(dir: &Path) -> Self {
		ScriptContext { dir: dir.to_owned(), project: RefCell::new(Project::new()) }
	}

	pub(crate) fn into_project(self) -> Project {
		self.project.into_inner()
	}
}

fn script_context<'a>(eval: &'a Evaluator) -> anyhow::Result<&'a ScriptContext> {
	match eval.extra.and_then(|extra| extra.downcast_ref::<ScriptContext>()) {
		Some(x) => Ok(x),
		None => err_msg("mkgen functions called outside of a build file".to_owned()),
	}
}

#[derive(Default)]
struct DependencyArgs {
	sources: Vec<String>,
	flags: Vec<String>,
	include_dirs: Vec<String>,
	static_libraries: Vec<String>,
	shared_libraries: Vec<String>,
	sys_libraries: Vec<String>,
}

impl DependencyArgs {
	fn apply(&self, dep: &mut Dependency, dir: &Path) -> anyhow::Result<()> {
		for flag in &self.flags {
			dep.add_flag(flag);
		}
		for src in &self.sources {
			dep.add_source_files(dir, src);
		}
		for inc in &self.include_dirs {
			dep.add_include_dir(inc);
		}
		for (labels, kind) in [(&self.static_libraries, LinkKind::Static), (&self.shared_libraries, LinkKind::Shared)] {
			for label in labels {
				match LibraryRef::from_label(label, kind) {
					Ok(lib) => dep.add_library(lib),
					Err(e) => return err_msg(e),
				};
			}
		}
		for name in &self.sys_libraries {
			dep.add_library(LibraryRef::system(name));
		}
		Ok(())
	}
}

fn dependency_names(deps: &[Value]) -> anyhow::Result<Vec<String>> {
	let mut names = Vec::with_capacity(deps.len());
	for dep in deps {
		if let Some(x) = StarDependency::from_value(*dep) {
			names.push(x.name.clone());
		} else if let Some(x) = dep.unpack_str() {
			names.push(x.to_owned());
		} else {
			return err_msg(format!("Could not match \"deps\" {}: {}", dep.to_str(), dep.get_type()));
		}
	}
	Ok(names)
}

fn add_target<'v>(
	eval: &Evaluator<'v, '_>,
	kind: TargetKind,
	name: &str,
	args: DependencyArgs,
	deps: Vec<Value<'v>>,
) -> anyhow::Result<Value<'v>> {
	let dep_names = dependency_names(&deps)?;
	let context = script_context(eval)?;
	{
		let mut project = context.project.borrow_mut();
		let target = match project.create_target(name, kind) {
			Some(x) => x,
			None => return Ok(Value::new_none()),
		};
		args.apply(target.default_dependency_mut(), &context.dir)?;
		for dep in &dep_names {
			project.attach_dependency(name, dep);
		}
	}
	Ok(eval.heap().alloc(StarTarget::new(name, kind)))
}

fn list_items<T>(list: Option<UnpackList<T>>) -> Vec<T> {
	list.map(|x| x.items).unwrap_or_default()
}

#[starlark_module]
pub(crate) fn build_api(builder: &mut GlobalsBuilder) {
	fn dependency<'v>(
		#[starlark(require = named)] name: Option<&str>,
		#[starlark(require = named)] sources: Option<UnpackList<String>>,
		#[starlark(require = named)] flags: Option<UnpackList<String>>,
		#[starlark(require = named)] include_dirs: Option<UnpackList<String>>,
		#[starlark(require = named)] static_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] shared_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] sys_libraries: Option<UnpackList<String>>,
		eval: &mut Evaluator<'v, '_>,
	) -> anyhow::Result<Value<'v>> {
		let args = DependencyArgs {
			sources: list_items(sources),
			flags: list_items(flags),
			include_dirs: list_items(include_dirs),
			static_libraries: list_items(static_libraries),
			shared_libraries: list_items(shared_libraries),
			sys_libraries: list_items(sys_libraries),
		};
		let context = script_context(eval)?;
		let dep_name = {
			let mut project = context.project.borrow_mut();
			let dep = match project.create_dependency(name) {
				Some(x) => x,
				None => return Ok(Value::new_none()),
			};
			args.apply(dep, &context.dir)?;
			dep.name().to_owned()
		};
		Ok(eval.heap().alloc(StarDependency { name: dep_name }))
	}

	fn add_binary<'v>(
		name: &str,
		#[starlark(require = named)] sources: Option<UnpackList<String>>,
		#[starlark(require = named)] flags: Option<UnpackList<String>>,
		#[starlark(require = named)] include_dirs: Option<UnpackList<String>>,
		#[starlark(require = named)] static_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] shared_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] sys_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] deps: Option<UnpackList<Value<'v>>>,
		eval: &mut Evaluator<'v, '_>,
	) -> anyhow::Result<Value<'v>> {
		let args = DependencyArgs {
			sources: list_items(sources),
			flags: list_items(flags),
			include_dirs: list_items(include_dirs),
			static_libraries: list_items(static_libraries),
			shared_libraries: list_items(shared_libraries),
			sys_libraries: list_items(sys_libraries),
		};
		add_target(eval, TargetKind::Binary, name, args, list_items(deps))
	}

	fn add_static_library<'v>(
		name: &str,
		#[starlark(require = named)] sources: Option<UnpackList<String>>,
		#[starlark(require = named)] flags: Option<UnpackList<String>>,
		#[starlark(require = named)] include_dirs: Option<UnpackList<String>>,
		#[starlark(require = named)] static_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] shared_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] sys_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] deps: Option<UnpackList<Value<'v>>>,
		eval: &mut Evaluator<'v, '_>,
	) -> anyhow::Result<Value<'v>> {
		let args = DependencyArgs {
			sources: list_items(sources),
			flags: list_items(flags),
			include_dirs: list_items(include_dirs),
			static_libraries: list_items(static_libraries),
			shared_libraries: list_items(shared_libraries),
			sys_libraries: list_items(sys_libraries),
		};
		add_target(eval, TargetKind::StaticLib, name, args, list_items(deps))
	}

	fn add_shared_library<'v>(
		name: &str,
		#[starlark(require = named)] sources: Option<UnpackList<String>>,
		#[starlark(require = named)] flags: Option<UnpackList<String>>,
		#[starlark(require = named)] include_dirs: Option<UnpackList<String>>,
		#[starlark(require = named)] static_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] shared_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] sys_libraries: Option<UnpackList<String>>,
		#[starlark(require = named)] deps: Option<UnpackList<Value<'v>>>,
		eval: &mut Evaluator<'v, '_>,
	) -> anyhow::Result<Value<'v>> {
		let args = DependencyArgs {
			sources: list_items(sources),
			flags: list_items(flags),
			include_dirs: list_items(include_dirs),
			static_libraries: list_items(static_libraries),
			shared_libraries: list_items(shared_libraries),
			sys_libraries: list_items(sys_libraries),
		};
		add_target(eval, TargetKind::SharedLib, name, args, list_items(deps))
	}
}
