mod dependency;
pub mod generator;
mod library;
pub mod loader;
mod misc;
pub mod project;
mod starlark_api;
mod starlark_dependency;
mod starlark_target;
mod target;
pub mod toolchain;

use std::path::Path;

use starlark::{
	environment::{
		Globals, //
		GlobalsBuilder,
		Module,
	},
	eval::Evaluator,
	syntax::{
		AstModule, //
		Dialect,
	},
};

pub use dependency::Dependency;
pub use library::{LibraryRef, LinkKind};
pub use target::{Target, TargetKind};

use loader::{ProjectLoader, StarlarkLoader};
use project::Project;
use starlark_api::{err_msg, ScriptContext};
use toolchain::Toolchain;

pub const BUILD_FILE: &str = "build.mkgen";
pub const TOOLCHAIN_FILE: &str = "mkgen.toml";
pub const DEFAULT_OUTPUT: &str = "Makefile";

pub(crate) fn setup() -> Globals {
	let mut globals_builder = GlobalsBuilder::standard();
	starlark_api::build_api(&mut globals_builder);
	globals_builder.build()
}

/// Evaluates one configuration file. `project_dir` is the directory the file
/// lives in; source globs are expanded against it.
pub(crate) fn parse_module(project_dir: &Path, starlark_code: String) -> Result<Project, anyhow::Error> {
	let ast = match AstModule::parse(BUILD_FILE, starlark_code, &Dialect::Standard) {
		Ok(x) => x,
		Err(e) => return err_msg(format!("{}: {}", project_dir.join(BUILD_FILE).display(), e)),
	};
	let globals = setup();
	let context = ScriptContext::new(project_dir);
	{
		let module = Module::new();
		let mut eval = Evaluator::new(&module);
		eval.extra = Some(&context);
		if let Err(e) = eval.eval_module(ast, &globals) {
			return err_msg(e.to_string());
		}
	}
	Ok(context.into_project())
}

/// Loads the project whose configuration file sits in `root`.
pub fn parse_project(root: &Path) -> Result<Project, anyhow::Error> {
	StarlarkLoader::new(root).load(".")
}

/// Loads the root project through `loader` and renders its Makefile.
pub fn generate_makefile(loader: &dyn ProjectLoader, toolchain: &Toolchain) -> Result<String, anyhow::Error> {
	let project = loader.load(".")?;
	if project.targets().next().is_none() {
		log::warn!("{} defines no targets", BUILD_FILE);
	}
	Ok(generator::generate(&project, loader, toolchain))
}
