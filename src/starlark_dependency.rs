use core::fmt;

use allocative::Allocative;
use starlark::{
	starlark_simple_value,
	values::{
		Heap, //
		NoSerialize,
		ProvidesStaticType,
		StarlarkValue,
		Value,
	},
};

/// Handle returned by `dependency()`, passed back through `deps = [...]`.
#[derive(Clone, Debug, Allocative, ProvidesStaticType, NoSerialize)]
pub(crate) struct StarDependency {
	pub name: String,
}

impl fmt::Display for StarDependency {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
		write!(f, r#"Dependency{{name: "{}"}}"#, self.name)
	}
}

#[starlark::values::starlark_value(type = "Dependency")]
impl<'v> StarlarkValue<'v> for StarDependency {
	fn get_attr(&self, attribute: &str, heap: &'v Heap) -> Option<Value<'v>> {
		match attribute {
			"name" => Some(heap.alloc(self.name.clone())),
			_ => None,
		}
	}

	fn has_attr(&self, attribute: &str, _: &'v Heap) -> bool {
		attribute == "name"
	}

	fn dir_attr(&self) -> Vec<String> {
		let attrs = vec!["name".to_owned()];
		attrs
	}
}

starlark_simple_value!(StarDependency);
