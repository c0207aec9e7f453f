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

use crate::target::TargetKind;

#[derive(Clone, Debug, Allocative, ProvidesStaticType, NoSerialize)]
pub(crate) struct StarTarget {
	name: String,
	kind: String,
	artifact: String,
}

impl StarTarget {
	pub(crate) fn new(name: &str, kind: TargetKind) -> Self {
		StarTarget { name: name.to_owned(), kind: kind.as_str().to_owned(), artifact: kind.artifact_name(name) }
	}
}

impl fmt::Display for StarTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			r#"Target{{
    name: "{}",
    kind: {},
    artifact: "{}",
}}"#,
			self.name, self.kind, self.artifact,
		)
	}
}

#[starlark::values::starlark_value(type = "Target")]
impl<'v> StarlarkValue<'v> for StarTarget {
	fn get_attr(&self, attribute: &str, heap: &'v Heap) -> Option<Value<'v>> {
		match attribute {
			"name" => Some(heap.alloc(self.name.clone())),
			"kind" => Some(heap.alloc(self.kind.clone())),
			"artifact" => Some(heap.alloc(self.artifact.clone())),
			_ => None,
		}
	}

	fn has_attr(&self, attribute: &str, _: &'v Heap) -> bool {
		#[allow(clippy::match_like_matches_macro)]
		match attribute {
			"name" | "kind" | "artifact" => true,
			_ => false,
		}
	}

	fn dir_attr(&self) -> Vec<String> {
		let attrs = vec!["name".to_owned(), "kind".to_owned(), "artifact".to_owned()];
		attrs
	}
}

starlark_simple_value!(StarTarget);
