//! Splits merged tag lists into SEO-priority and default subsets.

use crate::attributes::Attributes;
use crate::props::TagKind;
use hashbrown::{HashMap, HashSet};

/// Which values of one attribute mark a tag as SEO-priority.
#[derive(Clone, Debug)]
pub enum ValueMatch {
	/// Any value qualifies.
	Any,
	/// Only the listed values qualify, compared case-insensitively.
	AnyOf(HashSet<String>),
}

impl ValueMatch {
	#[must_use]
	pub fn any_of<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		ValueMatch::AnyOf(
			values
				.into_iter()
				.map(|value| {
					let value: String = value.into();
					value.to_lowercase()
				})
				.collect(),
		)
	}

	fn matches(&self, value: &str) -> bool {
		match self {
			ValueMatch::Any => true,
			ValueMatch::AnyOf(values) => values.contains(&value.to_lowercase()),
		}
	}
}

/// Operator-supplied table deciding which tags are committed first.
///
/// Per tag kind, maps an attribute key to the values that make a tag
/// SEO-priority. Only `link`, `meta` and `script` participate.
#[derive(Clone, Debug)]
pub struct SeoMatchTable {
	link: HashMap<String, ValueMatch>,
	meta: HashMap<String, ValueMatch>,
	script: HashMap<String, ValueMatch>,
}

impl SeoMatchTable {
	/// A table that prioritizes nothing.
	#[must_use]
	pub fn empty() -> Self {
		Self {
			link: HashMap::new(),
			meta: HashMap::new(),
			script: HashMap::new(),
		}
	}

	pub fn insert(&mut self, kind: TagKind, attribute: impl Into<String>, values: ValueMatch) -> &mut Self {
		if let Some(matches) = self.for_kind_mut(kind) {
			matches.insert(attribute.into(), values);
		}
		self
	}

	fn for_kind(&self, kind: TagKind) -> Option<&HashMap<String, ValueMatch>> {
		match kind {
			TagKind::Link => Some(&self.link),
			TagKind::Meta => Some(&self.meta),
			TagKind::Script => Some(&self.script),
			_ => None,
		}
	}

	fn for_kind_mut(&mut self, kind: TagKind) -> Option<&mut HashMap<String, ValueMatch>> {
		match kind {
			TagKind::Link => Some(&mut self.link),
			TagKind::Meta => Some(&mut self.meta),
			TagKind::Script => Some(&mut self.script),
			_ => None,
		}
	}
}

impl Default for SeoMatchTable {
	/// The built-in set tuned for common SEO tags.
	fn default() -> Self {
		let mut table = Self::empty();
		table
			.insert(TagKind::Link, "rel", ValueMatch::any_of(["amphtml", "canonical", "alternate"]))
			.insert(TagKind::Script, "type", ValueMatch::any_of(["application/ld+json"]))
			.insert(TagKind::Meta, "charSet", ValueMatch::Any)
			.insert(TagKind::Meta, "name", ValueMatch::any_of(["generator", "robots", "description"]))
			.insert(
				TagKind::Meta,
				"property",
				ValueMatch::any_of([
					"og:type",
					"og:title",
					"og:url",
					"og:image",
					"og:image:alt",
					"og:description",
					"twitter:url",
					"twitter:title",
					"twitter:description",
					"twitter:image",
					"twitter:image:alt",
					"twitter:card",
					"twitter:site",
				]),
			);
		table
	}
}

/// Outcome of partitioning one merged tag list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrioritySplit {
	pub priority: Vec<Attributes>,
	pub default: Vec<Attributes>,
}

/// Partitions `tags`, preserving relative order within each subset.
///
/// A tag is priority when any of its own attribute values is found in the
/// table's corresponding match set.
#[must_use]
pub fn split_priority(kind: TagKind, tags: Vec<Attributes>, table: &SeoMatchTable) -> PrioritySplit {
	let matches = table.for_kind(kind);
	let mut split = PrioritySplit::default();

	for tag in tags {
		let is_priority = matches.map_or(false, |matches| {
			tag.iter().any(|(name, value)| matches.get(name).map_or(false, |m| m.matches(value)))
		});
		if is_priority {
			split.priority.push(tag);
		} else {
			split.default.push(tag);
		}
	}

	split
}
