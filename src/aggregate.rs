//! Merges every registered fragment into one canonical [`AggregatedState`].

use crate::attributes::Attributes;
use crate::priority::{split_priority, SeoMatchTable};
use crate::props::{HeadProps, OnChangeClientState, TagKind, CSS_TEXT, INNER_HTML, ITEM_PROP};
use hashbrown::{HashMap, HashSet};
use tracing::warn;

/// The canonical merged snapshot derived from the full registry.
#[derive(Clone)]
pub struct AggregatedState {
	pub base: Option<Attributes>,
	pub body_attributes: Attributes,
	pub defer: Option<bool>,
	pub encode_special_characters: bool,
	pub html_attributes: Attributes,
	pub link: Vec<Attributes>,
	pub meta: Vec<Attributes>,
	pub noscript: Vec<Attributes>,
	pub on_change_client_state: Option<OnChangeClientState>,
	pub priority: Option<PriorityTags>,
	pub script: Vec<Attributes>,
	pub style: Vec<Attributes>,
	pub title: Option<String>,
	pub title_attributes: Attributes,
}

/// SEO-priority subsets split out of the merged `link`/`meta`/`script` lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PriorityTags {
	pub link: Vec<Attributes>,
	pub meta: Vec<Attributes>,
	pub script: Vec<Attributes>,
}

/// Computes the [`AggregatedState`] for an ordered registry snapshot.
///
/// Entries are `(instance id, fragment)` in registration order, outermost
/// first. Scalar fields resolve innermost-wins, object fields merge shallowly
/// front to back, and array fields deduplicate by primary attribute with the
/// outermost declaration taking priority.
#[must_use]
pub fn aggregate(registry: &[(String, HeadProps)], seo: &SeoMatchTable) -> AggregatedState {
	let mut link = merge_tags(TagKind::Link, registry);
	let mut meta = merge_tags(TagKind::Meta, registry);
	let mut script = merge_tags(TagKind::Script, registry);

	let priority = if registry.iter().any(|(_, props)| props.prioritize_seo_tags) {
		let links = split_priority(TagKind::Link, core::mem::take(&mut link), seo);
		link = links.default;
		let metas = split_priority(TagKind::Meta, core::mem::take(&mut meta), seo);
		meta = metas.default;
		let scripts = split_priority(TagKind::Script, core::mem::take(&mut script), seo);
		script = scripts.default;
		Some(PriorityTags {
			link: links.priority,
			meta: metas.priority,
			script: scripts.priority,
		})
	} else {
		None
	};

	AggregatedState {
		base: base_tag(registry),
		body_attributes: merge_attributes(registry, |props| props.body_attributes.as_ref()),
		defer: innermost(registry, |props| props.defer),
		encode_special_characters: innermost(registry, |props| props.encode_special_characters).unwrap_or(true),
		html_attributes: merge_attributes(registry, |props| props.html_attributes.as_ref()),
		link,
		meta,
		noscript: merge_tags(TagKind::Noscript, registry),
		on_change_client_state: innermost(registry, |props| props.on_change_client_state.clone()),
		priority,
		script,
		style: merge_tags(TagKind::Style, registry),
		title: resolve_title(registry),
		title_attributes: merge_attributes(registry, |props| props.title_attributes.as_ref()),
	}
}

/// Innermost-wins scalar resolution: the last fragment defining the field wins.
fn innermost<T>(registry: &[(String, HeadProps)], select: impl Fn(&HeadProps) -> Option<T>) -> Option<T> {
	registry.iter().rev().find_map(|(_, props)| select(props))
}

fn resolve_title(registry: &[(String, HeadProps)]) -> Option<String> {
	let title = innermost(registry, |props| props.title.clone());

	if let (Some(template), Some(title)) = (innermost(registry, |props| props.title_template.clone()), &title) {
		if !title.is_empty() {
			return Some(template.replace("%s", title));
		}
	}

	match title {
		Some(title) if !title.is_empty() => Some(title),
		_ => innermost(registry, |props| props.default_title.clone()),
	}
}

/// Shallow per-key merge, front to back: nested declarations overwrite single
/// keys while untouched keys from outer declarations persist.
fn merge_attributes(registry: &[(String, HeadProps)], select: impl Fn(&HeadProps) -> Option<&Attributes>) -> Attributes {
	let mut merged = Attributes::new();
	for (_, props) in registry {
		if let Some(attributes) = select(props) {
			for (name, value) in attributes {
				merged.set(name, value);
			}
		}
	}
	merged
}

/// The innermost `base` with a non-empty `href` or `target`, if any.
fn base_tag(registry: &[(String, HeadProps)]) -> Option<Attributes> {
	registry.iter().rev().find_map(|(_, props)| {
		let base = props.base.as_ref()?;
		let non_empty = |name| base.get(name).map_or(false, |value: &str| !value.is_empty());
		if non_empty("href") || non_empty("target") {
			Some(base.clone())
		} else {
			None
		}
	})
}

/// Selects the attribute identifying `tag` for de-duplication.
///
/// Candidates are scanned in the tag's own attribute order and the last
/// qualifying one wins, except that a selected `rel="canonical"` is never
/// displaced, `rel="stylesheet"` is never selected, and the content-bearing
/// keys (`innerHTML`, `cssText`, `itemProp`) force-win when present.
fn primary_attribute<'a>(kind: TagKind, tag: &'a Attributes) -> Option<&'a str> {
	let candidates = kind.primary_attributes();
	let mut primary: Option<&str> = None;

	for (name, value) in tag {
		let candidate = candidates.iter().any(|&c| c == name);
		let canonical_selected = primary == Some("rel") && tag.get("rel").map_or(false, |rel| rel.eq_ignore_ascii_case("canonical"));

		if candidate && !canonical_selected && !(name == "rel" && value.eq_ignore_ascii_case("stylesheet")) {
			primary = Some(name);
		}

		if candidate && (name == INNER_HTML || name == CSS_TEXT || name == ITEM_PROP) {
			primary = Some(name);
		}
	}

	primary
}

/// Merges one array-typed tag kind across the registry.
///
/// Outermost declarations take priority: once a `(primary attribute,
/// lowercased value)` pair has been accepted, any more deeply nested
/// instance's tag with the same pair is dropped. Within a single instance's
/// array, a later duplicate replaces the earlier entry in place.
fn merge_tags(kind: TagKind, registry: &[(String, HeadProps)]) -> Vec<Attributes> {
	let mut seen = HashSet::<(String, String)>::new();
	let mut approved: Vec<Attributes> = Vec::new();

	for (_, props) in registry {
		let mut instance_positions = HashMap::<(String, String), usize>::new();

		for tag in props.tags(kind) {
			let primary = match primary_attribute(kind, tag) {
				Some(primary) => primary,
				None => {
					warn!(
						"Dropping <{}> tag without a usable primary attribute (expected one of {:?}): {:?}",
						kind.element_name(),
						kind.primary_attributes(),
						tag
					);
					continue;
				}
			};
			let value = tag.get(primary).unwrap_or("");
			if value.is_empty() {
				warn!("Dropping <{}> tag with an empty {:?} attribute: {:?}", kind.element_name(), primary, tag);
				continue;
			}

			let pair = (primary.to_owned(), value.to_lowercase());
			if let Some(&position) = instance_positions.get(&pair) {
				approved[position] = tag.clone();
			} else if seen.insert(pair.clone()) {
				instance_positions.insert(pair, approved.len());
				approved.push(tag.clone());
			}
		}
	}

	approved
}
