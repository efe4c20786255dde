//! Commits an [`AggregatedState`] onto a live document.
//!
//! Each tag kind is reconciled independently: desired tags are materialized as
//! real elements, compared structurally against the engine-marked elements
//! already in the head, and only the difference is inserted or removed.

use crate::aggregate::AggregatedState;
use crate::attributes::Attributes;
use crate::dom::Dom;
use crate::props::{attribute_name, AttributeTarget, ClientState, TagKind, TagSnapshots, CSS_TEXT, ENGINE_ATTRIBUTE, INNER_HTML};
use tracing::{trace, trace_span};

struct TagGroup {
	all: Vec<Attributes>,
	added: Vec<Attributes>,
	removed: Vec<Attributes>,
}

/// Applies the minimal DOM edits taking the document from its current
/// engine-owned state to `state`.
///
/// Returns the committed snapshot. The state's `on_change_client_state` fires
/// once when this is the first commit since provider construction or any tag
/// kind added or removed at least one element.
pub fn commit_tag_changes<D: Dom>(dom: &D, state: &AggregatedState, first_render: bool) -> ClientState {
	let span = trace_span!("Committing head state", first_render);
	let _enter = span.enter();

	update_attributes(dom, AttributeTarget::Body, &state.body_attributes);
	update_attributes(dom, AttributeTarget::Html, &state.html_attributes);
	update_title(dom, state.title.as_deref(), &state.title_attributes);

	let mut result = ClientState {
		title: state.title.clone().unwrap_or_default(),
		defer: state.defer.unwrap_or(false),
		html_attributes: state.html_attributes.clone(),
		body_attributes: state.body_attributes.clone(),
		title_attributes: state.title_attributes.clone(),
		tags: TagSnapshots::default(),
	};
	let mut added = TagSnapshots::default();
	let mut removed = TagSnapshots::default();

	for &kind in &TagKind::ALL {
		let group = update_tags(dom, kind, &desired_tags(state, kind));
		*result.tags.of_mut(kind) = group.all;
		*added.of_mut(kind) = group.added;
		*removed.of_mut(kind) = group.removed;
	}

	if first_render || !added.is_empty() || !removed.is_empty() {
		if let Some(on_change_client_state) = &state.on_change_client_state {
			on_change_client_state(&result, &added, &removed);
		}
	}

	result
}

/// The desired list for `kind`: priority tags first, then default tags.
fn desired_tags<'a>(state: &'a AggregatedState, kind: TagKind) -> Vec<&'a Attributes> {
	let priority = state.priority.as_ref();
	match kind {
		TagKind::Base => state.base.iter().collect(),
		TagKind::Link => priority.map_or(&[][..], |p| &p.link[..]).iter().chain(&state.link).collect(),
		TagKind::Meta => priority.map_or(&[][..], |p| &p.meta[..]).iter().chain(&state.meta).collect(),
		TagKind::Noscript => state.noscript.iter().collect(),
		TagKind::Script => priority.map_or(&[][..], |p| &p.script[..]).iter().chain(&state.script).collect(),
		TagKind::Style => state.style.iter().collect(),
	}
}

fn update_tags<D: Dom>(dom: &D, kind: TagKind, tags: &[&Attributes]) -> TagGroup {
	let span = trace_span!("Updating tags", tag = kind.element_name(), "tags.len()" = tags.len());
	let _enter = span.enter();

	let mut old = dom.marked_elements(kind);
	let mut new_elements = Vec::new();
	let mut all = Vec::new();

	for &tag in tags {
		let element = dom.create_element(kind);
		for (property, value) in tag {
			if property == INNER_HTML {
				dom.set_inner_html(&element, value);
			} else if property == CSS_TEXT {
				dom.append_text(&element, value);
			} else {
				dom.set_attribute(&element, attribute_name(property), value);
			}
		}
		dom.set_attribute(&element, ENGINE_ATTRIBUTE, "true");
		all.push(dom.attribute_snapshot(&element));

		// An already-present structurally equal element is kept as-is.
		match old.iter().position(|existing| dom.is_equal_node(existing, &element)) {
			Some(index) => {
				old.remove(index);
			}
			None => new_elements.push(element),
		}
	}

	let removed: Vec<Attributes> = old
		.iter()
		.map(|element| {
			let snapshot = dom.attribute_snapshot(element);
			dom.remove(element);
			snapshot
		})
		.collect();

	let added: Vec<Attributes> = new_elements.iter().map(|element| dom.attribute_snapshot(element)).collect();
	for element in new_elements {
		dom.append_to_head(element);
	}

	trace!("{} added, {} kept, {} removed.", added.len(), tags.len() - added.len(), removed.len());

	TagGroup { all, added, removed }
}

/// Reconciles attributes onto a singleton element, recording ownership in the
/// marker attribute's comma-joined name list.
fn update_attributes<D: Dom>(dom: &D, target: AttributeTarget, attributes: &Attributes) {
	let element = match dom.attribute_root(target) {
		Some(element) => element,
		None => return,
	};
	let span = trace_span!("Updating singleton attributes", tag = target.element_name(), "attributes.len()" = attributes.len());
	let _enter = span.enter();

	let marker = dom.get_attribute(&element, ENGINE_ATTRIBUTE);
	let mut owned: Vec<String> = marker
		.as_deref()
		.filter(|marker| !marker.is_empty())
		.map_or_else(Vec::new, |marker| marker.split(',').map(str::to_owned).collect());
	let mut to_remove = owned.clone();
	let attribute_keys: Vec<&str> = attributes.iter().map(|(property, _)| attribute_name(property)).collect();

	for (property, value) in attributes {
		let name = attribute_name(property);
		if dom.get_attribute(&element, name).as_deref() != Some(value) {
			dom.set_attribute(&element, name, value);
		}
		if !owned.iter().any(|owned| owned == name) {
			owned.push(name.to_owned());
		}
		if let Some(index) = to_remove.iter().position(|abandoned| abandoned == name) {
			to_remove.remove(index);
		}
	}

	for name in to_remove.iter().rev() {
		dom.remove_attribute(&element, name);
	}

	let keys = attribute_keys.join(",");
	if owned.len() == to_remove.len() {
		dom.remove_attribute(&element, ENGINE_ATTRIBUTE);
	} else if dom.get_attribute(&element, ENGINE_ATTRIBUTE).as_deref() != Some(keys.as_str()) {
		dom.set_attribute(&element, ENGINE_ATTRIBUTE, &keys);
	}
}

/// Writes the document title only when it differs, then reconciles the title
/// element's attributes.
fn update_title<D: Dom>(dom: &D, title: Option<&str>, attributes: &Attributes) {
	if let Some(title) = title {
		if dom.title() != title {
			dom.set_title(title);
		}
	}
	update_attributes(dom, AttributeTarget::Title, attributes);
}
