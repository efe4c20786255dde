//! Static rendering of an [`AggregatedState`] to plain HTML strings, for
//! server-side or build-time emission.
//!
//! Rendered tags carry the engine marker attribute so a later client-side
//! commit recognizes and adopts or retires them.

use crate::aggregate::AggregatedState;
use crate::attributes::Attributes;
use crate::props::{attribute_name, TagKind, CSS_TEXT, ENGINE_ATTRIBUTE, INNER_HTML};
use core::fmt::Write;

/// All head markup derived from one aggregated snapshot.
///
/// `priority` holds the SEO-prioritized `link`/`meta`/`script` tags (empty
/// unless prioritization was active); the per-kind fields hold the rest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticHead {
	pub base: String,
	pub body_attributes: String,
	pub html_attributes: String,
	pub link: String,
	pub meta: String,
	pub noscript: String,
	pub priority: String,
	pub script: String,
	pub style: String,
	pub title: String,
	pub title_attributes: String,
}

/// Renders `state` to strings, escaping special characters unless the state
/// disables it.
#[must_use]
pub fn static_head(state: &AggregatedState) -> StaticHead {
	let encode = state.encode_special_characters;
	let mut priority = String::new();
	if let Some(tags) = &state.priority {
		render_tags(&mut priority, TagKind::Link, &tags.link, encode);
		render_tags(&mut priority, TagKind::Meta, &tags.meta, encode);
		render_tags(&mut priority, TagKind::Script, &tags.script, encode);
	}

	StaticHead {
		base: render_kind(TagKind::Base, state.base.as_ref().map_or(&[][..], core::slice::from_ref), encode),
		body_attributes: render_singleton_attributes(&state.body_attributes, encode),
		html_attributes: render_singleton_attributes(&state.html_attributes, encode),
		link: render_kind(TagKind::Link, &state.link, encode),
		meta: render_kind(TagKind::Meta, &state.meta, encode),
		noscript: render_kind(TagKind::Noscript, &state.noscript, encode),
		priority,
		script: render_kind(TagKind::Script, &state.script, encode),
		style: render_kind(TagKind::Style, &state.style, encode),
		title: render_title(state.title.as_deref().unwrap_or(""), &state.title_attributes, encode),
		title_attributes: render_singleton_attributes(&state.title_attributes, encode),
	}
}

/// Escapes text for attribute values and title text.
fn encode_special_characters(text: &str, encode: bool) -> String {
	if !encode {
		return text.to_owned();
	}
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
		.replace('\'', "&#x27;")
}

fn render_attributes(out: &mut String, attributes: &Attributes, encode: bool) {
	for (property, value) in attributes {
		if property == INNER_HTML || property == CSS_TEXT {
			continue;
		}
		let _ = write!(out, " {}=\"{}\"", attribute_name(property), encode_special_characters(value, encode));
	}
}

fn render_kind(kind: TagKind, tags: &[Attributes], encode: bool) -> String {
	let mut out = String::new();
	render_tags(&mut out, kind, tags, encode);
	out
}

fn render_tags(out: &mut String, kind: TagKind, tags: &[Attributes], encode: bool) {
	let self_closing = matches!(kind, TagKind::Base | TagKind::Link | TagKind::Meta);
	for tag in tags {
		let name = kind.element_name();
		let _ = write!(out, "<{} {}=\"true\"", name, ENGINE_ATTRIBUTE);
		render_attributes(out, tag, encode);

		if self_closing {
			out.push_str("/>");
		} else {
			// Inline bodies are emitted raw; escaping them would corrupt
			// markup and style text.
			let content = tag.get(INNER_HTML).or_else(|| tag.get(CSS_TEXT)).unwrap_or("");
			let _ = write!(out, ">{}</{}>", content, name);
		}
	}
}

fn render_title(title: &str, attributes: &Attributes, encode: bool) -> String {
	let mut out = String::new();
	let _ = write!(out, "<title {}=\"true\"", ENGINE_ATTRIBUTE);
	render_attributes(&mut out, attributes, encode);
	let _ = write!(out, ">{}</title>", encode_special_characters(title, encode));
	out
}

/// The attribute string interpolated into a server-rendered `<html>` or
/// `<body>` open tag.
fn render_singleton_attributes(attributes: &Attributes, encode: bool) -> String {
	let mut out = String::new();
	for (property, value) in attributes {
		if !out.is_empty() {
			out.push(' ');
		}
		let _ = write!(out, "{}=\"{}\"", attribute_name(property), encode_special_characters(value, encode));
	}
	out
}
