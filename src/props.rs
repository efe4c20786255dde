use crate::attributes::Attributes;
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// Reserved marker attribute identifying engine-owned elements.
///
/// On head tags it holds `"true"`; on `<html>`/`<body>`/the title element it
/// holds the comma-joined list of attribute names the engine currently owns.
pub const ENGINE_ATTRIBUTE: &str = "data-casque";

/// Property applied as raw markup content rather than as an attribute.
pub const INNER_HTML: &str = "innerHTML";
/// Property applied as inline style text rather than as an attribute.
pub const CSS_TEXT: &str = "cssText";
/// Microdata property; forces itself as the primary attribute when present.
pub const ITEM_PROP: &str = "itemProp";

/// Head-level tag kinds the engine reconciles as element lists.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum TagKind {
	Base,
	Link,
	Meta,
	Noscript,
	Script,
	Style,
}

impl TagKind {
	pub const ALL: [TagKind; 6] = [TagKind::Base, TagKind::Link, TagKind::Meta, TagKind::Noscript, TagKind::Script, TagKind::Style];

	#[must_use]
	pub fn element_name(self) -> &'static str {
		match self {
			TagKind::Base => "base",
			TagKind::Link => "link",
			TagKind::Meta => "meta",
			TagKind::Noscript => "noscript",
			TagKind::Script => "script",
			TagKind::Style => "style",
		}
	}

	/// Candidate primary attributes identifying a tag instance of this kind.
	#[must_use]
	pub fn primary_attributes(self) -> &'static [&'static str] {
		match self {
			TagKind::Base => &["href", "target"],
			TagKind::Link => &["rel", "href"],
			TagKind::Meta => &["name", "charSet", "httpEquiv", "property", ITEM_PROP],
			TagKind::Noscript => &[INNER_HTML],
			TagKind::Script => &["src", INNER_HTML],
			TagKind::Style => &[CSS_TEXT],
		}
	}
}

/// Singleton elements the engine reconciles attributes onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttributeTarget {
	Html,
	Body,
	Title,
}

impl AttributeTarget {
	#[must_use]
	pub fn element_name(self) -> &'static str {
		match self {
			AttributeTarget::Html => "html",
			AttributeTarget::Body => "body",
			AttributeTarget::Title => "title",
		}
	}
}

/// Maps a declaration property name to the HTML attribute it sets.
#[must_use]
pub fn attribute_name(property: &str) -> &str {
	match property {
		"charSet" => "charset",
		"className" => "class",
		"htmlFor" => "for",
		"httpEquiv" => "http-equiv",
		ITEM_PROP => "itemprop",
		_ => property,
	}
}

/// Attribute snapshots of the committed head tags, one list per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSnapshots {
	pub base: Vec<Attributes>,
	pub link: Vec<Attributes>,
	pub meta: Vec<Attributes>,
	pub noscript: Vec<Attributes>,
	pub script: Vec<Attributes>,
	pub style: Vec<Attributes>,
}

impl TagSnapshots {
	#[must_use]
	pub fn of(&self, kind: TagKind) -> &[Attributes] {
		match kind {
			TagKind::Base => &self.base,
			TagKind::Link => &self.link,
			TagKind::Meta => &self.meta,
			TagKind::Noscript => &self.noscript,
			TagKind::Script => &self.script,
			TagKind::Style => &self.style,
		}
	}

	pub(crate) fn of_mut(&mut self, kind: TagKind) -> &mut Vec<Attributes> {
		match kind {
			TagKind::Base => &mut self.base,
			TagKind::Link => &mut self.link,
			TagKind::Meta => &mut self.meta,
			TagKind::Noscript => &mut self.noscript,
			TagKind::Script => &mut self.script,
			TagKind::Style => &mut self.style,
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		TagKind::ALL.iter().all(|&kind| self.of(kind).is_empty())
	}
}

/// Full result snapshot handed to [`OnChangeClientState`] after a commit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientState {
	pub title: String,
	pub defer: bool,
	pub html_attributes: Attributes,
	pub body_attributes: Attributes,
	pub title_attributes: Attributes,
	pub tags: TagSnapshots,
}

/// Fires after a commit with the new state and the per-kind added/removed tags.
pub type OnChangeClientState = Rc<dyn Fn(&ClientState, &TagSnapshots, &TagSnapshots)>;

/// One declaring component's requested head metadata.
///
/// Array-field entries are always a sequence of attribute maps; an empty `Vec`
/// means the field is not declared.
#[derive(Clone, Default)]
pub struct HeadProps {
	pub base: Option<Attributes>,
	pub body_attributes: Option<Attributes>,
	pub default_title: Option<String>,
	pub defer: Option<bool>,
	pub encode_special_characters: Option<bool>,
	pub html_attributes: Option<Attributes>,
	pub link: Vec<Attributes>,
	pub meta: Vec<Attributes>,
	pub noscript: Vec<Attributes>,
	pub on_change_client_state: Option<OnChangeClientState>,
	pub prioritize_seo_tags: bool,
	pub script: Vec<Attributes>,
	pub style: Vec<Attributes>,
	pub title: Option<String>,
	pub title_attributes: Option<Attributes>,
	pub title_template: Option<String>,
}

impl HeadProps {
	pub(crate) fn tags(&self, kind: TagKind) -> &[Attributes] {
		match kind {
			// `base` is a single object field; the aggregator resolves it separately.
			TagKind::Base => &[],
			TagKind::Link => &self.link,
			TagKind::Meta => &self.meta,
			TagKind::Noscript => &self.noscript,
			TagKind::Script => &self.script,
			TagKind::Style => &self.style,
		}
	}
}

impl Debug for HeadProps {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("HeadProps")
			.field("base", &self.base)
			.field("body_attributes", &self.body_attributes)
			.field("default_title", &self.default_title)
			.field("defer", &self.defer)
			.field("encode_special_characters", &self.encode_special_characters)
			.field("html_attributes", &self.html_attributes)
			.field("link", &self.link)
			.field("meta", &self.meta)
			.field("noscript", &self.noscript)
			.field("on_change_client_state", &self.on_change_client_state.as_ref().map(|_| ..))
			.field("prioritize_seo_tags", &self.prioritize_seo_tags)
			.field("script", &self.script)
			.field("style", &self.style)
			.field("title", &self.title)
			.field("title_attributes", &self.title_attributes)
			.field("title_template", &self.title_template)
			.finish()
	}
}
