//! The engine's boundary to a live document.

use crate::attributes::Attributes;
use crate::props::{AttributeTarget, TagKind};

/// Document operations the reconciler needs.
///
/// The browser implementation is [`WebDom`] (wasm32 only); the native test
/// suite drives an in-memory implementation. All mutation is assumed
/// synchronous and non-failing at this boundary; implementations log and
/// continue on unexpected platform errors.
pub trait Dom: Clone {
	type Element;

	/// Engine-marked elements of `kind` currently present in the document
	/// head, in document order.
	fn marked_elements(&self, kind: TagKind) -> Vec<Self::Element>;

	/// Creates a detached element of `kind`.
	fn create_element(&self, kind: TagKind) -> Self::Element;

	fn get_attribute(&self, element: &Self::Element, name: &str) -> Option<String>;
	fn set_attribute(&self, element: &Self::Element, name: &str, value: &str);
	fn remove_attribute(&self, element: &Self::Element, name: &str);

	/// Replaces the element's content with raw markup.
	fn set_inner_html(&self, element: &Self::Element, html: &str);

	/// Appends a text node. Used for inline style text.
	fn append_text(&self, element: &Self::Element, text: &str);

	/// The element's current attributes, in document order.
	fn attribute_snapshot(&self, element: &Self::Element) -> Attributes;

	/// Structural equality: same tag, same attribute set, same content.
	fn is_equal_node(&self, a: &Self::Element, b: &Self::Element) -> bool;

	fn append_to_head(&self, element: Self::Element);

	/// Detaches `element` from its parent.
	fn remove(&self, element: &Self::Element);

	/// The singleton element attributes are reconciled onto, if present.
	fn attribute_root(&self, target: AttributeTarget) -> Option<Self::Element>;

	fn title(&self) -> String;
	fn set_title(&self, title: &str);
}

#[cfg(target_arch = "wasm32")]
mod web {
	use super::Dom;
	use crate::attributes::Attributes;
	use crate::props::{AttributeTarget, TagKind, ENGINE_ATTRIBUTE};
	use tracing::error;
	use wasm_bindgen::{JsCast, UnwrapThrowExt};
	use web_sys::{Document, Element};

	/// [`Dom`] backed by the browser document via `web-sys`.
	#[derive(Clone, Debug)]
	pub struct WebDom {
		document: Document,
	}

	impl WebDom {
		/// # Panics
		///
		/// If there is no `window` or it has no `document` (non-browser host).
		#[must_use]
		pub fn new() -> Self {
			Self::for_document(
				web_sys::window()
					.expect_throw("casque: no `window` to reconcile against")
					.document()
					.expect_throw("casque: `window` has no `document`"),
			)
		}

		#[must_use]
		pub fn for_document(document: Document) -> Self {
			Self { document }
		}

		fn head(&self) -> web_sys::HtmlHeadElement {
			self.document.head().expect_throw("casque: document has no <head>")
		}
	}

	impl Default for WebDom {
		fn default() -> Self {
			Self::new()
		}
	}

	impl Dom for WebDom {
		type Element = Element;

		fn marked_elements(&self, kind: TagKind) -> Vec<Element> {
			let selector = format!("{}[{}]", kind.element_name(), ENGINE_ATTRIBUTE);
			let nodes = match self.head().query_selector_all(&selector) {
				Ok(nodes) => nodes,
				Err(error) => {
					error!("Failed to query {:?}: {:?}", selector, error);
					return Vec::new();
				}
			};
			(0..nodes.length()).filter_map(|i| nodes.get(i)?.dyn_into::<Element>().ok()).collect()
		}

		fn create_element(&self, kind: TagKind) -> Element {
			self.document.create_element(kind.element_name()).unwrap_throw()
		}

		fn get_attribute(&self, element: &Element, name: &str) -> Option<String> {
			element.get_attribute(name)
		}

		fn set_attribute(&self, element: &Element, name: &str, value: &str) {
			if let Err(error) = element.set_attribute(name, value) {
				error!("Failed to set attribute {:?} on <{}>: {:?}", name, element.tag_name(), error);
			}
		}

		fn remove_attribute(&self, element: &Element, name: &str) {
			if let Err(error) = element.remove_attribute(name) {
				error!("Failed to remove attribute {:?} from <{}>: {:?}", name, element.tag_name(), error);
			}
		}

		fn set_inner_html(&self, element: &Element, html: &str) {
			element.set_inner_html(html);
		}

		fn append_text(&self, element: &Element, text: &str) {
			let text = self.document.create_text_node(text);
			if let Err(error) = element.append_child(text.as_ref()) {
				error!("Failed to append text to <{}>: {:?}", element.tag_name(), error);
			}
		}

		fn attribute_snapshot(&self, element: &Element) -> Attributes {
			let attributes = element.attributes();
			let mut snapshot = Attributes::new();
			for i in 0..attributes.length() {
				if let Some(attribute) = attributes.item(i) {
					snapshot.set(attribute.local_name(), attribute.value());
				}
			}
			snapshot
		}

		fn is_equal_node(&self, a: &Element, b: &Element) -> bool {
			a.is_equal_node(Some(b.as_ref()))
		}

		fn append_to_head(&self, element: Element) {
			if let Err(error) = self.head().append_child(element.as_ref()) {
				error!("Failed to append <{}> to head: {:?}", element.tag_name(), error);
			}
		}

		fn remove(&self, element: &Element) {
			element.remove();
		}

		fn attribute_root(&self, target: AttributeTarget) -> Option<Element> {
			self.document.get_elements_by_tag_name(target.element_name()).item(0)
		}

		fn title(&self) -> String {
			self.document.title()
		}

		fn set_title(&self, title: &str) {
			self.document.set_title(title);
		}
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebDom;
