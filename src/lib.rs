#![doc(html_root_url = "https://docs.rs/casque/0.1.0")]
#![warn(clippy::pedantic)]

//! Aggregates document-head metadata declared by many independently mounted UI
//! components into one canonical state and reconciles it onto the live DOM
//! with minimal edits.
//!
//! A [`HeadProvider`] owns the registry; declaring components talk to it
//! through a [`HeadScope`] handle obtained from [`HeadProvider::scope`]. The
//! merged [`AggregatedState`] can also be rendered to plain strings via
//! [`render::static_head`] for server-side emission.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod aggregate;
pub mod attributes;
pub mod commit;
pub mod dom;
pub mod priority;
pub mod props;
pub mod provider;
pub mod render;
pub mod schedule;

pub use self::aggregate::{aggregate, AggregatedState, PriorityTags};
pub use self::attributes::Attributes;
pub use self::commit::commit_tag_changes;
pub use self::dom::Dom;
pub use self::priority::{SeoMatchTable, ValueMatch};
pub use self::props::{ClientState, HeadProps, OnChangeClientState, TagKind, TagSnapshots, ENGINE_ATTRIBUTE};
pub use self::provider::{HeadProvider, HeadScope};
pub use self::schedule::FrameScheduler;

#[cfg(target_arch = "wasm32")]
pub use self::dom::WebDom;
#[cfg(target_arch = "wasm32")]
pub use self::schedule::AnimationFrameScheduler;
