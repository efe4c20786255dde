//! Provider-owned registry state, cache invalidation and commit scheduling.

use crate::aggregate::{aggregate, AggregatedState};
use crate::commit::commit_tag_changes;
use crate::dom::Dom;
use crate::priority::SeoMatchTable;
use crate::props::HeadProps;
use crate::schedule::FrameScheduler;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{error, trace};

struct Inner<D: Dom, S: FrameScheduler> {
	dom: D,
	scheduler: S,
	seo: SeoMatchTable,
	registry: Vec<(String, HeadProps)>,
	state: Option<Rc<AggregatedState>>,
	first_render: bool,
	pending_frame: Option<S::Handle>,
}

/// Owns one independent Instance Registry and commits its aggregated state.
///
/// Nested providers are fully independent; dropping a provider cancels its
/// outstanding deferred commit and invalidates every handle it issued.
pub struct HeadProvider<D: Dom, S: FrameScheduler> {
	inner: Rc<RefCell<Inner<D, S>>>,
}

impl<D: Dom + 'static, S: FrameScheduler + 'static> HeadProvider<D, S> {
	#[must_use]
	pub fn new(dom: D, scheduler: S) -> Self {
		Self::with_seo_table(dom, scheduler, SeoMatchTable::default())
	}

	/// The SEO match table is operator configuration; this constructor takes
	/// a custom one.
	#[must_use]
	pub fn with_seo_table(dom: D, scheduler: S, seo: SeoMatchTable) -> Self {
		Self {
			inner: Rc::new(RefCell::new(Inner {
				dom,
				scheduler,
				seo,
				registry: Vec::new(),
				state: None,
				first_render: true,
				pending_frame: None,
			})),
		}
	}

	/// Hands out a registration handle for declaring components.
	#[must_use]
	pub fn scope(&self) -> HeadScope<D, S> {
		HeadScope {
			inner: Rc::downgrade(&self.inner),
		}
	}

	/// Registers, updates or (with `None`) unregisters the instance `id`.
	pub fn update(&self, id: &str, props: Option<HeadProps>) {
		update(&self.inner, id, props);
	}

	/// Requests that the current registry contents be committed, either
	/// synchronously or on the next paint frame depending on `defer`.
	pub fn request_commit(&self) {
		request_commit(&self.inner);
	}

	/// The current aggregated snapshot, recomputing it if the cache is stale.
	#[must_use]
	pub fn state(&self) -> Rc<AggregatedState> {
		ensure_state(&mut self.inner.borrow_mut())
	}
}

impl<D: Dom, S: FrameScheduler> Drop for HeadProvider<D, S> {
	fn drop(&mut self) {
		// A stale frame must not fire after the provider is gone.
		let mut inner = self.inner.borrow_mut();
		if let Some(handle) = inner.pending_frame.take() {
			inner.scheduler.cancel(handle);
		}
	}
}

/// Registration handle connecting declaring components to the nearest
/// provider.
///
/// Handles are cheap to clone and hold only a weak reference: using one whose
/// provider is gone — or a [`detached`](`HeadScope::detached`) one — is a
/// programmer error and panics after logging.
pub struct HeadScope<D: Dom, S: FrameScheduler> {
	inner: Weak<RefCell<Inner<D, S>>>,
}

impl<D: Dom + 'static, S: FrameScheduler + 'static> HeadScope<D, S> {
	/// A handle bound to no provider, for use as a default before one is
	/// installed.
	#[must_use]
	pub fn detached() -> Self {
		Self { inner: Weak::new() }
	}

	/// See [`HeadProvider::update`].
	pub fn update(&self, id: &str, props: Option<HeadProps>) {
		update(&self.attached(), id, props);
	}

	/// See [`HeadProvider::request_commit`].
	pub fn request_commit(&self) {
		request_commit(&self.attached());
	}

	fn attached(&self) -> Rc<RefCell<Inner<D, S>>> {
		self.inner.upgrade().unwrap_or_else(|| {
			error!("Head declaration made outside a live `HeadProvider`.");
			panic!("casque: head declarations must be made under a live `HeadProvider`")
		})
	}
}

impl<D: Dom, S: FrameScheduler> Clone for HeadScope<D, S> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

fn update<D: Dom, S: FrameScheduler>(inner: &Rc<RefCell<Inner<D, S>>>, id: &str, props: Option<HeadProps>) {
	let mut inner = inner.borrow_mut();
	let index = inner.registry.iter().position(|(entry_id, _)| entry_id == id);
	match (index, props) {
		(Some(index), Some(props)) => {
			inner.state = None;
			inner.registry[index].1 = props;
		}
		(Some(index), None) => {
			inner.state = None;
			inner.registry.remove(index);
		}
		(None, Some(props)) => {
			inner.state = None;
			inner.registry.push((id.to_owned(), props));
		}
		// Unregistering an unknown id is a no-op.
		(None, None) => {}
	}
}

fn ensure_state<D: Dom, S: FrameScheduler>(inner: &mut Inner<D, S>) -> Rc<AggregatedState> {
	if let Some(state) = &inner.state {
		return state.clone();
	}
	let state = Rc::new(aggregate(&inner.registry, &inner.seo));
	inner.state = Some(state.clone());
	state
}

fn request_commit<D: Dom + 'static, S: FrameScheduler + 'static>(inner_rc: &Rc<RefCell<Inner<D, S>>>) {
	let mut inner = inner_rc.borrow_mut();
	if inner.state.is_some() {
		// Nothing changed since the last aggregation; the completed or still
		// pending commit already covers this state generation.
		trace!("Commit request with fresh state. Skipping.");
		return;
	}

	let state = ensure_state(&mut inner);
	if state.defer.unwrap_or(false) {
		if inner.pending_frame.is_none() {
			let weak = Rc::downgrade(inner_rc);
			let handle = inner.scheduler.schedule(Box::new(move || {
				if let Some(inner_rc) = weak.upgrade() {
					commit_now(&inner_rc, true);
				}
			}));
			inner.pending_frame = Some(handle);
		}
	} else {
		if let Some(handle) = inner.pending_frame.take() {
			inner.scheduler.cancel(handle);
		}
		drop(inner);
		commit_now(inner_rc, false);
	}
}

fn commit_now<D: Dom, S: FrameScheduler>(inner_rc: &Rc<RefCell<Inner<D, S>>>, from_frame: bool) {
	let (dom, state, first_render) = {
		let mut inner = inner_rc.borrow_mut();
		if from_frame {
			inner.pending_frame = None;
		}
		// The registry may have changed while the frame was pending; the
		// coalesced commit reads whatever it holds now.
		let state = ensure_state(&mut inner);
		let first_render = inner.first_render;
		inner.first_render = false;
		(inner.dom.clone(), state, first_render)
	};

	// No borrow is held here: the change callback may re-enter the provider.
	commit_tag_changes(&dom, &state, first_render);
}
