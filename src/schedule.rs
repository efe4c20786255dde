//! Deferred-commit scheduling.

/// A cancellable single-shot delayed task primitive.
///
/// Any timer, microtask or platform paint callback satisfies the contract as
/// long as the callback runs at most once, `schedule` never invokes it
/// synchronously, and `cancel` before the fire time prevents it entirely.
pub trait FrameScheduler {
	type Handle;

	fn schedule(&self, callback: Box<dyn FnOnce()>) -> Self::Handle;

	/// Cancelling a handle whose callback already ran is a no-op.
	fn cancel(&self, handle: Self::Handle);
}

#[cfg(target_arch = "wasm32")]
mod web {
	use super::FrameScheduler;
	use tracing::error;
	use wasm_bindgen::closure::Closure;
	use wasm_bindgen::{JsCast, UnwrapThrowExt};

	/// Schedules onto the browser's next paint via `requestAnimationFrame`.
	#[derive(Clone, Copy, Debug, Default)]
	pub struct AnimationFrameScheduler;

	impl FrameScheduler for AnimationFrameScheduler {
		type Handle = i32;

		fn schedule(&self, callback: Box<dyn FnOnce()>) -> i32 {
			let closure = Closure::once_into_js(move |_timestamp: f64| callback());
			web_sys::window()
				.expect_throw("casque: no `window` to schedule an animation frame on")
				.request_animation_frame(closure.unchecked_ref::<js_sys::Function>())
				.unwrap_throw()
		}

		fn cancel(&self, handle: i32) {
			// The JS function behind a cancelled frame is reclaimed by the GC.
			if let Some(window) = web_sys::window() {
				if let Err(error) = window.cancel_animation_frame(handle) {
					error!("Failed to cancel animation frame {}: {:?}", handle, error);
				}
			}
		}
	}
}

#[cfg(target_arch = "wasm32")]
pub use web::AnimationFrameScheduler;
