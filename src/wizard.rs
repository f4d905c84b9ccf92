//! Multi-step wizard state.
//!
//! Wizard mode restricts the tree's top-level children to one visible step
//! at a time. `WizardState` holds the step index behind a cheap clone
//! handle so navigation handlers injected into buttons and the render pass
//! observe the same position.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

struct WizardInner {
	current: usize,
	total: usize,
}

/// Shared step-index handle for wizard mode.
///
/// Invariant: `current_step < max(total_steps, 1)`. Navigation clamps at
/// both ends; assigning a smaller total clamps the current step down.
///
/// # Examples
///
/// ```
/// use formtree::WizardState;
///
/// let wizard = WizardState::new(3);
/// assert_eq!(wizard.current_step(), 0);
/// assert!(wizard.is_first_step());
///
/// wizard.next();
/// wizard.next();
/// assert!(wizard.is_last_step());
///
/// // Clamped at the last step.
/// wizard.next();
/// assert_eq!(wizard.current_step(), 2);
/// ```
#[derive(Clone)]
pub struct WizardState {
	inner: Arc<RwLock<WizardInner>>,
}

impl WizardState {
	/// Creates wizard state positioned on the first step.
	pub fn new(total: usize) -> Self {
		Self {
			inner: Arc::new(RwLock::new(WizardInner { current: 0, total })),
		}
	}

	/// Returns the current step index.
	pub fn current_step(&self) -> usize {
		self.inner.read().current
	}

	/// Returns the total number of steps.
	pub fn total_steps(&self) -> usize {
		self.inner.read().total
	}

	/// Reassigns the total step count, clamping the current step so a
	/// shrinking tree renders its new last step instead of nothing.
	pub fn set_total(&self, total: usize) {
		let mut inner = self.inner.write();
		inner.total = total;
		let last = total.saturating_sub(1);
		if inner.current > last {
			trace!(from = inner.current, to = last, "wizard step clamped");
			inner.current = last;
		}
	}

	/// Advances one step, clamped to the last step.
	pub fn next(&self) {
		let mut inner = self.inner.write();
		if inner.current + 1 < inner.total {
			inner.current += 1;
			trace!(step = inner.current, "wizard advanced");
		}
	}

	/// Steps back once; a no-op on the first step.
	pub fn previous(&self) {
		let mut inner = self.inner.write();
		if inner.current > 0 {
			inner.current -= 1;
			trace!(step = inner.current, "wizard stepped back");
		}
	}

	/// Returns whether the wizard is on the first step.
	pub fn is_first_step(&self) -> bool {
		self.inner.read().current == 0
	}

	/// Returns whether the wizard is on the last step.
	pub fn is_last_step(&self) -> bool {
		let inner = self.inner.read();
		inner.current + 1 >= inner.total
	}

	/// Returns completion progress as a percentage.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::WizardState;
	///
	/// let wizard = WizardState::new(4);
	/// assert_eq!(wizard.progress_percentage(), 25.0);
	/// wizard.next();
	/// assert_eq!(wizard.progress_percentage(), 50.0);
	/// ```
	pub fn progress_percentage(&self) -> f32 {
		let inner = self.inner.read();
		if inner.total == 0 {
			return 0.0;
		}
		((inner.current + 1) as f32 / inner.total as f32) * 100.0
	}

	/// Returns the status line rendered under the processed step.
	pub fn status_line(&self) -> String {
		let inner = self.inner.read();
		format!("Step {} of {}", inner.current + 1, inner.total)
	}
}

impl std::fmt::Debug for WizardState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner = self.inner.read();
		f.debug_struct("WizardState")
			.field("current", &inner.current)
			.field("total", &inner.total)
			.finish()
	}
}
