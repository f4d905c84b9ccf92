//! Platform selection and native event-prop resolution.
//!
//! Native-mobile components take differently named change-event props than
//! web elements (`onChangeText` on a text input, `onValueChange` on a
//! switch). The caller picks a [`PlatformMode`]; it is resolved exactly
//! once per render pass into a [`Platform`] that is threaded through the
//! traversal, so no code mid-walk consults the environment.

use crate::node::Element;

/// Well-known native component type names.
pub mod components {
	pub const TEXT_INPUT: &str = "TextInput";
	pub const SWITCH: &str = "Switch";
	pub const PICKER: &str = "Picker";
	pub const SLIDER: &str = "Slider";
	pub const CHECK_BOX: &str = "CheckBox";
	pub const RADIO_BUTTON: &str = "RadioButton";
}

/// Platform selector supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlatformMode {
	/// Web event-prop conventions.
	Web,
	/// Native-mobile event-prop conventions.
	Native,
	/// Probe the build target once at the render boundary.
	#[default]
	Auto,
}

/// Effective platform after resolving [`PlatformMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
	Web,
	Native,
}

impl PlatformMode {
	/// Resolves the mode into an effective platform.
	///
	/// `Auto` maps to `Native` on mobile build targets and `Web` everywhere
	/// else. Called once per render pass; the result is passed down
	/// explicitly.
	///
	/// # Examples
	///
	/// ```
	/// use formtree::{Platform, PlatformMode};
	///
	/// assert_eq!(PlatformMode::Web.resolve(), Platform::Web);
	/// assert_eq!(PlatformMode::Native.resolve(), Platform::Native);
	/// ```
	pub fn resolve(self) -> Platform {
		match self {
			PlatformMode::Web => Platform::Web,
			PlatformMode::Native => Platform::Native,
			PlatformMode::Auto => {
				if cfg!(any(target_os = "ios", target_os = "android")) {
					Platform::Native
				} else {
					Platform::Web
				}
			}
		}
	}
}

impl Platform {
	/// Returns whether native event-prop conventions apply.
	pub fn is_native(self) -> bool {
		matches!(self, Platform::Native)
	}
}

/// Resolves an element's component type name.
///
/// The explicit `component` field wins; on web the tag name stands in for
/// it; otherwise the type is `"unknown"`.
///
/// # Examples
///
/// ```
/// use formtree::platform::{component_type, components};
/// use formtree::{Element, Platform};
///
/// let native = Element::input("input", "bio").component(components::TEXT_INPUT);
/// assert_eq!(component_type(&native, Platform::Native), "TextInput");
///
/// let web = Element::input("textarea", "bio");
/// assert_eq!(component_type(&web, Platform::Web), "textarea");
/// assert_eq!(component_type(&web, Platform::Native), "unknown");
/// ```
pub fn component_type<'a>(element: &'a Element, platform: Platform) -> &'a str {
	if let Some(component) = element.component_name() {
		return component;
	}
	if !platform.is_native() {
		return element.tag();
	}
	"unknown"
}

/// Maps a component type to the change-event prop name for a platform.
///
/// On web everything uses `onChange`. On native, text entry takes
/// `onChangeText`; switch/picker/slider/checkbox/radio take
/// `onValueChange`; anything else falls back to `onChange`.
pub fn change_event_prop(platform: Platform, component_type: &str) -> &'static str {
	if !platform.is_native() {
		return "onChange";
	}
	match component_type {
		components::TEXT_INPUT => "onChangeText",
		components::SWITCH
		| components::PICKER
		| components::SLIDER
		| components::CHECK_BOX
		| components::RADIO_BUTTON => "onValueChange",
		_ => "onChange",
	}
}

/// Maps a component type to the value prop name for a platform.
///
/// Pickers and sliders carry their value in `selectedValue` on native;
/// everything else uses `value`.
pub fn value_prop(platform: Platform, component_type: &str) -> &'static str {
	if !platform.is_native() {
		return "value";
	}
	match component_type {
		components::PICKER | components::SLIDER => "selectedValue",
		_ => "value",
	}
}
