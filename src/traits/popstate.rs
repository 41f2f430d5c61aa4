// SPDX-License-Identifier: MIT OR Apache-2.0

/// Source of "popstate" events, fired whenever the user navigates back or forward.
///
/// Listeners receive the query string of the location navigated to.
pub trait PopStateTarget {
    type ListenerId;

    /// Register a listener and return a handle to remove it again.
    fn add_popstate_listener(&self, listener: Box<dyn FnMut(&str)>) -> Self::ListenerId;

    /// Remove a previously registered listener. Unknown handles are ignored.
    fn remove_popstate_listener(&self, id: Self::ListenerId);
}
