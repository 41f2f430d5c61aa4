// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{self, Debug};

use tracing::{debug, trace};

use crate::traits::PopStateTarget;
use crate::url_state::{FieldDefinition, QueryPrefix, Setters, params_to_state};

/// Keeps a popstate listener registered for as long as it is alive.
///
/// Created by [`listen`]. Dropping the subscription (or calling [`unsubscribe`]) removes the
/// listener, tie it to the lifetime of the view owning the setters.
///
/// [`unsubscribe`]: PopStateSubscription::unsubscribe
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct PopStateSubscription<T: PopStateTarget> {
    target: T,
    listener_id: Option<T::ListenerId>,
}

impl<T: PopStateTarget> PopStateSubscription<T> {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.listener_id.take() {
            self.target.remove_popstate_listener(id);
            debug!("removed popstate listener");
        }
    }
}

impl<T: PopStateTarget> Drop for PopStateSubscription<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: PopStateTarget> Debug for PopStateSubscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopStateSubscription")
            .field("active", &self.listener_id.is_some())
            .finish()
    }
}

/// Re-apply URL state whenever the user navigates back or forward.
///
/// On every popstate event the definitions are requested afresh from `definitions` and the
/// parameters of the location navigated to are handed to the setters, see [`params_to_state`].
pub fn listen<T, F>(
    target: T,
    prefix: QueryPrefix,
    mut setters: Setters<'static>,
    mut definitions: F,
) -> PopStateSubscription<T>
where
    T: PopStateTarget,
    F: FnMut() -> Vec<FieldDefinition> + 'static,
{
    let listener_prefix = prefix.clone();
    let listener_id = target.add_popstate_listener(Box::new(move |search: &str| {
        let definitions = definitions();
        let called = params_to_state(&mut setters, search, &definitions, &listener_prefix);
        trace!(prefix = %listener_prefix, search, called, "applied url state on popstate");
    }));
    debug!(prefix = %prefix, "registered popstate listener");

    PopStateSubscription {
        target,
        listener_id: Some(listener_id),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::memory::MemoryHistory;
    use crate::traits::{History, Location};
    use crate::url_state::{FieldDefinition, ParamValue, Setters};

    use super::listen;

    fn recording_setters() -> (Setters<'static>, Rc<RefCell<Vec<ParamValue>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let setters = {
            let received = received.clone();
            Setters::new().with("p", move |value| received.borrow_mut().push(value))
        };
        (setters, received)
    }

    #[test]
    fn applies_params_on_navigation() {
        let mut history = MemoryHistory::new(Location::new("/teams", "?tbl_p=1"));
        history.push(Location::new("/teams", "tbl_p=2")).unwrap();

        let (setters, received) = recording_setters();
        let _subscription = listen(history.clone(), "tbl_".into(), setters, || {
            vec![FieldDefinition::num("page", "p", "1")]
        });

        // Pushing does not emit popstate.
        history.push(Location::new("/teams", "tbl_p=3")).unwrap();
        assert!(received.borrow().is_empty());

        history.back();
        history.back();
        history.forward();
        assert_eq!(
            *received.borrow(),
            vec![
                ParamValue::Num(2.0),
                ParamValue::Num(1.0),
                ParamValue::Num(2.0)
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_updates() {
        let mut history = MemoryHistory::default();
        history.push(Location::new("/", "p=5")).unwrap();

        let (setters, received) = recording_setters();
        let subscription = listen(history.clone(), "".into(), setters, || {
            vec![FieldDefinition::num("page", "p", "1")]
        });
        assert_eq!(history.listener_count(), 1);

        subscription.unsubscribe();
        assert_eq!(history.listener_count(), 0);

        history.back();
        assert!(received.borrow().is_empty());
    }
}
