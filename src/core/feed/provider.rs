//! Scoped access to the session notification store.
//!
//! Most consumers receive their store handle as an explicit constructor
//! argument. Deeply nested callbacks that cannot thread a handle through can
//! look it up here instead, which fails loudly when no scope is active.

use std::cell::RefCell;

use super::record::NotificationRecord;
use super::store::SharedStore;
use crate::core::error::FeedError;

thread_local! {
    static NOTIFICATIONS: RefCell<Vec<SharedStore<NotificationRecord>>> = const { RefCell::new(Vec::new()) };
}

/// Pops the scope on exit, including during unwinding.
struct ScopeGuard;

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        NOTIFICATIONS.with(|scopes| {
            scopes.borrow_mut().pop();
        });
    }
}

/// Run `f` with `store` as the current notification store. Scopes nest; the
/// innermost one wins.
pub fn provide<T>(store: SharedStore<NotificationRecord>, f: impl FnOnce() -> T) -> T {
    NOTIFICATIONS.with(|scopes| scopes.borrow_mut().push(store));
    let _guard = ScopeGuard;
    f()
}

/// The notification store of the innermost active scope.
pub fn use_notifications() -> Result<SharedStore<NotificationRecord>, FeedError> {
    NOTIFICATIONS
        .with(|scopes| scopes.borrow().last().cloned())
        .ok_or(FeedError::ProviderMissing)
}
