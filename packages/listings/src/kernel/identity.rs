//! In-process identity provider.
//!
//! Holds the signed-in user for a process (the CLI, tests) and fans changes
//! out to subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{BaseIdentityProvider, IdentityListener, Subscription};
use crate::common::UserId;

#[derive(Default)]
struct IdentityState {
    current: Option<UserId>,
    next_listener_id: u64,
    listeners: HashMap<u64, Arc<IdentityListener>>,
}

#[derive(Clone, Default)]
pub struct LocalIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(user_id: UserId) -> Self {
        let provider = Self::new();
        provider.lock().current = Some(user_id);
        provider
    }

    pub fn sign_in(&self, user_id: UserId) {
        self.set(Some(user_id));
    }

    pub fn sign_out(&self) {
        self.set(None);
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, IdentityState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set(&self, user: Option<UserId>) {
        // Listeners run without the lock held so they may query the provider
        let listeners: Vec<Arc<IdentityListener>> = {
            let mut state = self.lock();
            if state.current == user {
                return;
            }
            state.current = user;
            state.listeners.values().cloned().collect()
        };

        debug!(user = ?user, listeners = listeners.len(), "identity changed");
        for listener in listeners {
            listener(user);
        }
    }
}

impl BaseIdentityProvider for LocalIdentityProvider {
    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let listener = Arc::new(listener);
        let (id, current) = {
            let mut state = self.lock();
            let id = state.next_listener_id;
            state.next_listener_id += 1;
            state.listeners.insert(id, Arc::clone(&listener));
            (id, state.current)
        };

        listener(current);

        let state = Arc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = state.upgrade() {
                state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .listeners
                    .remove(&id);
            }
        })
    }
}
