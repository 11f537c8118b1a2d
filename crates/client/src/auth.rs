//! Authentication bridge.
//!
//! The provider that signs users in lives outside this crate; all the client
//! needs from it is a stream of "who is signed in now" notifications.
//! [`AuthBridge`] mirrors that stream into the store for as long as it is
//! alive, and releases its [`Subscription`] when dropped.

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{action::AuthAction, store::Store};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Bearer credential for the finance API. Never serialized back out.
    #[serde(skip_serializing)]
    pub id_token: Option<String>,
}

impl AuthUser {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            id_token: None,
        }
    }
}

/// Callback invoked on every auth-state transition.
pub type AuthListener = Box<dyn Fn(Option<AuthUser>) + Send + Sync>;

/// Source of auth-state notifications.
pub trait AuthProvider {
    /// Register `listener`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription;
}

/// Handle to a registered listener; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[derive(Default)]
struct ProviderInner {
    current: Option<AuthUser>,
    listeners: HashMap<u64, Arc<dyn Fn(Option<AuthUser>) + Send + Sync>>,
    next_id: u64,
}

/// In-process provider holding the current session.
///
/// Like hosted providers, it reports the current state to a listener as soon
/// as it registers, then again on every sign-in or sign-out.
#[derive(Clone, Default)]
pub struct LocalAuthProvider {
    inner: Arc<Mutex<ProviderInner>>,
}

impl LocalAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.inner.lock().current.clone()
    }

    pub fn sign_in(&self, user: AuthUser) {
        self.set(Some(user));
    }

    pub fn sign_out(&self) {
        self.set(None);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().listeners.len()
    }

    fn set(&self, user: Option<AuthUser>) {
        // Listeners run outside the lock so they may call back into us.
        let listeners: Vec<_> = {
            let mut inner = self.inner.lock();
            inner.current = user.clone();
            inner.listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener(user.clone());
        }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn on_auth_state_changed(&self, listener: AuthListener) -> Subscription {
        let listener: Arc<dyn Fn(Option<AuthUser>) + Send + Sync> = Arc::from(listener);
        let (id, current) = {
            let mut inner = self.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.insert(id, listener.clone());
            (id, inner.current.clone())
        };
        listener(current);

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.lock().listeners.remove(&id);
            }
        })
    }
}

/// Keeps the store's auth slice in sync with an [`AuthProvider`].
#[derive(Debug)]
pub struct AuthBridge {
    _subscription: Subscription,
}

impl AuthBridge {
    pub fn mount<P: AuthProvider + ?Sized>(provider: &P, store: Store) -> Self {
        let subscription = provider.on_auth_state_changed(Box::new(move |user| {
            match &user {
                Some(user) => tracing::info!(uid = %user.uid, "auth state: signed in"),
                None => tracing::info!("auth state: signed out"),
            }
            store.dispatch(AuthAction::SetUser(user));
        }));
        Self {
            _subscription: subscription,
        }
    }

    pub fn unmount(self) {
        drop(self);
    }
}
