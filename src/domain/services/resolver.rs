use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::domain::models::role::Permission;
use crate::domain::models::session::{ResolvedSession, SessionError, SessionState};
use crate::domain::ports::{IdentityProvider, UserStore};
use crate::error::AppError;

/// Resolve one identity key against the user store. Shared by the
/// stream-driven resolver below and the per-request auth extractor.
#[instrument(skip(store))]
pub async fn resolve_profile(store: &dyn UserStore, uid: &str) -> SessionState {
    match store.get(uid).await {
        Ok(Some(user)) if !user.is_active => {
            SessionState::Failed(SessionError::AccountDeactivated)
        }
        Ok(Some(user)) => SessionState::Active(ResolvedSession::for_user(user)),
        Ok(None) => SessionState::Failed(SessionError::ProfileNotFound),
        Err(AppError::InvalidRole(value)) => {
            warn!(uid, value, "user record carries a role outside the catalog");
            SessionState::Failed(SessionError::InvalidRole(value))
        }
        Err(err) => {
            warn!(uid, error = %err, "profile lookup failed");
            SessionState::Failed(SessionError::StoreFailure)
        }
    }
}

/// Turns identity changes into published session states.
///
/// Each identity change (and each manual refresh) claims a fresh sequence
/// number; a resolution may only publish while its number is still the
/// latest, so a slow lookup for a previous identity can never overwrite
/// the session of the current one.
pub struct SessionResolver {
    store: Arc<dyn UserStore>,
    state_tx: watch::Sender<SessionState>,
    seq: AtomicU64,
    current_uid: Mutex<Option<String>>,
}

impl SessionResolver {
    pub fn new(store: Arc<dyn UserStore>) -> Arc<Self> {
        let (state_tx, _) = watch::channel(SessionState::SignedOut);
        Arc::new(Self {
            store,
            state_tx,
            seq: AtomicU64::new(0),
            current_uid: Mutex::new(None),
        })
    }

    /// Latest published state.
    pub fn session(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to published state changes.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.session().has_permission(permission)
    }

    pub fn is_admin(&self) -> bool {
        self.session().is_admin()
    }

    pub fn is_super_admin(&self) -> bool {
        self.session().is_super_admin()
    }

    /// Apply a sign-in or sign-out. Sign-out publishes immediately;
    /// sign-in publishes `Pending` and resolves in the background.
    pub fn set_identity(self: &Arc<Self>, uid: Option<String>) {
        let seq = {
            let mut current = self.current_uid.lock().unwrap();
            current.clone_from(&uid);
            self.next_seq()
        };

        match uid {
            None => self.publish(seq, SessionState::SignedOut),
            Some(uid) => {
                self.publish(seq, SessionState::Pending);
                let resolver = Arc::clone(self);
                tokio::spawn(async move {
                    let outcome = resolve_profile(resolver.store.as_ref(), &uid).await;
                    resolver.publish(seq, outcome);
                });
            }
        }
    }

    /// Re-resolve the current identity on demand, e.g. after a profile
    /// edit. Awaitable: when this returns, the outcome has been published
    /// unless a newer change superseded it mid-flight.
    pub async fn refresh(&self) {
        let (uid, seq) = {
            let current = self.current_uid.lock().unwrap();
            (current.clone(), self.next_seq())
        };

        match uid {
            None => self.publish(seq, SessionState::SignedOut),
            Some(uid) => {
                self.publish(seq, SessionState::Pending);
                let outcome = resolve_profile(self.store.as_ref(), &uid).await;
                self.publish(seq, outcome);
            }
        }
    }

    /// Drive this resolver from a provider's identity stream. The
    /// provider's current identity is applied immediately; the task ends
    /// when the provider goes away.
    pub fn attach(self: &Arc<Self>, provider: Arc<dyn IdentityProvider>) -> JoinHandle<()> {
        let resolver = Arc::clone(self);
        let mut events = provider.subscribe();
        tokio::spawn(async move {
            loop {
                let uid = events.borrow_and_update().clone();
                resolver.set_identity(uid);
                if events.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn publish(&self, seq: u64, state: SessionState) {
        if self.seq.load(Ordering::SeqCst) == seq {
            let _ = self.state_tx.send(state);
        } else {
            debug!(seq, "discarding superseded session resolution");
        }
    }
}
