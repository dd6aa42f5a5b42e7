use tokio::sync::watch;

use crate::domain::ports::IdentityProvider;

/// Watch-channel identity source. An embedding client pushes sign-in and
/// sign-out transitions; the session resolver subscribes and reacts.
pub struct IdentityChannel {
    tx: watch::Sender<Option<String>>,
}

impl IdentityChannel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx }
    }

    pub fn signed_in(&self, uid: impl Into<String>) {
        let _ = self.tx.send(Some(uid.into()));
    }

    pub fn signed_out(&self) {
        let _ = self.tx.send(None);
    }
}

impl Default for IdentityChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for IdentityChannel {
    fn current_identity(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}
