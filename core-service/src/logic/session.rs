//! Session Observation
//!
//! The authentication side owns a `SessionHandle` and updates it on
//! sign-in / sign-out. Views that need gating hold a `SessionWatch`
//! and ask it before rendering; an absent or expired session means
//! "go to sign-in".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("sign in required")]
    SignInRequired,
}

/// An authenticated user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

// ============================================================================
// HANDLE (writer side)
// ============================================================================

/// Current session plus its change stream
#[derive(Debug)]
pub struct SessionHandle {
    tx: watch::Sender<Option<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn sign_in(&self, session: Session) {
        log::info!("Session started for {}", session.email);
        self.tx.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        if let Some(previous) = self.tx.send_replace(None) {
            log::info!("Session ended for {}", previous.email);
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionWatch {
        SessionWatch {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// WATCH (reader side)
// ============================================================================

#[derive(Debug, Clone)]
pub struct SessionWatch {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionWatch {
    pub fn current(&self) -> Option<Session> {
        self.rx.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait for the next sign-in / sign-out.
    ///
    /// Returns `None` once the handle is gone and no further change can come.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Gate for a view that requires sign-in
    pub fn require(&self, now: DateTime<Utc>) -> Result<Session, AccessError> {
        match self.rx.borrow().as_ref() {
            Some(session) if session.is_active_at(now) => Ok(session.clone()),
            _ => Err(AccessError::SignInRequired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        Session {
            user_id: Uuid::new_v4(),
            email: "driver@example.com".to_string(),
            expires_at: Utc::now() + expires_in,
        }
    }

    #[test]
    fn test_gate_follows_handle() {
        let handle = SessionHandle::new();
        let watch = handle.subscribe();

        assert_eq!(watch.require(Utc::now()), Err(AccessError::SignInRequired));

        let s = session(Duration::hours(1));
        handle.sign_in(s.clone());
        assert_eq!(watch.require(Utc::now()), Ok(s));

        handle.sign_out();
        assert!(!watch.is_present());
        assert_eq!(watch.require(Utc::now()), Err(AccessError::SignInRequired));
    }

    #[test]
    fn test_expired_session_is_absent_for_gating() {
        let handle = SessionHandle::new();
        let watch = handle.subscribe();
        handle.sign_in(session(Duration::minutes(-5)));

        assert!(watch.is_present());
        assert_eq!(watch.require(Utc::now()), Err(AccessError::SignInRequired));
    }

    #[tokio::test]
    async fn test_changes_are_notified() {
        let handle = SessionHandle::new();
        let mut watch = handle.subscribe();

        let s = session(Duration::hours(1));
        handle.sign_in(s.clone());
        assert_eq!(watch.changed().await, Some(Some(s)));

        handle.sign_out();
        assert_eq!(watch.changed().await, Some(None));

        drop(handle);
        assert_eq!(watch.changed().await, None);
    }
}
