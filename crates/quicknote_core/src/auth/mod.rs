//! Authentication collaborator contract.
//!
//! # Responsibility
//! - Resolve the current user id for owner-scoped note operations.
//!
//! # Invariants
//! - "No current user" is a normal answer, not an error.
//! - A poisoned session lock is recovered and logged; the guarded value is a
//!   plain `Option<UserId>` and stays valid.

use crate::model::note::UserId;
use async_trait::async_trait;
use log::{info, warn};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Resolves the currently authenticated user.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns the signed-in user id, or `None` when nobody is signed in.
    async fn current_user_id(&self) -> Option<UserId>;
}

/// Process-local session holding at most one signed-in user.
#[derive(Debug, Default)]
pub struct SessionAuth {
    user_id: RwLock<Option<UserId>>,
}

impl SessionAuth {
    /// Creates a session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// Creates a session already signed in as `user_id`.
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: RwLock::new(Some(user_id)),
        }
    }

    pub fn sign_in(&self, user_id: UserId) {
        *self.write("sign_in") = Some(user_id);
        info!("event=sign_in module=auth status=ok user_id={user_id}");
    }

    pub fn sign_out(&self) {
        *self.write("sign_out") = None;
        info!("event=sign_out module=auth status=ok");
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<UserId>> {
        self.user_id.read().unwrap_or_else(|poisoned| {
            warn!("event=current_user module=auth status=recovered error_code=lock_poisoned");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self, event: &'static str) -> RwLockWriteGuard<'_, Option<UserId>> {
        self.user_id.write().unwrap_or_else(|poisoned| {
            warn!("event={event} module=auth status=recovered error_code=lock_poisoned");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[async_trait]
impl AuthProvider for SessionAuth {
    async fn current_user_id(&self) -> Option<UserId> {
        *self.read()
    }
}
