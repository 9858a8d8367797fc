use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{ai::gemini::ApiKey, query_log::QueryLog};

/// Everything one user session owns: the runtime key and the query log.
#[derive(Debug, Default)]
pub struct Session {
    pub api_key: Option<ApiKey>,
    pub log: QueryLog,
}

impl Session {
    pub fn new(api_key: Option<ApiKey>) -> Self {
        Self {
            api_key,
            log: QueryLog::new(),
        }
    }
}

/// Locks the session.  A panic in another handler doesn't leave the
/// log in a half-written state, so a poisoned lock is still usable.
pub fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
