//! Identity resolution for sync writes.
//!
//! An authenticated session always supplies the user id. Without one, a
//! stable per-installation id is minted once and persisted, so records
//! written before sign-in keep a consistent owner across restarts.

use rehoboam_store::{KvStore, USER_INSTANCE_NAMESPACE};
use tracing::info;

use crate::config::AuthSession;
use crate::error::Result;

/// Resolve the user id to own sync rows.
pub fn resolve_user_id(kv: &KvStore, session: Option<&AuthSession>) -> Result<String> {
    if let Some(session) = session {
        return Ok(session.user_id.clone());
    }

    let existing: Option<String> = kv.get_or(USER_INSTANCE_NAMESPACE, None)?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let minted = format!("local-{}", uuid::Uuid::new_v4());
    kv.put(USER_INSTANCE_NAMESPACE, &minted)?;
    info!(user_id = %minted, "Minted local instance identity");
    Ok(minted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_identity_is_stable_across_calls() {
        let kv = KvStore::open_in_memory().unwrap();
        let first = resolve_user_id(&kv, None).unwrap();
        let second = resolve_user_id(&kv, None).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("local-"));
    }

    #[test]
    fn authenticated_session_supersedes_instance_id() {
        let kv = KvStore::open_in_memory().unwrap();
        let minted = resolve_user_id(&kv, None).unwrap();

        let session = AuthSession {
            user_id: "auth-user".to_string(),
            access_token: "token".to_string(),
        };
        let resolved = resolve_user_id(&kv, Some(&session)).unwrap();
        assert_eq!(resolved, "auth-user");
        assert_ne!(resolved, minted);
    }
}
