//! Client-side session management.
//!
//! This module is the library half of the SPA shell: it keeps the issued
//! credential in persisted storage, inspects its expiry without a network
//! round-trip, and decides navigation for protected and guest-only routes.
//! The expiry decode here is advisory UX only; the server re-verifies the
//! signature on every request and remains the security boundary.

mod store;

pub use store::{MemoryStore, SessionStore, STORAGE_KEY};

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

/// What the client persists after login/registration: the bearer token plus
/// the denormalized user fields the UI renders without a profile fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl Session {
    /// Read the persisted session. Absence or corruption reads as logged
    /// out; a corrupt blob is cleared as soon as it is detected, whatever
    /// route triggered the read.
    pub fn load(store: &dyn SessionStore) -> Option<Session> {
        let raw = store.get()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                debug!(error = %e, "persisted session is corrupt");
                store.remove();
                None
            }
        }
    }

    pub fn save(&self, store: &dyn SessionStore) {
        if let Ok(raw) = serde_json::to_string(self) {
            store.put(&raw);
        }
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: i64,
}

/// Decode the `exp` claim from a JWT payload without verifying the signature.
/// Advisory only: good enough to skip a doomed request, never a substitute
/// for server-side verification.
pub fn token_expiry(token: &str) -> Option<OffsetDateTime> {
    let payload = token.split('.').nth(1)?;
    let bytes = Base64UrlUnpadded::decode_vec(payload).ok()?;
    let claim: ExpiryClaim = serde_json::from_slice(&bytes).ok()?;
    OffsetDateTime::from_unix_timestamp(claim.exp).ok()
}

fn session_is_live(session: &Session, now: OffsetDateTime) -> bool {
    match token_expiry(&session.token) {
        Some(exp) => now < exp,
        None => false,
    }
}

/// Route classification for navigation decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Requires a live session to render.
    Protected,
    /// Login/registration entry points, pointless for a signed-in user.
    GuestOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    ToLogin,
    ToDashboard,
}

/// Decide what to do on navigation. Runs synchronously to completion before
/// any render. A dead session on a protected route is an expected steady-state
/// event: clear storage and redirect silently, no error surfaced.
pub fn route_decision(
    store: &dyn SessionStore,
    class: RouteClass,
    now: OffsetDateTime,
) -> Navigation {
    let live = Session::load(store)
        .map(|s| session_is_live(&s, now))
        .unwrap_or(false);

    match class {
        RouteClass::Protected => {
            if live {
                Navigation::Proceed
            } else {
                store.remove();
                Navigation::ToLogin
            }
        }
        RouteClass::GuestOnly => {
            if live {
                Navigation::ToDashboard
            } else {
                Navigation::Proceed
            }
        }
    }
}

/// Logout is purely local: tokens are stateless, so clearing persisted state
/// is the whole operation.
pub fn logout(store: &dyn SessionStore) {
    store.remove();
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Unsigned JWT-shaped token; route decisions never verify signatures.
    fn fake_token(exp: i64) -> String {
        let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = Base64UrlUnpadded::encode_string(
            format!(r#"{{"sub":"{}","exp":{}}}"#, Uuid::new_v4(), exp).as_bytes(),
        );
        format!("{header}.{payload}.sig")
    }

    fn store_with_session(exp: i64) -> MemoryStore {
        let store = MemoryStore::default();
        Session {
            token: fake_token(exp),
            id: Uuid::new_v4(),
            name: "Ann".into(),
            email: "ann@example.com".into(),
        }
        .save(&store);
        store
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[test]
    fn expired_session_on_protected_route_redirects_and_clears() {
        let store = store_with_session(now().unix_timestamp() - 60);
        assert_eq!(
            route_decision(&store, RouteClass::Protected, now()),
            Navigation::ToLogin
        );
        assert!(store.get().is_none(), "stale session must be cleared");
    }

    #[test]
    fn live_session_on_protected_route_proceeds() {
        let store = store_with_session(now().unix_timestamp() + 3600);
        assert_eq!(
            route_decision(&store, RouteClass::Protected, now()),
            Navigation::Proceed
        );
        assert!(store.get().is_some());
    }

    #[test]
    fn missing_session_on_protected_route_redirects() {
        let store = MemoryStore::default();
        assert_eq!(
            route_decision(&store, RouteClass::Protected, now()),
            Navigation::ToLogin
        );
    }

    #[test]
    fn corrupt_session_reads_as_logged_out() {
        let store = MemoryStore::default();
        store.put("{not-json");
        assert_eq!(
            route_decision(&store, RouteClass::Protected, now()),
            Navigation::ToLogin
        );
        assert!(store.get().is_none());
    }

    #[test]
    fn corrupt_session_on_guest_route_is_cleared_too() {
        let store = MemoryStore::default();
        store.put("{not-json");
        assert_eq!(
            route_decision(&store, RouteClass::GuestOnly, now()),
            Navigation::Proceed
        );
        assert!(store.get().is_none(), "corrupt blob must not linger");
    }

    #[test]
    fn live_session_on_guest_route_goes_to_dashboard() {
        let store = store_with_session(now().unix_timestamp() + 3600);
        assert_eq!(
            route_decision(&store, RouteClass::GuestOnly, now()),
            Navigation::ToDashboard
        );
    }

    #[test]
    fn dead_session_on_guest_route_renders_the_form() {
        let store = store_with_session(now().unix_timestamp() - 60);
        assert_eq!(
            route_decision(&store, RouteClass::GuestOnly, now()),
            Navigation::Proceed
        );
    }

    #[test]
    fn token_expiry_decodes_without_verification() {
        let exp = now().unix_timestamp() + 1234;
        let decoded = token_expiry(&fake_token(exp)).expect("expiry");
        assert_eq!(decoded.unix_timestamp(), exp);
    }

    #[test]
    fn token_expiry_rejects_malformed_tokens() {
        assert!(token_expiry("").is_none());
        assert!(token_expiry("one-part").is_none());
        assert!(token_expiry("a.b.c").is_none());
        assert!(token_expiry("a.!!!not-base64!!!.c").is_none());
    }

    #[test]
    fn logout_clears_the_store() {
        let store = store_with_session(now().unix_timestamp() + 3600);
        logout(&store);
        assert!(store.get().is_none());
        assert_eq!(
            route_decision(&store, RouteClass::Protected, now()),
            Navigation::ToLogin
        );
    }
}
