//! Signed-in customer session.
//!
//! Mirrors the auth endpoints: the customer record rides in a
//! [`Loadable`] so pages can show the request status and error, and the
//! bearer token is held next to it. Login and register share one state.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use techstore_core::{FetchStatus, UserId};
use tracing::{debug, info, instrument};

use crate::catalog::Loadable;
use crate::checkout::Customer;

/// Which auth request a response or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    Login,
    Register,
}

impl AuthFlow {
    /// Error shown when the backend gives no message.
    #[must_use]
    pub const fn fallback_error(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
        }
    }
}

/// Body returned by the login and register endpoints.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub token: SecretString,
}

fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

/// Auth state for the current visitor.
#[derive(Debug, Default)]
pub struct Session {
    user: Loadable<Customer>,
    token: Option<SecretString>,
}

impl Session {
    /// Rebuild a session from persisted values.
    ///
    /// The customer is only restored together with a token; a stored
    /// profile without one is dropped.
    #[must_use]
    pub fn restore(token: Option<SecretString>, user: Option<Customer>) -> Self {
        let mut session = Self::default();
        if let (Some(token), Some(user)) = (token, user) {
            session.user.data = Some(user);
            session.token = Some(token);
        }
        session
    }

    /// Mark a login or register request as in flight.
    pub fn start(&mut self) {
        self.user.start();
    }

    /// Store the customer and token from a successful login or register.
    #[instrument(skip_all, fields(user_id = %response.id))]
    pub fn signed_in(&mut self, response: AuthResponse) {
        let AuthResponse {
            id,
            name,
            email,
            phone,
            token,
        } = response;
        self.user.succeed(Customer {
            id,
            name,
            email,
            phone,
        });
        self.token = Some(token);
        info!("Signed in");
    }

    /// Record a failed request and sign the visitor out.
    ///
    /// A missing or blank message becomes the flow's fallback error.
    #[instrument(skip(self))]
    pub fn failed(&mut self, flow: AuthFlow, message: Option<&str>) {
        let message = message
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| flow.fallback_error());
        self.user.fail(message);
        self.user.data = None;
        self.token = None;
    }

    /// Apply a profile update. Contact fields the update leaves out are
    /// kept; the request status is untouched.
    pub fn merge_profile(&mut self, profile: Customer) {
        match self.user.data.as_mut() {
            Some(user) => {
                user.id = profile.id;
                user.name = profile.name;
                if profile.email.is_some() {
                    user.email = profile.email;
                }
                if profile.phone.is_some() {
                    user.phone = profile.phone;
                }
            }
            None => self.user.data = Some(profile),
        }
    }

    pub fn clear_error(&mut self) {
        self.user.error = None;
    }

    /// Drop the customer, token and any error.
    pub fn logout(&mut self) {
        self.user.reset();
        self.token = None;
        debug!("Logged out");
    }

    #[must_use]
    pub const fn current_user(&self) -> Option<&Customer> {
        self.user.data.as_ref()
    }

    /// Bearer token for authenticated requests.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_ref().map(|token| token.expose_secret())
    }

    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.user.status
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.user.error.as_deref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::checkout::CheckoutForm;

    fn response() -> AuthResponse {
        serde_json::from_value(serde_json::json!({
            "_id": "u1",
            "name": "Omar Hassan",
            "email": "omar@example.com",
            "phone": "01012345678",
            "token": "jwt-abc"
        }))
        .unwrap()
    }

    #[test]
    fn test_sign_in_then_logout() {
        let mut session = Session::default();
        session.start();
        assert!(session.status().is_loading());

        session.signed_in(response());
        assert_eq!(session.status(), FetchStatus::Succeeded);
        assert_eq!(session.token(), Some("jwt-abc"));
        assert_eq!(session.current_user().unwrap().name, "Omar Hassan");
        assert!(session.is_authenticated());

        session.logout();
        assert_eq!(session.status(), FetchStatus::Idle);
        assert!(session.current_user().is_none());
        assert!(session.token().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_failure_uses_fallback_and_signs_out() {
        let mut session = Session::default();
        session.signed_in(response());

        session.start();
        session.failed(AuthFlow::Login, Some("  "));
        assert_eq!(session.status(), FetchStatus::Failed);
        assert_eq!(session.error(), Some("Login failed"));
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated());

        session.failed(AuthFlow::Register, None);
        assert_eq!(session.error(), Some("Registration failed"));

        session.failed(AuthFlow::Register, Some("Email already registered"));
        assert_eq!(session.error(), Some("Email already registered"));

        session.clear_error();
        assert!(session.error().is_none());
        assert_eq!(session.status(), FetchStatus::Failed);
    }

    #[test]
    fn test_restore_needs_token_and_user() {
        let user = Customer {
            id: UserId::new("u1"),
            name: "Omar".to_string(),
            email: None,
            phone: None,
        };

        let orphan = Session::restore(None, Some(user.clone()));
        assert!(orphan.current_user().is_none());
        assert!(!orphan.is_authenticated());

        let restored = Session::restore(Some(SecretString::from("jwt")), Some(user));
        assert_eq!(restored.token(), Some("jwt"));
        assert_eq!(restored.current_user().unwrap().id, UserId::new("u1"));
        assert_eq!(restored.status(), FetchStatus::Idle);
    }

    #[test]
    fn test_merge_profile_keeps_missing_contacts() {
        let mut session = Session::default();
        session.signed_in(response());

        session.merge_profile(Customer {
            id: UserId::new("u1"),
            name: "Omar H.".to_string(),
            email: None,
            phone: Some("01112345678".to_string()),
        });

        let user = session.current_user().unwrap();
        assert_eq!(user.name, "Omar H.");
        assert_eq!(user.email.as_deref(), Some("omar@example.com"));
        assert_eq!(user.phone.as_deref(), Some("01112345678"));
        assert_eq!(session.status(), FetchStatus::Succeeded);
    }

    #[test]
    fn test_session_user_prefills_checkout() {
        let mut session = Session::default();
        session.signed_in(response());

        let mut form = CheckoutForm::default();
        form.prefill(session.current_user().unwrap());
        assert_eq!(form.first_name, "Omar");
        assert_eq!(form.last_name, "Hassan");
        assert_eq!(form.phone, "01012345678");
    }

    #[test]
    fn test_debug_hides_token() {
        let mut session = Session::default();
        session.signed_in(response());
        assert!(!format!("{session:?}").contains("jwt-abc"));
    }
}
