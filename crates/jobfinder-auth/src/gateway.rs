//! The identity gateway.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use jobfinder_models::{
    Persistence, Role, SessionId, SocialCredential, SocialProvider, UserProfile,
};

use crate::error::{AuthErrorCode, GatewayError, GatewayResult};
use crate::messages::{self, AuthOperation};
use crate::metrics::record_attempt;
use crate::ports::{Account, ActiveSession, IdentityProvider, ProfileStore, SessionStore};

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Keep the session across browser restarts
    pub remember: bool,
}

#[derive(Debug, Clone)]
pub struct SocialSignInRequest {
    pub provider: SocialProvider,
    /// Role written to the profile if this is the account's first sign-in
    pub role: Role,
    pub remember: bool,
    pub credential: SocialCredential,
}

/// Result of a registration whose account was created.
///
/// A registration that fails before the account exists is an `Err`.
#[derive(Debug)]
pub enum RegistrationOutcome {
    FullSuccess {
        session: ActiveSession,
        profile: UserProfile,
    },
    /// The account exists and is signed in, but its profile document could
    /// not be written.
    AccountOnly {
        session: ActiveSession,
        error: GatewayError,
    },
}

impl RegistrationOutcome {
    pub fn session(&self) -> &ActiveSession {
        match self {
            RegistrationOutcome::FullSuccess { session, .. }
            | RegistrationOutcome::AccountOnly { session, .. } => session,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            RegistrationOutcome::FullSuccess { profile, .. } => Some(profile),
            RegistrationOutcome::AccountOnly { .. } => None,
        }
    }

    /// Message to show alongside a degraded success.
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            RegistrationOutcome::FullSuccess { .. } => None,
            RegistrationOutcome::AccountOnly { .. } => Some(messages::PROFILE_NOT_SAVED),
        }
    }
}

/// A completed sign-in together with the profile read right after it.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: ActiveSession,
    pub profile: Option<UserProfile>,
}

impl SignedIn {
    /// Check the role picked on the login form against the stored one.
    ///
    /// Rejection does not sign the session out.
    pub fn require_role(&self, selected: Role) -> Result<&UserProfile, LoginRejection> {
        let profile = self.profile.as_ref().ok_or(LoginRejection::MissingProfile)?;
        if profile.matches_role(selected) {
            Ok(profile)
        } else {
            Err(LoginRejection::RoleMismatch {
                registered: profile.user_type,
            })
        }
    }
}

/// Why a successful sign-in still cannot proceed to a profile page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginRejection {
    MissingProfile,
    RoleMismatch { registered: Role },
}

impl fmt::Display for LoginRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginRejection::MissingProfile => f.write_str(messages::PROFILE_MISSING),
            LoginRejection::RoleMismatch { registered } => {
                f.write_str(&messages::role_mismatch(*registered))
            }
        }
    }
}

impl std::error::Error for LoginRejection {}

/// Session plus profile for `GET /api/session`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session: ActiveSession,
    pub profile: Option<UserProfile>,
}

/// Routes auth intents through the identity provider, profile store and
/// session store. Each call runs its steps strictly in order and never retries.
#[derive(Clone)]
pub struct AuthGateway {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthGateway {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            identity,
            profiles,
            sessions,
        }
    }

    pub fn profiles(&self) -> &Arc<dyn ProfileStore> {
        &self.profiles
    }

    /// Create an account and its profile document.
    ///
    /// The new account is signed in with durable persistence. A failed profile
    /// write is reported as [`RegistrationOutcome::AccountOnly`].
    pub async fn register(&self, req: RegisterRequest) -> GatewayResult<RegistrationOutcome> {
        let result = self.register_inner(req).await;
        let outcome = match &result {
            Ok(RegistrationOutcome::FullSuccess { .. }) => "success",
            Ok(RegistrationOutcome::AccountOnly { .. }) => "degraded",
            Err(e) => e.outcome(),
        };
        record_attempt(AuthOperation::Register.as_str(), outcome);
        result
    }

    async fn register_inner(&self, req: RegisterRequest) -> GatewayResult<RegistrationOutcome> {
        let mut account = self
            .identity
            .create_account(&req.email, &req.password)
            .await?;

        match self
            .identity
            .update_display_name(&account, &req.display_name)
            .await
        {
            Ok(()) => account.display_name = Some(req.display_name.clone()),
            Err(e) => {
                warn!(uid = %account.uid, error = %e, "Failed to set display name, continuing");
            }
        }

        let session = self
            .sessions
            .establish(&SessionId::generate(), &account)
            .await?;

        let profile = UserProfile::for_registration(req.email, req.display_name, req.role);
        match self.profiles.create(&account.uid, &profile).await {
            Ok(()) => {
                info!(uid = %account.uid, role = %req.role, "Registered account");
                Ok(RegistrationOutcome::FullSuccess { session, profile })
            }
            Err(e) => {
                error!(uid = %account.uid, error = %e, "Account created but profile write failed");
                Ok(RegistrationOutcome::AccountOnly { session, error: e })
            }
        }
    }

    /// Password sign-in.
    ///
    /// Persistence is recorded before the credentials are checked. The caller
    /// applies the role check with [`SignedIn::require_role`].
    pub async fn login(&self, req: LoginRequest) -> GatewayResult<SignedIn> {
        let result = self.login_inner(req).await;
        record_attempt(AuthOperation::Login.as_str(), outcome_label(&result));
        result
    }

    async fn login_inner(&self, req: LoginRequest) -> GatewayResult<SignedIn> {
        let session_id = SessionId::generate();
        self.sessions
            .set_persistence(&session_id, Persistence::from_remember(req.remember))
            .await?;

        let account = self
            .identity
            .sign_in_with_password(&req.email, &req.password)
            .await?;
        let session = self.sessions.establish(&session_id, &account).await?;
        let profile = match self.profiles.get(&account.uid).await {
            Ok(profile) => profile,
            Err(e) => {
                self.discard_session(&session_id).await;
                return Err(e);
            }
        };

        info!(uid = %account.uid, persistence = %session.persistence, "Signed in");
        Ok(SignedIn { session, profile })
    }

    /// OAuth sign-in.
    ///
    /// Creates the profile on first sign-in. Later sign-ins only merge
    /// `lastLogin`; the stored role is kept even if another one was selected.
    pub async fn social_sign_in(&self, req: SocialSignInRequest) -> GatewayResult<SignedIn> {
        let operation = AuthOperation::Social(req.provider);
        let result = self.social_sign_in_inner(req).await;
        record_attempt(operation.as_str(), outcome_label(&result));
        result
    }

    async fn social_sign_in_inner(&self, req: SocialSignInRequest) -> GatewayResult<SignedIn> {
        let session_id = SessionId::generate();
        self.sessions
            .set_persistence(&session_id, Persistence::from_remember(req.remember))
            .await?;

        if !req.credential.is_present() {
            return Err(GatewayError::auth(AuthErrorCode::PopupClosedByUser));
        }

        let account = self
            .identity
            .sign_in_with_idp(req.provider, &req.credential)
            .await?;
        let session = self.sessions.establish(&session_id, &account).await?;

        match self.sync_social_profile(&account, &req).await {
            Ok(profile) => Ok(SignedIn {
                session,
                profile: Some(profile),
            }),
            Err(e) => {
                self.discard_session(&session_id).await;
                Err(e)
            }
        }
    }

    /// Create or touch the profile for a social sign-in, then re-read it.
    async fn sync_social_profile(
        &self,
        account: &Account,
        req: &SocialSignInRequest,
    ) -> GatewayResult<UserProfile> {
        match self.profiles.get(&account.uid).await? {
            None => {
                let profile = UserProfile::for_social_sign_up(
                    account.email.clone(),
                    account.display_name.clone(),
                    req.role,
                    req.provider.provider_id(),
                );
                self.profiles.create(&account.uid, &profile).await?;
                info!(
                    uid = %account.uid,
                    provider = %req.provider,
                    role = %req.role,
                    "Created profile on first social sign-in"
                );
            }
            Some(existing) => {
                if existing.user_type != req.role {
                    info!(
                        uid = %account.uid,
                        stored = %existing.user_type,
                        selected = %req.role,
                        "Keeping stored role on repeat social sign-in"
                    );
                }
                self.profiles.merge_last_login(&account.uid, Utc::now()).await?;
            }
        }

        self.profiles.get(&account.uid).await?.ok_or_else(|| {
            GatewayError::profile_store(format!("users/{} missing after write", account.uid))
        })
    }

    /// Drop a session whose sign-in failed after it was established.
    async fn discard_session(&self, session_id: &SessionId) {
        if let Err(e) = self.sessions.end(session_id).await {
            warn!(error = %e, "Failed to discard session after sign-in error");
        }
    }

    /// End the session. Safe to call for sessions that no longer exist.
    pub async fn logout(&self, session_id: &SessionId) -> GatewayResult<()> {
        self.sessions.end(session_id).await?;
        record_attempt("logout", "success");
        Ok(())
    }

    /// Signed-in account and profile for a session id, if it is live.
    pub async fn current_user(&self, session_id: &SessionId) -> GatewayResult<Option<CurrentUser>> {
        let Some(session) = self.sessions.current(session_id).await? else {
            return Ok(None);
        };
        let profile = self.profiles.get(&session.uid).await?;
        Ok(Some(CurrentUser { session, profile }))
    }
}

fn outcome_label<T>(result: &GatewayResult<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{Account, MockIdentityProvider, MockProfileStore, MockSessionStore};
    use jobfinder_models::AccountId;
    use mockall::Sequence;

    fn account(uid: &str) -> Account {
        Account {
            uid: AccountId::new(uid),
            email: Some(format!("{}@example.com", uid)),
            display_name: Some("Pat".to_string()),
            id_token: Some("id-token".to_string()),
        }
    }

    fn session_for(id: &SessionId, account: &Account, persistence: Persistence) -> ActiveSession {
        let now = Utc::now();
        ActiveSession {
            session_id: id.clone(),
            uid: account.uid.clone(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            persistence,
            established_at: now,
            expires_at: now + chrono::Duration::hours(1),
        }
    }

    fn gateway(
        identity: MockIdentityProvider,
        profiles: MockProfileStore,
        sessions: MockSessionStore,
    ) -> AuthGateway {
        AuthGateway::new(Arc::new(identity), Arc::new(profiles), Arc::new(sessions))
    }

    fn establishing_sessions() -> MockSessionStore {
        let mut sessions = MockSessionStore::new();
        sessions
            .expect_set_persistence()
            .returning(|_, _| Ok(()));
        sessions
            .expect_establish()
            .returning(|id, account| Ok(session_for(id, account, Persistence::Durable)));
        sessions
    }

    fn register_request(role: Role) -> RegisterRequest {
        RegisterRequest {
            email: "new@example.com".to_string(),
            password: "secret1".to_string(),
            role,
            display_name: "Pat".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_writes_profile_with_selected_role() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_create_account()
            .times(1)
            .returning(|_, _| Ok(account("u1")));
        identity
            .expect_update_display_name()
            .withf(|_, name| name.to_string() == "Pat")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut profiles = MockProfileStore::new();
        profiles
            .expect_create()
            .withf(|uid, profile| {
                uid.as_str() == "u1"
                    && profile.user_type == Role::Employer
                    && profile.email.as_deref() == Some("new@example.com")
                    && profile.display_name == "Pat"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let gw = gateway(identity, profiles, establishing_sessions());
        let outcome = gw.register(register_request(Role::Employer)).await.unwrap();

        assert_eq!(outcome.profile().map(|p| p.user_type), Some(Role::Employer));
        assert!(outcome.warning().is_none());
        assert_eq!(outcome.session().persistence, Persistence::Durable);
    }

    #[tokio::test]
    async fn test_register_existing_email_writes_nothing() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_create_account()
            .times(1)
            .returning(|_, _| Err(GatewayError::auth(AuthErrorCode::EmailAlreadyInUse)));
        identity.expect_update_display_name().never();

        let mut profiles = MockProfileStore::new();
        profiles.expect_create().never();

        let mut sessions = MockSessionStore::new();
        sessions.expect_establish().never();

        let gw = gateway(identity, profiles, sessions);
        let err = gw.register(register_request(Role::Employee)).await.unwrap_err();

        assert_eq!(err.auth_code(), Some(&AuthErrorCode::EmailAlreadyInUse));
    }

    #[tokio::test]
    async fn test_register_profile_failure_is_degraded_success() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_create_account()
            .returning(|_, _| Ok(account("u2")));
        identity
            .expect_update_display_name()
            .returning(|_, _| Ok(()));

        let mut profiles = MockProfileStore::new();
        profiles
            .expect_create()
            .returning(|_, _| Err(GatewayError::profile_store("PERMISSION_DENIED")));

        let gw = gateway(identity, profiles, establishing_sessions());
        let outcome = gw.register(register_request(Role::Employee)).await.unwrap();

        assert!(matches!(outcome, RegistrationOutcome::AccountOnly { .. }));
        assert_eq!(outcome.session().uid.as_str(), "u2");
        assert_eq!(
            outcome.warning(),
            Some("Account created but profile data could not be saved. Some features may be limited.")
        );
    }

    #[tokio::test]
    async fn test_register_display_name_failure_is_ignored() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_create_account()
            .returning(|_, _| Ok(account("u3")));
        identity
            .expect_update_display_name()
            .returning(|_, _| Err(GatewayError::provider("timeout")));

        let mut profiles = MockProfileStore::new();
        profiles.expect_create().times(1).returning(|_, _| Ok(()));

        let gw = gateway(identity, profiles, establishing_sessions());
        let outcome = gw.register(register_request(Role::Employee)).await.unwrap();
        assert!(matches!(outcome, RegistrationOutcome::FullSuccess { .. }));
    }

    #[tokio::test]
    async fn test_register_session_carries_display_name() {
        let mut seq = Sequence::new();
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_create_account()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(Account {
                    display_name: None,
                    ..account("u9")
                })
            });
        identity
            .expect_update_display_name()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut sessions = MockSessionStore::new();
        sessions
            .expect_establish()
            .withf(|_, account| account.display_name.as_deref() == Some("Pat"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, account| Ok(session_for(id, account, Persistence::Durable)));

        let mut profiles = MockProfileStore::new();
        profiles.expect_create().returning(|_, _| Ok(()));

        let gw = gateway(identity, profiles, sessions);
        let outcome = gw.register(register_request(Role::Employee)).await.unwrap();
        assert_eq!(outcome.session().display_name.as_deref(), Some("Pat"));
    }

    #[tokio::test]
    async fn test_login_profile_read_failure_ends_session() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in_with_password()
            .returning(|_, _| Ok(account("u10")));

        let mut profiles = MockProfileStore::new();
        profiles
            .expect_get()
            .returning(|_| Err(GatewayError::profile_store("UNAVAILABLE")));

        let mut sessions = establishing_sessions();
        sessions.expect_end().times(1).returning(|_| Ok(()));

        let gw = gateway(identity, profiles, sessions);
        let err = gw
            .login(LoginRequest {
                email: "u10@example.com".to_string(),
                password: "secret1".to_string(),
                remember: true,
            })
            .await
            .unwrap_err();
        assert!(err.auth_code().is_none());
    }

    async fn login_with_remember(remember: bool, expected: Persistence) {
        let mut seq = Sequence::new();
        let mut sessions = MockSessionStore::new();
        let mut identity = MockIdentityProvider::new();
        let mut profiles = MockProfileStore::new();

        sessions
            .expect_set_persistence()
            .withf(move |_, p| *p == expected)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        identity
            .expect_sign_in_with_password()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(account("u4")));
        sessions
            .expect_establish()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |id, account| Ok(session_for(id, account, expected)));
        profiles
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(UserProfile::for_registration("u4@example.com", "Pat", Role::Employee))));

        let gw = gateway(identity, profiles, sessions);
        let signed_in = gw
            .login(LoginRequest {
                email: "u4@example.com".to_string(),
                password: "secret1".to_string(),
                remember,
            })
            .await
            .unwrap();

        assert_eq!(signed_in.session.persistence, expected);
    }

    #[tokio::test]
    async fn test_login_sets_persistence_before_authenticating() {
        login_with_remember(true, Persistence::Durable).await;
        login_with_remember(false, Persistence::SessionScoped).await;
    }

    #[tokio::test]
    async fn test_login_role_mismatch_keeps_session() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in_with_password()
            .returning(|_, _| Ok(account("u5")));

        let mut profiles = MockProfileStore::new();
        profiles
            .expect_get()
            .returning(|_| Ok(Some(UserProfile::for_registration("u5@example.com", "Pat", Role::Employer))));

        let mut sessions = establishing_sessions();
        sessions.expect_end().never();

        let gw = gateway(identity, profiles, sessions);
        let signed_in = gw
            .login(LoginRequest {
                email: "u5@example.com".to_string(),
                password: "secret1".to_string(),
                remember: true,
            })
            .await
            .unwrap();

        let rejection = signed_in.require_role(Role::Employee).unwrap_err();
        assert_eq!(rejection, LoginRejection::RoleMismatch { registered: Role::Employer });
        assert!(rejection.to_string().contains("registered as a employer"));
        assert!(signed_in.require_role(Role::Employer).is_ok());
    }

    #[tokio::test]
    async fn test_login_bad_credentials() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in_with_password()
            .returning(|_, _| Err(GatewayError::auth(AuthErrorCode::InvalidCredential)));

        let mut profiles = MockProfileStore::new();
        profiles.expect_get().never();

        let mut sessions = MockSessionStore::new();
        sessions.expect_set_persistence().returning(|_, _| Ok(()));
        sessions.expect_establish().never();

        let gw = gateway(identity, profiles, sessions);
        let err = gw
            .login(LoginRequest {
                email: "x@example.com".to_string(),
                password: "wrong".to_string(),
                remember: false,
            })
            .await
            .unwrap_err();

        assert_eq!(
            messages::user_message(&err, AuthOperation::Login),
            messages::INVALID_CREDENTIALS
        );
    }

    #[test]
    fn test_missing_profile_rejection() {
        let now = Utc::now();
        let signed_in = SignedIn {
            session: ActiveSession {
                session_id: SessionId::generate(),
                uid: AccountId::new("u6"),
                email: None,
                display_name: None,
                persistence: Persistence::Durable,
                established_at: now,
                expires_at: now,
            },
            profile: None,
        };
        let rejection = signed_in.require_role(Role::Employee).unwrap_err();
        assert_eq!(rejection.to_string(), "Login failed. Please try again.");
    }

    fn social_request(role: Role) -> SocialSignInRequest {
        SocialSignInRequest {
            provider: SocialProvider::Google,
            role,
            remember: true,
            credential: SocialCredential {
                id_token: Some("google-token".to_string()),
                access_token: None,
                request_uri: None,
            },
        }
    }

    #[tokio::test]
    async fn test_first_social_sign_in_creates_profile() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_sign_in_with_idp().returning(|_, _| {
            Ok(Account {
                display_name: None,
                ..account("u7")
            })
        });

        let created = UserProfile::for_social_sign_up(
            Some("u7@example.com".into()),
            None,
            Role::Employer,
            "google.com",
        );
        let stored = created.clone();

        let mut seq = Sequence::new();
        let mut profiles = MockProfileStore::new();
        profiles
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        profiles
            .expect_create()
            .withf(|_, p| {
                p.user_type == Role::Employer
                    && p.display_name == "employer User"
                    && p.auth_provider.as_deref() == Some("google.com")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        profiles
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(stored.clone())));
        profiles.expect_merge_last_login().never();

        let gw = gateway(identity, profiles, establishing_sessions());
        let signed_in = gw.social_sign_in(social_request(Role::Employer)).await.unwrap();

        assert_eq!(signed_in.profile, Some(created));
    }

    #[tokio::test]
    async fn test_repeat_social_sign_in_keeps_role() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in_with_idp()
            .returning(|_, _| Ok(account("u8")));

        let existing = UserProfile::for_social_sign_up(
            Some("u8@example.com".into()),
            Some("Pat".into()),
            Role::Employer,
            "google.com",
        );
        let mut after_merge = existing.clone();
        after_merge.last_login = Some(Utc::now());
        let reread = after_merge.clone();

        let mut seq = Sequence::new();
        let mut profiles = MockProfileStore::new();
        profiles
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(existing.clone())));
        profiles
            .expect_merge_last_login()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        profiles
            .expect_get()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_| Ok(Some(reread.clone())));
        profiles.expect_create().never();

        let gw = gateway(identity, profiles, establishing_sessions());
        let signed_in = gw.social_sign_in(social_request(Role::Employee)).await.unwrap();

        let profile = signed_in.profile.unwrap();
        assert_eq!(profile.user_type, Role::Employer);
        assert!(profile.last_login.is_some());
    }

    #[tokio::test]
    async fn test_social_profile_write_failure_ends_session() {
        let mut identity = MockIdentityProvider::new();
        identity
            .expect_sign_in_with_idp()
            .returning(|_, _| Ok(account("u11")));

        let mut profiles = MockProfileStore::new();
        profiles.expect_get().times(1).returning(|_| Ok(None));
        profiles
            .expect_create()
            .returning(|_, _| Err(GatewayError::profile_store("PERMISSION_DENIED")));

        let mut sessions = establishing_sessions();
        sessions.expect_end().times(1).returning(|_| Ok(()));

        let gw = gateway(identity, profiles, sessions);
        let err = gw.social_sign_in(social_request(Role::Employer)).await.unwrap_err();
        assert_eq!(
            messages::user_message(&err, AuthOperation::Social(SocialProvider::Google)),
            "Failed to login with google. Please try again."
        );
    }

    #[tokio::test]
    async fn test_social_without_credential_is_popup_closed() {
        let mut identity = MockIdentityProvider::new();
        identity.expect_sign_in_with_idp().never();

        let mut sessions = MockSessionStore::new();
        sessions.expect_set_persistence().times(1).returning(|_, _| Ok(()));

        let gw = gateway(identity, MockProfileStore::new(), sessions);
        let mut req = social_request(Role::Employee);
        req.credential = SocialCredential::default();

        let err = gw.social_sign_in(req).await.unwrap_err();
        assert_eq!(err.auth_code(), Some(&AuthErrorCode::PopupClosedByUser));
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let id = SessionId::generate();
        let expected = id.clone();

        let mut sessions = MockSessionStore::new();
        sessions
            .expect_end()
            .withf(move |s| *s == expected)
            .times(1)
            .returning(|_| Ok(()));

        let gw = gateway(MockIdentityProvider::new(), MockProfileStore::new(), sessions);
        gw.logout(&id).await.unwrap();
    }
}
