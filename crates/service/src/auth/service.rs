use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::domain::{Caller, Credential, LoginInput, LoginOutcome};
use super::guard::CredentialResolver;
use crate::errors::ServiceError;
use crate::users::repository::UserRepository;

/// Auth business service independent of web framework
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Check a username/national id pair and hand back the bearer token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use models::user::Role;
    /// use service::auth::{domain::LoginInput, AuthService};
    /// use service::users::{domain::NewUser, repository::mock::MockUserRepository, UserService};
    ///
    /// let repo = Arc::new(MockUserRepository::default());
    /// let users = UserService::new(repo.clone());
    /// let new = NewUser { full_name: "Ana Diaz".into(), username: "ana".into(), national_id: "12345678".into(), role: Role::Hr };
    /// tokio_test::block_on(users.create(new)).unwrap();
    ///
    /// let auth = AuthService::new(repo);
    /// let ok = tokio_test::block_on(auth.login(LoginInput { username: "ana".into(), national_id: "12345678".into() })).unwrap();
    /// assert!(ok.success);
    /// assert_eq!(ok.token.as_deref(), Some("ana:12345678"));
    /// let bad = tokio_test::block_on(auth.login(LoginInput { username: "ana".into(), national_id: "00000000".into() })).unwrap();
    /// assert!(!bad.success);
    /// ```
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome, ServiceError> {
        let Some(user) = self.repo.find_by_credentials(&input.username, &input.national_id).await? else {
            debug!("login rejected");
            return Ok(LoginOutcome {
                success: false,
                message: "invalid username or national id".into(),
                user: None,
                token: None,
            });
        };
        let token = Credential::new(user.username.clone(), user.national_id.clone()).token();
        info!(user_id = %user.id, role = %user.role, "user_logged_in");
        Ok(LoginOutcome {
            success: true,
            message: format!("Welcome {}", user.full_name),
            user: Some(user),
            token: Some(token),
        })
    }
}

#[async_trait]
impl<R: UserRepository + ?Sized> CredentialResolver for AuthService<R> {
    async fn resolve(&self, token: &str) -> Result<Caller, ServiceError> {
        let cred = Credential::parse(token)?;
        self.repo
            .find_by_credentials(&cred.username, &cred.national_id)
            .await?
            .map(Caller::from)
            .ok_or_else(|| ServiceError::Unauthenticated("unknown credential".into()))
    }
}
