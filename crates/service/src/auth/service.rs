use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::domain::{AuthSession, AuthUser, Identity, LoginInput, NewUser, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration. The token secret is handed in from the loaded
/// configuration at construction; nothing reads it from process globals.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

/// Session token claims. `adm` is set only by the admin login path; standard
/// sessions re-derive the admin capability from the user record instead.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    uid: String,
    adm: bool,
    iat: usize,
    exp: usize,
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new member account and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let input = RegisterInput { email: "user@example.com".into(), name: "Test".into(), password: "Secret123".into(), business_name: None, phone: None, address: None };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(session.user.email, "user@example.com");
    /// assert!(!session.user.is_admin);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        let user = self.create_account(input, false).await?;
        let token = self.issue_token(&user, false)?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(AuthSession { user, token })
    }

    /// Register an administrator account. Only reachable through the
    /// debug-gated bootstrap route; no session token is issued.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_admin(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let user = self.create_account(input, true).await?;
        info!(user_id = %user.id, email = %user.email, "admin_created");
        Ok(user)
    }

    async fn create_account(&self, input: RegisterInput, is_admin: bool) -> Result<AuthUser, AuthError> {
        if !input.email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        if input.name.trim().is_empty() {
            return Err(AuthError::Validation("name required".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(NewUser {
            email: input.email,
            name: input.name,
            is_admin,
            business_name: input.business_name,
            phone: input.phone,
            address: input.address,
        }).await?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hash(e.to_string()))?
            .to_string();
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        Ok(user)
    }

    /// Authenticate a member or administrator through the standard entry
    /// point and issue a session token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig { jwt_secret: "secret".into(), token_ttl_hours: 24, password_algorithm: "argon2".into() });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), name: "N".into(), password: "Passw0rd".into(), business_name: None, phone: None, address: None }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !self.password_matches(&user, &input.password).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user, false)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Administrator login. A non-admin account and a wrong password both
    /// answer the identical `invalid credentials` failure so callers cannot
    /// probe which accounts are privileged; the log lines stay distinct.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn admin_login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = match self.repo.find_user_by_email(&input.email).await? {
            Some(u) if u.is_admin => u,
            Some(_) => {
                warn!("admin_login_rejected: account is not an administrator");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                warn!("admin_login_rejected: unknown account");
                return Err(AuthError::InvalidCredentials);
            }
        };
        if !self.password_matches(&user, &input.password).await? {
            warn!(user_id = %user.id, "admin_login_rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issue_token(&user, true)?;
        info!(user_id = %user.id, "admin_logged_in");
        Ok(AuthSession { user, token })
    }

    /// Resolve the acting identity from a session token.
    ///
    /// Admin-login tokens carry the admin capability themselves; standard
    /// tokens carry only the user id and the capability is re-derived by a
    /// user lookup, so it never outlives the token on a deleted account.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let key = DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &key, &validation).map_err(|e| {
            debug!(err = %e, "token_rejected");
            AuthError::Unauthenticated
        })?;
        let uid = Uuid::parse_str(&data.claims.uid).map_err(|_| AuthError::Unauthenticated)?;

        if data.claims.adm {
            return Ok(Identity::Admin { id: uid });
        }
        match self.repo.find_user_by_id(uid).await? {
            Some(u) if u.is_admin => Ok(Identity::Admin { id: u.id }),
            Some(u) => Ok(Identity::Member { id: u.id }),
            None => Err(AuthError::Unauthenticated),
        }
    }

    /// All accounts, for the debug-gated maintenance route.
    pub async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        self.repo.list_users().await
    }

    /// Wipe all accounts, for the debug-gated maintenance route.
    pub async fn delete_all_users(&self) -> Result<u64, AuthError> {
        let n = self.repo.delete_all_users().await?;
        info!(deleted = n, "all_users_deleted");
        Ok(n)
    }

    async fn password_matches(&self, user: &AuthUser, password: &str) -> Result<bool, AuthError> {
        let cred = match self.repo.get_credentials(user.id).await? {
            Some(c) => c,
            None => return Ok(false),
        };
        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }

    fn issue_token(&self, user: &AuthUser, admin_session: bool) -> Result<String, AuthError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.cfg.token_ttl_hours);
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id.to_string(),
            adm: admin_session,
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::Token(e.to_string()))
    }
}
