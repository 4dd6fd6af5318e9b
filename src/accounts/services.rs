use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::{
    dto::{AuthResponse, LoginRequest, PublicAccount, RefreshRequest, RegisterRequest},
    jwt::JwtKeys,
    password::{check_strength, hash_password, verify_password},
    repo::AccountRepo,
    repo_types::{Account, NewAccount},
};
use crate::error::{AppError, Resource};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn issue_tokens(keys: &JwtKeys, account: Account) -> Result<AuthResponse, AppError> {
    let access_token = keys.sign_access(&account.email)?;
    let refresh_token = keys.sign_refresh(&account.email)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user: account.into(),
    })
}

pub async fn register(
    accounts: &dyn AccountRepo,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    check_strength(&req.password)?;

    let hash = hash_password(&req.password)?;
    let account = accounts
        .create(NewAccount {
            email: &email,
            name,
            password_hash: &hash,
            role: req.role,
        })
        .await?
        .ok_or_else(|| {
            warn!(%email, "email already registered");
            AppError::Conflict("Email already registered".into())
        })?;

    info!(account_id = account.id, email = %account.email, role = ?account.role, "account registered");
    issue_tokens(keys, account)
}

pub async fn login(
    accounts: &dyn AccountRepo,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);
    let Some(account) = accounts.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&req.password, &account.password_hash)? {
        warn!(%email, account_id = account.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    info!(account_id = account.id, %email, "account logged in");
    issue_tokens(keys, account)
}

pub async fn refresh(
    accounts: &dyn AccountRepo,
    keys: &JwtKeys,
    req: RefreshRequest,
) -> Result<AuthResponse, AppError> {
    let claims = keys
        .verify_refresh(&req.refresh_token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;
    let account = accounts
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account not found".into()))?;
    issue_tokens(keys, account)
}

pub async fn me(accounts: &dyn AccountRepo, email: &str) -> Result<PublicAccount, AppError> {
    accounts
        .find_by_email(email)
        .await?
        .map(PublicAccount::from)
        .ok_or(AppError::NotFound(Resource::Account))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{accounts::repo_types::Role, testing::Fake};
    use axum::extract::FromRef;

    fn register_req(email: &str, password: &str, role: Role) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a x@y.com"));
        assert_eq!(normalize_email("  A@X.Com "), "a@x.com");
    }

    #[tokio::test]
    async fn register_then_login() {
        let fake = Fake::new();
        let keys = JwtKeys::from_ref(&fake.state);

        let reg = register(
            fake.store.as_ref(),
            &keys,
            register_req(" Boss@Corp.com ", "hunter2hunter2", Role::Employer),
        )
        .await
        .unwrap();
        assert_eq!(reg.user.email, "boss@corp.com");
        assert_eq!(reg.user.role, Role::Employer);
        assert_eq!(keys.verify(&reg.access_token).unwrap().sub, "boss@corp.com");

        let logged = login(
            fake.store.as_ref(),
            &keys,
            LoginRequest {
                email: "boss@corp.com".into(),
                password: "hunter2hunter2".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(logged.user.id, reg.user.id);
    }

    #[tokio::test]
    async fn register_rejects_taken_email_and_bad_input() {
        let fake = Fake::new();
        let keys = JwtKeys::from_ref(&fake.state);
        let store = fake.store.as_ref();

        register(store, &keys, register_req("a@x.com", "password1", Role::Applicant))
            .await
            .unwrap();

        let dup = register(store, &keys, register_req("A@X.COM", "password1", Role::Applicant)).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));

        let bad_email = register(store, &keys, register_req("nope", "password1", Role::Applicant)).await;
        assert!(matches!(bad_email, Err(AppError::Validation(_))));

        let short = register(store, &keys, register_req("b@x.com", "short", Role::Applicant)).await;
        assert!(matches!(short, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn login_failures_look_the_same() {
        let fake = Fake::new();
        let keys = JwtKeys::from_ref(&fake.state);
        let store = fake.store.as_ref();
        register(store, &keys, register_req("a@x.com", "password1", Role::Applicant))
            .await
            .unwrap();

        let wrong = login(
            store,
            &keys,
            LoginRequest { email: "a@x.com".into(), password: "password2".into() },
        )
        .await
        .unwrap_err();
        let unknown = login(
            store,
            &keys,
            LoginRequest { email: "ghost@x.com".into(), password: "password1".into() },
        )
        .await
        .unwrap_err();
        assert_eq!(wrong.to_string(), unknown.to_string());
        assert!(matches!(wrong, AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_issues_new_pair_only_for_refresh_tokens() {
        let fake = Fake::new();
        let keys = JwtKeys::from_ref(&fake.state);
        let store = fake.store.as_ref();
        let reg = register(store, &keys, register_req("a@x.com", "password1", Role::Applicant))
            .await
            .unwrap();

        let renewed = refresh(store, &keys, RefreshRequest { refresh_token: reg.refresh_token })
            .await
            .unwrap();
        assert_eq!(renewed.user.email, "a@x.com");

        let err = refresh(store, &keys, RefreshRequest { refresh_token: reg.access_token })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
