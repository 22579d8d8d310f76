// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository, user_repo::NewUser},
    models::{
        auth::{
            AuthResponse, Claims, LoginUserPayload, RegisterCompanyPayload, RegistrationResponse, Role,
            UpdatePasswordPayload, User,
        },
        company::SubscriptionStatus,
    },
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    company_repo: CompanyRepository,
    jwt_secret: String,
    token_ttl_days: i64,
    pool: PgPool,
}

/// Hash bcrypt fora do runtime assíncrono.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

pub fn issue_token(secret: &str, ttl_days: i64, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(ttl_days);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        company_id: user.company_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_ref()))?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_ref()), &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        company_repo: CompanyRepository,
        jwt_secret: String,
        token_ttl_days: i64,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, company_repo, jwt_secret, token_ttl_days, pool }
    }

    /// Cria a empresa (pendente) e o dono (inativo até a aprovação).
    pub async fn register_company(&self, payload: &RegisterCompanyPayload) -> Result<RegistrationResponse, AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let mut tx = self.pool.begin().await?;

        let company = self
            .company_repo
            .create(
                &mut *tx,
                &payload.company_name,
                &payload.email,
                payload.phone.as_deref(),
                payload.plan.as_deref().unwrap_or("starter"),
                SubscriptionStatus::Pending,
            )
            .await?;

        let user = self
            .user_repo
            .create_user(
                &mut *tx,
                NewUser {
                    company_id: company.id,
                    full_name: &payload.full_name,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    role: Role::CompanyOwner,
                    phone: payload.phone.as_deref(),
                    hourly_rate: None,
                    is_active: false,
                },
            )
            .await?;

        tx.commit().await?;
        tracing::info!(company_id = %company.id, "nova empresa cadastrada, aguardando aprovação");

        Ok(RegistrationResponse {
            message: "Company and Owner registered successfully".to_string(),
            user,
        })
    }

    pub async fn login(&self, payload: &LoginUserPayload) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&payload.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::Unauthorized("User account is inactive. Contact admin.".into()));
        }

        if user.role != Role::SuperAdmin {
            let company = self.company_repo.find_by_id(user.company_id).await?;
            if company.is_some_and(|c| c.plan_expired(Utc::now())) {
                return Err(AppError::Unauthorized(
                    "Company subscription plan has expired. Please contact support to renew.".into(),
                ));
            }
        }

        let token = issue_token(&self.jwt_secret, self.token_ttl_days, &user)?;
        Ok(AuthResponse { token, user })
    }

    /// Valida o token e recarrega o usuário do banco.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !user.is_active {
            return Err(AppError::Unauthorized("User account is inactive. Contact admin.".into()));
        }
        Ok(user)
    }

    pub async fn update_password(&self, user_id: Uuid, payload: &UpdatePasswordPayload) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if !verify_password(&payload.current_password, &user.password_hash).await? {
            return Err(AppError::Unauthorized("Invalid current password".into()));
        }

        let hashed = hash_password(&payload.new_password).await?;
        self.user_repo.update_password(user.id, &hashed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            full_name: "Ana Lima".into(),
            email: "ana@obra.com".into(),
            password_hash: String::new(),
            role: Role::Foreman,
            phone: None,
            hourly_rate: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn token_round_trip_keeps_identity() {
        let user = user();
        let token = issue_token("segredo", 7, &user).unwrap();
        let claims = decode_token("segredo", &token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.role, Role::Foreman);
        assert_eq!(claims.company_id, user.company_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("segredo", 7, &user()).unwrap();
        assert!(matches!(decode_token("outro", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token("segredo", -1, &user()).unwrap();
        assert!(matches!(decode_token("segredo", &token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("s3nh@forte").await.unwrap();
        assert!(verify_password("s3nh@forte", &hashed).await.unwrap());
        assert!(!verify_password("errada", &hashed).await.unwrap());
    }
}
