// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, CurrentUser, Role},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        // 1. Hashing fora da transação (não toca no banco)
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // 2. Usuário + papel inicial na mesma transação: se a atribuição do
        // papel falhar, o usuário criado acima é desfeito.
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, name, email, &hashed_password)
            .await?;

        self.user_repo
            .grant_role(&mut *tx, new_user.id, Role::Vendor)
            .await?;

        tx.commit().await?;

        tracing::info!("Novo usuário registrado: {}", new_user.id);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    // Decodifica o token e carrega identidade + papéis. É este par validado
    // (user_id, roles) que o restante do sistema confia.
    pub async fn validate_token(&self, token: &str) -> Result<CurrentUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let roles = self.user_repo.get_roles(user.id).await?;

        Ok(CurrentUser {
            id: user.id,
            name: user.name,
            email: user.email,
            roles,
        })
    }

    // Somente admin concede papéis (ex: promover um usuário a manager).
    pub async fn grant_role(
        &self,
        actor: &CurrentUser,
        user_id: Uuid,
        role: Role,
    ) -> Result<(), AppError> {
        if !actor.has_role(Role::Admin) {
            return Err(AppError::Forbidden(
                "Somente administradores podem conceder papéis.".into(),
            ));
        }

        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        self.user_repo.grant_role(&self.pool, user_id, role).await?;
        tracing::info!("Papel {:?} concedido ao usuário {}", role, user_id);
        Ok(())
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
