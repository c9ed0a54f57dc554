use reqwest::Method;
use serde::{Deserialize, Serialize};

use portal_api::{CredentialsInput, PasswordResetInput, SignUpInput, TokenPair, User};

use crate::error::PortalResult;
use crate::http::{Auth, PortalClient};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Данные успешной аутентификации: пользователь и пара токенов.
pub struct AuthData {
    /// Аутентифицированный пользователь.
    pub user: User,
    /// Новая пара токенов сессии.
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailRequest<'a> {
    email: &'a str,
}

impl PortalClient {
    /// Вход по email и паролю. Сохраняет полученную пару токенов.
    pub async fn sign_in(&self, input: &CredentialsInput) -> PortalResult<User> {
        let data: AuthData = self
            .execute(Method::POST, "/auth/signin", Some(input), Auth::None)
            .await?;
        self.tokens().save(data.tokens);
        Ok(data.user)
    }

    /// Регистрация. Сессия не создаётся, пока email не подтверждён.
    pub async fn sign_up(&self, input: &SignUpInput) -> PortalResult<User> {
        self.execute(Method::POST, "/auth/signup", Some(input), Auth::None)
            .await
    }

    /// Подтверждение email по токену из письма. Сохраняет пару токенов.
    pub async fn verify(&self, token: &str) -> PortalResult<User> {
        let data: AuthData = self
            .execute(
                Method::POST,
                "/auth/verify",
                Some(&VerifyRequest { token }),
                Auth::None,
            )
            .await?;
        self.tokens().save(data.tokens);
        Ok(data.user)
    }

    /// Повторная отправка письма с подтверждением.
    pub async fn resend_verification(&self, email: &str) -> PortalResult<()> {
        self.execute_ack(
            Method::POST,
            "/auth/resend-verification",
            Some(&EmailRequest { email }),
            Auth::None,
        )
        .await
    }

    /// Запрос письма для сброса пароля.
    pub async fn forgot_password(&self, email: &str) -> PortalResult<()> {
        self.execute_ack(
            Method::POST,
            "/auth/forgot-password",
            Some(&EmailRequest { email }),
            Auth::None,
        )
        .await
    }

    /// Сброс пароля по токену из письма.
    pub async fn reset_password(&self, input: &PasswordResetInput) -> PortalResult<()> {
        self.execute_ack(Method::POST, "/auth/reset-password", Some(input), Auth::None)
            .await
    }

    /// Выход. Локальная сессия очищается даже если запрос не удался.
    pub async fn sign_out(&self) -> PortalResult<()> {
        let result = self
            .execute_ack(Method::DELETE, "/auth/signout", None::<&()>, Auth::Bearer)
            .await;
        self.tokens().clear();
        result
    }
}
