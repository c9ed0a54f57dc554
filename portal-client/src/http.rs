use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use portal_api::{ApiResponse, TokenPair};

use crate::error::{PortalError, PortalResult};
use crate::session;
use crate::store::TokenStore;

/// Нужен ли запросу bearer-токен.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Публичный endpoint.
    None,
    /// Защищённый endpoint: токен прикрепляется, при 401 выполняется
    /// ровно один тихий refresh с повтором запроса.
    Bearer,
}

#[derive(Debug, Clone)]
/// HTTP-клиент портала.
///
/// Оборачивает каждый исходящий запрос: прикрепляет bearer-токен,
/// прозрачно обновляет истёкший токен перед отправкой и один раз
/// повторяет запрос после refresh при ответе 401.
pub struct PortalClient {
    base_url: String,
    http: Client,
    tokens: TokenStore,
}

impl PortalClient {
    /// Создаёт клиент с пустым хранилищем токенов.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_store(base_url, TokenStore::new())
    }

    /// Создаёт клиент поверх готового хранилища токенов
    /// (одно хранилище может разделяться несколькими клиентами).
    pub fn with_store(base_url: impl Into<String>, tokens: TokenStore) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            http,
            tokens,
        }
    }

    /// Хранилище токенов клиента.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Обновляет пару токенов по refresh-токену и сохраняет её целиком.
    pub async fn refresh(&self) -> PortalResult<TokenPair> {
        let Some(pair) = self.tokens.load() else {
            return Err(PortalError::Unauthorized);
        };

        let url = self.endpoint("/auth/refresh-token");
        let response = self
            .http
            .request(Method::POST, url)
            .bearer_auth(&pair.refresh_token)
            .send()
            .await?;

        let fresh: TokenPair = Self::decode_data(response).await?;
        self.tokens.save(fresh.clone());
        debug!("session tokens refreshed");
        Ok(fresh)
    }

    /// Access-токен для исходящего запроса: истёкший токен обновляется
    /// заранее; если refresh не удался, запрос уходит без токена и,
    /// скорее всего, завершится 401 ниже по конвейеру.
    async fn fresh_access_token(&self) -> Option<String> {
        let pair = self.tokens.load()?;
        if !session::is_expired(&pair.access_token) {
            return Some(pair.access_token);
        }

        match self.refresh().await {
            Ok(fresh) => Some(fresh.access_token),
            Err(err) => {
                debug!("token refresh before send failed: {err}");
                None
            }
        }
    }

    async fn dispatch<TReq: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
        token: Option<&str>,
    ) -> PortalResult<reqwest::Response> {
        let mut request = self.http.request(method, self.endpoint(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Конвейер запроса. Единственный повтор — один тихий
    /// refresh-and-retry при 401 на защищённом запросе; если и refresh
    /// не удался, ошибка уходит вызывающему.
    async fn send_with_retry<TReq>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
        auth: Auth,
    ) -> PortalResult<reqwest::Response>
    where
        TReq: Serialize + ?Sized,
    {
        let token = match auth {
            Auth::Bearer => self.fresh_access_token().await,
            Auth::None => None,
        };

        let response = self
            .dispatch(method.clone(), path, body, token.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED || auth != Auth::Bearer {
            return Ok(response);
        }

        let fresh = self.refresh().await?;
        debug!("replaying request to {path} after 401");
        self.dispatch(method, path, body, Some(&fresh.access_token))
            .await
    }

    /// Выполняет запрос и декодирует `data` из конверта ответа.
    pub(crate) async fn execute<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
        auth: Auth,
    ) -> PortalResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        let response = self.send_with_retry(method, path, body, auth).await?;
        Self::decode_data(response).await
    }

    /// То же, что [`Self::execute`], но для ответов без полезной нагрузки
    /// (подтверждения удаления и т.п.).
    pub(crate) async fn execute_ack<TReq>(
        &self,
        method: Method,
        path: &str,
        body: Option<&TReq>,
        auth: Auth,
    ) -> PortalResult<()>
    where
        TReq: Serialize + ?Sized,
    {
        let response = self.send_with_retry(method, path, body, auth).await?;
        Self::decode_ack(response).await
    }

    async fn decode_error(response: reqwest::Response) -> PortalError {
        let status = response.status();
        let message = match response.json::<ApiResponse<serde_json::Value>>().await {
            Ok(body) if !body.message.is_empty() => Some(body.message),
            _ => None,
        };
        PortalError::from_http_status(status, message)
    }

    async fn decode_data<TRes: DeserializeOwned>(
        response: reqwest::Response,
    ) -> PortalResult<TRes> {
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let envelope = response.json::<ApiResponse<TRes>>().await?;
        if !envelope.success {
            return Err(PortalError::InvalidRequest(envelope.message));
        }
        envelope.data.ok_or(PortalError::EmptyPayload)
    }

    async fn decode_ack(response: reqwest::Response) -> PortalResult<()> {
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        let envelope = response.json::<ApiResponse<serde_json::Value>>().await?;
        if !envelope.success {
            return Err(PortalError::InvalidRequest(envelope.message));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_normalizes_slashes() {
        let client = PortalClient::new("http://localhost:8080/");
        assert_eq!(
            client.endpoint("/protected/articles"),
            "http://localhost:8080/protected/articles"
        );
    }

    #[test]
    fn refresh_without_session_is_unauthorized() {
        let client = PortalClient::new("http://localhost:8080");
        let result = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("build runtime")
            .block_on(client.refresh());
        assert!(matches!(result, Err(PortalError::Unauthorized)));
    }
}
