//! Разбор claims access-токена без проверки подписи.
//!
//! У клиента нет секрета, поэтому подпись не проверяется: значения
//! используются только как подсказка для UI и маршрутизации, реальную
//! авторизацию выполняет бэкенд на каждом защищённом запросе.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use portal_api::Claims;

use crate::error::{PortalError, PortalResult};

/// Декодирует payload JWT-токена в [`Claims`]. Чистая функция, без I/O.
pub fn decode_claims(token: &str) -> PortalResult<Claims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(PortalError::MalformedToken);
    };

    let raw = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| PortalError::MalformedToken)?;
    serde_json::from_slice(&raw).map_err(|_| PortalError::MalformedToken)
}

/// Истёк ли токен: `exp * 1000 < now`. Неразбираемый токен считается
/// истёкшим.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_expired_at(Utc::now().timestamp_millis()),
        Err(_) => true,
    }
}

#[cfg(test)]
pub(crate) mod test_tokens {
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use portal_api::{Claims, Role};

    /// Собирает JWT-подобный токен с фиктивной подписью: для клиентского
    /// декодера важен только payload.
    pub(crate) fn token_with(claims: &Claims) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).expect("serialize claims"));
        format!("{header}.{payload}.signature")
    }

    pub(crate) fn claims(role: Role, verified: bool, exp: i64) -> Claims {
        Claims {
            sub: "42".to_string(),
            email: "user@example.com".to_string(),
            role,
            verified,
            iat: 0,
            exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_tokens::{claims, token_with};
    use super::*;
    use portal_api::Role;

    #[test]
    fn decode_returns_typed_claims() {
        let token = token_with(&claims(Role::Reporter, true, 4_000_000_000));
        let decoded = decode_claims(&token).expect("decode claims");

        assert_eq!(decoded.sub, "42");
        assert_eq!(decoded.role, Role::Reporter);
        assert!(decoded.verified);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_claims("not-a-token").is_err());
        assert!(decode_claims("a.b").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }

    #[test]
    fn past_exp_means_expired() {
        let token = token_with(&claims(Role::Reader, true, 1_000));
        assert!(is_expired(&token));
    }

    #[test]
    fn future_exp_means_not_expired() {
        let token = token_with(&claims(Role::Reader, true, 4_000_000_000));
        assert!(!is_expired(&token));
    }

    #[test]
    fn malformed_token_counts_as_expired() {
        assert!(is_expired("definitely.not.a-jwt"));
    }
}
