//! Маршрутный гард: решение «пустить или перенаправить» по пути,
//! токену сессии и наличию верификационного токена в запросе.
//!
//! Чистая функция без I/O. Claims токена читаются без проверки
//! подписи — это подсказка для навигации, а не авторизация: бэкенд
//! всё равно проверяет каждый защищённый запрос.

use portal_api::Role;
use portal_client::session;

/// Страница входа.
pub const SIGN_IN_PATH: &str = "/auth/sign-in";
/// Страница подтверждения email.
pub const VERIFY_PATH: &str = "/auth/verify";
/// Редактирование профиля — единственный `/auth/*`-путь, доступный
/// вошедшему читателю.
pub const UPDATE_PROFILE_PATH: &str = "/auth/update-profile";
/// Корень дашборда администратора.
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
/// Корень дашборда репортёра.
pub const REPORTER_DASHBOARD_PATH: &str = "/reporter/dashboard";
/// Раздел статей.
pub const ARTICLES_PATH: &str = "/articles";
/// Главная страница.
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Решение гарда по навигации.
pub enum RouteDecision {
    /// Переход разрешён.
    Allow,
    /// Переход перенаправляется на указанный путь.
    Redirect(String),
}

impl RouteDecision {
    fn redirect(target: &str) -> Self {
        Self::Redirect(target.to_string())
    }
}

/// Лежит ли `path` в поддереве `root` (сам корень включительно).
fn under(path: &str, root: &str) -> bool {
    path == root || path.strip_prefix(root).is_some_and(|rest| rest.starts_with('/'))
}

fn is_dashboard(path: &str) -> bool {
    under(path, ADMIN_DASHBOARD_PATH) || under(path, REPORTER_DASHBOARD_PATH)
}

/// Решает судьбу перехода на `path`.
///
/// `token` — access-токен текущей сессии, если она есть;
/// `has_verify_token` — пришёл ли пользователь по ссылке подтверждения
/// (верификационный токен в query-параметрах).
///
/// Порядок проверок фиксирован: страница подтверждения, отсутствие
/// сессии, неразбираемый токен, неподтверждённый email, роль.
pub fn evaluate(path: &str, token: Option<&str>, has_verify_token: bool) -> RouteDecision {
    // Страница подтверждения живёт по своим правилам: на неё пускают
    // либо по ссылке из письма, либо с живой сессией.
    if under(path, VERIFY_PATH) {
        return if has_verify_token || token.is_some() {
            RouteDecision::Allow
        } else {
            RouteDecision::redirect(SIGN_IN_PATH)
        };
    }

    let Some(token) = token else {
        if is_dashboard(path) {
            return RouteDecision::redirect(SIGN_IN_PATH);
        }
        return RouteDecision::Allow;
    };

    let Ok(claims) = session::decode_claims(token) else {
        // Битый токен: отправляем на вход, но саму страницу входа
        // не запираем, иначе редирект зациклится.
        if under(path, SIGN_IN_PATH) {
            return RouteDecision::Allow;
        }
        return RouteDecision::redirect(SIGN_IN_PATH);
    };

    if !claims.verified && under(path, ARTICLES_PATH) {
        return RouteDecision::redirect(VERIFY_PATH);
    }

    match claims.role {
        Role::Admin if !under(path, ADMIN_DASHBOARD_PATH) => {
            RouteDecision::redirect(ADMIN_DASHBOARD_PATH)
        }
        Role::Reporter if !under(path, REPORTER_DASHBOARD_PATH) => {
            RouteDecision::redirect(REPORTER_DASHBOARD_PATH)
        }
        Role::Reader
            if is_dashboard(path)
                || (under(path, "/auth") && !under(path, UPDATE_PROFILE_PATH)) =>
        {
            RouteDecision::redirect(HOME_PATH)
        }
        _ => RouteDecision::Allow,
    }
}
