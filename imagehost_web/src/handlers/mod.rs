pub mod images;
pub mod users;

use axum::http::{header, HeaderMap};

use imagehost_core::entity::user;
use imagehost_core::session::SessionId;

use crate::AppState;

pub(crate) const SESSION_COOKIE: &str = "session_id";

/// Extract the session id from the Cookie header, if any.
pub(crate) fn session_id_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE).then(|| SessionId::from(value.to_string()))
    })
}

pub(crate) fn session_cookie(id: &SessionId) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly")
}

pub(crate) fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// Resolve the logged-in user for this request, if the cookie names a live
/// session holding one.
pub(crate) async fn logged_user(state: &AppState, headers: &HeaderMap) -> Option<user::Model> {
    let id = session_id_from_headers(headers)?;
    state.sessions.logged_user(&id).await
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use imagehost_core::service::images::ImagesService;
    use imagehost_core::service::users::UsersService;
    use imagehost_core::session::SessionStore;
    use imagehost_core::test_utils::setup_test_db;

    use crate::AppState;

    pub async fn test_state() -> AppState {
        let db = setup_test_db().await;
        AppState {
            users: UsersService::new(db.clone()),
            images: ImagesService::new(db),
            sessions: SessionStore::new(),
        }
    }

    pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// POST an urlencoded form, optionally with a session cookie. Returns
    /// status, Location header, Set-Cookie header and parsed JSON body.
    pub async fn post_form(
        app: Router,
        uri: &str,
        body: &str,
        cookie: Option<&str>,
    ) -> (
        StatusCode,
        Option<String>,
        Option<String>,
        serde_json::Value,
    ) {
        let mut req = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        let res = app
            .oneshot(req.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();

        let status = res.status();
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, location, set_cookie, json)
    }

    /// The `session_id=...` pair out of a Set-Cookie header.
    pub fn cookie_pair(set_cookie: &str) -> String {
        set_cookie
            .split(';')
            .next()
            .expect("Set-Cookie has a name=value pair")
            .to_string()
    }
}
