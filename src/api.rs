//! The users API: five handlers over an injected [`UserStore`].
//!
//! | Method   | Path          | Success                   |
//! |----------|---------------|---------------------------|
//! | `GET`    | `/users`      | JSON array of users       |
//! | `GET`    | `/users/{id}` | JSON user                 |
//! | `POST`   | `/users`      | JSON user with its new id |
//! | `PUT`    | `/users/{id}` | JSON user as stored       |
//! | `DELETE` | `/users/{id}` | JSON string `"User deleted"` |
//!
//! Malformed bodies, non-integer ids and blank fields answer `400`. A
//! missing row answers `500`, the same as any other store failure. Error
//! bodies are the error text as a JSON string.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::{StoreError, UserStore};
use crate::user::UserInput;

/// Literal body returned by a successful delete.
pub const USER_DELETED: &str = "User deleted";

/// Everything a users handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Body(#[from] serde_json::Error),

    #[error("invalid user id `{0}`")]
    Id(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            Self::Body(_) | Self::Id(_) | Self::Store(StoreError::Validation(_)) => Status::BadRequest,
            Self::Store(StoreError::NotFound(_) | StoreError::Database(_)) => Status::InternalServerError,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == Status::InternalServerError {
            warn!(error = %self, "users request failed");
        }
        Response::builder().status(status).json(&self.to_string())
    }
}

/// What every users handler returns.
pub type ApiResult = Result<Response, ApiError>;

/// Registers the users routes under `prefix` (e.g. `/api/rust`).
pub fn routes(router: Router, prefix: &str, store: Arc<dyn UserStore>) -> Router {
    let prefix = prefix.trim_end_matches('/');
    let collection = format!("{prefix}/users");
    let member = format!("{prefix}/users/{{id}}");

    router
        .on(Method::Get, &collection, inject(Arc::clone(&store), list))
        .on(Method::Post, &collection, inject(Arc::clone(&store), create))
        .on(Method::Get, &member, inject(Arc::clone(&store), get))
        .on(Method::Put, &member, inject(Arc::clone(&store), update))
        .on(Method::Delete, &member, inject(Arc::clone(&store), delete))
}

/// Binds a store to a handler, giving the router a plain `Fn(Request)`.
fn inject<F, Fut>(
    store: Arc<dyn UserStore>,
    handler: F,
) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<dyn UserStore>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ApiResult> + Send + 'static,
{
    move |req| handler(Arc::clone(&store), req)
}

fn user_id(req: &Request) -> Result<i64, ApiError> {
    let raw = req.param("id").unwrap_or_default();
    raw.parse().map_err(|_| ApiError::Id(raw.to_owned()))
}

/// `GET /users`
pub async fn list(store: Arc<dyn UserStore>, _req: Request) -> ApiResult {
    let users = store.list_users().await?;
    Ok(Response::json(&users))
}

/// `GET /users/{id}`
pub async fn get(store: Arc<dyn UserStore>, req: Request) -> ApiResult {
    let id = user_id(&req)?;
    let user = store.get_user(id).await?;
    Ok(Response::json(&user))
}

/// `POST /users`
pub async fn create(store: Arc<dyn UserStore>, req: Request) -> ApiResult {
    let input: UserInput = req.json()?;
    let user = store.create_user(&input.name, &input.email).await?;
    info!(id = user.id, "user created");
    Ok(Response::json(&user))
}

/// `PUT /users/{id}`
pub async fn update(store: Arc<dyn UserStore>, req: Request) -> ApiResult {
    let id = user_id(&req)?;
    let input: UserInput = req.json()?;
    let user = store.update_user(id, &input.name, &input.email).await?;
    info!(id, "user updated");
    Ok(Response::json(&user))
}

/// `DELETE /users/{id}`
pub async fn delete(store: Arc<dyn UserStore>, req: Request) -> ApiResult {
    let id = user_id(&req)?;
    let user = store.delete_user(id).await?;
    info!(id, name = %user.name, email = %user.email, "user deleted");
    Ok(Response::json(USER_DELETED))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::ErasedHandler;
    use crate::store::SqlUserStore;
    use crate::store::tests::memory_store;

    const PREFIX: &str = "/api/rust";

    async fn app() -> (Router, SqlUserStore) {
        let store = memory_store().await;
        let router = routes(Router::new(), PREFIX, Arc::new(store.clone()));
        (router, store)
    }

    async fn send(router: &Router, method: Method, path: &str, body: &str) -> (u16, Value) {
        let res = router.call(Request::fake(method, &format!("{PREFIX}{path}"), body)).await;
        let body = serde_json::from_slice(res.body()).unwrap_or(Value::Null);
        (res.status_code(), body)
    }

    #[tokio::test]
    async fn list_returns_every_user() {
        let (router, store) = app().await;
        assert_eq!(send(&router, Method::Get, "/users", "").await, (200, json!([])));

        store.create_user("John Doe", "john@example.com").await.unwrap();
        store.create_user("Jane Doe", "jane@example.com").await.unwrap();

        let (status, body) = send(&router, Method::Get, "/users", "").await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!([
                { "id": 1, "name": "John Doe", "email": "john@example.com" },
                { "id": 2, "name": "Jane Doe", "email": "jane@example.com" },
            ])
        );
    }

    #[tokio::test]
    async fn crud_scenario() {
        let (router, _store) = app().await;
        let john = json!({ "id": 1, "name": "John Doe", "email": "john@example.com" });

        let created = send(&router, Method::Post, "/users", r#"{"name":"John Doe","email":"john@example.com"}"#).await;
        assert_eq!(created, (200, john.clone()));

        assert_eq!(send(&router, Method::Get, "/users/1", "").await, (200, john));

        let updated = send(
            &router,
            Method::Put,
            "/users/1",
            r#"{"name":"John Doe Updated","email":"john_updated@example.com"}"#,
        )
        .await;
        assert_eq!(
            updated,
            (200, json!({ "id": 1, "name": "John Doe Updated", "email": "john_updated@example.com" }))
        );

        assert_eq!(send(&router, Method::Delete, "/users/1", "").await, (200, json!("User deleted")));
        assert_eq!(send(&router, Method::Get, "/users/1", "").await, (500, json!("user 1 not found")));
    }

    #[rstest]
    #[case::missing_email(Method::Post, "/users", r#"{"name":"a"}"#)]
    #[case::wrong_type(Method::Post, "/users", r#"{"name":"a","email":7}"#)]
    #[case::not_json(Method::Put, "/users/1", "name=a")]
    #[case::blank_name(Method::Post, "/users", r#"{"name":"","email":"a@b.c"}"#)]
    #[case::non_integer_id(Method::Get, "/users/abc", "")]
    #[tokio::test]
    async fn client_errors_are_bad_request(#[case] method: Method, #[case] path: &str, #[case] body: &str) {
        let (router, store) = app().await;
        store.create_user("John Doe", "john@example.com").await.unwrap();

        let (status, body) = send(&router, method, path, body).await;
        assert_eq!(status, 400);
        assert!(body.is_string());
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[rstest]
    #[case(Method::Get)]
    #[case(Method::Delete)]
    #[tokio::test]
    async fn missing_user_is_a_server_error(#[case] method: Method) {
        let (router, _store) = app().await;
        assert_eq!(send(&router, method, "/users/9", "").await, (500, json!("user 9 not found")));
    }

    #[tokio::test]
    async fn update_of_missing_user_is_a_server_error() {
        let (router, _store) = app().await;
        let (status, _) = send(&router, Method::Put, "/users/9", r#"{"name":"a","email":"a@b.c"}"#).await;
        assert_eq!(status, 500);
    }

    #[test]
    fn database_failures_map_to_500() {
        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolClosed));
        let res = err.into_response();
        assert_eq!(res.status_code(), 500);
        assert!(String::from_utf8_lossy(res.body()).contains("database error"));
    }
}
