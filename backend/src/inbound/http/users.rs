//! User profile HTTP handlers.
//!
//! ```text
//! POST /api/v1/users
//! GET  /api/v1/users/{id}
//! ```
//!
//! Responses never carry credential material.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::RegisterUserRequest;
use crate::domain::{UserId, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const USER_ID: FieldName = FieldName::new("id");
const EMAIL: FieldName = FieldName::new("email");
const USERNAME: FieldName = FieldName::new("username");
const FIRST_NAME: FieldName = FieldName::new("firstName");
const LAST_NAME: FieldName = FieldName::new("lastName");

/// Request payload for provisioning a user.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    #[schema(format = "email")]
    pub email: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TryFrom<RegisterUserBody> for RegisterUserRequest {
    type Error = crate::domain::Error;

    fn try_from(body: RegisterUserBody) -> Result<Self, Self::Error> {
        Ok(Self {
            email: require(body.email, EMAIL)?,
            username: require(body.username, USERNAME)?,
            first_name: require(body.first_name, FIRST_NAME)?,
            last_name: require(body.last_name, LAST_NAME)?,
        })
    }
}

/// Public user profile.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<UserProfile> for UserProfileBody {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            created_at: profile.created_at.to_rfc3339(),
        }
    }
}

/// Provision a user without credentials.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterUserBody,
    responses(
        (status = 201, description = "User created", body = UserProfileBody),
        (status = 400, description = "Missing or invalid fields", body = ErrorSchema),
        (status = 409, description = "Email or username already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser"
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterUserBody>,
) -> ApiResult<HttpResponse> {
    let request = RegisterUserRequest::try_from(payload.into_inner())?;
    let profile = state.registration.register_user(request).await?;
    Ok(HttpResponse::Created().json(UserProfileBody::from(profile)))
}

/// Fetch a user's public profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, format = "uuid", description = "User identifier")),
    responses(
        (status = 200, description = "User profile", body = UserProfileBody),
        (status = 400, description = "Invalid identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfileBody>> {
    let user_id: UserId = parse_id(path.into_inner(), USER_ID)?;
    let profile = state.profiles.fetch_profile(user_id).await?;
    Ok(web::Json(UserProfileBody::from(profile)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::UserId;
    use crate::inbound::http::test_utils::{memory_world, test_app};

    #[actix_web::test]
    async fn profile_omits_credentials() {
        let world = memory_world();
        let app = actix_test::init_service(test_app(world.state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{}", world.alice))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["email"], "alice@example.com");
        assert!(body.get("passwordHash").is_none());
        assert!(body.get("password").is_none());
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
    #[case("42", StatusCode::BAD_REQUEST)]
    #[actix_web::test]
    async fn profile_lookup_failures(#[case] id: &str, #[case] expected: StatusCode) {
        let world = memory_world();
        let app = actix_test::init_service(test_app(world.state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }

    #[actix_web::test]
    async fn registration_creates_a_profile_that_can_be_fetched() {
        let world = memory_world();
        let app = actix_test::init_service(test_app(world.state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({
                "email": "bob@example.com",
                "username": "bob_k",
                "firstName": "Bob",
                "lastName": "Kowalski"
            }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = actix_test::read_body_json(response).await;
        let id: UserId = created["id"]
            .as_str()
            .expect("id")
            .parse()
            .expect("uuid id");

        let fetched: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{id}"))
                .to_request(),
        )
        .await;
        assert_eq!(fetched, created);
    }

    #[rstest]
    #[case(json!({ "username": "carol", "firstName": "C", "lastName": "D" }), StatusCode::BAD_REQUEST, "email")]
    #[case(json!({ "email": "ALICE@example.com", "username": "carol", "firstName": "C", "lastName": "D" }), StatusCode::CONFLICT, "email")]
    #[case(json!({ "email": "carol@example.com", "username": "alice", "firstName": "C", "lastName": "D" }), StatusCode::CONFLICT, "username")]
    #[actix_web::test]
    async fn registration_rejections(
        #[case] payload: Value,
        #[case] expected: StatusCode,
        #[case] field: &str,
    ) {
        let world = memory_world();
        let app = actix_test::init_service(test_app(world.state)).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }
}
