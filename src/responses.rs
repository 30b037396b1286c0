//! Request and response bodies shared between the client and commands.

use serde::{Deserialize, Serialize};

/// Body of `POST /login`.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Echo of a `PUT /users/{id}`; the demo API returns whatever was sent plus a timestamp.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdatedUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<String>,
}

/// Error payload, e.g. `{"error": "Missing password"}`.
#[derive(Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}
