//! The reqres contract suite.

use restcheck_domain::{DomainResult, RequestBody, RequestSpec, Scenario};

/// Suite name used in reports.
pub const SUITE_NAME: &str = "reqres";

/// Schema for a page of the user list.
pub const USERS_LIST_SCHEMA: &str = "users_list_schema.json";

/// Schema for the delayed user list.
pub const DELAYED_RESPONSE_SCHEMA: &str = "delayed_response_schema.json";

/// Registering a defined user returns its id and token.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn successful_register() -> DomainResult<Scenario> {
    Scenario::builder(
        "successful register",
        RequestSpec::post("/api/register").with_body(RequestBody::json([
            ("email", "eve.holt@reqres.in"),
            ("password", "pistol"),
        ])),
    )
    .status(200)
    .field_eq("id", 4)
    .field_eq("token", "QpwL5tke4Pnpja7X4")
    .build()
}

/// Registering without a password is rejected.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn unsuccessful_register() -> DomainResult<Scenario> {
    Scenario::builder(
        "unsuccessful register",
        RequestSpec::post("/api/register")
            .with_body(RequestBody::json([("email", "sydney@fife")])),
    )
    .status(400)
    .field_eq("error", "Missing password")
    .build()
}

/// Logging in with valid credentials returns a token.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn successful_login() -> DomainResult<Scenario> {
    Scenario::builder(
        "successful login",
        RequestSpec::post("/api/login").with_body(RequestBody::json([
            ("email", "eve.holt@reqres.in"),
            ("password", "cityslicka"),
        ])),
    )
    .status(200)
    .field_not_null("token")
    .build()
}

/// Logging in without a password is rejected.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn unsuccessful_login() -> DomainResult<Scenario> {
    Scenario::builder(
        "unsuccessful login",
        RequestSpec::post("/api/login").with_body(RequestBody::json([("email", "peter@klaven")])),
    )
    .status(400)
    .field_eq("error", "Missing password")
    .build()
}

/// The delayed first page still has the full page of users.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn delayed_response() -> DomainResult<Scenario> {
    Scenario::builder(
        "delayed response",
        RequestSpec::get("/api/users").with_query("delay", "3"),
    )
    .status(200)
    .schema(DELAYED_RESPONSE_SCHEMA)
    .field_eq("per_page", 6)
    .field_eq("total", 12)
    .field_size("data.id", 6)
    .build()
}

/// The second page of users matches the schema and ends with Rachel.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn list_users() -> DomainResult<Scenario> {
    Scenario::builder(
        "list users",
        RequestSpec::get("/api/users").with_query("page", "2"),
    )
    .status(200)
    .schema(USERS_LIST_SCHEMA)
    .field_eq("per_page", 6)
    .field_eq("total", 12)
    .field_eq("data.email[5]", "rachel.howell@reqres.in")
    .build()
}

/// Unknown users are not found.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn user_not_found() -> DomainResult<Scenario> {
    Scenario::builder("user not found", RequestSpec::get("/api/users/23"))
        .status(404)
        .build()
}

/// Creating a user echoes it back with an id and creation time.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn create_user() -> DomainResult<Scenario> {
    Scenario::builder(
        "create user",
        RequestSpec::post("/api/users")
            .with_body(RequestBody::json([("name", "Boris"), ("job", "QA")])),
    )
    .status(201)
    .field_eq("name", "Boris")
    .field_eq("job", "QA")
    .field_not_null("id")
    .field_not_null("createdAt")
    .build()
}

/// All scenarios of the suite, in report order.
///
/// # Errors
///
/// Fails only if a field path is malformed.
pub fn scenarios() -> DomainResult<Vec<Scenario>> {
    Ok(vec![
        successful_register()?,
        unsuccessful_register()?,
        successful_login()?,
        unsuccessful_login()?,
        delayed_response()?,
        list_users()?,
        user_not_found()?,
        create_user()?,
    ])
}
