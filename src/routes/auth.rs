use crate::{
    db::users as db_users,
    error::AppError,
    models::user::{ChangePasswordRequest, LoginRequest, RegisterRequest, Role, User, UserResponse},
    routes::AppState,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    // Validate input
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if req.password.len() < 4 {
        return Err(AppError::BadRequest(
            "Password must be at least 4 characters".to_string(),
        ));
    }
    if !(1..=12).contains(&req.grade) {
        return Err(AppError::BadRequest("Grade must be between 1 and 12".to_string()));
    }

    if db_users::find_by_name(&state.pool, &req.name).await?.is_some() {
        return Err(AppError::Conflict("Name already registered".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?
        .to_string();

    let role = req.role.unwrap_or(Role::Student);
    let is_elementary = req.grade <= 6;
    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(
        &state.pool,
        &user_id,
        req.name.trim(),
        role,
        req.grade,
        is_elementary,
        &password_hash,
    )
    .await?;

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    let role = req.role.unwrap_or(Role::Student);

    let user = match req.name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => {
            let user = db_users::find_by_name(&state.pool, name)
                .await?
                .filter(|u| u.role == role)
                .ok_or(AppError::Unauthorized("Invalid name or password".to_string()))?;
            if !verify_password(&user, &req.password)? {
                return Err(AppError::Unauthorized("Invalid name or password".to_string()));
            }
            user
        }
        // Teacher kiosk variant: no name, match the password against every
        // teacher account.
        None if role == Role::Teacher => {
            let teachers = db_users::list_by_role(&state.pool, Role::Teacher).await?;
            let mut matched = None;
            for teacher in teachers {
                if verify_password(&teacher, &req.password)? {
                    matched = Some(teacher);
                    break;
                }
            }
            matched.ok_or(AppError::Unauthorized("Invalid password".to_string()))?
        }
        None => return Err(AppError::BadRequest("Name is required".to_string())),
    };

    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

/// Users are immutable except for their password.
pub async fn change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if req.new_password.len() < 4 {
        return Err(AppError::BadRequest(
            "Password must be at least 4 characters".to_string(),
        ));
    }
    let user = db_users::find_by_id(&state.pool, &req.user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !verify_password(&user, &req.old_password)? {
        return Err(AppError::Unauthorized("Invalid password".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.new_password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))?
        .to_string();
    db_users::update_password(&state.pool, &user.id, &password_hash).await?;

    Ok(Json(json!({ "ok": true })))
}

fn verify_password(user: &User, password: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::test_pool;

    fn register_req(name: &str, password: &str, grade: i64, role: Option<Role>) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            password: password.to_string(),
            grade,
            role,
        }
    }

    fn login_req(name: Option<&str>, password: &str, role: Option<Role>) -> LoginRequest {
        LoginRequest {
            name: name.map(str::to_string),
            password: password.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trips() {
        let state = AppState { pool: test_pool().await };

        let Json(registered) = register(
            State(state.clone()),
            Json(register_req("aki", "hunter2", 8, None)),
        )
        .await
        .expect("register");
        assert_eq!(registered["user"]["role"], "student");
        assert_eq!(registered["user"]["is_elementary"], false);
        // The argon2 hash must never leak into the response.
        assert!(registered["user"].get("password_hash").is_none());

        let Json(logged_in) = login(
            State(state),
            Json(login_req(Some("aki"), "hunter2", None)),
        )
        .await
        .expect("login");
        assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);
    }

    #[tokio::test]
    async fn low_grades_are_elementary() {
        let state = AppState { pool: test_pool().await };
        let Json(body) = register(
            State(state),
            Json(register_req("mio", "abcd", 3, None)),
        )
        .await
        .unwrap();
        assert_eq!(body["user"]["is_elementary"], true);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let state = AppState { pool: test_pool().await };
        let result = register(State(state), Json(register_req("aki", "abc", 8, None))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn duplicate_name_conflicts() {
        let state = AppState { pool: test_pool().await };
        register(State(state.clone()), Json(register_req("aki", "hunter2", 8, None)))
            .await
            .unwrap();
        let result = register(State(state), Json(register_req("aki", "other4", 9, None))).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let state = AppState { pool: test_pool().await };
        register(State(state.clone()), Json(register_req("aki", "hunter2", 8, None)))
            .await
            .unwrap();
        let result = login(State(state), Json(login_req(Some("aki"), "hunter3", None))).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn nameless_teacher_login_matches_by_password() {
        let state = AppState { pool: test_pool().await };
        register(
            State(state.clone()),
            Json(register_req("tanaka", "staff-room", 12, Some(Role::Teacher))),
        )
        .await
        .unwrap();
        register(State(state.clone()), Json(register_req("aki", "hunter2", 8, None)))
            .await
            .unwrap();

        let Json(body) = login(
            State(state.clone()),
            Json(login_req(None, "staff-room", Some(Role::Teacher))),
        )
        .await
        .expect("kiosk login");
        assert_eq!(body["user"]["name"], "tanaka");

        // A student's password must not open the kiosk path.
        let result = login(
            State(state.clone()),
            Json(login_req(None, "hunter2", Some(Role::Teacher))),
        )
        .await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));

        // And a nameless student login is a plain validation error.
        let result = login(State(state), Json(login_req(None, "hunter2", None))).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    fn user_with_password(password: &str) -> User {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();
        User {
            id: "u1".to_string(),
            name: "aki".to_string(),
            role: Role::Student,
            grade: 8,
            is_elementary: 0,
            password_hash: hash,
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn password_verification_round_trips() {
        let user = user_with_password("hunter2");
        assert!(verify_password(&user, "hunter2").unwrap());
        assert!(!verify_password(&user, "hunter3").unwrap());
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let mut user = user_with_password("hunter2");
        user.password_hash = "not-a-phc-string".to_string();
        assert!(verify_password(&user, "hunter2").is_err());
    }
}
