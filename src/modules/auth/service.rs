use sqlx::PgPool;
use tracing::{info, instrument};

use rentree_auth::create_access_token;
use rentree_config::JwtConfig;
use rentree_core::{AppError, scopes, verify_password};
use rentree_models::User;

use super::model::{LoginRequest, LoginResponse};
use crate::metrics::{track_jwt_issued, track_user_login_failure, track_user_login_success};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Checks the credentials and issues a token carrying the scopes of the
    /// user's role.
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let Some(user) = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, password, role, created_at, updated_at
               FROM users WHERE email = $1"#,
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        else {
            track_user_login_failure("unknown_email");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure("wrong_password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let granted = scopes::for_role(&user.role);
        let access_token = create_access_token(
            user.id.into_inner(),
            &user.email,
            &user.role,
            granted.clone(),
            jwt_config,
        )?;

        track_jwt_issued();
        track_user_login_success(&user.role);
        info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: jwt_config.access_token_expiry,
            scopes: granted,
            user: user.into(),
        })
    }
}
