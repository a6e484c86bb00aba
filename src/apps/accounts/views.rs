//! Account lifecycle and JWT views.
//!
//! Accounts are created inactive and without a password; a signed
//! activation link sets the password, activates the account, and issues the
//! first token pair. Password and email resets follow the same signed-link
//! pattern. Notification delivery is external; views only hand messages to
//! the mailer collaborator.

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password_validation::password_violations;
use crate::context::AppContext;
use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::pagination::{PageNumberPagination, PaginatedResponse};

use super::emails;
use super::models::User;
use super::serializers::{
	ActivateSerializer, ResendActivationSerializer, ResetEmailConfirmSerializer,
	ResetPasswordConfirmSerializer, SetEmailSerializer, SetPasswordSerializer,
	TokenCreateSerializer, TokenRefreshSerializer, TokenVerifySerializer, UidAndTokenSerializer,
	UserCreateSerializer, UserEmailLoginSerializer, UserResponse, UserUpdateSerializer,
	UserWithTokenResponse,
};

const INVALID_UID: &str = "Invalid user id or user doesn't exist.";
const INVALID_TOKEN: &str = "Invalid token for given user.";
const NO_ACTIVE_ACCOUNT: &str = "No active account found with the given credentials";
const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";

/// Resolve the bearer token to an active user.
pub async fn request_user(ctx: &AppContext, request: &Request) -> Result<User> {
	let token = request
		.bearer_token()
		.ok_or_else(|| Error::AuthenticationFailed(NOT_AUTHENTICATED.to_string()))?;
	let claims = ctx.jwt.verify_access(token)?;
	let user = User::find_by_id(&ctx.pool, claims.user_id()?)
		.await?
		.ok_or_else(|| Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()))?;
	if !user.is_active {
		return Err(Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()));
	}
	Ok(user)
}

/// Resolve an activation/reset `{uid, token}` pair to its user.
async fn user_from_uid_token(ctx: &AppContext, uid: &str, token: &str) -> Result<User> {
	let id: Uuid = uid
		.parse()
		.map_err(|_| Error::validation("uid", INVALID_UID))?;
	let user = User::find_by_id(&ctx.pool, id)
		.await?
		.ok_or_else(|| Error::validation("uid", INVALID_UID))?;
	if !ctx.activation_tokens.check_token(user.token_state(), token) {
		return Err(Error::validation("token", INVALID_TOKEN));
	}
	Ok(user)
}

fn check_password_rules(password: &str, email: &str) -> Result<()> {
	let violations = password_violations(password, Some(email));
	if violations.is_empty() {
		Ok(())
	} else {
		let mut fields = crate::exception::FieldErrors::new();
		fields.insert("password".to_string(), violations);
		Err(Error::Validation(fields))
	}
}

/// `POST /auth/users/` — register an inactive account and send the
/// activation link.
pub async fn user_create(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: UserCreateSerializer = request.validated_json()?;

	let user = User::create(
		&ctx.pool,
		&serializer.email,
		&serializer.first_name,
		&serializer.last_name,
	)
	.await?;

	let token = ctx.activation_tokens.make_token(user.token_state());
	ctx.mailer
		.send_email(&emails::activation_email(&ctx.settings, &user, &token))
		.await?;

	Response::created().with_json(&UserResponse::from_model(&user))
}

/// `GET /auth/users/` — the authenticated user's own record, paginated for
/// wire-shape consistency with the other list endpoints.
pub async fn user_list(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;

	let paginator = PageNumberPagination::from_settings(&ctx.settings);
	let params = paginator.page_params(&request)?;
	let page = PaginatedResponse::build(
		&request,
		&params,
		1,
		vec![UserResponse::from_model(&user)],
	)?;

	Response::ok().with_json(&page)
}

/// `GET /auth/users/{id}/` — visible for the requesting user only.
pub async fn user_detail(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;

	let id: Uuid = request
		.path_param("id")
		.unwrap_or_default()
		.parse()
		.map_err(|_| Error::not_found())?;
	if id != user.id {
		return Err(Error::not_found());
	}

	Response::ok().with_json(&UserResponse::from_model(&user))
}

/// `GET /auth/users/me/`
pub async fn user_me(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;
	Response::ok().with_json(&UserResponse::from_model(&user))
}

/// `PATCH /auth/users/me/` — partial profile update.
pub async fn user_me_update(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;
	let serializer: UserUpdateSerializer = request.validated_json()?;

	let updated = User::update_names(
		&ctx.pool,
		user.id,
		serializer.first_name.as_deref(),
		serializer.last_name.as_deref(),
	)
	.await?;

	Response::ok().with_json(&UserResponse::from_model(&updated))
}

/// `POST /auth/users/activation/` — validate the signed link, set the
/// password, activate, and issue the first token pair.
pub async fn activation(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ActivateSerializer = request.validated_json()?;
	let user = user_from_uid_token(&ctx, &serializer.uid, &serializer.token).await?;

	if user.is_active {
		return Err(Error::conflict("user", "This account is already active"));
	}
	if user.password.is_some() {
		return Err(Error::forbidden_state(
			"password",
			"Password already created for this user",
		));
	}
	check_password_rules(&serializer.password, &user.email)?;

	let hash = ctx.hasher.hash(&serializer.password)?;
	let user = User::set_password_and_activate(&ctx.pool, user.id, &hash).await?;
	let token = ctx.jwt.token_pair(user.id, &user.email)?;

	Response::ok().with_json(&UserWithTokenResponse {
		user: UserResponse::from_model(&user),
		token,
	})
}

/// `POST /auth/users/validate-activation-link/` — read-only check of a
/// signed pair; mutates nothing.
pub async fn validate_activation_link(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: UidAndTokenSerializer = request.validated_json()?;
	let user = user_from_uid_token(&ctx, &serializer.uid, &serializer.token).await?;

	if user.is_active {
		return Err(Error::conflict("user", "This account is already active"));
	}

	Response::ok().with_json(&UserResponse::from_model(&user))
}

/// `POST /auth/users/resend-activation/`
pub async fn resend_activation(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ResendActivationSerializer = request.validated_json()?;

	let Some(user) = User::find_inactive_by_email(&ctx.pool, &serializer.email).await? else {
		return Err(Error::conflict(
			"email",
			"Email is not associated with any user or user is active",
		));
	};

	let token = ctx.activation_tokens.make_token(user.token_state());
	ctx.mailer
		.send_email(&emails::activation_email(&ctx.settings, &user, &token))
		.await?;

	Ok(Response::no_content())
}

/// `POST /auth/users/set-password/` — authenticated password change.
pub async fn set_password(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;
	let serializer: SetPasswordSerializer = request.validated_json()?;

	let current_hash = user.password.as_deref().unwrap_or("");
	if !ctx.hasher.verify(&serializer.current_password, current_hash)? {
		return Err(Error::validation("current_password", "Invalid password."));
	}
	check_password_rules(&serializer.new_password, &user.email)?;

	let hash = ctx.hasher.hash(&serializer.new_password)?;
	User::set_password(&ctx.pool, user.id, &hash).await?;

	Ok(Response::no_content())
}

/// `POST /auth/users/reset-password/` — always 204; the notification is
/// only dispatched when an active account matches.
pub async fn reset_password(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ResendActivationSerializer = request.validated_json()?;

	if let Some(user) = User::find_by_email(&ctx.pool, &serializer.email).await?
		&& user.is_active
	{
		let token = ctx.activation_tokens.make_token(user.token_state());
		ctx.mailer
			.send_email(&emails::password_reset_email(&ctx.settings, &user, &token))
			.await?;
	}

	Ok(Response::no_content())
}

/// `POST /auth/users/reset-password-confirm/`
pub async fn reset_password_confirm(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ResetPasswordConfirmSerializer = request.validated_json()?;
	let user = user_from_uid_token(&ctx, &serializer.uid, &serializer.token).await?;

	check_password_rules(&serializer.new_password, &user.email)?;
	let hash = ctx.hasher.hash(&serializer.new_password)?;
	User::set_password(&ctx.pool, user.id, &hash).await?;

	Ok(Response::no_content())
}

/// `POST /auth/users/reset-email/` — request a signed email-change link.
pub async fn reset_email(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ResendActivationSerializer = request.validated_json()?;

	if let Some(user) = User::find_by_email(&ctx.pool, &serializer.email).await?
		&& user.is_active
	{
		let token = ctx.activation_tokens.make_token(user.token_state());
		ctx.mailer
			.send_email(&emails::email_change_email(&ctx.settings, &user, &token))
			.await?;
	}

	Ok(Response::no_content())
}

/// `POST /auth/users/reset-email-confirm/`
pub async fn reset_email_confirm(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: ResetEmailConfirmSerializer = request.validated_json()?;
	let user = user_from_uid_token(&ctx, &serializer.uid, &serializer.token).await?;

	User::set_email(&ctx.pool, user.id, &serializer.new_email).await?;

	Ok(Response::no_content())
}

/// `POST /auth/users/set-email/` — authenticated email change.
pub async fn set_email(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let user = request_user(&ctx, &request).await?;
	let serializer: SetEmailSerializer = request.validated_json()?;

	let current_hash = user.password.as_deref().unwrap_or("");
	if !ctx.hasher.verify(&serializer.current_password, current_hash)? {
		return Err(Error::validation("current_password", "Invalid password."));
	}

	User::set_email(&ctx.pool, user.id, &serializer.new_email).await?;

	Ok(Response::no_content())
}

/// `POST /auth/jwt/create/` — email+password login.
pub async fn jwt_create(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: TokenCreateSerializer = request.validated_json()?;

	let user = User::find_by_email(&ctx.pool, &serializer.email)
		.await?
		.ok_or_else(|| Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()))?;
	let hash = user
		.password
		.as_deref()
		.ok_or_else(|| Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()))?;
	if !user.is_active || !ctx.hasher.verify(&serializer.password, hash)? {
		return Err(Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()));
	}

	let pair = ctx.jwt.token_pair(user.id, &user.email)?;
	Response::ok().with_json(&pair)
}

/// `POST /auth/jwt/refresh/`
pub async fn jwt_refresh(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: TokenRefreshSerializer = request.validated_json()?;

	let claims = ctx.jwt.verify_refresh(&serializer.refresh)?;
	let access = ctx.jwt.access_token(claims.user_id()?, &claims.email)?;

	Response::ok().with_json(&serde_json::json!({ "access": access }))
}

/// `POST /auth/jwt/verify/`
pub async fn jwt_verify(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: TokenVerifySerializer = request.validated_json()?;

	ctx.jwt.decode(&serializer.token)?;

	Response::ok().with_json(&serde_json::json!({}))
}

/// `POST /auth/jwt/email-login/` — look the account up and dispatch a
/// login link; the link itself is the credential.
pub async fn jwt_email_login(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: UserEmailLoginSerializer = request.validated_json()?;

	let user = User::find_by_email(&ctx.pool, &serializer.email)
		.await?
		.ok_or_else(Error::not_found)?;

	let token = ctx.activation_tokens.make_token(user.token_state());
	ctx.mailer
		.send_email(&emails::login_link_email(
			&ctx.settings,
			&user,
			&token,
			serializer.redirect_url.as_deref(),
		))
		.await?;

	Ok(Response::no_content())
}

/// `POST /auth/jwt/create-by-token/` — exchange a signed login link for a
/// fresh token pair.
pub async fn jwt_create_by_token(ctx: Arc<AppContext>, request: Request) -> Result<Response> {
	let serializer: UidAndTokenSerializer = request.validated_json()?;
	let user = user_from_uid_token(&ctx, &serializer.uid, &serializer.token).await?;

	if !user.is_active {
		return Err(Error::AuthenticationFailed(NO_ACTIVE_ACCOUNT.to_string()));
	}

	let token = ctx.jwt.token_pair(user.id, &user.email)?;
	Response::ok().with_json(&UserWithTokenResponse {
		user: UserResponse::from_model(&user),
		token,
	})
}
