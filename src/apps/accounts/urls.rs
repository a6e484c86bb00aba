//! URL patterns for the accounts application, mounted under `/auth/`.

use hyper::Method;

use crate::http::Router;

use super::views;

pub fn routes() -> Router {
	Router::new()
		.function("/jwt/create/", Method::POST, views::jwt_create)
		.function("/jwt/refresh/", Method::POST, views::jwt_refresh)
		.function("/jwt/verify/", Method::POST, views::jwt_verify)
		.function("/jwt/email-login/", Method::POST, views::jwt_email_login)
		.function("/jwt/create-by-token/", Method::POST, views::jwt_create_by_token)
		.function("/users/", Method::POST, views::user_create)
		.function("/users/", Method::GET, views::user_list)
		.function("/users/me/", Method::GET, views::user_me)
		.function("/users/me/", Method::PATCH, views::user_me_update)
		.function("/users/activation/", Method::POST, views::activation)
		.function(
			"/users/validate-activation-link/",
			Method::POST,
			views::validate_activation_link,
		)
		.function("/users/resend-activation/", Method::POST, views::resend_activation)
		.function("/users/set-password/", Method::POST, views::set_password)
		.function("/users/reset-password/", Method::POST, views::reset_password)
		.function(
			"/users/reset-password-confirm/",
			Method::POST,
			views::reset_password_confirm,
		)
		.function("/users/reset-email/", Method::POST, views::reset_email)
		.function("/users/reset-email-confirm/", Method::POST, views::reset_email_confirm)
		.function("/users/set-email/", Method::POST, views::set_email)
		.function("/users/{id}/", Method::GET, views::user_detail)
}
