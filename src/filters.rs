//! Query-string driven filtering for list endpoints.
//!
//! Three backends compose over a [`sqlx::QueryBuilder`]: exact-match field
//! filters (typed), a substring search across a fixed column set, and an
//! allow-listed ordering filter. Each view declares its own columns, the
//! way each resource declares its filterable surface.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::exception::{Error, Result};

/// Case-insensitive substring search over a fixed set of columns.
pub struct SearchFilter {
	pub columns: &'static [&'static str],
}

impl SearchFilter {
	/// Append `AND (col ILIKE %term% OR ...)` with the escaped term bound
	/// once per column.
	pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>, term: &str) {
		let pattern = format!("%{}%", escape_like(term));
		qb.push(" AND (");
		for (i, column) in self.columns.iter().enumerate() {
			if i > 0 {
				qb.push(" OR ");
			}
			qb.push(*column);
			qb.push(" ILIKE ");
			qb.push_bind(pattern.clone());
		}
		qb.push(")");
	}
}

/// Escape LIKE wildcards in user input so the term matches literally.
fn escape_like(term: &str) -> String {
	term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// `?ordering=` handling: a comma-separated list of allow-listed fields,
/// each optionally prefixed with `-` for descending order.
pub struct OrderingFilter {
	pub allowed: &'static [&'static str],
	pub default: &'static str,
}

impl OrderingFilter {
	/// Build the ORDER BY column list. Unknown fields are rejected rather
	/// than ignored, so typos surface instead of silently reordering.
	pub fn order_clause(&self, param: Option<&str>) -> Result<String> {
		let raw = match param {
			Some(value) if !value.trim().is_empty() => value,
			_ => self.default,
		};

		let mut parts = Vec::new();
		for field in raw.split(',') {
			let field = field.trim();
			let (column, direction) = match field.strip_prefix('-') {
				Some(column) => (column, "DESC"),
				None => (field, "ASC"),
			};
			if !self.allowed.contains(&column) {
				return Err(Error::validation(
					"ordering",
					format!("Invalid ordering field: {}.", field),
				));
			}
			parts.push(format!("{} {}", column, direction));
		}
		Ok(parts.join(", "))
	}
}

/// Append `AND column = value` for a text parameter.
pub fn push_eq_text(qb: &mut QueryBuilder<'_, Postgres>, column: &str, value: &str) {
	qb.push(" AND ");
	qb.push(column);
	qb.push(" = ");
	qb.push_bind(value.to_string());
}

/// Append `AND column = value` for a boolean parameter
/// (`true`/`false`/`1`/`0`, case-insensitive).
pub fn push_eq_bool(
	qb: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	param: &str,
	raw: &str,
) -> Result<()> {
	let value = match raw.to_ascii_lowercase().as_str() {
		"true" | "1" => true,
		"false" | "0" => false,
		_ => {
			return Err(Error::validation(
				param,
				format!("Invalid boolean value: {:?}.", raw),
			));
		}
	};
	qb.push(" AND ");
	qb.push(column);
	qb.push(" = ");
	qb.push_bind(value);
	Ok(())
}

/// Append `AND column = value` for a UUID parameter.
pub fn push_eq_uuid(
	qb: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	param: &str,
	raw: &str,
) -> Result<()> {
	let value: Uuid = raw
		.parse()
		.map_err(|_| Error::validation(param, format!("Invalid UUID value: {:?}.", raw)))?;
	qb.push(" AND ");
	qb.push(column);
	qb.push(" = ");
	qb.push_bind(value);
	Ok(())
}

/// Append `AND column = value` for an RFC 3339 timestamp parameter.
pub fn push_eq_timestamptz(
	qb: &mut QueryBuilder<'_, Postgres>,
	column: &str,
	param: &str,
	raw: &str,
) -> Result<()> {
	let value: DateTime<Utc> = raw
		.parse()
		.map_err(|_| Error::validation(param, format!("Invalid datetime value: {:?}.", raw)))?;
	qb.push(" AND ");
	qb.push(column);
	qb.push(" = ");
	qb.push_bind(value);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn qb() -> QueryBuilder<'static, Postgres> {
		QueryBuilder::new("SELECT * FROM article WHERE TRUE")
	}

	#[rstest]
	fn test_search_filter_spans_all_columns() {
		let filter = SearchFilter {
			columns: &["title", "excerpt", "content"],
		};
		let mut qb = qb();

		filter.apply(&mut qb, "endometriosis");

		assert_eq!(
			qb.sql(),
			"SELECT * FROM article WHERE TRUE AND (title ILIKE $1 OR excerpt ILIKE $2 OR content ILIKE $3)"
		);
	}

	#[rstest]
	#[case("50% off", "%50\\% off%")]
	#[case("under_score", "%under\\_score%")]
	#[case("back\\slash", "%back\\\\slash%")]
	fn test_search_term_wildcards_are_escaped(#[case] term: &str, #[case] expected: &str) {
		assert_eq!(format!("%{}%", escape_like(term)), expected);
	}

	#[rstest]
	#[case(None, "created_at DESC")]
	#[case(Some("title"), "title ASC")]
	#[case(Some("-title"), "title DESC")]
	#[case(Some("publish_date"), "publish_date ASC")]
	#[case(Some("-created_at"), "created_at DESC")]
	#[case(Some("title,-created_at"), "title ASC, created_at DESC")]
	fn test_ordering_clause(#[case] param: Option<&str>, #[case] expected: &str) {
		let filter = OrderingFilter {
			allowed: &["created_at", "updated_at", "publish_date", "title"],
			default: "-created_at",
		};

		assert_eq!(filter.order_clause(param).unwrap(), expected);
	}

	#[rstest]
	#[case("id")]
	#[case("-slug")]
	#[case("title; DROP TABLE article")]
	fn test_ordering_rejects_unknown_fields(#[case] param: &str) {
		let filter = OrderingFilter {
			allowed: &["created_at", "title"],
			default: "-created_at",
		};

		assert!(matches!(
			filter.order_clause(Some(param)),
			Err(Error::Validation(_))
		));
	}

	#[rstest]
	fn test_push_eq_text_binds_value() {
		let mut qb = qb();

		push_eq_text(&mut qb, "slug", "test-article");

		assert_eq!(qb.sql(), "SELECT * FROM article WHERE TRUE AND slug = $1");
	}

	#[rstest]
	#[case("true", true)]
	#[case("True", true)]
	#[case("1", true)]
	#[case("false", false)]
	#[case("0", false)]
	fn test_push_eq_bool_accepts_common_forms(#[case] raw: &str, #[case] _expected: bool) {
		let mut qb = qb();

		push_eq_bool(&mut qb, "is_featured", "is_featured", raw).unwrap();

		assert_eq!(qb.sql(), "SELECT * FROM article WHERE TRUE AND is_featured = $1");
	}

	#[rstest]
	fn test_push_eq_bool_rejects_garbage() {
		let mut qb = qb();

		let result = push_eq_bool(&mut qb, "is_featured", "is_featured", "maybe");

		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[rstest]
	fn test_push_eq_uuid_rejects_garbage() {
		let mut qb = qb();

		let result = push_eq_uuid(&mut qb, "author_id", "author", "not-a-uuid");

		assert!(matches!(result, Err(Error::Validation(_))));
	}

	#[rstest]
	fn test_push_eq_timestamptz_parses_rfc3339() {
		let mut qb = qb();

		push_eq_timestamptz(&mut qb, "publish_date", "publish_date", "2026-01-15T12:00:00Z")
			.unwrap();

		assert_eq!(
			qb.sql(),
			"SELECT * FROM article WHERE TRUE AND publish_date = $1"
		);
	}
}
