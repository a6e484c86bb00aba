//! Text utilities.

/// Derive a URL-friendly slug from a human-readable name.
///
/// Lowercases the input, keeps alphanumerics, and collapses every run of
/// other characters into a single hyphen. There is no collision handling:
/// two names deriving the same slug will conflict on the slug's uniqueness
/// constraint at insert time.
///
/// # Examples
///
/// ```
/// use nuages::common::text::slugify;
///
/// assert_eq!(slugify("Test Article"), "test-article");
/// assert_eq!(slugify("  Organic -- Cotton T-Shirt!  "), "organic-cotton-t-shirt");
/// ```
pub fn slugify(value: &str) -> String {
	let mut slug = String::with_capacity(value.len());
	let mut pending_separator = false;

	for c in value.chars() {
		if c.is_alphanumeric() {
			if pending_separator && !slug.is_empty() {
				slug.push('-');
			}
			pending_separator = false;
			for lower in c.to_lowercase() {
				slug.push(lower);
			}
		} else {
			pending_separator = true;
		}
	}

	slug
}
