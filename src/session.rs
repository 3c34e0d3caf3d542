use uuid::Uuid;

pub const COOKIE_NAME: &str = "session";

/// Creates a session cookie with no expiry
pub fn create_cookie(session_id: Uuid) -> cookie::Cookie<'static> {
	cookie::Cookie::build((COOKIE_NAME, session_id.to_string()))
		.secure(!cfg!(debug_assertions))
		.http_only(true)
		.same_site(cookie::SameSite::Lax)
		.path("/")
		.into()
}

/// Creates an empty session cookie used to invalidate a previous one
pub fn clear_cookie() -> cookie::Cookie<'static> {
	cookie::Cookie::build(COOKIE_NAME)
		.http_only(true)
		.path("/")
		.max_age(cookie::time::Duration::ZERO)
		.into()
}

/// Returns `next` if it is a path on this site, otherwise the feed.
///
/// Protocol-relative values such as `//evil.example` are rejected.
pub fn safe_next(next: Option<&str>) -> &str {
	match next {
		Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
		_ => "/",
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_create_cookie() {
		let id = Uuid::new_v4();
		let cookie = create_cookie(id);

		assert_eq!(cookie.name(), COOKIE_NAME);
		assert_eq!(cookie.value(), id.to_string());
		assert_eq!(cookie.http_only(), Some(true));
		assert_eq!(cookie.path(), Some("/"));
	}

	#[test]
	fn test_clear_cookie() {
		let cookie = clear_cookie();

		assert_eq!(cookie.value(), "");
		assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
	}

	#[test]
	fn test_safe_next() {
		assert_eq!(safe_next(None), "/");
		assert_eq!(safe_next(Some("/new/")), "/new/");
		assert_eq!(safe_next(Some("//evil.example")), "/");
		assert_eq!(safe_next(Some("https://evil.example")), "/");
	}
}
