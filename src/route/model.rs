use serde::Deserialize;

/// Number of entries on every paginated listing.
pub const PAGE_SIZE: i64 = 10;

/// The raw `?page=` parameter. It is kept as a string so that garbage input
/// falls back to the first page instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
	#[serde(default)]
	pub page: Option<String>,
}

/// A resolved page window over a listing of `total` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginate {
	/// The page number to return (1-indexed).
	pub page: i64,
	/// The number of items to return per page.
	pub size: i64,
}

impl Paginate {
	/// Resolves the requested page against the listing size, clamping to the
	/// nearest valid page. Missing or non-numeric input means the first page.
	pub fn clamp(query: &PageQuery, total: i64) -> Self {
		let last = num_pages(total, PAGE_SIZE);
		let requested = query
			.page
			.as_deref()
			.and_then(|page| page.trim().parse::<i64>().ok())
			.unwrap_or(1);

		Self {
			page: requested.clamp(1, last),
			size: PAGE_SIZE,
		}
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1) * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}
}

/// Number of pages needed for `total` entries. An empty listing still has one page.
pub fn num_pages(total: i64, size: i64) -> i64 {
	((total + size - 1) / size).max(1)
}

/// One page of a listing, newest first.
#[derive(Debug)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub number: i64,
	pub num_pages: i64,
	pub total: i64,
}

impl<T> Page<T> {
	pub fn new(items: Vec<T>, number: i64, num_pages: i64, total: i64) -> Self {
		Self {
			items,
			number,
			num_pages,
			total,
		}
	}

	pub fn from_window(items: Vec<T>, paginate: Paginate, total: i64) -> Self {
		Self::new(items, paginate.page, num_pages(total, paginate.size), total)
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}
}
