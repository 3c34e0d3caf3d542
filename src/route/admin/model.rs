use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::route::model::PageQuery;

/// Date ranges offered by the admin listings, mirroring a "since" filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
	Today,
	Week,
	Month,
	Year,
}

impl DateFilter {
	pub const ALL: [Self; 4] = [Self::Today, Self::Week, Self::Month, Self::Year];

	/// The earliest instant included by the filter, relative to `now`.
	pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
		let midnight = |date: chrono::NaiveDate| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
		let today = now.date_naive();

		match self {
			Self::Today => midnight(today),
			Self::Week => midnight(today) - Duration::days(7),
			Self::Month => midnight(today.with_day(1).unwrap_or(today)),
			Self::Year => midnight(today.with_ordinal(1).unwrap_or(today)),
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Today => "today",
			Self::Week => "week",
			Self::Month => "month",
			Self::Year => "year",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Today => "Today",
			Self::Week => "Past 7 days",
			Self::Month => "This month",
			Self::Year => "This year",
		}
	}

	fn parse(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|filter| filter.as_str() == value)
	}
}

/// Query parameters of the searchable admin listings.
#[derive(Debug, Default, Deserialize)]
pub struct AdminQuery {
	/// Case-insensitive search in the text.
	#[serde(default)]
	pub q: Option<String>,
	/// One of [`DateFilter`]. Unknown values are ignored.
	#[serde(default)]
	pub since: Option<String>,
	#[serde(default)]
	pub page: Option<String>,
}

impl AdminQuery {
	pub fn search(&self) -> Option<String> {
		self.q
			.as_deref()
			.map(str::trim)
			.filter(|q| !q.is_empty())
			.map(str::to_owned)
	}

	pub fn date_filter(&self) -> Option<DateFilter> {
		self.since.as_deref().and_then(DateFilter::parse)
	}

	pub fn page_query(&self) -> PageQuery {
		PageQuery {
			page: self.page.clone(),
		}
	}

	/// The active filters, encoded for the paginator links.
	pub fn filters(&self) -> String {
		let mut pairs = Vec::new();

		if let Some(q) = self.search() {
			pairs.push(("q", q));
		}

		if let Some(since) = self.date_filter() {
			pairs.push(("since", since.as_str().to_owned()));
		}

		serde_urlencoded::to_string(pairs).unwrap_or_default()
	}
}
