use chrono::{
  Local,
  NaiveDate
};

const COUNT_DATE_FORMAT: &str =
  "%a %b %d %Y";
const HEADER_DATE_FORMAT: &str =
  "%A, %B %-d";

#[must_use]
pub fn local_today() -> NaiveDate {
  Local::now().date_naive()
}

/// Day marker stored next to the pomodoro
/// counter, e.g. `Sun Oct 18 2026`.
#[must_use]
pub fn count_date_key(
  date: NaiveDate
) -> String {
  date.format(COUNT_DATE_FORMAT).to_string()
}

/// Long form for the page header, e.g.
/// `Sunday, October 18`.
#[must_use]
pub fn header_date(
  date: NaiveDate
) -> String {
  date.format(HEADER_DATE_FORMAT).to_string()
}
