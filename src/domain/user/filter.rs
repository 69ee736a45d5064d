use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use super::model::{UserRecord, UserStatus, UserType};
use crate::support::errors::DomainError;

/// Registration-date window offered by the date selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    /// Same calendar day
    Today,
    /// Within 7 days
    Week,
    /// Within 30 days
    Month,
    /// Within 365 days
    Year,
}

impl DateWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateWindow::Today => "today",
            DateWindow::Week => "week",
            DateWindow::Month => "month",
            DateWindow::Year => "year",
        }
    }

    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let within = |days: i64| (today - date).num_days().abs() <= days;
        match self {
            DateWindow::Today => date == today,
            DateWindow::Week => within(7),
            DateWindow::Month => within(30),
            DateWindow::Year => within(365),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(DateWindow::Today),
            "week" => Ok(DateWindow::Week),
            "month" => Ok(DateWindow::Month),
            "year" => Ok(DateWindow::Year),
            other => Err(format!("unknown date window: {}", other)),
        }
    }
}

/// Current values of the search box and the three selectors.
///
/// Owns no data; it only narrows which canonical records are visible.
/// `None` / empty search is the "no filter" sentinel for each predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    pub user_type: Option<UserType>,
    pub status: Option<UserStatus>,
    pub date: Option<DateWindow>,
}

impl FilterState {
    /// Build from raw selector values where `""` means "any".
    pub fn from_inputs(
        search: &str,
        user_type: &str,
        status: &str,
        date: &str,
    ) -> Result<Self, DomainError> {
        fn optional<T: FromStr<Err = String>>(raw: &str) -> Result<Option<T>, DomainError> {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse().map(Some).map_err(DomainError::Validation)
        }

        Ok(Self::default()
            .with_search(search)
            .with_type(optional(user_type)?)
            .with_status(optional(status)?)
            .with_date(optional(date)?))
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.set_search(search);
        self
    }

    pub fn with_type(mut self, user_type: Option<UserType>) -> Self {
        self.user_type = user_type;
        self
    }

    pub fn with_status(mut self, status: Option<UserStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_date(mut self, date: Option<DateWindow>) -> Self {
        self.date = date;
        self
    }

    /// Stored lowercased; matching is case-insensitive.
    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty()
            && self.user_type.is_none()
            && self.status.is_none()
            && self.date.is_none()
    }

    pub fn matches(&self, user: &UserRecord, today: NaiveDate) -> bool {
        if !self.search.is_empty()
            && !user
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.search))
        {
            return false;
        }
        if self.user_type.is_some_and(|t| t != user.user_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != user.status) {
            return false;
        }
        if self
            .date
            .is_some_and(|window| !window.contains(user.registration_date, today))
        {
            return false;
        }
        true
    }

    /// Ids of the matching records, in canonical order. Single pass over `records`.
    pub fn apply(&self, records: &[UserRecord], today: NaiveDate) -> Vec<u32> {
        records
            .iter()
            .filter(|user| self.matches(user, today))
            .map(|user| user.id)
            .collect()
    }
}
