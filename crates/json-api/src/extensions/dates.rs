//! Calendar date parsing helpers.

use jiff::{Zoned, civil::Date};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

/// The current calendar date in the server's time zone.
pub(crate) fn today() -> Date {
    Zoned::now().date()
}

/// Parse an ISO-8601 `YYYY-MM-DD` date, naming `field` in the error.
pub(crate) fn parse_date(value: &str, field: &str) -> Result<Date, StatusError> {
    value
        .trim()
        .parse::<Date>()
        .or_400(&format!("could not parse \"{field}\" as a YYYY-MM-DD date"))
}

pub(crate) trait DateParamExt {
    fn into_date_or_today(self, field: &str) -> Result<Date, StatusError>;
}

impl DateParamExt for QueryParam<String, false> {
    fn into_date_or_today(self, field: &str) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| parse_date(&value, field))
            .transpose()
            .map(|date| date.unwrap_or_else(today))
    }
}
