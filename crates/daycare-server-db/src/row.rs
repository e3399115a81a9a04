// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.
//!
//! Ids are stored as hyphenated UUID strings and timestamps as RFC 3339
//! strings. Anything that fails to parse is reported as `DbError::Internal`.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::DbError;

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DbError> {
	Uuid::parse_str(value).map_err(|e| DbError::Internal(format!("Invalid {column} UUID: {e}")))
}

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

pub(crate) fn parse_optional_timestamp(
	value: Option<String>,
	column: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
	value.map(|v| parse_timestamp(&v, column)).transpose()
}

pub(crate) fn parse_optional_date(
	value: Option<String>,
	column: &str,
) -> Result<Option<NaiveDate>, DbError> {
	value
		.map(|v| {
			NaiveDate::parse_from_str(&v, "%Y-%m-%d")
				.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
		})
		.transpose()
}
