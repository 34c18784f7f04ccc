use crate::error::TopError;
use time::macros::format_description;
use time::OffsetDateTime;

/// Replace a Unix-epoch item with its UTC calendar day as `DD.MM.YYYY`.
/// `line`/`column` only feed the error.
pub fn day_bucket(item: &str, line: u64, column: usize) -> Result<String, TopError> {
    let bad = || TopError::Value {
        line,
        column,
        value: item.to_string(),
        expected: "a unix timestamp",
    };
    let ts: i64 = item.trim().parse().map_err(|_| bad())?;
    let dt = OffsetDateTime::from_unix_timestamp(ts).map_err(|_| bad())?;
    dt.format(format_description!("[day].[month].[year]")).map_err(|_| bad())
}
