use axum::{extract::rejection::JsonRejection, Json};
use serde_json::Value;

use crate::error::AppError;

/// A body sent without a JSON content type is read as an empty object.
pub fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// A JSON number with no fractional part, e.g. `3` or `3.0`.
pub fn integral(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Id carried in a JSON body. Anything other than a non-negative integer matches nothing.
pub fn entity_id(value: &Value) -> Option<u64> {
    integral(value).and_then(|n| u64::try_from(n).ok())
}

/// Path segment read as a number. Text that is not numeric is rejected with `invalid`;
/// numeric text that is not a non-negative integer, such as `-1` or `1.5`, yields `None`.
pub fn path_id(raw: &str, invalid: &str) -> Result<Option<u64>, AppError> {
    let number: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|n: &f64| !n.is_nan())
        .ok_or_else(|| AppError::validation(invalid))?;

    if number.fract() == 0.0 && number >= 0.0 && number <= u64::MAX as f64 {
        Ok(Some(number as u64))
    } else {
        Ok(None)
    }
}
