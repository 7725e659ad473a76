use crate::error::ApiError;
use crate::models::MonthLabel;
use crate::registry::Registry;

/// Split a comma-separated `months` query value into labels. At least one
/// label is required; any label that does not parse rejects the request.
pub fn parse_months(raw: &str) -> Result<Vec<MonthLabel>, ApiError> {
    let labels = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<MonthLabel>()
                .map_err(|err| ApiError::BadRequest(err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if labels.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one month is required".into(),
        ));
    }
    Ok(labels)
}

/// Location codes must come from the registry; anything else is a caller bug.
pub fn validate_locations(codes: &[String], registry: &Registry) -> Result<(), ApiError> {
    for code in codes {
        if !registry.is_location(code) {
            return Err(ApiError::BadRequest(format!("unknown location {code:?}")));
        }
    }
    Ok(())
}

/// Split a comma-separated multi-select query value, dropping blanks. An
/// explicitly empty selection stays empty ("show nothing").
pub fn split_selection(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
