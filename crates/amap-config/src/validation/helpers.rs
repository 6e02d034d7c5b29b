//! Shared validation helpers.

/// Push an error if `value` is outside `[min, max]`.
pub(crate) fn validate_range(errors: &mut Vec<String>, name: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

/// Push an error if `value` is empty or whitespace only.
pub(crate) fn validate_non_blank(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}

/// Push an error for every blank entry in `values`.
pub(crate) fn validate_names(errors: &mut Vec<String>, name: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        if value.trim().is_empty() {
            errors.push(format!("{name}[{i}] must not be empty"));
        }
    }
}
