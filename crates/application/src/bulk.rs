use registar_core::AppError;

/// Attaches the 1-based element position to a bulk validation failure.
pub(crate) fn bulk_element_error(index: usize, entity: &'static str, error: AppError) -> AppError {
    match error {
        AppError::Validation(message) => AppError::Validation(format!(
            "{entity} at position {} is invalid: {message}",
            index + 1
        )),
        other => other,
    }
}
