use crate::server::response::ApiError;

const MAX_NAME_LEN: usize = 255;

fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("El campo name es obligatorio".to_string());
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "El campo name no puede superar los {MAX_NAME_LEN} caracteres"
        ));
    }
    Ok(())
}

/// Name on create: must be present and non-blank.
pub fn require_name(name: Option<String>) -> Result<String, ApiError> {
    let name = name.unwrap_or_default();
    validate_name(&name).map_err(ApiError::validation)?;
    Ok(name)
}

/// Name on partial update: absent is fine, explicit null or blank is not.
pub fn validate_name_change(name: Option<Option<String>>) -> Result<Option<String>, ApiError> {
    match name {
        None => Ok(None),
        Some(value) => require_name(value).map(Some),
    }
}

/// Treats empty optional text as absent.
#[must_use]
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Blank team ids mean "no team".
#[must_use]
pub fn normalize_team_id(team_id: Option<String>) -> Option<String> {
    team_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}
