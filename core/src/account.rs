use std::fmt;

pub const DEFAULT_CSRF_HEADER: &str = "X-CSRF-TOKEN";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Passwords do not match!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordError {
    Mismatch,
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordError::Mismatch => write!(f, "{PASSWORD_MISMATCH_MESSAGE}"),
        }
    }
}

impl std::error::Error for PasswordError {}

pub fn validate_password(password: &str, confirm: &str) -> Result<(), PasswordError> {
    if password != confirm {
        return Err(PasswordError::Mismatch);
    }
    Ok(())
}

/// The POST sent to end the server session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutRequest {
    pub url: String,
    pub redirect: String,
    pub headers: Vec<(String, String)>,
}

impl LogoutRequest {
    pub const METHOD: &'static str = "POST";

    pub fn new(url: &str, redirect: &str, csrf_header: Option<&str>, csrf_token: &str) -> Self {
        let csrf_header = csrf_header
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_CSRF_HEADER);
        let headers = vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
            (csrf_header.to_string(), csrf_token.to_string()),
        ];
        Self {
            url: url.to_string(),
            redirect: redirect.to_string(),
            headers,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
