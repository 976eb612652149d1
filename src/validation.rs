//! Client-side form checks, run before any request is issued

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::models::SignupForm;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Accepts any URL that mentions a YouTube host
pub fn is_youtube_url(url: &str) -> bool {
    static YOUTUBE: OnceLock<Option<Regex>> = OnceLock::new();
    YOUTUBE
        .get_or_init(|| Regex::new(r"youtube\.com|youtu\.be").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(url))
}

pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if is_blank(username) || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationError> {
    let required = [
        &form.username,
        &form.name,
        &form.email,
        &form.phone_number,
        &form.device_id,
    ];
    if form.password.is_empty() || required.iter().any(|f| is_blank(f)) {
        return Err(ValidationError::MissingFields);
    }
    Ok(())
}

pub fn validate_new_baby(name: &str, age: &str) -> Result<(), ValidationError> {
    if is_blank(name) || is_blank(age) {
        return Err(ValidationError::MissingBabyDetails);
    }
    Ok(())
}

/// A response needs a selected baby, a name and a YouTube URL
pub fn validate_new_response(
    baby: Option<&str>,
    name: &str,
    url: &str,
) -> Result<(), ValidationError> {
    if baby.map_or(true, is_blank) || is_blank(name) || is_blank(url) {
        return Err(ValidationError::MissingFields);
    }
    if !is_youtube_url(url) {
        return Err(ValidationError::InvalidYoutubeUrl);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_youtube_hosts() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=abc"));
        assert!(is_youtube_url("https://youtu.be/abc"));
        assert!(is_youtube_url("https://m.youtube.com/watch?v=abc"));
        // host match is case-sensitive
        assert!(!is_youtube_url("HTTPS://WWW.YOUTUBE.COM/watch?v=abc"));
        assert!(!is_youtube_url("https://example.com/video"));
        assert!(!is_youtube_url("https://vimeo.com/123"));
    }

    #[test]
    fn test_login_requires_both() {
        assert_eq!(validate_login("", "pw"), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_login("anna", ""), Err(ValidationError::MissingCredentials));
        assert_eq!(validate_login("anna", "pw"), Ok(()));
    }

    #[test]
    fn test_signup_requires_everything() {
        let mut form = SignupForm {
            username: "anna".into(),
            password: "pw".into(),
            name: "Anna".into(),
            email: "anna@example.com".into(),
            phone_number: "555".into(),
            device_id: "pi-42".into(),
            ..Default::default()
        };
        assert_eq!(validate_signup(&form), Ok(()));

        form.device_id = "  ".into();
        assert_eq!(validate_signup(&form), Err(ValidationError::MissingFields));
    }

    #[test]
    fn test_new_baby() {
        assert_eq!(
            validate_new_baby("Tommy", ""),
            Err(ValidationError::MissingBabyDetails)
        );
        assert_eq!(validate_new_baby("Tommy", "6 months"), Ok(()));
    }

    #[test]
    fn test_new_response() {
        assert_eq!(
            validate_new_response(None, "Lullaby", "https://youtu.be/x"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_new_response(Some("Tommy"), "", "https://youtu.be/x"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_new_response(Some("Tommy"), "Lullaby", "https://example.com/video"),
            Err(ValidationError::InvalidYoutubeUrl)
        );
        assert_eq!(
            validate_new_response(Some("Tommy"), "Lullaby", "https://youtu.be/x"),
            Ok(())
        );
    }
}
