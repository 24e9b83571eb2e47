//! Response classifier (§4.6).

use crate::response::HttpResponse;

#[derive(Debug, PartialEq, Eq)]
pub enum Classification {
    Success,
    /// Carries the redirect target.
    TemporaryRedirect(String),
    ServiceError,
}

pub fn classify(response: &HttpResponse) -> Classification {
    if response.is_success() {
        return Classification::Success;
    }
    if response.status_code == 307 {
        if let Some(location) = response.header("Location") {
            if !location.is_empty() {
                return Classification::TemporaryRedirect(location.to_string());
            }
        }
    }
    Classification::ServiceError
}
