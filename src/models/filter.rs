use std::collections::HashMap;

/// Filters accepted by the range listing.
///
/// Built fresh from URL query parameters on every request. Keys the
/// listing does not know about are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    pub country: Option<String>,
}

impl QueryFilter {
    pub const COUNTRY: &'static str = "country";

    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let country = params
            .get(Self::COUNTRY)
            .filter(|value| !value.trim().is_empty())
            .cloned();

        Self { country }
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none()
    }
}
