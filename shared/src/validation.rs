//! Input validation functions
//!
//! Field rules for categories and links live here so that the backend
//! and any client apply the same checks before anything is persisted.

/// User-Agent fragments accepted by the mobile-only device check
pub const MOBILE_USER_AGENT_MARKERS: &[&str] = &["Android", "iPhone", "iPad"];

/// Validate a category name
pub fn validate_category_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Category name is required".to_string());
    }
    Ok(())
}

/// Validate the required link fields
pub fn validate_link_fields(title: &str, url: &str, category_id: i64) -> Result<(), String> {
    if title.trim().is_empty() || url.trim().is_empty() || category_id <= 0 {
        return Err("Title, URL, and category are required".to_string());
    }
    Ok(())
}

/// Check whether a User-Agent header identifies a phone or tablet
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_USER_AGENT_MARKERS
        .iter()
        .any(|marker| user_agent.contains(marker))
}
