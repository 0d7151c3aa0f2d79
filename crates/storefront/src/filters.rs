//! Askama filters shared by the storefront templates.

use std::fmt::Display;

use chrono::Datelike;

/// Year shown in the footer.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    Ok(chrono::Local::now().year())
}

/// A quantity followed by `item` or `items`.
///
/// Usage in templates: `{{ cart.item_count|items }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn items(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(count_label(&count.to_string()))
}

fn count_label(count: &str) -> String {
    let noun = if count == "1" { "item" } else { "items" };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label() {
        assert_eq!(count_label("0"), "0 items");
        assert_eq!(count_label("1"), "1 item");
        assert_eq!(count_label("12"), "12 items");
    }
}
