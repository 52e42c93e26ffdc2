// src/product.rs
//! Product identifier extraction from Tiki product page URLs.

use once_cell::sync::Lazy;
use regex::Regex;

static PRODUCT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-p(\d+)\.html").expect("product id regex"));

/// Extract the numeric product id from a URL such as
/// `https://tiki.vn/some-product-p12345.html?spid=1`.
///
/// The first `-p<digits>.html` occurrence anywhere in the string wins.
/// Anything else (including garbage input) yields `None`.
pub fn extract_product_id(url: &str) -> Option<String> {
    PRODUCT_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_digits_before_html_suffix() {
        assert_eq!(
            extract_product_id("https://tiki.vn/dien-thoai-abc-p12345.html"),
            Some("12345".to_string())
        );
    }

    #[test]
    fn query_string_after_suffix_is_ignored() {
        assert_eq!(
            extract_product_id("https://tiki.vn/x-p987.html?spid=42&src=home"),
            Some("987".to_string())
        );
    }

    #[test]
    fn missing_pattern_is_none() {
        assert_eq!(extract_product_id("https://tiki.vn/search?q=phone"), None);
        assert_eq!(extract_product_id("-p.html"), None);
        assert_eq!(extract_product_id("p12345.html"), None);
        assert_eq!(extract_product_id(""), None);
    }
}
