use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Same character classes as `char::is_alphanumeric`.
    static ref RE: Regex = Regex::new(r"[\p{Alphabetic}\p{N}]+").expect("valid regex");
}

/// Tokenize text into lowercase alphanumeric terms, in document order.
///
/// Every run of non-alphanumeric characters is a separator. A term's position
/// is its index in the returned vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    RE.find_iter(&lowered).map(|m| m.as_str().to_string()).collect()
}
