//! Phone number utilities
//!
//! Phone numbers are opaque identifiers in this service; they are never
//! normalized before lookup. These helpers only prepare them for logs.

/// Mask a phone number for logging (e.g., 111****2333)
///
/// Numbers shorter than seven characters are fully masked.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}
