/// Formatting-while-typing masks.
///
/// Pure string transforms keyed only on the digits of the raw input. Nothing
/// here validates.
use crate::contact::digits_only;

/// "0812345678" -> "081-234-5678", progressively as digits arrive
pub fn format_phone(input: &str) -> String {
    let digits = digits_only(input);
    let digits = &digits[..digits.len().min(10)];

    match digits.len() {
        0..=3 => digits.to_string(),
        4..=6 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => format!("{}-{}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

/// "09122025" -> "09/12/2025", progressively as digits arrive
pub fn format_date_input(input: &str) -> String {
    let digits = digits_only(input);
    let digits = &digits[..digits.len().min(8)];

    match digits.len() {
        0..=2 => digits.to_string(),
        3..=4 => format!("{}/{}", &digits[..2], &digits[2..]),
        _ => format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_mask_progression() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("081"), "081");
        assert_eq!(format_phone("0812"), "081-2");
        assert_eq!(format_phone("081234"), "081-234");
        assert_eq!(format_phone("0812345"), "081-234-5");
        assert_eq!(format_phone("0812345678"), "081-234-5678");
    }

    #[test]
    fn test_phone_mask_ignores_non_digits_and_overflow() {
        assert_eq!(format_phone("081-234-5678"), "081-234-5678");
        assert_eq!(format_phone("(081) 234 56789"), "081-234-5678");
    }

    #[test]
    fn test_phone_mask_does_not_validate() {
        assert_eq!(format_phone("0712345678"), "071-234-5678");
    }

    #[test]
    fn test_date_mask_progression() {
        assert_eq!(format_date_input("0"), "0");
        assert_eq!(format_date_input("091"), "09/1");
        assert_eq!(format_date_input("0912"), "09/12");
        assert_eq!(format_date_input("09122"), "09/12/2");
        assert_eq!(format_date_input("091220251"), "09/12/2025");
        assert_eq!(format_date_input("09/12/2025"), "09/12/2025");
    }
}
