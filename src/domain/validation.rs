//! Field format checks
//!
//! Two flavours per field: the full check used at submit time and the
//! prefix filter applied on every keystroke.

pub const PHONE_LEN: usize = 8;
pub const BARCODE_LEN: usize = 12;

#[inline]
fn all_ascii_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly `len` ASCII digits
#[inline]
fn is_digits_exact(s: &str, len: usize) -> bool {
    s.len() == len && all_ascii_digits(s)
}

/// Between 0 and `max` ASCII digits
#[inline]
fn is_digits_up_to(s: &str, max: usize) -> bool {
    s.len() <= max && all_ascii_digits(s)
}

pub fn is_valid_phone(s: &str) -> bool {
    is_digits_exact(s, PHONE_LEN)
}

pub fn is_valid_barcode(s: &str) -> bool {
    is_digits_exact(s, BARCODE_LEN)
}

/// Whether `candidate` may become the phone field's value while typing
pub fn accepts_phone_input(candidate: &str) -> bool {
    is_digits_up_to(candidate, PHONE_LEN)
}

/// Whether `candidate` may become the barcode field's value while typing
pub fn accepts_barcode_input(candidate: &str) -> bool {
    is_digits_up_to(candidate, BARCODE_LEN)
}

/// Replace `current` with `candidate` only if the filter accepts it.
/// Returns whether the value changed.
pub fn apply_filtered(current: &mut String, candidate: &str, accepts: fn(&str) -> bool) -> bool {
    if accepts(candidate) {
        *current = candidate.to_string();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_exact_length() {
        assert!(is_valid_phone("06123456"));
        assert!(is_valid_phone("00000000"));
        assert!(!is_valid_phone("0612345"));
        assert!(!is_valid_phone("061234567"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("123"));
    }

    #[test]
    fn test_phone_rejects_non_digits() {
        assert!(!is_valid_phone("0612345a"));
        assert!(!is_valid_phone(" 6123456"));
        assert!(!is_valid_phone("+2161234"));
        // Arabic-Indic digits are not ASCII digits
        assert!(!is_valid_phone("٠١٢٣٤٥٦٧"));
    }

    #[test]
    fn test_barcode_exact_length() {
        assert!(is_valid_barcode("123456789012"));
        assert!(!is_valid_barcode("12345678901"));
        assert!(!is_valid_barcode("1234567890123"));
        assert!(!is_valid_barcode("12345678901x"));
    }

    #[test]
    fn test_all_digit_strings_of_exact_length_pass() {
        for d in 0..=9u8 {
            let c = char::from(b'0' + d);
            assert!(is_valid_phone(&c.to_string().repeat(PHONE_LEN)));
            assert!(is_valid_barcode(&c.to_string().repeat(BARCODE_LEN)));
        }
    }

    #[test]
    fn test_wrong_lengths_fail() {
        for len in 0..20 {
            let s = "7".repeat(len);
            assert_eq!(is_valid_phone(&s), len == PHONE_LEN, "phone len {}", len);
            assert_eq!(is_valid_barcode(&s), len == BARCODE_LEN, "barcode len {}", len);
        }
    }

    #[test]
    fn test_prefix_filters() {
        assert!(accepts_phone_input(""));
        assert!(accepts_phone_input("0612"));
        assert!(accepts_phone_input("06123456"));
        assert!(!accepts_phone_input("061234567"));
        assert!(!accepts_phone_input("06a"));

        assert!(accepts_barcode_input(""));
        assert!(accepts_barcode_input("123456789012"));
        assert!(!accepts_barcode_input("1234567890123"));
        assert!(!accepts_barcode_input("12-4"));
    }

    #[test]
    fn test_rejected_keystrokes_leave_value_unchanged() {
        let mut phone = String::new();
        for c in "06x12-3456789".chars() {
            let mut candidate = phone.clone();
            candidate.push(c);
            let before = phone.clone();
            if !apply_filtered(&mut phone, &candidate, accepts_phone_input) {
                assert_eq!(phone, before);
            }
        }
        assert_eq!(phone, "06123456");

        // Applying the same rejected keystroke twice changes nothing
        assert!(!apply_filtered(&mut phone, "061234567", accepts_phone_input));
        assert!(!apply_filtered(&mut phone, "061234567", accepts_phone_input));
        assert_eq!(phone, "06123456");
    }
}
