//! Small shared helpers.

use chrono::Utc;

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Render `n` in base 36, lowercase, no padding.
fn to_base36(mut n: u64) -> String {
    // 13 digits cover u64::MAX in base 36
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    loop {
        i -= 1;
        buf[i] = BASE36_DIGITS[(n % 36) as usize];
        n /= 36;
        if n == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

/// Generate a stable unique id for a new row: millisecond timestamp plus a
/// random suffix, both base 36. Sorts roughly by creation time and stays
/// filesystem-safe for the blob cache.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::random();
    format!("{}{}", to_base36(millis), to_base36(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(46655), "zzz");
    }

    #[test]
    fn test_generate_id_charset() {
        let id = generate_id();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_generate_id_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }
}
