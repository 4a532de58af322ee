/// Lowercase base36 rendering used for compact script names.
fn base36(mut v: u64) -> String {
    let alphabet = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if v == 0 {
        return "0".to_string();
    }
    let mut s = String::new();
    while v > 0 {
        let idx = (v % 36) as usize;
        s.push(alphabet[idx] as char);
        v /= 36;
    }
    s.chars().rev().collect()
}

/// Base36 left-padded with zeros to at least `width` characters.
pub fn base36_padded(v: u64, width: usize) -> String {
    format!("{:0>width$}", base36(v), width = width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base36_values() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(u64::MAX), "3w5e11264sgsf");
    }

    #[test]
    fn test_base36_padded() {
        assert_eq!(base36_padded(1, 6), "000001");
        assert_eq!(base36_padded(36, 2), "10");
        assert_eq!(base36_padded(36, 1), "10");
    }
}
