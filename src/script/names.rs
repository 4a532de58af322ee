//! Uniqueness sources for generated script names.
//!
//! A name source only proposes candidates. Collisions with files that already
//! exist are resolved by exclusive creation in the initializer, which asks for
//! another candidate.
use std::io;

use crate::util::id::base36_padded;

/// Supplies candidate file-name stems for generated scripts.
pub trait NameSource {
    fn next_name(&mut self) -> io::Result<String>;
}

/// Names drawn from OS randomness: 13 base36 characters (64 bits).
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomNames;

impl NameSource for RandomNames {
    fn next_name(&mut self) -> io::Result<String> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf)
            .map_err(|e| io::Error::other(format!("random name source failed: {e}")))?;
        Ok(base36_padded(u64::from_le_bytes(buf), 13))
    }
}

/// Deterministic counter-based names (`000000`, `000001`, ...).
#[derive(Debug, Clone)]
pub struct SequentialNames {
    next: u64,
    width: usize,
}

impl SequentialNames {
    pub fn new(start: u64) -> Self {
        Self {
            next: start,
            width: 6,
        }
    }
}

impl Default for SequentialNames {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NameSource for SequentialNames {
    fn next_name(&mut self) -> io::Result<String> {
        let n = self.next;
        self.next = self
            .next
            .checked_add(1)
            .ok_or_else(|| io::Error::other("sequential name source exhausted"))?;
        Ok(base36_padded(n, self.width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_names_are_deterministic() {
        let mut a = SequentialNames::new(35);
        assert_eq!(a.next_name().unwrap(), "00000z");
        assert_eq!(a.next_name().unwrap(), "000010");
    }

    #[test]
    fn test_sequential_names_report_overflow() {
        let mut a = SequentialNames::new(u64::MAX);
        assert!(a.next_name().is_err());
    }

    #[test]
    fn test_random_names_shape_and_spread() {
        let mut r = RandomNames;
        let mut seen = HashSet::new();
        for _ in 0..64 {
            let n = r.next_name().unwrap();
            assert_eq!(n.len(), 13, "{n}");
            assert!(n.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
            seen.insert(n);
        }
        assert_eq!(seen.len(), 64);
    }
}
