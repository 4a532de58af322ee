#![allow(dead_code)]

use std::io::{self, Write};
use std::path::Path;

pub fn read_script(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("read script {}: {e}", path.display()))
}

pub fn line_count(path: &Path) -> usize {
    read_script(path).lines().count()
}

/// Writer that accepts `budget` bytes and then fails like a full disk.
pub struct FullAfter {
    pub written: Vec<u8>,
    budget: usize,
}

impl FullAfter {
    pub fn new(budget: usize) -> Self {
        Self {
            written: Vec::new(),
            budget,
        }
    }
}

impl Write for FullAfter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.budget == 0 {
            return Err(io::Error::other("no space left on device"));
        }
        let n = buf.len().min(self.budget);
        self.written.extend_from_slice(&buf[..n]);
        self.budget -= n;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
