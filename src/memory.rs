use std::fs;

const PAGE_SIZE: u64 = 4096;

/// Resident set size of this process in bytes, from `/proc/self/statm`.
/// Returns 0 where the file is unavailable (non-Linux) so status reporting
/// degrades instead of failing.
pub(crate) fn resident_bytes() -> u64 {
    let text = match fs::read_to_string("/proc/self/statm") {
        Ok(text) => text,
        Err(_) => return 0,
    };
    text.split_whitespace()
        .nth(1)
        .and_then(|pages| pages.parse::<u64>().ok())
        .map(|pages| pages * PAGE_SIZE)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_os = "linux")]
    fn reports_nonzero_on_linux() {
        assert!(resident_bytes() > 0);
    }
}
