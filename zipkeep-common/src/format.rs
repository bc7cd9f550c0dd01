// zipkeep-common/src/format.rs

const ABBREVS: [(u64, &str); 6] = [
    (1 << 50, "PB"),
    (1 << 40, "TB"),
    (1 << 30, "GB"),
    (1 << 20, "MB"),
    (1 << 10, "kB"),
    (1, "bytes"),
];

/// Human-readable rendering of a byte count. Picks the greatest unit whose
/// threshold the count meets or exceeds.
pub fn humanize_bytes(bytes: u64) -> String {
    if bytes == 1 {
        return "1 byte".to_string();
    }
    let (factor, suffix) = ABBREVS
        .iter()
        .find(|(factor, _)| bytes >= *factor)
        .copied()
        .unwrap_or((1, "bytes"));
    format!("{:.2} {}", bytes as f64 / factor as f64, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_byte_is_singular() {
        assert_eq!(humanize_bytes(1), "1 byte");
    }

    #[test]
    fn zero_bytes() {
        assert_eq!(humanize_bytes(0), "0.00 bytes");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(humanize_bytes(1023), "1023.00 bytes");
        assert_eq!(humanize_bytes(1024), "1.00 kB");
        assert_eq!(humanize_bytes(1 << 20), "1.00 MB");
        assert_eq!(humanize_bytes(1 << 30), "1.00 GB");
        assert_eq!(humanize_bytes(1 << 40), "1.00 TB");
        assert_eq!(humanize_bytes(1 << 50), "1.00 PB");
    }

    #[test]
    fn fractional_values() {
        assert_eq!(humanize_bytes(1536), "1.50 kB");
        assert_eq!(humanize_bytes((1 << 30) + (1 << 29)), "1.50 GB");
    }
}
