const MEGABYTE: usize = 1024 * 1024;

/// Число с разделителями разрядов (точками)
///
/// ```
/// use catalog_backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// ```
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut groups: Vec<&str> = Vec::new();
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend(
        digits.as_bytes()[head..]
            .chunks(3)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok()),
    );
    groups.join(".")
}

/// Размер тела ответа: байты с разрядами до мегабайта, дальше МБ
pub fn format_size(bytes: usize) -> String {
    if bytes < MEGABYTE {
        format!("{} B", format_number(bytes))
    } else {
        format!("{:.1} MB", bytes as f64 / MEGABYTE as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(45000), "45.000");
        assert_eq!(format_number(1234567890), "1.234.567.890");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(20480), "20.480 B");
        assert_eq!(format_size(3 * MEGABYTE / 2), "1.5 MB");
    }
}
