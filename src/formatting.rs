use chrono::{DateTime, Local};

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

pub fn format_timestamp(datetime: &DateTime<Local>) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

/// Tamaño legible en base 1024 con hasta dos decimales (`1.5 KB`).
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit_index = 0;

    while value >= 1024.0 && unit_index < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::format_size;

    #[test]
    fn format_size_matches_units() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_size(1_288_490_189), "1.2 GB");
    }
}
