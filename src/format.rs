// Human-readable byte sizes for log lines

const SUFFIXES: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Binary (1024) scaling, at most two decimals, trailing zeros dropped:
/// 1536 -> "1.5 KB", 0 -> "0 B", 1073741824 -> "1 GB".
pub fn human_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut i = 0;
    while value >= 1024.0 && i < SUFFIXES.len() - 1 {
        value /= 1024.0;
        i += 1;
    }
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", SUFFIXES[i])
}
