use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Last path component of a file path.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// `12-40`, `12`, or nothing when the start line is unknown.
pub fn line_span(start: Option<u32>, end: Option<u32>) -> Option<String> {
    let start = start?;
    Some(match end.filter(|end| *end > start) {
        Some(end) => format!("{start}-{end}"),
        None => start.to_string(),
    })
}

pub fn format_score(value: f64) -> String {
    if value == 0.0 {
        "0".to_owned()
    } else if value.abs() < 0.001 {
        format!("{value:.2e}")
    } else {
        format!("{value:.4}")
    }
}

/// Deterministic pseudo-random pair in `[-1, 1]²` derived from `id`.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_keeps_the_last_component() {
        assert_eq!(file_name("src/pkg/mod.py"), "mod.py");
        assert_eq!(file_name("win\\pkg\\mod.py"), "mod.py");
        assert_eq!(file_name("setup.py"), "setup.py");
    }

    #[test]
    fn stable_pair_is_deterministic_and_bounded() {
        let first = stable_pair("a::b");
        assert_eq!(first, stable_pair("a::b"));
        assert!((-1.0..=1.0).contains(&first.0) && (-1.0..=1.0).contains(&first.1));
    }

    #[test]
    fn line_spans_collapse_to_the_start_line() {
        assert_eq!(line_span(Some(12), Some(40)).as_deref(), Some("12-40"));
        assert_eq!(line_span(Some(12), Some(12)).as_deref(), Some("12"));
        assert_eq!(line_span(Some(12), None).as_deref(), Some("12"));
        assert_eq!(line_span(None, Some(40)), None);
    }

    #[test]
    fn scores_format_compactly() {
        assert_eq!(format_score(0.0), "0");
        assert_eq!(format_score(0.12345), "0.1235");
        assert_eq!(format_score(0.00012), "1.20e-4");
    }
}
