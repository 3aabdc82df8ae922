/// Storage name generation
///
/// Names are `<epoch millis>.<extension>`. The millisecond value is bumped
/// past the last one issued, so two captures inside the same millisecond
/// (or a clock that steps backwards) still get distinct, ordered names.

use chrono::Utc;

#[derive(Debug, Clone)]
pub struct NameGenerator {
    extension: String,
    last_millis: i64,
}

impl NameGenerator {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            last_millis: 0,
        }
    }

    /// Next name for a capture happening now
    pub fn next_name(&mut self, taken: impl Fn(&str) -> bool) -> String {
        self.next_name_at(Utc::now().timestamp_millis(), taken)
    }

    /// Next name for a capture at `now_millis`, skipping any name `taken` reports in use
    pub fn next_name_at(&mut self, now_millis: i64, taken: impl Fn(&str) -> bool) -> String {
        let mut millis = now_millis.max(self.last_millis + 1);
        loop {
            let name = format!("{}.{}", millis, self.extension);
            if !taken(&name) {
                self.last_millis = millis;
                return name;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_timestamp() {
        let mut names = NameGenerator::new("jpeg");
        assert_eq!(names.next_name_at(1_700_000_000_123, |_| false), "1700000000123.jpeg");
    }

    #[test]
    fn test_same_millisecond_bumped() {
        let mut names = NameGenerator::new("jpeg");
        let first = names.next_name_at(1_000, |_| false);
        let second = names.next_name_at(1_000, |_| false);
        let third = names.next_name_at(999, |_| false);

        assert_eq!(first, "1000.jpeg");
        assert_eq!(second, "1001.jpeg");
        assert_eq!(third, "1002.jpeg");
    }

    #[test]
    fn test_taken_names_skipped() {
        let mut names = NameGenerator::new("jpeg");
        let name = names.next_name_at(5, |n| n == "5.jpeg" || n == "6.jpeg");
        assert_eq!(name, "7.jpeg");
    }

    #[test]
    fn test_wall_clock_names_are_digits() {
        let mut names = NameGenerator::new("jpeg");
        let name = names.next_name(|_| false);
        let (stem, ext) = name.split_once('.').unwrap();
        assert_eq!(ext, "jpeg");
        assert!(!stem.is_empty() && stem.chars().all(|c| c.is_ascii_digit()));
    }
}
