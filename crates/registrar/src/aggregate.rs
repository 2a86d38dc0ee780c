//! Chart-ready summaries of a registration list.
//!
//! Both aggregations are pure functions of the list they are given. They keep
//! no state between calls, so callers recompute them whenever the list
//! changes. Output slices appear in the order their key is first seen in the
//! input.

use std::fmt;

use serde::Serialize;

use crate::registration::Registration;

/// Slice colours, assigned by slice index and cycling when exhausted.
pub const PALETTE: [&str; 5] = ["#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6"];

/// Colour for the slice at `index`.
#[must_use]
pub fn slice_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Age buckets used by the age distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgeBucket {
    /// Younger than 18.
    Under18,
    /// 18 through 30 inclusive.
    From18To30,
    /// 31 through 45 inclusive.
    From31To45,
    /// 46 through 60 inclusive.
    From46To60,
    /// Older than 60.
    Over60,
}

impl AgeBucket {
    /// Bucket containing `age`.
    #[must_use]
    pub fn for_age(age: i64) -> Self {
        match age {
            i64::MIN..=17 => Self::Under18,
            18..=30 => Self::From18To30,
            31..=45 => Self::From31To45,
            46..=60 => Self::From46To60,
            _ => Self::Over60,
        }
    }

    /// Chart label for this bucket.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Under18 => "Under 18",
            Self::From18To30 => "18-30",
            Self::From31To45 => "31-45",
            Self::From46To60 => "46-60",
            Self::Over60 => "60+",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse the integer at the start of `text`.
///
/// Leading whitespace is skipped and one optional `+` or `-` sign is accepted.
/// The longest following run of ASCII digits is the value, so `"25abc"` is 25.
/// Returns `None` when no digit follows. Out-of-range values saturate.
#[must_use]
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen_digit = false;
    let mut value: i64 = 0;
    for digit in digits {
        seen_digit = true;
        let digit = i64::from(digit - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}

/// One labelled slice of a pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSlice {
    /// Category label.
    pub name: String,
    /// Number of records in the category.
    pub value: usize,
}

/// An ordered sequence of chart slices.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChartSeries {
    slices: Vec<ChartSlice>,
}

impl ChartSeries {
    /// Count occurrences of each key, keeping first-occurrence order.
    #[must_use]
    pub fn tally<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut slices: Vec<ChartSlice> = Vec::new();
        for key in keys {
            match slices.iter_mut().find(|slice| slice.name == key) {
                Some(slice) => slice.value += 1,
                None => slices.push(ChartSlice {
                    name: key.to_string(),
                    value: 1,
                }),
            }
        }
        Self { slices }
    }

    /// The slices in order.
    #[must_use]
    pub fn slices(&self) -> &[ChartSlice] {
        &self.slices
    }

    /// The slices as `(label, count)` pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, usize)> {
        self.slices
            .iter()
            .map(|slice| (slice.name.as_str(), slice.value))
            .collect()
    }

    /// Sum of all slice counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.slices.iter().map(|slice| slice.value).sum()
    }

    /// Whether the series has no slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Share of the slice at `index` in percent, or `None` if out of range.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percentage(&self, index: usize) -> Option<f64> {
        let slice = self.slices.get(index)?;
        let total = self.total();
        if total == 0 {
            return Some(0.0);
        }
        Some(slice.value as f64 * 100.0 / total as f64)
    }
}

/// Count records per age bucket.
///
/// Records whose `age` has no leading integer are skipped. Buckets without
/// members are omitted.
#[must_use]
pub fn age_distribution(records: &[Registration]) -> ChartSeries {
    ChartSeries::tally(
        records
            .iter()
            .filter_map(|record| parse_leading_int(&record.details.age))
            .map(|age| AgeBucket::for_age(age).label()),
    )
}

/// Count records per distinct non-empty gender value.
///
/// Values are grouped by exact string equality; no case folding or trimming.
#[must_use]
pub fn gender_distribution(records: &[Registration]) -> ChartSeries {
    ChartSeries::tally(
        records
            .iter()
            .map(|record| record.details.gender.as_str())
            .filter(|gender| !gender.is_empty()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::RegistrationForm;

    fn record(id: &str, age: &str, gender: &str) -> Registration {
        Registration::new(
            id,
            RegistrationForm {
                full_name: format!("Person {id}"),
                email: format!("{id}@example.com"),
                age: age.to_string(),
                gender: gender.to_string(),
                ..RegistrationForm::default()
            },
        )
    }

    fn with_ages(ages: &[&str]) -> Vec<Registration> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| record(&i.to_string(), age, ""))
            .collect()
    }

    fn with_genders(genders: &[&str]) -> Vec<Registration> {
        genders
            .iter()
            .enumerate()
            .map(|(i, gender)| record(&i.to_string(), "", gender))
            .collect()
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("25"), Some(25));
        assert_eq!(parse_leading_int("25abc"), Some(25));
        assert_eq!(parse_leading_int("  42"), Some(42));
        assert_eq!(parse_leading_int("+7"), Some(7));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("007"), Some(7));
        assert_eq!(parse_leading_int("30.9"), Some(30));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("a25"), None);
    }

    #[test]
    fn test_parse_leading_int_saturates() {
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-99999999999999999999999"), Some(i64::MIN));
    }

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (17, "Under 18"),
            (18, "18-30"),
            (30, "18-30"),
            (31, "31-45"),
            (45, "31-45"),
            (46, "46-60"),
            (60, "46-60"),
            (61, "60+"),
            (0, "Under 18"),
            (-4, "Under 18"),
            (120, "60+"),
        ];
        for (age, label) in cases {
            assert_eq!(AgeBucket::for_age(age).label(), label, "age {age}");
        }
    }

    #[test]
    fn test_age_distribution_scenario() {
        let records = with_ages(&["15", "25", "61"]);
        assert_eq!(
            age_distribution(&records).pairs(),
            vec![("Under 18", 1), ("18-30", 1), ("60+", 1)]
        );
    }

    #[test]
    fn test_age_distribution_first_occurrence_order() {
        let records = with_ages(&["70", "20", "70", "10", "20", "20"]);
        assert_eq!(
            age_distribution(&records).pairs(),
            vec![("60+", 2), ("18-30", 3), ("Under 18", 1)]
        );
    }

    #[test]
    fn test_age_distribution_skips_non_numeric() {
        let records = with_ages(&["", "abc", "  ", "33", "25abc"]);
        let series = age_distribution(&records);
        assert_eq!(series.pairs(), vec![("31-45", 1), ("18-30", 1)]);
        assert_eq!(series.total(), 2);
    }

    #[test]
    fn test_age_distribution_total_matches_parseable() {
        let ages = ["1", "18", "x", "45", "46", "", "60", "61", "200", "n/a"];
        let records = with_ages(&ages);
        let parseable = ages
            .iter()
            .filter(|age| parse_leading_int(age).is_some())
            .count();
        assert_eq!(age_distribution(&records).total(), parseable);
    }

    #[test]
    fn test_gender_distribution_scenario() {
        let records = with_genders(&["Male", "Male", "Female"]);
        assert_eq!(
            gender_distribution(&records).pairs(),
            vec![("Male", 2), ("Female", 1)]
        );
    }

    #[test]
    fn test_gender_distribution_exact_matching() {
        let records = with_genders(&["Female", "female", "", " Female", "Female"]);
        let series = gender_distribution(&records);
        assert_eq!(
            series.pairs(),
            vec![("Female", 2), ("female", 1), (" Female", 1)]
        );
        assert_eq!(series.total(), 4);
    }

    #[test]
    fn test_non_numeric_age_still_counts_for_gender() {
        let records = vec![record("1", "abc", "Male")];
        assert!(age_distribution(&records).is_empty());
        assert_eq!(gender_distribution(&records).pairs(), vec![("Male", 1)]);
    }

    #[test]
    fn test_aggregations_are_idempotent() {
        let records = vec![
            record("1", "22", "Male"),
            record("2", "50", "Female"),
            record("3", "", "Male"),
        ];
        assert_eq!(age_distribution(&records), age_distribution(&records));
        assert_eq!(gender_distribution(&records), gender_distribution(&records));
    }

    #[test]
    fn test_empty_input() {
        assert!(age_distribution(&[]).is_empty());
        assert!(gender_distribution(&[]).is_empty());
        assert_eq!(ChartSeries::default().total(), 0);
    }

    #[test]
    fn test_percentage() {
        let series = ChartSeries::tally(["a", "b", "a", "a"]);
        assert_eq!(series.percentage(0), Some(75.0));
        assert_eq!(series.percentage(1), Some(25.0));
        assert_eq!(series.percentage(2), None);
    }

    #[test]
    fn test_slice_color_cycles() {
        assert_eq!(slice_color(0), "#3B82F6");
        assert_eq!(slice_color(4), "#8B5CF6");
        assert_eq!(slice_color(5), "#3B82F6");
    }

    #[test]
    fn test_series_serializes_as_name_value_objects() {
        let series = ChartSeries::tally(["Male", "Male"]);
        let json = serde_json::to_string(&series).unwrap();
        assert_eq!(json, r#"[{"name":"Male","value":2}]"#);
    }
}
