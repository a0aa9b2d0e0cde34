//! Column sniffing heuristics.
//!
//! There is no declared schema, so the analyzer guesses which columns carry
//! record identifiers and dates from their names alone.

use once_cell::sync::Lazy;
use regex::Regex;

// Splits "ApplicationNumber", "case_id", "Violation-No" into words
static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z]+(?:[a-z0-9]+)?|[a-z0-9]+").expect("Invalid regex: column word splitter")
});

/// Trailing words that mark a column as a record identifier.
///
/// `number` and `no` are left out: `ClassNumber` or `PhoneNo` describe an
/// attribute shared by many records.
const IDENTIFIER_WORDS: [&str; 4] = ["id", "identifier", "uuid", "guid"];

/// First column whose name contains "date", ignoring case.
///
/// Only the first match is used for timeliness, so `FilingDate` wins over a
/// later `RegistrationDate`.
pub fn find_date_column<S: AsRef<str>>(columns: &[S]) -> Option<&str> {
    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|name| name.to_lowercase().contains("date"))
}

/// Column that identifies individual records, if any.
///
/// Exact candidates are checked first (case, `_`, `-` and spaces ignored).
/// Otherwise the first column whose last name word is `id`, `identifier`,
/// `uuid` or `guid` is returned.
pub fn find_identifier_column<'a, S, C>(columns: &'a [S], candidates: &[C]) -> Option<&'a str>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    let normalized_candidates: Vec<String> = candidates
        .iter()
        .map(|c| normalize_name(c.as_ref()))
        .collect();

    columns
        .iter()
        .map(AsRef::as_ref)
        .find(|name| normalized_candidates.contains(&normalize_name(name)))
        .or_else(|| {
            columns
                .iter()
                .map(AsRef::as_ref)
                .find(|name| has_identifier_suffix(name))
        })
}

fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn has_identifier_suffix(name: &str) -> bool {
    split_words(name)
        .last()
        .is_some_and(|word| IDENTIFIER_WORDS.contains(&word.as_str()))
}

fn split_words(name: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(name)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_date_column_case_insensitive() {
        let cols = ["ApplicationNumber", "filing_DATE", "Status"];
        assert_eq!(find_date_column(&cols), Some("filing_DATE"));
    }

    #[test]
    fn test_find_date_column_takes_first() {
        let cols = ["FilingDate", "RegistrationDate"];
        assert_eq!(find_date_column(&cols), Some("FilingDate"));
    }

    #[test]
    fn test_find_date_column_none() {
        let cols = ["ViolationType", "Year", "City"];
        assert_eq!(find_date_column(&cols), None);
    }

    #[test]
    fn test_find_date_column_matches_substring() {
        // "Updated" contains "date" as a substring and is accepted
        let cols = ["LastUpdated"];
        assert_eq!(find_date_column(&cols), Some("LastUpdated"));
    }

    #[test]
    fn test_identifier_exact_candidate() {
        let cols = ["FilingDate", "application_number", "CaseId"];
        assert_eq!(
            find_identifier_column(&cols, &["ApplicationNumber"]),
            Some("application_number")
        );
    }

    #[test]
    fn test_identifier_suffix_fallback() {
        let cols = ["ViolationType", "CaseId", "City"];
        assert_eq!(
            find_identifier_column(&cols, &["ApplicationNumber"]),
            Some("CaseId")
        );
    }

    #[test]
    fn test_identifier_snake_case_suffix() {
        let cols = ["employer_name", "violation_id"];
        assert_eq!(find_identifier_column::<_, &str>(&cols, &[]), Some("violation_id"));
    }

    #[test]
    fn test_identifier_ignores_attribute_numbers() {
        let cols = ["ClassNumber", "PhoneNumber", "violation_no", "UnitNum"];
        assert_eq!(find_identifier_column(&cols, &["ApplicationNumber"]), None);
    }

    #[test]
    fn test_identifier_ignores_words_ending_in_id() {
        // "Paid" and "Valid" end in "id" but are not identifier words
        let cols = ["AmountPaid", "Valid", "Classification"];
        assert_eq!(find_identifier_column::<_, &str>(&cols, &[]), None);
    }

    #[test]
    fn test_identifier_acronym_suffix() {
        let cols = ["RecordUUID"];
        assert_eq!(find_identifier_column::<_, &str>(&cols, &[]), Some("RecordUUID"));
    }

    #[test]
    fn test_split_words() {
        assert_eq!(split_words("ApplicationNumber"), vec!["application", "number"]);
        assert_eq!(split_words("case_id"), vec!["case", "id"]);
        assert_eq!(split_words("Nice Class 12"), vec!["nice", "class", "12"]);
    }
}
