use chrono::{NaiveDate, NaiveDateTime};

/// A cell interpreted as the most specific scalar it can be.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Empty,
    Number(f64),
    Date(NaiveDate),
    Text,
}

impl Scalar {
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if let Some(n) = parse_amount(trimmed) {
            return Self::Number(n);
        }
        if let Some(d) = parse_date(trimmed) {
            return Self::Date(d);
        }
        Self::Text
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Empty => ColumnKind::Empty,
            Self::Number(_) => ColumnKind::Number,
            Self::Date(_) => ColumnKind::Date,
            Self::Text => ColumnKind::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Empty,
    Number,
    Date,
    Text,
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Number => "number",
            Self::Date => "date",
            Self::Text => "text",
        }
    }

    /// Combine the kinds of two cells of the same column. Empty cells don't
    /// change a column's kind; any disagreement degrades to text.
    pub fn merge(self, other: ColumnKind) -> ColumnKind {
        match (self, other) {
            (Self::Empty, k) | (k, Self::Empty) => k,
            (a, b) if a == b => a,
            _ => Self::Text,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

/// Parse a money-ish cell: `1,234.56`, `$12`, `"500.00"`, `(5.00)` for negatives.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace([',', '"', '$'], "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return inner.trim().parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| -v);
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("\"500.00\""), Some(500.0));
        assert_eq!(parse_amount("  -42.50  "), Some(-42.5));
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("not_a_number"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_parse_amount_parenthesized_negatives() {
        assert_eq!(parse_amount("(500.00)"), Some(-500.0));
        assert_eq!(parse_amount("(1,234.56)"), Some(-1234.56));
    }

    #[test]
    fn test_parse_amount_currency_symbol() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("-$50.00"), Some(-50.0));
    }

    #[test]
    fn test_parse_date_formats() {
        let jan15 = NaiveDate::from_ymd_opt(2025, 1, 15);
        assert_eq!(parse_date("2025-01-15"), jan15);
        assert_eq!(parse_date("01/15/2025"), jan15);
        assert_eq!(parse_date("2025/01/15"), jan15);
        assert_eq!(parse_date("2025-01-15 08:30:00"), jan15);
        assert_eq!(parse_date("2025-01-15T08:30:00"), jan15);
    }

    #[test]
    fn test_parse_date_rejects_invalid_dates() {
        assert_eq!(parse_date("13/01/2025"), None);
        assert_eq!(parse_date("02/30/2025"), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_scalar_infer() {
        assert_eq!(Scalar::infer("  "), Scalar::Empty);
        assert_eq!(Scalar::infer("12.50"), Scalar::Number(12.5));
        assert_eq!(
            Scalar::infer("2024-01-01"),
            Scalar::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(Scalar::infer("Lunch"), Scalar::Text);
        assert_eq!(Scalar::infer("12.50").as_date(), None);
        assert_eq!(
            Scalar::infer(" 01/15/2025 ").as_date(),
            NaiveDate::from_ymd_opt(2025, 1, 15)
        );
    }

    #[test]
    fn test_column_kind_merge() {
        assert_eq!(ColumnKind::Empty.merge(ColumnKind::Number), ColumnKind::Number);
        assert_eq!(ColumnKind::Number.merge(ColumnKind::Empty), ColumnKind::Number);
        assert_eq!(ColumnKind::Date.merge(ColumnKind::Date), ColumnKind::Date);
        assert_eq!(ColumnKind::Number.merge(ColumnKind::Date), ColumnKind::Text);
    }
}
