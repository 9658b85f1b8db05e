use chrono::NaiveDate;

/// Day-first layouts for four-digit years. Year-first ISO dates are accepted
/// too since they cannot be read ambiguously.
const FOUR_DIGIT_YEAR_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d"];

/// Day-first layouts for two-digit years. `%Y` would read "23" as year 23, so
/// these must be chosen up front rather than tried as a fallback.
const TWO_DIGIT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d-%m-%y", "%d.%m.%y"];

/// Parses a transaction date using the day-first convention.
///
/// Returns `None` when the text is not a valid calendar date under any of the
/// accepted layouts. A trailing time component (`"24/11/2023 10:15"`) is ignored.
pub fn parse_day_first_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    if date_part.is_empty() {
        return None;
    }

    let mut parts = date_part.split(['/', '-', '.']);
    let first_len = parts.next().map_or(0, str::len);
    let last_len = parts.last().map_or(0, str::len);

    let formats = if first_len == 4 || last_len == 4 {
        FOUR_DIGIT_YEAR_FORMATS
    } else if last_len == 2 {
        TWO_DIGIT_YEAR_FORMATS
    } else {
        return None;
    };

    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

pub fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Parses a user supplied month name ("January", "jan", "MARCH") into its
/// canonical full English name.
pub fn canonical_month_name(name: &str) -> Option<&'static str> {
    name.trim()
        .parse::<chrono::Month>()
        .ok()
        .map(|month| month.name())
}

pub fn format_thousands(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    if n < 0 {
        result.push('-');
    }
    result.chars().rev().collect()
}

/// Renders a money amount rounded to whole units with thousands separators,
/// e.g. `format_currency(1234567.4, "₹") == "₹1,234,567"`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{}0", symbol);
    }
    format!("{}{}", symbol, format_thousands(value.round() as i64))
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
