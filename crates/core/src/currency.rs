//! Dollar amount formatting

use serde_json::Number;

/// Insert `,` every three digits of an unsigned integer string
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format a value with thousands separators and a fixed number of decimals
///
/// `format_amount(52000.0, 2)` → `"52,000.00"`
pub fn format_amount(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = match formatted.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Tuition style: `$12,076`, keeping cents only when the amount has them
pub fn format_dollars(value: &Number) -> String {
    if let Some(n) = value.as_i64() {
        let sign = if n < 0 { "-" } else { "" };
        return format!("${sign}{}", group_thousands(&n.unsigned_abs().to_string()));
    }
    if let Some(n) = value.as_u64() {
        return format!("${}", group_thousands(&n.to_string()));
    }

    let n = value.as_f64().unwrap_or_default();
    if n.fract() == 0.0 {
        format!("${}", format_amount(n, 0))
    } else {
        format!("${}", format_amount(n, 2))
    }
}

/// Earnings style: always two decimals, `$71,265.00`
pub fn format_dollars_cents(value: &Number) -> String {
    format!("${}", format_amount(value.as_f64().unwrap_or_default(), 2))
}
