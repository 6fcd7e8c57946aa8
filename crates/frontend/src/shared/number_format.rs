//! Number formatting in the es-CO convention: `.` groups thousands and
//! `,` separates decimals.

fn group_thousands(int_part: u64) -> String {
    let digits = int_part.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Format with a fixed number of decimals
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (int_str, frac_str) = match rendered.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rendered.as_str(), None),
    };
    let int_part: u64 = int_str.parse().unwrap_or(0);
    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_str {
        out.push(',');
        out.push_str(frac);
    }
    out
}

/// Quantity: up to two decimals, trailing zeros dropped
pub fn format_quantity(value: f64) -> String {
    let full = format_number(value, 2);
    match full.split_once(',') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{},{}", int, frac)
            }
        }
        None => full,
    }
}

/// Pesos without decimals
pub fn format_money(value: f64) -> String {
    format!("$ {}", format_number(value, 0))
}

/// Value put in an input when editing starts: no grouping, `,` for decimals
pub fn format_for_input(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value);
    match rendered.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int.to_string()
            } else {
                format!("{},{}", int, frac)
            }
        }
        None => rendered,
    }
}

/// `1.500` or `12.345.678`: dots between exact groups of three digits
fn is_grouped_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let mut groups = digits.split('.');
    let Some(first) = groups.next() else {
        return false;
    };
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && (1..=3).contains(&first.len())
        && !first.starts_with('0')
        && first.chars().all(|c| c.is_ascii_digit())
        && rest.iter().all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}

/// Accepts `1.234,5`, `1.500` (thousands) and `1234.5`
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim().trim_start_matches('$').trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if trimmed.contains(',') || is_grouped_integer(trimmed) {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.891, 2), "1.234.567,89");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(-1500.5, 1), "-1.500,5");
        assert_eq!(format_number(-0.001, 2), "0,00");
    }

    #[test]
    fn test_format_quantity_trims_zeros() {
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(12.5), "12,5");
        assert_eq!(format_quantity(2500.25), "2.500,25");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(85000.0), "$ 85.000");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1.234,5"), Some(1234.5));
        assert_eq!(parse_number("1234.5"), Some(1234.5));
        assert_eq!(parse_number("$ 2.000,00"), Some(2000.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("  "), None);
    }

    #[test]
    fn test_dot_groups_are_thousands() {
        assert_eq!(parse_number("1.500"), Some(1500.0));
        assert_eq!(parse_number("12.345.678"), Some(12345678.0));
        assert_eq!(parse_number("0.500"), Some(0.5));
        assert_eq!(parse_number("1.50"), Some(1.5));
        assert_eq!(parse_number("1234.567"), Some(1234.567));
    }

    #[test]
    fn test_formatted_values_read_back() {
        for value in [1000.0, 85000.0, 1234567.0, 2500.25, 12.5] {
            assert_eq!(parse_number(&format_number(value, 2)), Some(value));
            assert_eq!(parse_number(&format_for_input(value, 2)), Some(value));
        }
        assert_eq!(parse_number(&format_number(85000.0, 0)), Some(85000.0));
        assert_eq!(parse_number(&format_money(85000.0)), Some(85000.0));
        assert_eq!(format_for_input(85000.0, 0), "85000");
        assert_eq!(format_for_input(12.5, 2), "12,5");
    }
}
