use bigdecimal::{BigDecimal, Zero};
use std::cmp::Ordering;

use crate::models::{FieldCheck, FieldValue};

const NOT_AVAILABLE: &str = "N/A";

/// 数值容差: |a - b| < 0.01 视为相等
pub fn tolerance() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(100)
}

/// 按 digits 位小数四舍六入五成双，不受位数限制
pub(crate) fn round_half_even(value: &BigDecimal, digits: u32) -> BigDecimal {
    let truncated = value.with_scale(i64::from(digits));
    let step = BigDecimal::from(1) / BigDecimal::from(10u64.pow(digits));
    let doubled = (value - &truncated).abs() * BigDecimal::from(2);

    let away = match doubled.cmp(&step) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => !(truncated.as_bigint_and_exponent().0 % 2u32).is_zero(),
    };
    let rounded = match (away, *value < BigDecimal::zero()) {
        (false, _) => truncated,
        (true, true) => truncated - step,
        (true, false) => truncated + step,
    };
    rounded.with_scale(i64::from(digits))
}

/// 带符号两位小数，例如 "+2.00" / "-0.50"
pub(crate) fn signed_2dp(value: &BigDecimal) -> String {
    let rounded = round_half_even(value, 2);
    if *value > BigDecimal::from(0) {
        format!("+{}", rounded)
    } else {
        rounded.to_string()
    }
}

fn render(label: &str, value: impl std::fmt::Display) -> String {
    format!("{}: {}", label, value)
}

/// 比较两个可选标量
///
/// 规则依次为: 两侧都缺失视为通过；单侧缺失不通过；两侧都能数值化时
/// 按容差比较；否则按去空格、忽略大小写的字符串比较。
pub fn check_values(
    value_a: Option<&FieldValue>,
    value_b: Option<&FieldValue>,
    label_a: &str,
    label_b: &str,
) -> FieldCheck {
    let (a, b) = match (value_a, value_b) {
        (None, None) => {
            return FieldCheck {
                source_a: render(label_a, NOT_AVAILABLE),
                source_b: render(label_b, NOT_AVAILABLE),
                matched: true,
                note: Some("Both values not available".to_string()),
            };
        }
        (None, Some(b)) => {
            return FieldCheck {
                source_a: render(label_a, NOT_AVAILABLE),
                source_b: render(label_b, b),
                matched: false,
                note: Some(format!("Missing value: {} is N/A", label_a)),
            };
        }
        (Some(a), None) => {
            return FieldCheck {
                source_a: render(label_a, a),
                source_b: render(label_b, NOT_AVAILABLE),
                matched: false,
                note: Some(format!("Missing value: {} is N/A", label_b)),
            };
        }
        (Some(a), Some(b)) => (a, b),
    };

    if let (Some(num_a), Some(num_b)) = (a.as_decimal(), b.as_decimal()) {
        let diff = &num_a - &num_b;
        let matched = diff.abs() < tolerance();
        let note = (!matched).then(|| {
            format!(
                "Difference: {} ({}: {}, {}: {})",
                signed_2dp(&diff),
                label_a,
                num_a,
                label_b,
                num_b
            )
        });
        return FieldCheck {
            source_a: render(label_a, &num_a),
            source_b: render(label_b, &num_b),
            matched,
            note,
        };
    }

    let text_a = a.to_string();
    let text_b = b.to_string();
    let matched = text_a.trim().to_lowercase() == text_b.trim().to_lowercase();
    let note = (!matched).then(|| format!("Values differ: {}={}, {}={}", label_a, text_a, label_b, text_b));
    FieldCheck {
        source_a: render(label_a, &text_a),
        source_b: render(label_b, &text_b),
        matched,
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn num(s: &str) -> FieldValue {
        FieldValue::Number(BigDecimal::from_str(s).unwrap())
    }

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn tolerance_boundary() {
        let inside = check_values(Some(&num("10.0099")), Some(&num("10")), "A", "B");
        assert!(inside.matched);
        assert_eq!(inside.note, None);

        let at = check_values(Some(&num("10.01")), Some(&num("10")), "A", "B");
        assert!(!at.matched);
        assert_eq!(at.note.as_deref(), Some("Difference: +0.01 (A: 10.01, B: 10)"));
    }

    #[test]
    fn absence_symmetry() {
        let both = check_values(None, None, "A", "B");
        assert!(both.matched);
        assert_eq!(both.source_a, "A: N/A");
        assert_eq!(both.note.as_deref(), Some("Both values not available"));

        let left = check_values(None, Some(&num("5")), "A", "B");
        assert!(!left.matched);
        assert_eq!(left.note.as_deref(), Some("Missing value: A is N/A"));

        let right = check_values(Some(&num("5")), None, "A", "B");
        assert!(!right.matched);
        assert_eq!(right.note.as_deref(), Some("Missing value: B is N/A"));
    }

    #[test]
    fn numeric_looking_strings_compare_as_numbers() {
        let check = check_values(Some(&text("100")), Some(&text("100.0")), "PO", "INV");
        assert!(check.matched);
        assert_eq!(check.source_a, "PO: 100");
        assert_eq!(check.source_b, "INV: 100.0");
    }

    #[test]
    fn negative_difference_is_signed() {
        let check = check_values(Some(&num("8")), Some(&num("10.5")), "DN", "INV");
        assert!(!check.matched);
        assert!(check.note.unwrap().starts_with("Difference: -2.50"));
    }

    #[test]
    fn extreme_exponent_text_compares_as_text() {
        let check = check_values(Some(&text("1e-2000000000")), Some(&text("1")), "PO", "DN");
        assert!(!check.matched);
        assert_eq!(check.source_a, "PO: 1e-2000000000");
        assert_eq!(check.note.as_deref(), Some("Values differ: PO=1e-2000000000, DN=1"));
    }

    #[test]
    fn long_values_report_difference() {
        let long = "123456789012345678901234567890123456789012.5";
        let check = check_values(Some(&text(long)), Some(&num("0")), "A", "B");
        assert!(!check.matched);
        assert!(check
            .note
            .unwrap()
            .starts_with("Difference: +123456789012345678901234567890123456789012.50"));
    }

    #[test]
    fn rounding_is_half_even() {
        let r = |s: &str, d| round_half_even(&BigDecimal::from_str(s).unwrap(), d).to_string();
        assert_eq!(r("0.5", 0), "0");
        assert_eq!(r("1.5", 0), "2");
        assert_eq!(r("2.5", 0), "2");
        assert_eq!(r("2.51", 0), "3");
        assert_eq!(r("-2.5", 0), "-2");
        assert_eq!(r("-3.5", 0), "-4");
        assert_eq!(r("0.125", 2), "0.12");
        assert_eq!(r("0.135", 2), "0.14");
        assert_eq!(r("7", 2), "7.00");
    }

    #[test]
    fn text_falls_back_to_case_insensitive_equality() {
        assert!(check_values(Some(&text(" Box ")), Some(&text("box")), "A", "B").matched);

        let differ = check_values(Some(&text("box")), Some(&text("pallet")), "A", "B");
        assert!(!differ.matched);
        assert_eq!(differ.note.as_deref(), Some("Values differ: A=box, B=pallet"));
    }
}
