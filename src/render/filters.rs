use serde_json::Value;

/// Formats a count with thousands separators. Missing or non-numeric input
/// degrades to a displayable string rather than failing the page.
pub fn format_number(value: &Value) -> String {
    match value {
        Value::Null => "0".to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                group_thousands(i)
            } else if let Some(f) = n.as_f64() {
                group_thousands(f as i64)
            } else {
                n.to_string()
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => group_thousands(i),
            Err(_) => s.clone(),
        },
        other => other.to_string(),
    }
}

/// Formats a duration in seconds as M:SS.
pub fn format_duration(value: &Value) -> String {
    let seconds = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match seconds {
        Some(total) if total >= 0 => format!("{}:{:02}", total / 60, total % 60),
        _ => "0:00".to_string(),
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn number_null_is_zero() {
        assert_eq!(format_number(&Value::Null), "0");
    }

    #[test]
    fn number_groups_thousands() {
        assert_eq!(format_number(&json!(0)), "0");
        assert_eq!(format_number(&json!(999)), "999");
        assert_eq!(format_number(&json!(1234)), "1,234");
        assert_eq!(format_number(&json!(1234567)), "1,234,567");
        assert_eq!(format_number(&json!(-45123)), "-45,123");
    }

    #[test]
    fn number_parses_numeric_strings() {
        assert_eq!(format_number(&json!("2048")), "2,048");
    }

    #[test]
    fn number_falls_back_to_string_form() {
        assert_eq!(format_number(&json!("a lot")), "a lot");
        assert_eq!(format_number(&json!(true)), "true");
    }

    #[test]
    fn duration_null_is_zero() {
        assert_eq!(format_duration(&Value::Null), "0:00");
    }

    #[test]
    fn duration_formats_minutes_and_seconds() {
        assert_eq!(format_duration(&json!(125)), "2:05");
        assert_eq!(format_duration(&json!(59)), "0:59");
        assert_eq!(format_duration(&json!(3600)), "60:00");
        assert_eq!(format_duration(&json!("224")), "3:44");
    }

    #[test]
    fn duration_falls_back_on_junk() {
        assert_eq!(format_duration(&json!("soon")), "0:00");
        assert_eq!(format_duration(&json!({"seconds": 10})), "0:00");
    }
}
