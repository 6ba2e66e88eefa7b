//! Format: native value → nGQL literal.
//!
//! | Native kind | Accepted hints | Literal |
//! |-------------|----------------|---------|
//! | bool | none, bool | `true` / `false` |
//! | integers | none, int, float | decimal digits |
//! | floats | none, float / int | shortest general notation / truncated |
//! | text | none, string / date, time, datetime | `"..."` / `date("...")` ... |
//! | date-time | none, datetime / date / time | `datetime("...")` ... |
//! | date | none, date / datetime | `date("...")` / `datetime("...T00:00:00")` |
//! | time | none, time | `time("...")` |
//! | sequence | none, list / set | `[a, b]` / `set{a, b}` |
//! | set | none, set / list | `set{a, b}` / `[a, b]` |
//! | map | none, map / set | `map{k: v}` / `set{k1, k2}` |
//! | absent option | any / empty | `NULL` / `_EMPTY_` |
//!
//! Elements and entries are formatted without a hint.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::config::CodecConfig;
use crate::reflect::{Field, Native};
use crate::schema::StorageHint;
use crate::{Error, Result};

/// Placeholder literal for a never-written property.
pub const EMPTY_LITERAL: &str = "_EMPTY_";

pub const NULL_LITERAL: &str = "NULL";

/// Render `value` as a query literal for a property of storage kind `hint`.
pub fn format(config: &CodecConfig, hint: &StorageHint, value: &dyn Field) -> Result<String> {
    format_native(config, hint, value.as_native())
}

fn format_native(config: &CodecConfig, hint: &StorageHint, native: Native<'_>) -> Result<String> {
    use StorageHint as H;

    let kind = native.kind_name();
    let literal = match (native, hint) {
        (Native::Bool(b), H::None | H::Bool) => b.to_string(),

        (Native::Int(i), H::None | H::Int | H::Float) => i.to_string(),
        (Native::UInt(u), H::None | H::Int | H::Float) => u.to_string(),
        (Native::Float32(f), H::None | H::Float) => float_text(f),
        (Native::Float32(f), H::Int) => (f as i64).to_string(),
        (Native::Float64(f), H::None | H::Float) => float_text(f),
        (Native::Float64(f), H::Int) => (f as i64).to_string(),

        (Native::Text(s), H::None | H::String) => quote(s),
        (Native::Text(s), H::Date) => format!("date({})", quote(s)),
        (Native::Text(s), H::Time) => format!("time({})", quote(s)),
        (Native::Text(s), H::DateTime) => format!("datetime({})", quote(s)),

        (Native::DateTime(dt), H::None | H::DateTime) => datetime_literal(&dt),
        (Native::DateTime(dt), H::Date) => date_literal(&dt.date()),
        (Native::DateTime(dt), H::Time) => time_literal(&dt.time()),
        (Native::Instant(utc), H::None | H::DateTime | H::Date | H::Time) => {
            let local = utc.with_timezone(&config.timezone).naive_local();
            return format_native(config, hint, Native::DateTime(local));
        }
        (Native::Date(d), H::None | H::Date) => date_literal(&d),
        (Native::Date(d), H::DateTime) => datetime_literal(&d.and_time(NaiveTime::default())),
        (Native::Time(t), H::None | H::Time) => time_literal(&t),

        (Native::List(items), H::None | H::List) => join(config, "[", &items, "]")?,
        (Native::List(items), H::Set) => join(config, "set{", &items, "}")?,
        (Native::Set(items), H::None | H::Set) => join(config, "set{", &items, "}")?,
        (Native::Set(items), H::List) => join(config, "[", &items, "]")?,

        (Native::Map(entries), H::None | H::Map) => {
            let mut parts = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = match key.as_native() {
                    Native::Text(k) => k,
                    other => {
                        return Err(Error::UnsupportedConversion {
                            from: format!("map key of kind {}", other.kind_name()),
                            to: "map".into(),
                        });
                    }
                };
                parts.push(format!("{key}: {}", format(config, &H::None, value)?));
            }
            format!("map{{{}}}", parts.join(", "))
        }
        (Native::Map(entries), H::Set) => {
            let keys: Vec<&dyn Field> = entries.into_iter().map(|(k, _)| k).collect();
            join(config, "set{", &keys, "}")?
        }

        (Native::Indirect(Some(inner)), _) => return format(config, hint, inner),
        (Native::Indirect(None), H::Empty) => EMPTY_LITERAL.to_string(),
        (Native::Indirect(None), _) => NULL_LITERAL.to_string(),

        (_, hint) => {
            return Err(Error::UnsupportedConversion {
                from: kind.to_string(),
                to: hint.to_string(),
            });
        }
    };
    Ok(literal)
}

fn join(config: &CodecConfig, open: &str, items: &[&dyn Field], close: &str) -> Result<String> {
    let parts = items
        .iter()
        .map(|item| format(config, &StorageHint::None, *item))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("{open}{}{close}", parts.join(", ")))
}

/// Double-quoted string literal with `\`, `"` and control whitespace escaped.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Shortest round-trip digits in general notation: exponent form when the
/// decimal exponent is below -4 or at least 6, written `e+06` style.
/// Non-finite values print as `NaN`, `+Inf` and `-Inf`.
pub(crate) fn float_text<F>(f: F) -> String
where
    F: Copy + Into<f64> + fmt::Display + fmt::LowerExp,
{
    let wide: f64 = f.into();
    if wide.is_nan() {
        return "NaN".to_string();
    }
    if wide.is_infinite() {
        return if wide > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    let sci = format!("{f:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return f.to_string();
    };
    if (-4..6).contains(&exp) {
        return f.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
}

fn date_literal(d: &NaiveDate) -> String {
    format!("date(\"{}\")", d.format("%Y-%m-%d"))
}

fn time_literal(t: &NaiveTime) -> String {
    if t.nanosecond() == 0 {
        format!("time(\"{}\")", t.format("%H:%M:%S"))
    } else {
        format!("time(\"{}\")", t.format("%H:%M:%S%.6f"))
    }
}

fn datetime_literal(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() == 0 {
        format!("datetime(\"{}\")", dt.format("%Y-%m-%dT%H:%M:%S"))
    } else {
        format!("datetime(\"{}\")", dt.format("%Y-%m-%dT%H:%M:%S%.6f"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, Utc};
    use std::collections::BTreeMap;

    fn fmt(hint: StorageHint, value: &dyn Field) -> Result<String> {
        format(&CodecConfig::default(), &hint, value)
    }

    #[test]
    fn test_scalars() {
        assert_eq!(fmt(StorageHint::None, &42i64).unwrap(), "42");
        assert_eq!(fmt(StorageHint::Float, &7u8).unwrap(), "7");
        assert_eq!(fmt(StorageHint::Bool, &true).unwrap(), "true");
        assert_eq!(fmt(StorageHint::None, &2.5f64).unwrap(), "2.5");
        assert_eq!(fmt(StorageHint::Int, &2.9f32).unwrap(), "2");
        assert_eq!(fmt(StorageHint::Float, &1e21f64).unwrap(), "1e+21");
    }

    #[test]
    fn test_float_general_notation() {
        assert_eq!(float_text(1e21f64), "1e+21");
        assert_eq!(float_text(1e6f64), "1e+06");
        assert_eq!(float_text(1234567.0f64), "1.234567e+06");
        assert_eq!(float_text(123456.0f64), "123456");
        assert_eq!(float_text(2.5f64), "2.5");
        assert_eq!(float_text(0.0001f64), "0.0001");
        assert_eq!(float_text(-0.00001f64), "-1e-05");
        assert_eq!(float_text(1.5e-300f64), "1.5e-300");
        assert_eq!(float_text(0.0f64), "0");
        assert_eq!(float_text(0.1f32), "0.1");
        assert_eq!(float_text(f64::NAN), "NaN");
        assert_eq!(float_text(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn test_text_quoting() {
        let s = String::from("hello \"world\"");
        assert_eq!(fmt(StorageHint::None, &s).unwrap(), r#""hello \"world\"""#);
        let path = String::from("C:\\tmp\n");
        assert_eq!(fmt(StorageHint::String, &path).unwrap(), r#""C:\\tmp\n""#);
    }

    #[test]
    fn test_text_as_temporal_constructor() {
        let s = String::from("2024-01-02");
        assert_eq!(fmt(StorageHint::Date, &s).unwrap(), r#"date("2024-01-02")"#);
        let s = String::from("2024-01-02T03:04:05");
        assert_eq!(fmt(StorageHint::DateTime, &s).unwrap(), r#"datetime("2024-01-02T03:04:05")"#);
    }

    #[test]
    fn test_temporal() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap();
        assert_eq!(fmt(StorageHint::None, &dt).unwrap(), r#"datetime("2024-01-02T03:04:05")"#);
        assert_eq!(fmt(StorageHint::Date, &dt).unwrap(), r#"date("2024-01-02")"#);

        let precise = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_micro_opt(3, 4, 5, 120).unwrap();
        assert_eq!(
            fmt(StorageHint::DateTime, &precise).unwrap(),
            r#"datetime("2024-01-02T03:04:05.000120")"#
        );

        let t = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
        assert_eq!(fmt(StorageHint::Time, &t).unwrap(), r#"time("09:30:00")"#);

        let d = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(fmt(StorageHint::DateTime, &d).unwrap(), r#"datetime("2024-01-02T00:00:00")"#);
    }

    #[test]
    fn test_instant_in_configured_zone() {
        let instant: DateTime<Utc> = "2024-01-01T20:00:00Z".parse().unwrap();
        let config = CodecConfig::default().with_timezone(FixedOffset::east_opt(8 * 3600).unwrap());
        assert_eq!(
            format(&config, &StorageHint::DateTime, &instant).unwrap(),
            r#"datetime("2024-01-02T04:00:00")"#
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(fmt(StorageHint::None, &Vec::<i64>::new()).unwrap(), "[]");
        assert_eq!(fmt(StorageHint::None, &vec![1i64, 2]).unwrap(), "[1, 2]");
        assert_eq!(fmt(StorageHint::Set, &vec![String::from("a")]).unwrap(), r#"set{"a"}"#);

        let mut m = BTreeMap::new();
        m.insert(String::from("a"), 1i64);
        m.insert(String::from("b"), 2i64);
        assert_eq!(fmt(StorageHint::None, &m).unwrap(), "map{a: 1, b: 2}");
        assert_eq!(fmt(StorageHint::Set, &m).unwrap(), r#"set{"a", "b"}"#);
    }

    #[test]
    fn test_non_text_map_key() {
        let mut m = BTreeMap::new();
        m.insert(1i64, 1i64);
        assert!(matches!(fmt(StorageHint::None, &m), Err(Error::UnsupportedConversion { .. })));
    }

    #[test]
    fn test_options() {
        assert_eq!(fmt(StorageHint::Set, &None::<Vec<i64>>).unwrap(), "NULL");
        assert_eq!(fmt(StorageHint::Empty, &None::<String>).unwrap(), "_EMPTY_");
        assert_eq!(fmt(StorageHint::String, &Some(String::from("x"))).unwrap(), r#""x""#);
        assert_eq!(fmt(StorageHint::Set, &Some(Vec::<i64>::new())).unwrap(), "set{}");
    }

    #[test]
    fn test_kind_mismatch() {
        let err = fmt(StorageHint::Bool, &1i64).unwrap_err();
        match err {
            Error::UnsupportedConversion { from, to } => {
                assert_eq!(from, "signed integer");
                assert_eq!(to, "bool");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(fmt(StorageHint::Other("geography".into()), &String::new()).is_err());
    }
}
