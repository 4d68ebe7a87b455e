//! Schema validation for printer, format and representation properties.

use super::model::RasterType;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single type or value requirement on a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Parses as a (possibly negative) integer.
    Integer,
    /// Parses as a floating point number.
    Double,
    /// `true` or `false`, case-insensitive.
    Boolean,
    /// Not the empty string.
    NonEmpty,
    /// Numeric and `>= 0`.
    Positive,
    /// Numeric and `!= 0`.
    NonZero,
    /// One of a fixed set of lowercase values.
    OneOf(&'static [&'static str]),
    /// A raster type such as `6-dot`, `8-dot` or `3x3`.
    Raster,
}

impl Check {
    fn test(self, value: &str) -> bool {
        match self {
            Check::Integer => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                !digits.is_empty()
                    && digits.bytes().all(|b| b.is_ascii_digit())
                    && value.parse::<i64>().is_ok()
            }
            Check::Double => value.parse::<f64>().is_ok_and(f64::is_finite),
            Check::Boolean => value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false"),
            Check::NonEmpty => !value.is_empty(),
            Check::Positive => value.parse::<f64>().is_ok_and(|v| v >= 0.0),
            Check::NonZero => value.parse::<f64>().is_ok_and(|v| v != 0.0),
            Check::OneOf(options) => options.iter().any(|o| o.eq_ignore_ascii_case(value)),
            Check::Raster => value.parse::<RasterType>().is_ok(),
        }
    }

    fn describe(self) -> String {
        match self {
            Check::Integer => "expected an integer".to_string(),
            Check::Double => "expected a number".to_string(),
            Check::Boolean => "expected 'true' or 'false'".to_string(),
            Check::NonEmpty => "must not be empty".to_string(),
            Check::Positive => "must be positive".to_string(),
            Check::NonZero => "must not be zero".to_string(),
            Check::OneOf(options) => format!("expected one of: {}", options.join(", ")),
            Check::Raster => "expected '6-dot', '8-dot' or '<width>x<height>'".to_string(),
        }
    }
}

/// Value typed by the first type check of its rule; untyped values stay strings.
fn typed(checks: &[Check], value: &str) -> Value {
    let text = || Value::String(value.to_string());
    match checks.iter().find(|c| matches!(c, Check::Integer | Check::Double | Check::Boolean)) {
        Some(Check::Integer) => value.parse::<i64>().map_or_else(|_| text(), Value::from),
        Some(Check::Double) => {
            value.parse::<f64>().ok().and_then(serde_json::Number::from_f64).map_or_else(text, Value::Number)
        }
        Some(Check::Boolean) => Value::Bool(value.eq_ignore_ascii_case("true")),
        _ => text(),
    }
}

/// Property namespace a key belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Namespace {
    /// `printer.*`
    Printer,
    /// `format.<name>.*`
    Format(String),
    /// `representation.*`
    Representation,
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Printer => f.write_str("printer"),
            Namespace::Format(name) => write!(f, "format.{name}"),
            Namespace::Representation => f.write_str("representation"),
        }
    }
}

/// A key/value pair that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProperty {
    /// Namespace the key belongs to.
    pub namespace: Namespace,
    /// Property name with the namespace prefix removed.
    pub name: String,
    /// Value converted to the property's type.
    pub value: Value,
}

#[derive(Debug, Clone)]
struct Rule {
    checks: &'static [Check],
    required: bool,
}

#[derive(Debug, Clone, Default)]
struct Schema {
    rules: BTreeMap<&'static str, Rule>,
}

impl Schema {
    fn define(&mut self, name: &'static str, checks: &'static [Check], required: bool) {
        self.rules.insert(name, Rule { checks, required });
    }

    fn required(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().filter(|(_, r)| r.required).map(|(name, _)| *name)
    }
}

const INT_POS: &[Check] = &[Check::Integer, Check::Positive];
const INT_POS_NZ: &[Check] = &[Check::Integer, Check::Positive, Check::NonZero];
const DOUBLE_POS: &[Check] = &[Check::Double, Check::Positive];
const DOUBLE_POS_NZ: &[Check] = &[Check::Double, Check::Positive, Check::NonZero];
const BOOL: &[Check] = &[Check::Boolean];
const NON_EMPTY: &[Check] = &[Check::NonEmpty];

/// Printer modes known to the document builders.
pub const PRINTER_MODES: &[&str] = &["normalprinter", "index_everest_d_v4", "index_basic_d_v4"];

/// Validates property keys and values against per-namespace schemas.
#[derive(Debug, Clone)]
pub struct ConfigurationValidator {
    printer: Schema,
    format: Schema,
    representation: Schema,
}

impl Default for ConfigurationValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationValidator {
    /// Create a validator with the built-in schemas.
    #[must_use]
    pub fn new() -> Self {
        const MODE: &[Check] = &[Check::NonEmpty, Check::OneOf(PRINTER_MODES)];
        const RASTER: &[Check] = &[Check::NonEmpty, Check::Raster];
        const CAPTION: &[Check] = &[Check::OneOf(&["left", "right"])];
        const THRESHOLD: &[Check] = &[Check::Integer, Check::Positive];

        let mut printer = Schema::default();
        printer.define("name", NON_EMPTY, true);
        printer.define("mode", MODE, true);
        printer.define("brailletable", NON_EMPTY, false);
        printer.define("floatingDot.support", BOOL, true);
        printer.define("floatingDot.resolution", DOUBLE_POS_NZ, false);
        printer.define("constraint.top", DOUBLE_POS, true);
        printer.define("constraint.left", DOUBLE_POS, true);
        printer.define("constraint.width", DOUBLE_POS, false);
        printer.define("constraint.height", DOUBLE_POS, false);
        printer.define("raster.constraint.top", INT_POS, true);
        printer.define("raster.constraint.left", INT_POS, true);
        printer.define("raster.constraint.width", INT_POS, false);
        printer.define("raster.constraint.height", INT_POS, false);
        printer.define("raster.type", RASTER, true);
        printer.define("raster.dotDistance.horizontal", DOUBLE_POS_NZ, true);
        printer.define("raster.dotDistance.vertical", DOUBLE_POS_NZ, true);
        printer.define("raster.cellDistance.horizontal", DOUBLE_POS_NZ, true);
        printer.define("raster.cellDistance.vertical", DOUBLE_POS_NZ, true);
        printer.define("raster.dotDiameter", DOUBLE_POS_NZ, true);

        let mut format = Schema::default();
        format.define("page.width", INT_POS_NZ, true);
        format.define("page.height", INT_POS_NZ, true);
        format.define("margin.top", INT_POS, true);
        format.define("margin.right", INT_POS, true);
        format.define("margin.bottom", INT_POS, true);
        format.define("margin.left", INT_POS, true);

        let mut representation = Schema::default();
        representation.define("general.brailleLanguage", NON_EMPTY, false);
        representation.define("general.legendKeyword", NON_EMPTY, false);
        representation.define("general.maxTitleHeight", INT_POS, false);
        representation.define("floatingDot.minBarWidth", DOUBLE_POS, false);
        representation.define("floatingDot.maxBarWidth", DOUBLE_POS, false);
        representation.define("floatingDot.minBarDist", DOUBLE_POS, false);
        representation.define("floatingDot.grid", BOOL, false);
        representation.define("floatingDot.frames", BOOL, false);
        representation.define("floatingDot.secondAxis", BOOL, false);
        representation.define("floatingDot.derivation", BOOL, false);
        representation.define("floatingDot.dotFrame", BOOL, false);
        representation.define("floatingDot.barAccumulation", BOOL, false);
        representation.define("rasterizer.barChart.maxBarThickness", INT_POS_NZ, false);
        representation.define("rasterizer.barChart.minBarThickness", INT_POS_NZ, false);
        representation.define("rasterizer.barChart.barDotPadding", INT_POS, false);
        representation.define("rasterizer.barChart.barInCellPadding", INT_POS, false);
        representation.define("rasterizer.barChart.extraBarCellPadding", INT_POS, false);
        representation.define("rasterizer.barChart.captionLength", INT_POS_NZ, false);
        representation.define("rasterizer.barChart.captionPosition", CAPTION, false);
        representation.define("rasterizer.barChart.textureUnitSize", INT_POS_NZ, false);
        representation.define("rasterizer.image.threshold", THRESHOLD, false);
        representation.define("rasterizer.image.quantifiedPositions", BOOL, false);
        representation.define("rasterizer.image.preventOverStretch", BOOL, false);
        representation.define("rasterizer.image.preserveAspectRatio", BOOL, false);

        Self { printer, format, representation }
    }

    /// Validate a fully qualified key/value pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for unknown prefixes, unknown property names and
    /// values failing their type predicates.
    pub fn validate(&self, key: &str, value: &str) -> Result<ValidProperty> {
        let invalid = |message: String| Error::ConfigInvalid {
            key: key.to_string(),
            value: value.to_string(),
            message,
        };

        let (prefix, rest) = key.split_once('.').ok_or_else(|| invalid("missing property namespace".into()))?;

        let (namespace, name, schema) = match prefix {
            "printer" => (Namespace::Printer, rest, &self.printer),
            "representation" => (Namespace::Representation, rest, &self.representation),
            "format" => {
                let (format_name, name) = rest
                    .split_once('.')
                    .filter(|(f, n)| !f.is_empty() && !n.is_empty())
                    .ok_or_else(|| invalid("format keys need the form 'format.<name>.<property>'".into()))?;
                (Namespace::Format(format_name.to_string()), name, &self.format)
            }
            other => return Err(invalid(format!("invalid property prefix '{other}'"))),
        };

        let rule = schema.rules.get(name).ok_or_else(|| invalid(format!("unknown property '{name}'")))?;
        if let Some(failed) = rule.checks.iter().find(|c| !c.test(value)) {
            return Err(invalid(failed.describe()));
        }

        Ok(ValidProperty { namespace, name: name.to_string(), value: typed(rule.checks, value) })
    }

    /// Check that every required property of `namespace` is present in `names`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigMissing`] listing the absent keys.
    pub fn check_complete<'a>(
        &self,
        namespace: &Namespace,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        let schema = match namespace {
            Namespace::Printer => &self.printer,
            Namespace::Format(_) => &self.format,
            Namespace::Representation => &self.representation,
        };
        let present: Vec<&str> = names.into_iter().collect();
        let missing: Vec<String> =
            schema.required().filter(|r| !present.contains(r)).map(str::to_string).collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigMissing { namespace: namespace.to_string(), keys: missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checks() {
        assert!(Check::Integer.test("-12"));
        assert!(!Check::Integer.test("1.5"));
        assert!(!Check::Integer.test("-"));
        assert!(Check::Double.test("2.5"));
        assert!(!Check::Double.test("abc"));
        assert!(Check::Boolean.test("TRUE"));
        assert!(!Check::Boolean.test("yes"));
        assert!(Check::Positive.test("0"));
        assert!(!Check::Positive.test("-0.1"));
        assert!(!Check::NonZero.test("0.0"));
        assert!(Check::Raster.test("8-dot"));
        assert!(Check::Raster.test("3x3"));
        assert!(!Check::Raster.test("dots"));
    }

    #[test]
    fn test_validate_printer_property() {
        let v = ConfigurationValidator::new();
        let p = v.validate("printer.raster.dotDistance.horizontal", "2.5").unwrap();
        assert_eq!(p.namespace, Namespace::Printer);
        assert_eq!(p.name, "raster.dotDistance.horizontal");
        assert_eq!(p.value, serde_json::json!(2.5));
    }

    #[test]
    fn test_values_are_typed() {
        let v = ConfigurationValidator::new();
        assert_eq!(v.validate("format.A4.page.width", "210").unwrap().value, serde_json::json!(210));
        assert_eq!(v.validate("printer.floatingDot.support", "TRUE").unwrap().value, serde_json::json!(true));
        assert_eq!(v.validate("printer.raster.type", "6-dot").unwrap().value, serde_json::json!("6-dot"));
        assert_eq!(
            v.validate("representation.rasterizer.barChart.captionPosition", "right").unwrap().value,
            serde_json::json!("right")
        );
    }

    #[test]
    fn test_validate_format_property() {
        let v = ConfigurationValidator::new();
        let p = v.validate("format.A4.page.width", "210").unwrap();
        assert_eq!(p.namespace, Namespace::Format("A4".to_string()));
        assert_eq!(p.name, "page.width");
    }

    #[test]
    fn test_invalid_value_names_key_and_value() {
        let v = ConfigurationValidator::new();
        let err = v.validate("format.A4.page.width", "-210").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("format.A4.page.width"));
        assert!(msg.contains("-210"));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let v = ConfigurationValidator::new();
        assert!(v.validate("printer.colour", "red").is_err());
        assert!(v.validate("plotter.name", "x").is_err());
        assert!(v.validate("format.A4", "1").is_err());
        assert!(v.validate("name", "x").is_err());
    }

    #[test]
    fn test_printer_mode_enum() {
        let v = ConfigurationValidator::new();
        assert!(v.validate("printer.mode", "normalprinter").is_ok());
        assert!(v.validate("printer.mode", "laser").is_err());
    }

    #[test]
    fn test_completeness() {
        let v = ConfigurationValidator::new();
        let ns = Namespace::Format("A5".to_string());
        let err = v.check_complete(&ns, ["page.width", "page.height"]).unwrap_err();
        match err {
            Error::ConfigMissing { namespace, keys } => {
                assert_eq!(namespace, "format.A5");
                assert!(keys.contains(&"margin.top".to_string()));
                assert!(!keys.contains(&"page.width".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(v.check_complete(&Namespace::Representation, []).is_ok());
    }
}
