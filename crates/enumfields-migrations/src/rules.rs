//! Introspection rules for the legacy migration tool.
//!
//! The legacy tool freezes a field as a triple `(path, args, kwargs)` where
//! every kwarg is literal source text. Which kwargs to emit, and how to render
//! them, is driven by [`IntrospectionRule`]s registered against regex patterns
//! over the field path.
//!
//! Enum fields ship with one rule set, registered under the patterns from
//! `Settings::legacy_rule_patterns` (`^enumfields\.fields` by default). Its
//! `enum` kwarg renders the frozen enum as code and its `default` kwarg
//! renders the member's value.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use enumfields_core::error::{EnumFieldError, EnumFieldResult};
use enumfields_core::settings::SETTINGS;
use enumfields_db::fields::{EnumField, FieldDescription, FieldValue};
use enumfields_db::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::freeze::freeze_to_text;
use crate::literal::Literal;

/// The field attribute a kwarg is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAttribute {
    /// The bound enum type.
    Enum,
    /// The configured default.
    Default,
    /// `max_length` of text-backed fields.
    MaxLength,
    /// `null`
    Null,
    /// `blank`
    Blank,
    /// `unique`
    Unique,
    /// `db_index`
    DbIndex,
    /// The explicit `verbose_name`.
    VerboseName,
    /// The explicit `help_text`.
    HelpText,
    /// The explicit `db_column`.
    DbColumn,
}

/// How an attribute value is turned into a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// The value as is.
    Identity,
    /// The enum frozen to literal text (a string literal holding code).
    FreezeToText,
    /// A member replaced by its value; raw values pass through.
    EnumValue,
}

/// One kwarg emitted for matching fields.
#[derive(Debug, Clone, PartialEq)]
pub struct KwargRule {
    /// The kwarg name in the frozen triple.
    pub kwarg: String,
    /// Where the value comes from.
    pub attribute: FieldAttribute,
    /// How the value is converted.
    pub converter: Converter,
    /// The kwarg is omitted when its literal equals this. `None` means
    /// "not provided": the kwarg is only omitted when the attribute is unset.
    pub default: Option<Literal>,
    /// Emit a converted string as code rather than as a quoted string.
    pub is_django_function: bool,
}

impl KwargRule {
    /// Creates a rule reading `attribute` with no conversion and no default.
    pub fn new(kwarg: impl Into<String>, attribute: FieldAttribute) -> Self {
        Self {
            kwarg: kwarg.into(),
            attribute,
            converter: Converter::Identity,
            default: None,
            is_django_function: false,
        }
    }

    /// Sets the converter.
    #[must_use]
    pub const fn converter(mut self, converter: Converter) -> Self {
        self.converter = converter;
        self
    }

    /// Sets the default literal.
    #[must_use]
    pub fn default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }

    /// Marks the converted value as code.
    #[must_use]
    pub const fn as_code(mut self) -> Self {
        self.is_django_function = true;
        self
    }
}

/// A group of kwarg rules for one kind of field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntrospectionRule {
    /// The kwargs to emit, in order.
    pub kwargs: Vec<KwargRule>,
}

impl IntrospectionRule {
    /// Creates an empty rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a kwarg rule.
    #[must_use]
    pub fn kwarg(mut self, rule: KwargRule) -> Self {
        self.kwargs.push(rule);
        self
    }
}

/// A frozen field: `(path, args, kwargs)` with literal-text values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTriple {
    /// The dotted field class path.
    pub path: String,
    /// Positional arguments (always empty for enum fields).
    pub args: Vec<String>,
    /// Keyword arguments as literal source text.
    pub kwargs: BTreeMap<String, String>,
}

#[derive(Debug)]
struct RuleSet {
    patterns: Vec<Regex>,
    rules: Vec<IntrospectionRule>,
}

static INTROSPECTION_RULES: Lazy<RwLock<Vec<RuleSet>>> = Lazy::new(|| {
    let patterns = compile_patterns(&SETTINGS.get().legacy_rule_patterns).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring invalid legacy rule patterns");
        Vec::new()
    });
    RwLock::new(vec![RuleSet {
        patterns,
        rules: vec![enum_field_rules()],
    }])
});

/// Returns the rule set enum fields are frozen with.
pub fn enum_field_rules() -> IntrospectionRule {
    IntrospectionRule::new()
        .kwarg(
            KwargRule::new("enum", FieldAttribute::Enum)
                .converter(Converter::FreezeToText)
                .as_code(),
        )
        .kwarg(KwargRule::new("default", FieldAttribute::Default).converter(Converter::EnumValue))
        .kwarg(KwargRule::new("max_length", FieldAttribute::MaxLength))
        .kwarg(KwargRule::new("null", FieldAttribute::Null).default(Literal::Bool(false)))
        .kwarg(KwargRule::new("blank", FieldAttribute::Blank).default(Literal::Bool(false)))
        .kwarg(KwargRule::new("unique", FieldAttribute::Unique).default(Literal::Bool(false)))
        .kwarg(KwargRule::new("db_index", FieldAttribute::DbIndex).default(Literal::Bool(false)))
        .kwarg(KwargRule::new("verbose_name", FieldAttribute::VerboseName))
        .kwarg(KwargRule::new("help_text", FieldAttribute::HelpText))
        .kwarg(KwargRule::new("db_column", FieldAttribute::DbColumn))
}

/// Registers `rules` for field paths matching any of `patterns`.
///
/// # Errors
///
/// Returns [`EnumFieldError::ImproperlyConfigured`] if a pattern is not a
/// valid regex.
pub fn add_introspection_rules(
    rules: Vec<IntrospectionRule>,
    patterns: &[&str],
) -> EnumFieldResult<()> {
    let patterns = compile_patterns(patterns)?;
    tracing::debug!(
        patterns = ?patterns.iter().map(Regex::as_str).collect::<Vec<_>>(),
        rules = rules.len(),
        "Added introspection rules"
    );
    INTROSPECTION_RULES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(RuleSet { patterns, rules });
    Ok(())
}

/// Returns the kwarg rules that apply to `path`.
///
/// Later registrations override earlier ones for the same kwarg.
pub fn rules_for(path: &str) -> Vec<KwargRule> {
    let registry = INTROSPECTION_RULES
        .read()
        .unwrap_or_else(PoisonError::into_inner);
    let mut merged: Vec<KwargRule> = Vec::new();
    for set in registry
        .iter()
        .filter(|set| set.patterns.iter().any(|p| p.is_match(path)))
    {
        for rule in set.rules.iter().flat_map(|r| r.kwargs.iter()) {
            if let Some(existing) = merged.iter_mut().find(|k| k.kwarg == rule.kwarg) {
                *existing = rule.clone();
            } else {
                merged.push(rule.clone());
            }
        }
    }
    merged
}

/// Freezes `field` into a `(path, args, kwargs)` triple.
///
/// # Errors
///
/// Returns [`EnumFieldError::ImproperlyConfigured`] if no rules match the
/// field's path.
///
/// # Examples
///
/// ```
/// use enumfields_core::enums::EnumType;
/// use enumfields_db::fields::EnumField;
/// use enumfields_migrations::rules::field_triple;
///
/// let color = EnumType::builder("tests.test_enums", "Color")
///     .member("RED", "r")
///     .build()
///     .unwrap();
/// let field = EnumField::char("color", &color)
///     .default(color.member("RED").unwrap())
///     .build()
///     .unwrap();
///
/// let triple = field_triple(&field).unwrap();
/// assert_eq!(triple.path, "enumfields.fields.EnumField");
/// assert_eq!(triple.kwargs["enum"], "('tests.test_enums', 'Color', (('RED', 'r'),))");
/// assert_eq!(triple.kwargs["default"], "'r'");
/// assert_eq!(triple.kwargs["max_length"], "10");
/// ```
pub fn field_triple(field: &EnumField) -> EnumFieldResult<FieldTriple> {
    let description = field.describe();
    let rules = rules_for(&description.path);
    if rules.is_empty() {
        return Err(EnumFieldError::ImproperlyConfigured(format!(
            "No introspection rules match '{}'",
            description.path
        )));
    }

    let mut kwargs = BTreeMap::new();
    for rule in &rules {
        let Some(value) = attribute_literal(field, &description, rule) else {
            continue;
        };
        if rule.default.as_ref() == Some(&value) {
            continue;
        }
        let text = match (&value, rule.is_django_function) {
            (Literal::Str(code), true) => code.clone(),
            _ => value.to_string(),
        };
        kwargs.insert(rule.kwarg.clone(), text);
    }

    tracing::trace!(field = %field.name(), path = %description.path, "Built field triple");
    Ok(FieldTriple {
        path: description.path,
        args: Vec::new(),
        kwargs,
    })
}

fn attribute_literal(
    field: &EnumField,
    description: &FieldDescription,
    rule: &KwargRule,
) -> Option<Literal> {
    match rule.attribute {
        FieldAttribute::Enum => Some(match rule.converter {
            Converter::FreezeToText => Literal::Str(freeze_to_text(field.enum_type())),
            Converter::Identity | Converter::EnumValue => Literal::Str(field.enum_type().qualified_name()),
        }),
        FieldAttribute::Default => field.default_value().map(|default| match (rule.converter, default) {
            (Converter::EnumValue, FieldValue::Member(m)) => value_literal(&m.value().into()),
            (_, FieldValue::Member(m)) => Literal::Str(m.to_string()),
            (_, FieldValue::Raw(raw)) => value_literal(raw),
        }),
        FieldAttribute::MaxLength => description
            .max_length
            .map(|n| Literal::Int(i64::try_from(n).unwrap_or(i64::MAX))),
        FieldAttribute::Null => Some(Literal::Bool(description.null)),
        FieldAttribute::Blank => Some(Literal::Bool(description.blank)),
        FieldAttribute::Unique => Some(Literal::Bool(description.unique)),
        FieldAttribute::DbIndex => Some(Literal::Bool(description.db_index)),
        FieldAttribute::VerboseName => description.verbose_name.clone().map(Literal::Str),
        FieldAttribute::HelpText => description.help_text.clone().map(Literal::Str),
        FieldAttribute::DbColumn => description.db_column.clone().map(Literal::Str),
    }
}

fn value_literal(value: &Value) -> Literal {
    match value {
        Value::Null => Literal::None,
        Value::Bool(b) => Literal::Bool(*b),
        Value::Int(i) => Literal::Int(*i),
        Value::Float(f) => Literal::Float(*f),
        Value::String(s) => Literal::Str(s.clone()),
    }
}

fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> EnumFieldResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|e| {
                EnumFieldError::ImproperlyConfigured(format!(
                    "Invalid introspection pattern '{}': {e}",
                    p.as_ref()
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enumfields_core::enums::EnumType;
    use enumfields_core::EnumMember;
    use std::sync::Arc;

    fn color() -> Arc<EnumType> {
        EnumType::builder("tests.test_enums", "Color")
            .labeled_member("RED", "r", "Reddish")
            .member("GREEN", "g")
            .labeled_member("BLUE", "b", "bluë")
            .build()
            .unwrap()
    }

    fn priority() -> Arc<EnumType> {
        EnumType::builder("tests.test_enums", "Priority")
            .member("LOW", 1)
            .member("HIGH", 2)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_patterns_match_enum_fields() {
        assert!(!rules_for("enumfields.fields.EnumField").is_empty());
        assert!(!rules_for("enumfields.fields.EnumIntegerField").is_empty());
        assert!(rules_for("django.db.models.CharField").is_empty());
    }

    #[test]
    fn test_minimal_triple() {
        let triple = field_triple(&EnumField::char("color", color()).build().unwrap()).unwrap();
        assert!(triple.args.is_empty());
        assert_eq!(
            triple.kwargs.keys().collect::<Vec<_>>(),
            vec!["enum", "max_length"]
        );
        assert_eq!(
            triple.kwargs["enum"],
            "('tests.test_enums', 'Color', (('RED', 'r'), ('GREEN', 'g'), ('BLUE', 'b')))"
        );
    }

    #[test]
    fn test_integer_field_triple() {
        let priority = priority();
        let field = EnumField::integer("priority", &priority)
            .default(priority.member("HIGH").unwrap())
            .nullable()
            .build()
            .unwrap();
        let triple = field_triple(&field).unwrap();
        assert_eq!(triple.path, "enumfields.fields.EnumIntegerField");
        assert_eq!(triple.kwargs["default"], "2");
        assert_eq!(triple.kwargs["null"], "True");
        assert!(!triple.kwargs.contains_key("max_length"));
        assert!(!triple.kwargs.contains_key("blank"));
    }

    #[test]
    fn test_null_and_raw_defaults() {
        let field = EnumField::char("color", color())
            .default(None::<EnumMember>)
            .build()
            .unwrap();
        assert_eq!(field_triple(&field).unwrap().kwargs["default"], "None");

        let raw = EnumField::char("color", color()).default("g").build().unwrap();
        assert_eq!(field_triple(&raw).unwrap().kwargs["default"], "'g'");
    }

    #[test]
    fn test_text_options_are_quoted() {
        let field = EnumField::char("color", color())
            .verbose_name("favourite colour")
            .help_text("It's a colour")
            .db_column("fav")
            .build()
            .unwrap();
        let kwargs = field_triple(&field).unwrap().kwargs;
        assert_eq!(kwargs["verbose_name"], "'favourite colour'");
        assert_eq!(kwargs["help_text"], "\"It's a colour\"");
        assert_eq!(kwargs["db_column"], "'fav'");
    }

    #[test]
    fn test_enum_kwarg_round_trips_through_unfreeze() {
        let triple = field_triple(&EnumField::char("color", color()).build().unwrap()).unwrap();
        let thawed = crate::freeze::unfreeze_text(&triple.kwargs["enum"]).unwrap();
        assert!(thawed.same_members(&color()));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = add_introspection_rules(vec![], &["(unclosed"]).unwrap_err();
        assert!(matches!(err, EnumFieldError::ImproperlyConfigured(_)));
    }

    #[test]
    fn test_added_rules_apply_to_matching_paths() {
        add_introspection_rules(
            vec![IntrospectionRule::new()
                .kwarg(KwargRule::new("enum", FieldAttribute::Enum))],
            &[r"^myapp\.fields\.ColorField$"],
        )
        .unwrap();
        let rules = rules_for("myapp.fields.ColorField");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].converter, Converter::Identity);
        assert!(rules_for("enumfields.fields.EnumField")
            .iter()
            .any(|r| r.kwarg == "enum" && r.converter == Converter::FreezeToText));
    }
}
