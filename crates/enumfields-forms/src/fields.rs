//! The enum choice form field.
//!
//! An [`EnumChoiceField`] offers the choices of an enum-backed model field,
//! checks submitted strings against them, and coerces the survivors into
//! enum members through the model field's value table. [`formfield`] derives
//! one from an [`EnumField`] the way the host's model forms would.

use std::collections::HashMap;
use std::sync::Arc;

use enumfields_core::enums::EnumMember;
use enumfields_core::error::{EnumFieldResult, ValidationError, INVALID_CHOICE, REQUIRED};
use enumfields_core::utils::text::capfirst;
use enumfields_db::fields::{EnumField, FieldAdapter, FieldValue};
use enumfields_db::value::Value;

use crate::widgets::{create_widget, FormData, WidgetType};

/// A form field whose cleaned value is an enum member.
#[derive(Clone)]
pub struct EnumChoiceField {
    /// The HTML field name.
    pub name: String,
    adapter: Arc<dyn FieldAdapter>,
    /// The choices as `(value, display_label)` strings, in display order.
    pub choices: Vec<(String, String)>,
    /// Whether an empty submission is rejected.
    pub required: bool,
    /// The label shown next to the widget.
    pub label: Option<String>,
    /// Help text shown below the widget.
    pub help_text: String,
    /// The member shown when the form is unbound.
    pub initial: Option<EnumMember>,
    /// The widget used to render the choices.
    pub widget: WidgetType,
    /// Messages overriding the defaults, keyed by error code.
    pub error_messages: HashMap<String, String>,
}

impl std::fmt::Debug for EnumChoiceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumChoiceField")
            .field("name", &self.name)
            .field("choices", &self.choices)
            .field("required", &self.required)
            .field("label", &self.label)
            .field("initial", &self.initial)
            .field("widget", &self.widget)
            .finish_non_exhaustive()
    }
}

impl EnumChoiceField {
    /// Creates a required field offering every choice of `adapter`, without a blank.
    pub fn new(name: impl Into<String>, adapter: Arc<dyn FieldAdapter>) -> Self {
        let choices = prepare_choices(&adapter.choices(false));
        Self {
            name: name.into(),
            adapter,
            choices,
            required: true,
            label: None,
            help_text: String::new(),
            initial: None,
            widget: WidgetType::default(),
            error_messages: HashMap::new(),
        }
    }

    /// Replaces the offered choices.
    #[must_use]
    pub fn choices(mut self, choices: &[(Value, String)]) -> Self {
        self.choices = prepare_choices(choices);
        self
    }

    /// Sets whether this field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the initial member.
    #[must_use]
    pub fn initial(mut self, member: Option<EnumMember>) -> Self {
        self.initial = member;
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub const fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Overrides the message for an error code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Cleans a submitted string into a member.
    ///
    /// Empty input is rejected with `required` when the field is required and
    /// gives `None` otherwise. Anything else must be one of the offered choice
    /// values (`invalid_choice`) and is then coerced by the model field.
    pub fn clean(&self, raw: Option<&str>) -> Result<Option<EnumMember>, ValidationError> {
        let raw = raw.unwrap_or("");
        if raw.is_empty() {
            if self.required {
                return Err(ValidationError::new(
                    self.message(REQUIRED, "This field is required."),
                    REQUIRED,
                ));
            }
            return Ok(None);
        }

        if !self.valid_value(raw) {
            tracing::trace!(field = %self.name, value = raw, "Rejected choice");
            return Err(ValidationError::new(
                self.message(
                    INVALID_CHOICE,
                    &format!("Select a valid choice. {raw} is not one of the available choices."),
                ),
                INVALID_CHOICE,
            )
            .with_param("value", raw));
        }

        self.adapter
            .coerce(FieldValue::from(raw))
            .map_err(|e| e.to_validation_error())
    }

    /// Reads this field's value out of submitted data and cleans it.
    pub fn clean_data(&self, data: &FormData) -> Result<Option<EnumMember>, ValidationError> {
        let widget = create_widget(self.widget, &self.choices);
        self.clean(widget.value_from_data(data, &self.name).as_deref())
    }

    /// Returns `true` if `raw` is one of the offered choice values.
    pub fn valid_value(&self, raw: &str) -> bool {
        self.choices.iter().any(|(value, _)| value == raw)
    }

    /// Renders a value the way the widget expects it: members become their raw
    /// value string and nothing becomes `""`.
    pub fn prepare_value(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Member(member) => member.value().to_string(),
            FieldValue::Raw(raw) => choice_value(raw),
        }
    }

    /// Returns the label, or the capitalized field name when none was given.
    pub fn label_text(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| capfirst(&self.name.replace('_', " ")))
    }

    /// Renders the widget showing `value`, or the initial member when `None`.
    pub fn render(&self, value: Option<&FieldValue>, attrs: &HashMap<String, String>) -> String {
        let shown = match value {
            Some(v) => self.prepare_value(v),
            None => self
                .initial
                .as_ref()
                .map(|m| self.prepare_value(&FieldValue::from(m)))
                .unwrap_or_default(),
        };
        create_widget(self.widget, &self.choices).render(&self.name, Some(shown.as_str()), attrs)
    }

    fn message(&self, code: &str, default: &str) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

/// Builds the form field for an enum model field.
///
/// A blank choice is offered when the field allows blank input or has no
/// default. Blank fields are optional. The label comes from the field's
/// verbose name and the initial member from its default.
///
/// # Errors
///
/// Returns [`EnumFieldError::InvalidDefaultConversion`] when the field's
/// default does not name a member.
///
/// [`EnumFieldError::InvalidDefaultConversion`]: enumfields_core::error::EnumFieldError::InvalidDefaultConversion
pub fn formfield(field: &Arc<EnumField>) -> EnumFieldResult<EnumChoiceField> {
    let include_blank = field.blank() || !field.has_default();
    let initial = field.get_default()?;
    tracing::debug!(
        field = field.name(),
        include_blank,
        "Building enum choice form field"
    );

    let adapter: Arc<dyn FieldAdapter> = field.clone();
    Ok(EnumChoiceField::new(field.name(), adapter)
        .choices(&field.get_choices(include_blank, None))
        .required(!field.blank())
        .label(capfirst(&field.verbose_name()))
        .help_text(field.help_text())
        .initial(initial))
}

fn prepare_choices(choices: &[(Value, String)]) -> Vec<(String, String)> {
    choices
        .iter()
        .map(|(value, label)| (choice_value(value), label.clone()))
        .collect()
}

fn choice_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
