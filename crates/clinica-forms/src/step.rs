use std::sync::Arc;

use clinica_core::{Draft, ErrorMap};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validators;

/// How a field is rendered by a frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum InputKind {
    Text,
    TextArea,
    Number,
    Date,
    Phone,
    Email,
    Select,
    Checkbox,
    /// A list of free-text entries (allergies, medications).
    List,
    /// A nested list of records (vaccinations).
    Records,
    /// Patient search box that fills `selected_patient`.
    PatientPicker,
}

/// Fixed textual formats checked by pattern validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Pattern {
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    Phone,
    Email,
}

/// A single-field rule. "Required" is carried by [`FieldSpec::required`]
/// because absence and invalidity are reported separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "rule", rename_all = "snake_case")]
#[ts(export)]
pub enum Rule {
    Range { min: f64, max: f64 },
    Integer,
    /// A record reference: a non-blank string or a number.
    Identifier,
    Pattern { pattern: Pattern },
    OneOf { options: Vec<String> },
    MaxLength { max: usize },
    StringList,
}

/// Render and validation metadata for one draft field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldSpec {
    /// Dot-separated draft path.
    pub path: String,
    pub label: String,
    pub input: InputKind,
    pub required: bool,
    /// Another path read when `path` is empty (e.g. `selected_patient.id`
    /// for `patient_id`). Its value must pass the same rules.
    pub alternate: Option<String>,
    pub rules: Vec<Rule>,
    pub unit: Option<String>,
}

impl FieldSpec {
    pub fn new(path: &str, label: &str, input: InputKind) -> Self {
        Self {
            path: path.to_string(),
            label: label.to_string(),
            input,
            required: false,
            alternate: None,
            rules: Vec::new(),
            unit: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn or_from(mut self, alternate: &str) -> Self {
        self.alternate = Some(alternate.to_string());
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.rule(Rule::Range { min, max })
    }

    pub fn integer(self) -> Self {
        self.rule(Rule::Integer)
    }

    pub fn identifier(self) -> Self {
        self.rule(Rule::Identifier)
    }

    pub fn pattern(self, pattern: Pattern) -> Self {
        self.rule(Rule::Pattern { pattern })
    }

    pub fn one_of<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule(Rule::OneOf {
            options: options.into_iter().map(Into::into).collect(),
        })
    }

    pub fn max_length(self, max: usize) -> Self {
        self.rule(Rule::MaxLength { max })
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }
}

/// One wizard page. Looked up by id, rendered from [`Step::fields`] and
/// checked with [`Step::validate`].
pub trait Step: Send + Sync {
    /// Stable identifier (e.g. "vital_signs").
    fn id(&self) -> &str;

    fn title(&self) -> &str;

    /// Fields rendered on this page, in display order.
    fn fields(&self) -> &[FieldSpec];

    /// Paths that must be filled before leaving this page.
    fn required_fields(&self) -> Vec<&str> {
        self.fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.path.as_str())
            .collect()
    }

    /// Validate the draft against this page. Never fails; problems are
    /// returned as an error map.
    fn validate(&self, draft: &Draft) -> ErrorMap;

    /// Whether a conditional step applies to the draft. Base steps are
    /// always shown.
    fn visible_when(&self, _draft: &Draft) -> bool {
        true
    }

    /// True for the review page that closes every form.
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Extra validation involving several fields.
pub type CrossCheck = fn(&Draft, &mut ErrorMap);

/// Visibility predicate for conditional steps.
pub type Visibility = fn(&Draft) -> bool;

/// A statically defined step: fields, optional cross-field checks and an
/// optional visibility rule.
pub struct StepDescriptor {
    id: &'static str,
    title: &'static str,
    fields: Vec<FieldSpec>,
    cross_checks: Vec<CrossCheck>,
    visible_when: Option<Visibility>,
}

impl StepDescriptor {
    pub fn new(id: &'static str, title: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self {
            id,
            title,
            fields,
            cross_checks: Vec::new(),
            visible_when: None,
        }
    }

    pub fn cross_check(mut self, check: CrossCheck) -> Self {
        self.cross_checks.push(check);
        self
    }

    pub fn visible_when(mut self, predicate: Visibility) -> Self {
        self.visible_when = Some(predicate);
        self
    }
}

impl Step for StepDescriptor {
    fn id(&self) -> &str {
        self.id
    }

    fn title(&self) -> &str {
        self.title
    }

    fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn validate(&self, draft: &Draft) -> ErrorMap {
        let mut errors = validators::validate_fields(&self.fields, draft);
        for check in &self.cross_checks {
            check(draft, &mut errors);
        }
        errors
    }

    fn visible_when(&self, draft: &Draft) -> bool {
        self.visible_when.is_none_or(|predicate| predicate(draft))
    }
}

/// Terminal step. Re-validates every step that applies to the draft, so
/// edits made after navigating back are caught before submission.
pub struct ReviewStep {
    steps: Vec<Arc<dyn Step>>,
}

impl ReviewStep {
    pub const ID: &'static str = "review";

    pub fn new(steps: Vec<Arc<dyn Step>>) -> Self {
        Self { steps }
    }
}

impl Step for ReviewStep {
    fn id(&self) -> &str {
        Self::ID
    }

    fn title(&self) -> &str {
        "Review"
    }

    fn fields(&self) -> &[FieldSpec] {
        &[]
    }

    fn validate(&self, draft: &Draft) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for step in self.steps.iter().filter(|s| s.visible_when(draft)) {
            errors.extend(step.validate(draft));
        }
        errors
    }

    fn is_terminal(&self) -> bool {
        true
    }
}
