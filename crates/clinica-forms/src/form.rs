use std::collections::HashMap;
use std::sync::Arc;

use clinica_core::EntityKind;

use crate::error::FormError;
use crate::step::{ReviewStep, Step};

/// A conditional step and the base step it follows when visible.
#[derive(Clone)]
pub struct Placement {
    pub after: String,
    pub step: Arc<dyn Step>,
}

/// The static definition of one wizard: ordered base steps, conditional
/// steps with their anchors, and the terminal review step.
pub struct FormDefinition {
    id: String,
    title: String,
    kind: EntityKind,
    base: Vec<Arc<dyn Step>>,
    conditional: Vec<Placement>,
    review: Arc<dyn Step>,
    table: HashMap<String, Arc<dyn Step>>,
}

impl FormDefinition {
    pub fn builder(id: &str, title: &str, kind: EntityKind) -> FormBuilder {
        FormBuilder {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            base: Vec::new(),
            conditional: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn base_steps(&self) -> &[Arc<dyn Step>] {
        &self.base
    }

    pub fn conditional_steps(&self) -> &[Placement] {
        &self.conditional
    }

    pub fn review_step(&self) -> &Arc<dyn Step> {
        &self.review
    }

    /// Look up any step of this form (base, conditional or review) by id.
    pub fn step(&self, id: &str) -> Option<&Arc<dyn Step>> {
        self.table.get(id)
    }

    /// Every step id in template order, regardless of visibility.
    pub fn all_step_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(self.table.len());
        for step in &self.base {
            ids.push(step.id());
            ids.extend(
                self.conditional
                    .iter()
                    .filter(|p| p.after == step.id())
                    .map(|p| p.step.id()),
            );
        }
        ids.push(self.review.id());
        ids
    }
}

pub struct FormBuilder {
    id: String,
    title: String,
    kind: EntityKind,
    base: Vec<Arc<dyn Step>>,
    conditional: Vec<Placement>,
}

impl FormBuilder {
    pub fn step(mut self, step: impl Step + 'static) -> Self {
        self.base.push(Arc::new(step));
        self
    }

    /// Add a step shown right after `after` whenever its visibility rule
    /// holds for the draft.
    pub fn conditional_after(mut self, after: &str, step: impl Step + 'static) -> Self {
        self.conditional.push(Placement {
            after: after.to_string(),
            step: Arc::new(step),
        });
        self
    }

    pub fn build(self) -> Result<FormDefinition, FormError> {
        if self.base.is_empty() {
            return Err(FormError::NoSteps(self.id));
        }

        for placement in &self.conditional {
            if !self.base.iter().any(|s| s.id() == placement.after) {
                return Err(FormError::UnknownAnchor {
                    step_id: placement.step.id().to_string(),
                    anchor: placement.after.clone(),
                });
            }
        }

        let validated: Vec<Arc<dyn Step>> = self
            .base
            .iter()
            .chain(self.conditional.iter().map(|p| &p.step))
            .cloned()
            .collect();
        let review: Arc<dyn Step> = Arc::new(ReviewStep::new(validated.clone()));

        let mut table = HashMap::with_capacity(validated.len() + 1);
        for step in validated.iter().chain(std::iter::once(&review)) {
            let previous = table.insert(step.id().to_string(), Arc::clone(step));
            if previous.is_some() {
                return Err(FormError::DuplicateStep {
                    form_id: self.id,
                    step_id: step.id().to_string(),
                });
            }
        }

        Ok(FormDefinition {
            id: self.id,
            title: self.title,
            kind: self.kind,
            base: self.base,
            conditional: self.conditional,
            review,
            table,
        })
    }
}
