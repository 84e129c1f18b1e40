//! Step resolution.
//!
//! The effective step list is recomputed from the form's immutable template
//! every time it is needed, so repeated resolution can never accumulate
//! duplicate steps.

use std::sync::Arc;

use clinica_core::Draft;
use tracing::debug;

use crate::form::FormDefinition;
use crate::step::Step;

/// Compute the ordered steps that apply to `draft`.
///
/// Base steps keep their template order. Each conditional step whose
/// visibility rule holds is inserted right after its anchor; conditional
/// steps sharing an anchor keep declaration order. The review step is
/// always last. Equal drafts always produce equal lists.
pub fn resolve_steps(form: &FormDefinition, draft: &Draft) -> Vec<Arc<dyn Step>> {
    let mut steps: Vec<Arc<dyn Step>> = Vec::with_capacity(form.base_steps().len() + 2);

    for base in form.base_steps() {
        steps.push(Arc::clone(base));
        steps.extend(
            form.conditional_steps()
                .iter()
                .filter(|p| p.after == base.id() && p.step.visible_when(draft))
                .map(|p| Arc::clone(&p.step)),
        );
    }
    steps.push(Arc::clone(form.review_step()));

    debug!(
        form = form.id(),
        steps = steps.len(),
        "resolved wizard steps"
    );
    steps
}

pub fn resolve_step_ids(form: &FormDefinition, draft: &Draft) -> Vec<String> {
    resolve_steps(form, draft)
        .iter()
        .map(|s| s.id().to_string())
        .collect()
}
