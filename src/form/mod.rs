mod controller;
mod field_errors;
mod submit;

use crate::dom::{Document, ElementId, Selector};
use crate::error::AppResult;
use crate::event::{Key, UiEvent};
use crate::site::{Feature, Handled, PageContext};

pub use controller::{
    BUSY_LABEL, FormController, FormPhase, SubmitOutcome, error_content, success_content,
};
pub use field_errors::{
    FIELD_ERROR_CLASS, INVALID_CLASS, check_field, clear_field_error, show_field_error,
};
pub use submit::{
    FormKind, InstantSubmitter, SimulatedSubmitter, SubmissionReceipt, SubmissionRequest,
    Submitter, reference_token,
};

/// Every managed form on the page: `#contact-form` and each `.enquiry-form`.
pub struct Forms;

#[derive(Debug, Default)]
pub struct FormsState {
    controllers: Vec<FormController>,
}

impl FormsState {
    pub fn controllers(&self) -> &[FormController] {
        &self.controllers
    }

    pub fn controller(&self, form: ElementId) -> Option<&FormController> {
        self.controllers.iter().find(|c| c.form() == form)
    }

    fn controller_mut(&mut self, form: ElementId) -> Option<&mut FormController> {
        self.controllers.iter_mut().find(|c| c.form() == form)
    }

    fn owner_of(&mut self, doc: &dyn Document, element: ElementId) -> Option<&mut FormController> {
        self.controllers
            .iter_mut()
            .find(|c| c.contains(doc, element))
    }

    pub(crate) fn complete(
        &mut self,
        ctx: &mut PageContext<'_>,
        form: ElementId,
        generation: u64,
        result: AppResult<SubmissionReceipt>,
    ) -> AppResult<bool> {
        match self.controller_mut(form) {
            Some(controller) => controller.complete(ctx, generation, result),
            None => Ok(false),
        }
    }

    pub fn cancel_all(&mut self, doc: &mut dyn Document) {
        for controller in &mut self.controllers {
            controller.cancel(doc);
        }
    }
}

impl Feature for Forms {
    type State = FormsState;

    const NAME: &'static str = "forms";

    fn mount(ctx: &mut PageContext<'_>) -> AppResult<Self::State> {
        let mut controllers = Vec::new();
        let doc = &*ctx.doc;
        let contact = Selector::tag("form").and(Selector::id("contact-form"));
        for form in doc.query_all(&contact) {
            controllers.push(FormController::new(form, FormKind::Contact, "contact-form"));
        }
        for form in doc.query_all(&Selector::tag("form").and(Selector::class("enquiry-form"))) {
            if controllers.iter().any(|c| c.form() == form) {
                continue;
            }
            let name = doc
                .attr(form, "id")
                .unwrap_or_else(|| "enquiry-form".to_string());
            controllers.push(FormController::new(form, FormKind::Enquiry, name));
        }
        for form in &controllers {
            ctx.doc.set_attr(form.form(), "novalidate", "");
        }
        Ok(FormsState { controllers })
    }

    fn handle_ui(
        state: &mut Self::State,
        event: &UiEvent,
        ctx: &mut PageContext<'_>,
    ) -> AppResult<Handled> {
        match event {
            UiEvent::Submit { form } => {
                let Some(controller) = state.controller_mut(*form) else {
                    return Ok(Handled::Ignored);
                };
                controller.submit(ctx)?;
                Ok(Handled::Consumed)
            }
            UiEvent::Click { target } => {
                let Some(controller) = state.owner_of(ctx.doc, *target) else {
                    return Ok(Handled::Ignored);
                };
                let submit = controller.submit_control(ctx.doc);
                if submit.is_none_or(|button| !ctx.doc.is_inside(*target, button)) {
                    return Ok(Handled::Ignored);
                }
                controller.submit(ctx)?;
                Ok(Handled::Consumed)
            }
            UiEvent::KeyDown {
                target: Some(target),
                key: Key::Enter,
            } if ctx.doc.tag(*target) == Some("input") => {
                let Some(controller) = state.owner_of(ctx.doc, *target) else {
                    return Ok(Handled::Ignored);
                };
                controller.submit(ctx)?;
                Ok(Handled::Consumed)
            }
            UiEvent::Blur { target } => {
                if state.owner_of(ctx.doc, *target).is_some() {
                    check_field(ctx.doc, *target);
                }
                Ok(Handled::Ignored)
            }
            UiEvent::Input { target, .. } => {
                if state.owner_of(ctx.doc, *target).is_some() {
                    clear_field_error(ctx.doc, *target);
                }
                Ok(Handled::Ignored)
            }
            _ => Ok(Handled::Ignored),
        }
    }
}
