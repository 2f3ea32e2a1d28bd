use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dom::{Document, ElementId, Selector};
use crate::error::{AppError, AppResult};
use crate::overlay::ModalContent;
use crate::site::PageContext;

use super::field_errors::{check_field, clear_field_error, show_field_error};
use super::submit::{FormKind, SubmissionReceipt, SubmissionRequest};

pub const BUSY_LABEL: &str = "Sending...";

const EMERGENCY_LINE: &str = "(011) 456-7891";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Busy { generation: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission of this form is still in flight.
    Ignored,
    /// At least one field failed; the first failing control has focus.
    Rejected { invalid: Vec<ElementId> },
    Started { generation: u64 },
}

/// Validation and submission lifecycle of one form element.
#[derive(Debug)]
pub struct FormController {
    form: ElementId,
    kind: FormKind,
    name: String,
    phase: FormPhase,
    generation: u64,
    saved_label: Option<String>,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl FormController {
    pub fn new(form: ElementId, kind: FormKind, name: impl Into<String>) -> Self {
        Self {
            form,
            kind,
            name: name.into(),
            phase: FormPhase::Idle,
            generation: 0,
            saved_label: None,
            cancel: None,
            task: None,
        }
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn contains(&self, doc: &dyn Document, element: ElementId) -> bool {
        element != self.form && doc.is_inside(element, self.form)
    }

    /// Editable controls of the form in document order.
    pub fn controls(&self, doc: &dyn Document) -> Vec<ElementId> {
        let selector = Selector::any([
            Selector::tag("input"),
            Selector::tag("select"),
            Selector::tag("textarea"),
        ]);
        doc.query_within(self.form, &selector)
            .into_iter()
            .filter(|id| {
                !matches!(
                    doc.attr(*id, "type").as_deref(),
                    Some("submit" | "button" | "reset" | "hidden")
                )
            })
            .collect()
    }

    pub fn submit_control(&self, doc: &dyn Document) -> Option<ElementId> {
        let selector = Selector::any([Selector::tag("button"), Selector::tag("input")])
            .and(Selector::attr_eq("type", "submit"));
        doc.query_within(self.form, &selector).into_iter().next()
    }

    /// Validates every checked control, refreshing inline errors.
    pub fn validate_all(&self, doc: &mut dyn Document) -> Vec<ElementId> {
        let mut invalid = Vec::new();
        for control in self.controls(doc) {
            if check_field(doc, control).valid {
                continue;
            }
            if self.kind == FormKind::Contact
                && let Some(message) = doc
                    .attr(control, "name")
                    .and_then(|name| contact_message(&name))
            {
                show_field_error(doc, control, message);
            }
            invalid.push(control);
        }
        invalid
    }

    pub(crate) fn submit(&mut self, ctx: &mut PageContext<'_>) -> AppResult<SubmitOutcome> {
        if matches!(self.phase, FormPhase::Busy { .. }) {
            tracing::debug!(form = %self.name, "submission already in flight");
            return Ok(SubmitOutcome::Ignored);
        }

        let invalid = self.validate_all(ctx.doc);
        if let Some(first) = invalid.first() {
            ctx.doc.focus(*first);
            tracing::debug!(form = %self.name, invalid = invalid.len(), "form rejected");
            return Ok(SubmitOutcome::Rejected { invalid });
        }

        let fields = self
            .controls(ctx.doc)
            .into_iter()
            .filter_map(|control| {
                let name = ctx.doc.attr(control, "name")?;
                Some((name, ctx.doc.value(control).unwrap_or_default()))
            })
            .collect();
        let request = SubmissionRequest {
            kind: self.kind,
            form: self.name.clone(),
            fields,
        };

        self.generation += 1;
        let generation = self.generation;
        self.phase = FormPhase::Busy { generation };
        self.enter_busy(ctx.doc);

        let cancel = CancellationToken::new();
        self.task = Some(
            ctx.scheduler
                .submit(self.form, generation, request, cancel.clone()),
        );
        self.cancel = Some(cancel);
        tracing::info!(form = %self.name, generation, "form submitted");
        Ok(SubmitOutcome::Started { generation })
    }

    /// Applies a finished submission. Returns `false` for results of a
    /// cancelled or superseded generation, which are dropped untouched.
    pub(crate) fn complete(
        &mut self,
        ctx: &mut PageContext<'_>,
        generation: u64,
        result: AppResult<SubmissionReceipt>,
    ) -> AppResult<bool> {
        if self.phase != (FormPhase::Busy { generation }) {
            tracing::debug!(form = %self.name, generation, "dropping stale submission result");
            return Ok(false);
        }
        self.phase = FormPhase::Idle;
        self.cancel = None;
        self.task = None;
        self.leave_busy(ctx.doc);

        match result {
            Ok(receipt) => {
                self.reset_fields(ctx.doc);
                ctx.overlays
                    .open_modal(ctx.doc, success_content(self.kind, &receipt));
                match self.kind {
                    FormKind::Contact => ctx.track("contact_form", "submission_success")?,
                    FormKind::Enquiry => ctx.track("form_submission", &self.name)?,
                }
            }
            Err(err) => {
                tracing::warn!(form = %self.name, error = %err, "form submission failed");
                ctx.overlays.open_modal(ctx.doc, error_content(&err));
                ctx.track("form_error", &self.name)?;
            }
        }
        Ok(true)
    }

    /// Abandons an in-flight submission and restores the submit control.
    pub fn cancel(&mut self, doc: &mut dyn Document) -> bool {
        if self.phase == FormPhase::Idle {
            return false;
        }
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.phase = FormPhase::Idle;
        self.leave_busy(doc);
        tracing::debug!(form = %self.name, "submission cancelled");
        true
    }

    fn enter_busy(&mut self, doc: &mut dyn Document) {
        let Some(button) = self.submit_control(doc) else {
            return;
        };
        self.saved_label = Some(label_of(doc, button));
        set_label(doc, button, BUSY_LABEL);
        doc.set_attr(button, "disabled", "");
        doc.set_attr(button, "aria-busy", "true");
    }

    fn leave_busy(&mut self, doc: &mut dyn Document) {
        let Some(button) = self.submit_control(doc) else {
            return;
        };
        if let Some(label) = self.saved_label.take() {
            set_label(doc, button, &label);
        }
        doc.remove_attr(button, "disabled");
        doc.remove_attr(button, "aria-busy");
    }

    fn reset_fields(&self, doc: &mut dyn Document) {
        for control in self.controls(doc) {
            doc.set_value(control, "");
            clear_field_error(doc, control);
        }
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
    }
}

fn label_of(doc: &dyn Document, button: ElementId) -> String {
    if doc.tag(button) == Some("input") {
        doc.attr(button, "value").unwrap_or_default()
    } else {
        doc.own_text(button).unwrap_or_default().to_string()
    }
}

fn set_label(doc: &mut dyn Document, button: ElementId, label: &str) {
    if doc.tag(button) == Some("input") {
        doc.set_attr(button, "value", label);
    } else {
        doc.set_text(button, label);
    }
}

/// Contact form wording for its empty required fields.
fn contact_message(name: &str) -> Option<&'static str> {
    match name {
        "name" => Some("Please enter your name"),
        "message" => Some("Please enter your message"),
        _ => None,
    }
}

pub fn success_content(kind: FormKind, receipt: &SubmissionReceipt) -> ModalContent {
    match kind {
        FormKind::Contact => ModalContent::titled("Message Sent Successfully!")
            .paragraph(
                "Thank you for contacting Neptune Claws & Paws Rescue. \
                 We'll get back to you within 24 hours.",
            )
            .labelled(
                "For urgent matters, please call our emergency line:",
                EMERGENCY_LINE,
            )
            .labelled("Reference #:", &receipt.reference),
        FormKind::Enquiry => ModalContent::titled("Success!")
            .paragraph("Your form has been submitted successfully. We'll get back to you soon.")
            .labelled("Reference #:", &receipt.reference),
    }
}

pub fn error_content(err: &AppError) -> ModalContent {
    let detail = match err {
        AppError::Submission { message, .. } => message.clone(),
        other => other.to_string(),
    };
    ModalContent::titled("Error")
        .paragraph(
            "Sorry, there was an error submitting your form. \
             Please try again or contact us directly.",
        )
        .paragraph(format!("Error: {detail}"))
}
