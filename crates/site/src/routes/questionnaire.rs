//! Intake questionnaire route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, instrument, warn};

use prana_core::Goal;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::intake::{Field, IntakeForm, ValidationErrors};
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Shown when the forms endpoint fails or cannot be reached.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Submission failed. Please try again.";

/// One goal checkbox.
pub struct GoalChoiceView {
    pub label: &'static str,
    pub checked: bool,
}

/// Inline messages for the validated fields.
#[derive(Default)]
pub struct FieldErrorsView {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub phone: Option<&'static str>,
    pub age: Option<&'static str>,
}

impl From<&ValidationErrors> for FieldErrorsView {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            name: errors.get(Field::Name),
            email: errors.get(Field::Email),
            phone: errors.get(Field::Phone),
            age: errors.get(Field::Age),
        }
    }
}

/// Questionnaire page template.
#[derive(Template, WebTemplate)]
#[template(path = "questionnaire/form.html")]
pub struct QuestionnaireTemplate {
    pub nonce: String,
    pub form: IntakeForm,
    pub goals: Vec<GoalChoiceView>,
    pub errors: FieldErrorsView,
    pub submit_error: Option<&'static str>,
}

impl QuestionnaireTemplate {
    fn new(nonce: String, form: IntakeForm, errors: FieldErrorsView) -> Self {
        let goals = Goal::ALL
            .into_iter()
            .map(|goal| GoalChoiceView {
                label: goal.label(),
                checked: form.goals.contains(goal),
            })
            .collect();

        Self {
            nonce,
            form,
            goals,
            errors,
            submit_error: None,
        }
    }
}

/// Thank-you page template.
#[derive(Template, WebTemplate)]
#[template(path = "questionnaire/thanks.html")]
pub struct QuestionnaireThanksTemplate {
    pub nonce: String,
}

/// Display the empty questionnaire.
#[instrument(skip(nonce))]
pub async fn show(CspNonce(nonce): CspNonce) -> impl IntoResponse {
    QuestionnaireTemplate::new(nonce, IntakeForm::default(), FieldErrorsView::default())
}

/// Validate and submit the questionnaire.
///
/// Invalid input re-renders the form with inline messages and makes no
/// network call. A failed submission re-renders the form with one banner.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    CspNonce(nonce): CspNonce,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = IntakeForm::from_pairs(pairs);

    let record = match form.clone().into_record() {
        Ok(record) => record,
        Err(errors) => {
            info!(invalid_fields = errors.len(), "Questionnaire failed validation");
            let errors = FieldErrorsView::from(&errors);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                QuestionnaireTemplate::new(nonce, form, errors),
            )
                .into_response();
        }
    };

    match state.forms().submit(&record).await {
        Ok(()) => {
            add_breadcrumb("intake", "Questionnaire submitted", None);
            Redirect::to("/questionnaire/thanks").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Questionnaire submission failed");
            let mut page = QuestionnaireTemplate::new(nonce, form, FieldErrorsView::default());
            page.submit_error = Some(SUBMISSION_FAILED_MESSAGE);
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Display the thank-you page.
pub async fn thanks(CspNonce(nonce): CspNonce) -> impl IntoResponse {
    QuestionnaireThanksTemplate { nonce }
}
