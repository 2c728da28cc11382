use std::collections::HashMap;

use axum::extract::RawForm;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{Gate, Session, StudentLogin},
    evaluations::{
        RATING_RANGE,
        progress::Progress,
        submit::{EvaluationSubmission, SubmissionError, submit_evaluation},
    },
    flash::Flash,
    questions::Question,
    state::Conn,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
};

pub async fn evaluate_page(
    Gate(login): Gate<StudentLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let questions = Question::all_ordered(&mut *conn)?;
    let progress = Progress::of_student(&login.school_id, &mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Evaluate")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { "Evaluate an instructor" }
                p class="text-muted" {
                    (format!(
                        "{} of {} instructors remaining.",
                        progress.remaining_count, progress.total_instructors
                    ))
                }
                @if progress.total_instructors == 0 {
                    p { "There are no instructors to evaluate yet." }
                } @else if progress.is_complete() {
                    p { "You have already evaluated every instructor." }
                } @else {
                    form method="post" action="/evaluate" {
                        div class="mb-3" {
                            label for="instructor" class="form-label" { "Instructor" }
                            select class="form-select" id="instructor" name="instructor" required {
                                option value="" disabled selected { "Select an instructor" }
                                @for instructor in &progress.remaining_instructors {
                                    option value=(instructor.id) {
                                        (format!("{} ({})", instructor.full_name(), instructor.course))
                                    }
                                }
                            }
                        }
                        @for question in &questions {
                            fieldset class="mb-3" {
                                legend class="fs-6" { (question.text) }
                                @for rating in RATING_RANGE {
                                    div class="form-check form-check-inline" {
                                        input class="form-check-input" type="radio"
                                            id=(format!("q{}_{rating}", question.id))
                                            name=(format!("ratings[{}]", question.id))
                                            value=(rating)
                                            required;
                                        label class="form-check-label"
                                            for=(format!("q{}_{rating}", question.id)) {
                                            (rating)
                                        }
                                    }
                                }
                            }
                        }
                        div class="mb-3" {
                            label for="remarks" class="form-label" { "Remarks (optional)" }
                            textarea class="form-control" id="remarks" name="remarks" rows="3" {}
                        }
                        button type="submit" class="btn btn-primary" { "Submit evaluation" }
                    }
                }
            })
            .render(),
    )
}

/// Ratings arrive as `ratings[<question id>]=<rating>`, so the body is
/// decoded with `serde_qs` rather than as a flat form.
#[derive(Deserialize, Default, Debug)]
pub struct EvaluationForm {
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    remarks: Option<String>,
    #[serde(default)]
    ratings: HashMap<String, String>,
}

pub async fn do_evaluate(
    Gate(login): Gate<StudentLogin>,
    flash: Flash,
    mut conn: Conn<true>,
    RawForm(body): RawForm,
) -> FlashResponse {
    let form = match serde_qs::Config::new(5, false)
        .deserialize_bytes::<EvaluationForm>(&body)
    {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!("malformed evaluation form: {e}");
            return see_other_ok(
                flash.error("Invalid form submission."),
                "/evaluate",
            );
        }
    };

    let submission = EvaluationSubmission {
        student_id: &login.school_id,
        instructor: form.instructor.as_deref(),
        ratings: &form.ratings,
        remarks: form.remarks.as_deref(),
    };

    match submit_evaluation(submission, &mut *conn) {
        Ok(_) => see_other_ok(
            flash.success(
                "Evaluation submitted successfully! Thank you for your \
                 feedback.",
            ),
            "/dashboard",
        ),
        Err(SubmissionError::Database(e)) => {
            tracing::error!("could not store evaluation: {e}");
            see_other_ok(
                flash.error(SubmissionError::Database(e).to_string()),
                "/evaluate",
            )
        }
        Err(e) => see_other_ok(flash.error(e.to_string()), "/evaluate"),
    }
}
