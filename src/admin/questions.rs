use std::collections::HashMap;

use axum::extract::RawForm;
use hypertext::prelude::*;
use serde::Deserialize;

use crate::{
    auth::{AdminLogin, Gate, Session},
    flash::Flash,
    questions::Question,
    state::Conn,
    store::Deletion,
    template::Page,
    util_resp::{FlashResponse, see_other_ok, success},
    validation::{parse_id, required},
};

const MANAGE_QUESTIONS: &str = "/admin_manage_questions";

pub async fn manage_questions_page(
    Gate(_): Gate<AdminLogin>,
    session: Session,
    flash: Flash,
    mut conn: Conn<false>,
) -> FlashResponse {
    let questions = Question::all_ordered(&mut *conn)?;

    let (flash, notices) = flash.take();
    success(
        flash,
        Page::new()
            .title("Manage questions")
            .session(session)
            .notices(notices)
            .body(maud! {
                h1 class="h2 mb-3" { "Evaluation questions" }
                @if questions.is_empty() {
                    p { "There are no questions yet." }
                } @else {
                    form method="post" action=(MANAGE_QUESTIONS) {
                        input type="hidden" name="action" value="update_questions";
                        @for question in &questions {
                            div class="input-group mb-2" {
                                span class="input-group-text" { (question.display_order) }
                                input type="text" class="form-control"
                                    name=(format!("text[{}]", question.id))
                                    value=(question.text);
                            }
                        }
                        button type="submit" class="btn btn-primary" { "Save changes" }
                    }

                    h2 class="h4 mt-4" { "Delete a question" }
                    form method="post" action=(MANAGE_QUESTIONS) class="d-flex gap-2" {
                        input type="hidden" name="action" value="delete_question";
                        select class="form-select" name="question_id" required {
                            @for question in &questions {
                                option value=(question.id) { (question.text) }
                            }
                        }
                        button type="submit" class="btn btn-outline-danger"
                            onclick="return confirm('Are you sure?')" { "Delete" }
                    }
                }

                h2 class="h4 mt-4" { "Add a question" }
                form method="post" action=(MANAGE_QUESTIONS) {
                    input type="hidden" name="action" value="add_question";
                    div class="mb-3" {
                        input type="text" class="form-control" name="new_text" required;
                    }
                    button type="submit" class="btn btn-primary" { "Add question" }
                }
            })
            .render(),
    )
}

/// The bulk update sends `text[<question id>]` for every question.
#[derive(Deserialize, Default, Debug)]
pub struct ManageQuestionsForm {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    text: HashMap<String, String>,
    #[serde(default)]
    new_text: Option<String>,
    #[serde(default)]
    question_id: Option<String>,
}

pub async fn do_manage_questions(
    Gate(_): Gate<AdminLogin>,
    flash: Flash,
    mut conn: Conn<true>,
    RawForm(body): RawForm,
) -> FlashResponse {
    let form = match serde_qs::Config::new(5, false)
        .deserialize_bytes::<ManageQuestionsForm>(&body)
    {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!("malformed question form: {e}");
            return see_other_ok(
                flash.error("Invalid form submission."),
                MANAGE_QUESTIONS,
            );
        }
    };

    let flash = match form.action.as_deref() {
        Some("update_questions") => update_questions(flash, &mut conn, &form),
        Some("add_question") => add_question(flash, &mut conn, &form),
        Some("delete_question") => delete_question(flash, &mut conn, &form),
        _ => flash.error("Unknown action."),
    };

    see_other_ok(flash, MANAGE_QUESTIONS)
}

fn update_questions(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageQuestionsForm,
) -> Flash {
    let texts = form
        .text
        .iter()
        .filter_map(|(id, text)| Some((id.trim().parse::<i32>().ok()?, text.clone())))
        .collect::<Vec<_>>();

    match Question::update_texts(&texts, &mut **conn) {
        Ok(_) => flash.success("Evaluation questions updated successfully!"),
        Err(e) => {
            tracing::error!("could not update questions: {e}");
            flash.error("Error updating questions.")
        }
    }
}

fn add_question(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageQuestionsForm,
) -> Flash {
    let Some(text) = required(&form.new_text) else {
        return flash.error("Please enter the text of the new question.");
    };

    match Question::add(text, &mut **conn) {
        Ok(_) => flash.success("New question added successfully!"),
        Err(e) => {
            tracing::error!("could not add question: {e}");
            flash.error("Error adding question.")
        }
    }
}

fn delete_question(
    flash: Flash,
    conn: &mut Conn<true>,
    form: &ManageQuestionsForm,
) -> Flash {
    let Some(id) = parse_id(&form.question_id) else {
        return flash.error("Please select a question to delete.");
    };

    match Question::delete(id, &mut **conn) {
        Ok(Deletion::Deleted) => flash.success("Question deleted successfully!"),
        Ok(Deletion::InUse) => flash.error(
            "Cannot delete question. Existing evaluations use it.",
        ),
        Ok(Deletion::NotFound) => flash.error("Question not found."),
        Err(e) => {
            tracing::error!("could not delete question {id}: {e}");
            flash.error("Error deleting question.")
        }
    }
}
