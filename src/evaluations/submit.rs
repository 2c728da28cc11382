//! Accepting a student's evaluation of an instructor.

use std::{collections::HashMap, fmt};

use chrono::Utc;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};

use crate::{
    evaluations::{NewEvaluationDetail, RATING_RANGE},
    instructors::Instructor,
    questions::Question,
    schema::{evaluation_details, evaluations},
    store,
};

#[derive(Debug)]
pub enum SubmissionError {
    MissingRating { question_id: i32 },
    InvalidRating { question_id: i32 },
    NoInstructor,
    UnknownInstructor,
    AlreadyEvaluated,
    Database(diesel::result::Error),
}

impl fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionError::MissingRating { question_id } => write!(
                f,
                "Please ensure all questions are rated. Missing rating for \
                 question ID {question_id}."
            ),
            SubmissionError::InvalidRating { question_id } => write!(
                f,
                "Ratings must be whole numbers from 1 to 5 (question ID \
                 {question_id})."
            ),
            SubmissionError::NoInstructor => {
                f.write_str("Please select an instructor to evaluate.")
            }
            SubmissionError::UnknownInstructor => {
                f.write_str("The selected instructor does not exist.")
            }
            SubmissionError::AlreadyEvaluated => {
                f.write_str("You have already evaluated this instructor.")
            }
            SubmissionError::Database(_) => {
                f.write_str("Error submitting evaluation.")
            }
        }
    }
}

impl std::error::Error for SubmissionError {}

impl From<diesel::result::Error> for SubmissionError {
    fn from(e: diesel::result::Error) -> Self {
        if store::is_unique_violation(&e) {
            SubmissionError::AlreadyEvaluated
        } else {
            SubmissionError::Database(e)
        }
    }
}

/// A validated rating for every registered question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSheet(Vec<(i32, i32)>);

impl RatingSheet {
    /// Checks `submitted` (question id -> rating, as sent by the form)
    /// against the registered questions. Questions are checked in display
    /// order, and the first one without a usable rating is reported. Ratings
    /// for unknown questions are ignored.
    pub fn complete(
        questions: &[Question],
        submitted: &HashMap<String, String>,
    ) -> Result<RatingSheet, SubmissionError> {
        let by_id = submitted
            .iter()
            .filter_map(|(k, v)| Some((k.trim().parse::<i32>().ok()?, v)))
            .collect::<HashMap<i32, &String>>();

        questions
            .iter()
            .map(|question| {
                let question_id = question.id;
                let raw = by_id
                    .get(&question_id)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .ok_or(SubmissionError::MissingRating { question_id })?;

                match raw.parse::<i32>() {
                    Ok(rating) if RATING_RANGE.contains(&rating) => {
                        Ok((question_id, rating))
                    }
                    _ => Err(SubmissionError::InvalidRating { question_id }),
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(RatingSheet)
    }

    pub fn ratings(&self) -> &[(i32, i32)] {
        &self.0
    }
}

#[derive(Debug)]
pub struct EvaluationSubmission<'a> {
    pub student_id: &'a str,
    /// As sent by the form; `None` or blank if nothing was selected.
    pub instructor: Option<&'a str>,
    pub ratings: &'a HashMap<String, String>,
    pub remarks: Option<&'a str>,
}

/// Validates and stores an evaluation, returning the new evaluation's id.
///
/// The evaluation and its detail rows are written in a single (nested)
/// transaction; on any failure none of them are kept.
#[tracing::instrument(skip_all, fields(student = submission.student_id))]
pub fn submit_evaluation(
    submission: EvaluationSubmission<'_>,
    conn: &mut impl LoadConnection<Backend = Sqlite>,
) -> Result<i32, SubmissionError> {
    let questions = Question::all_ordered(conn)?;
    let sheet = RatingSheet::complete(&questions, submission.ratings)?;

    let instructor_id = submission
        .instructor
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SubmissionError::NoInstructor)?
        .parse::<i32>()
        .map_err(|_| SubmissionError::UnknownInstructor)?;

    if Instructor::fetch(instructor_id, conn)?.is_none() {
        return Err(SubmissionError::UnknownInstructor);
    }

    let already = diesel::select(diesel::dsl::exists(
        evaluations::table
            .filter(evaluations::student_id.eq(submission.student_id))
            .filter(evaluations::instructor_id.eq(instructor_id)),
    ))
    .get_result::<bool>(conn)?;
    if already {
        return Err(SubmissionError::AlreadyEvaluated);
    }

    let remarks = submission
        .remarks
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let evaluation_id = conn.transaction::<_, diesel::result::Error, _>(
        |conn| {
            let evaluation_id = diesel::insert_into(evaluations::table)
                .values((
                    evaluations::instructor_id.eq(instructor_id),
                    evaluations::student_id.eq(submission.student_id),
                    evaluations::remarks.eq(remarks),
                    evaluations::submitted_at.eq(Utc::now().naive_utc()),
                ))
                .returning(evaluations::id)
                .get_result::<i32>(conn)?;

            let details = sheet
                .ratings()
                .iter()
                .map(|(question_id, rating)| NewEvaluationDetail {
                    evaluation_id,
                    question_id: *question_id,
                    rating: *rating,
                })
                .collect::<Vec<_>>();

            if !details.is_empty() {
                diesel::insert_into(evaluation_details::table)
                    .values(&details)
                    .execute(conn)?;
            }

            Ok(evaluation_id)
        },
    )?;

    tracing::info!(evaluation_id, instructor_id, "evaluation submitted");
    Ok(evaluation_id)
}
