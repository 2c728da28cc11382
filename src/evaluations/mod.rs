//! Evaluations submitted by students, and everything computed from them.
//!
//! An evaluation is one student's assessment of one instructor. It carries
//! an optional free-text remark, and one [`EvaluationDetail`] per question
//! holding that question's rating. The per-question rows are the only place
//! ratings are stored; averages are always computed from them.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::{evaluation_details, evaluations};

pub mod progress;
pub mod report;
pub mod submit;

/// Ratings are whole numbers on this scale.
pub const RATING_RANGE: std::ops::RangeInclusive<i32> = 1..=5;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = evaluations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Evaluation {
    pub id: i32,
    pub instructor_id: i32,
    pub student_id: String,
    pub remarks: Option<String>,
    pub submitted_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(Evaluation))]
#[diesel(table_name = evaluation_details)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EvaluationDetail {
    pub id: i32,
    pub evaluation_id: i32,
    pub question_id: i32,
    pub rating: i32,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = evaluation_details)]
pub struct NewEvaluationDetail {
    pub evaluation_id: i32,
    pub question_id: i32,
    pub rating: i32,
}
