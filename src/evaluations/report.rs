//! Aggregated results for an instructor.

use std::{collections::HashMap, fmt};

use chrono::NaiveDateTime;
use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};
use itertools::Itertools;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    instructors::Instructor,
    questions::Question,
    schema::{evaluation_details, evaluations, students},
};

/// The mean of a set of ratings, as displayed. No ratings means there is no
/// statistic at all, which is distinct from a mean of zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AverageRating {
    NotAvailable,
    Mean(Decimal),
}

impl AverageRating {
    pub fn of(ratings: &[i32]) -> AverageRating {
        if ratings.is_empty() {
            return AverageRating::NotAvailable;
        }

        let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
        let mean = Decimal::from(sum) / Decimal::from(ratings.len());
        AverageRating::Mean(
            mean.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl fmt::Display for AverageRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AverageRating::NotAvailable => f.write_str("N/A"),
            AverageRating::Mean(mean) => write!(f, "{mean:.2}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionStat {
    pub question_id: i32,
    pub text: String,
    pub average: AverageRating,
    pub responses: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remark {
    pub remarks: String,
    pub submitted_at: NaiveDateTime,
    pub year_level: String,
}

#[derive(Debug, Clone)]
pub struct InstructorReport {
    pub instructor: Instructor,
    /// One entry per registered question, in display order.
    pub questions: Vec<QuestionStat>,
    /// Newest first.
    pub remarks: Vec<Remark>,
}

impl InstructorReport {
    /// The caller is responsible for checking that the instructor exists
    /// (and that the viewer may see it).
    #[tracing::instrument(skip_all, fields(instructor = instructor.id))]
    pub fn for_instructor(
        instructor: Instructor,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<InstructorReport> {
        let questions = Question::all_ordered(conn)?;

        let mut ratings: HashMap<i32, Vec<i32>> = evaluation_details::table
            .inner_join(evaluations::table)
            .filter(evaluations::instructor_id.eq(instructor.id))
            .select((evaluation_details::question_id, evaluation_details::rating))
            .load::<(i32, i32)>(conn)?
            .into_iter()
            .into_group_map();

        let questions = questions
            .into_iter()
            .map(|question| {
                let ratings = ratings.remove(&question.id).unwrap_or_default();
                QuestionStat {
                    question_id: question.id,
                    text: question.text,
                    average: AverageRating::of(&ratings),
                    responses: ratings.len(),
                }
            })
            .collect();

        let remarks = evaluations::table
            .inner_join(students::table)
            .filter(evaluations::instructor_id.eq(instructor.id))
            .filter(evaluations::remarks.is_not_null())
            .filter(evaluations::remarks.ne(""))
            .order_by((evaluations::submitted_at.desc(), evaluations::id.desc()))
            .select((
                evaluations::remarks.assume_not_null(),
                evaluations::submitted_at,
                students::year_level,
            ))
            .load::<(String, NaiveDateTime, String)>(conn)?
            .into_iter()
            .filter(|(remarks, _, _)| !remarks.trim().is_empty())
            .map(|(remarks, submitted_at, year_level)| Remark {
                remarks,
                submitted_at,
                year_level,
            })
            .collect();

        Ok(InstructorReport {
            instructor,
            questions,
            remarks,
        })
    }
}

/// One row of a teacher's dashboard.
#[derive(Debug, Clone)]
pub struct CourseSummary {
    pub instructor: Instructor,
    pub evaluation_count: usize,
    /// Over every rating of every question.
    pub average: AverageRating,
}

impl CourseSummary {
    #[tracing::instrument(skip(conn))]
    pub fn for_teacher(
        teacher_id: i32,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Vec<CourseSummary>> {
        let instructors = Instructor::of_teacher(teacher_id, conn)?;
        let ids = instructors.iter().map(|i| i.id).collect::<Vec<_>>();

        let evaluation_counts: HashMap<i32, usize> = evaluations::table
            .filter(evaluations::instructor_id.eq_any(&ids))
            .select(evaluations::instructor_id)
            .load::<i32>(conn)?
            .into_iter()
            .counts();

        let mut ratings: HashMap<i32, Vec<i32>> = evaluation_details::table
            .inner_join(evaluations::table)
            .filter(evaluations::instructor_id.eq_any(&ids))
            .select((evaluations::instructor_id, evaluation_details::rating))
            .load::<(i32, i32)>(conn)?
            .into_iter()
            .into_group_map();

        Ok(instructors
            .into_iter()
            .map(|instructor| {
                let ratings =
                    ratings.remove(&instructor.id).unwrap_or_default();
                CourseSummary {
                    evaluation_count: evaluation_counts
                        .get(&instructor.id)
                        .copied()
                        .unwrap_or(0),
                    average: AverageRating::of(&ratings),
                    instructor,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::test::fixtures::{
        add_instructor, add_question, add_teacher, evaluate, evaluate_with,
        memory_conn, register_student,
    };

    use super::*;

    #[test]
    fn averages_are_shown_to_two_places() {
        assert_eq!(AverageRating::of(&[]).to_string(), "N/A");
        assert_eq!(AverageRating::of(&[5, 5]).to_string(), "5.00");
        assert_eq!(AverageRating::of(&[4, 5]).to_string(), "4.50");
        assert_eq!(AverageRating::of(&[1, 2, 2]).to_string(), "1.67");
        assert_eq!(AverageRating::of(&[4, 4, 5]).to_string(), "4.33");
    }

    #[test]
    fn per_question_averages_and_counts() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        register_student(&mut conn, "s2", true);
        let q1 = add_question(&mut conn, "Explains clearly");
        let q2 = add_question(&mut conn, "Starts on time");
        let i = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");

        evaluate(&mut conn, "s1", i, &[(q1, 5), (q2, 3)]);
        // added after s1 submitted, so only s2 answers it
        let q3 = add_question(&mut conn, "Is approachable");
        evaluate(&mut conn, "s2", i, &[(q1, 5), (q2, 3), (q3, 4)]);

        let instructor = Instructor::fetch(i, &mut conn).unwrap().unwrap();
        let report =
            InstructorReport::for_instructor(instructor, &mut conn).unwrap();

        let stats = report
            .questions
            .iter()
            .map(|s| (s.question_id, s.average.to_string(), s.responses))
            .collect::<Vec<_>>();
        assert_eq!(
            stats,
            vec![
                (q1, "5.00".to_string(), 2),
                (q2, "3.00".to_string(), 2),
                (q3, "4.00".to_string(), 1),
            ]
        );
    }

    #[test]
    fn instructor_without_evaluations_has_no_statistics() {
        let mut conn = memory_conn();
        add_question(&mut conn, "Explains clearly");
        let i = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");

        let instructor = Instructor::fetch(i, &mut conn).unwrap().unwrap();
        let report =
            InstructorReport::for_instructor(instructor, &mut conn).unwrap();

        assert_eq!(report.questions.len(), 1);
        assert_eq!(report.questions[0].average, AverageRating::NotAvailable);
        assert_eq!(report.questions[0].average.to_string(), "N/A");
        assert_eq!(report.questions[0].responses, 0);
        assert!(report.remarks.is_empty());
    }

    #[test]
    fn only_non_empty_remarks_are_listed_newest_first() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        register_student(&mut conn, "s2", true);
        register_student(&mut conn, "s3", true);
        let q = add_question(&mut conn, "Explains clearly");
        let i = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");

        evaluate_with(&mut conn, "s1", i, &[(q, 4)], Some("Great lectures"));
        evaluate_with(&mut conn, "s2", i, &[(q, 4)], Some("   "));
        evaluate_with(&mut conn, "s3", i, &[(q, 5)], Some("Very patient"));

        let instructor = Instructor::fetch(i, &mut conn).unwrap().unwrap();
        let report =
            InstructorReport::for_instructor(instructor, &mut conn).unwrap();

        assert_eq!(
            report
                .remarks
                .iter()
                .map(|r| r.remarks.as_str())
                .collect::<Vec<_>>(),
            vec!["Very patient", "Great lectures"]
        );
        assert_eq!(report.remarks[0].year_level, "1");
    }

    #[test]
    fn teacher_summary_covers_only_their_instructors() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        register_student(&mut conn, "s2", true);
        let q1 = add_question(&mut conn, "Explains clearly");
        let q2 = add_question(&mut conn, "Starts on time");
        let teacher = add_teacher(&mut conn, "tlovelace", "Ada", "Lovelace");
        let mine = add_instructor(&mut conn, "Grace", "Hopper", "COBOL");
        let quiet = add_instructor(&mut conn, "Alan", "Kay", "Smalltalk");
        let other = add_instructor(&mut conn, "Edsger", "Dijkstra", "Algol");
        Instructor::assign_teacher(mine, Some(teacher), &mut conn).unwrap();
        Instructor::assign_teacher(quiet, Some(teacher), &mut conn).unwrap();

        evaluate(&mut conn, "s1", mine, &[(q1, 5), (q2, 4)]);
        evaluate(&mut conn, "s2", mine, &[(q1, 3), (q2, 3)]);
        evaluate(&mut conn, "s1", other, &[(q1, 1), (q2, 1)]);

        let summary = CourseSummary::for_teacher(teacher, &mut conn).unwrap();
        let rows = summary
            .iter()
            .map(|s| (s.instructor.id, s.evaluation_count, s.average.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            vec![
                (mine, 2, "3.75".to_string()),
                (quiet, 0, "N/A".to_string()),
            ]
        );
    }
}
