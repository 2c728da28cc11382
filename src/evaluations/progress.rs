use diesel::{connection::LoadConnection, prelude::*, sqlite::Sqlite};

use crate::{
    instructors::Instructor,
    schema::{evaluations, instructors},
};

/// How far a student has got through evaluating every instructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub total_instructors: i64,
    pub evaluated_count: i64,
    pub remaining_count: i64,
    /// Ordered by last name, then first name.
    pub remaining_instructors: Vec<Instructor>,
}

impl Progress {
    #[tracing::instrument(skip(conn))]
    pub fn of_student(
        school_id: &str,
        conn: &mut impl LoadConnection<Backend = Sqlite>,
    ) -> QueryResult<Progress> {
        let total_instructors = Instructor::count(conn)?;

        let evaluated_count = evaluations::table
            .filter(evaluations::student_id.eq(school_id))
            .select(diesel::dsl::count(evaluations::instructor_id).aggregate_distinct())
            .get_result::<i64>(conn)?;

        let remaining_instructors = if total_instructors > 0 {
            let evaluated = evaluations::table
                .filter(evaluations::student_id.eq(school_id))
                .select(evaluations::instructor_id);

            instructors::table
                .filter(instructors::id.ne_all(evaluated))
                .order_by((
                    instructors::last_name.asc(),
                    instructors::first_name.asc(),
                    instructors::id.asc(),
                ))
                .select(Instructor::as_select())
                .load(conn)?
        } else {
            Vec::new()
        };

        Ok(Progress {
            total_instructors,
            evaluated_count,
            remaining_count: (total_instructors - evaluated_count).max(0),
            remaining_instructors,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_count == 0
    }
}

#[cfg(test)]
mod tests {
    use crate::test::fixtures::{
        add_instructor, add_question, evaluate, memory_conn, register_student,
    };

    use super::*;

    #[test]
    fn no_instructors_means_nothing_to_do() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);

        let progress = Progress::of_student("s1", &mut conn).unwrap();
        assert_eq!(
            progress,
            Progress {
                total_instructors: 0,
                evaluated_count: 0,
                remaining_count: 0,
                remaining_instructors: vec![],
            }
        );
        assert!(progress.is_complete());
    }

    #[test]
    fn evaluated_instructors_are_not_remaining() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        register_student(&mut conn, "s2", true);
        let q = add_question(&mut conn, "Clarity");
        let a = add_instructor(&mut conn, "Alan", "Turing", "Computability");
        let b = add_instructor(&mut conn, "Barbara", "Liskov", "Abstraction");
        let c = add_instructor(&mut conn, "Claude", "Shannon", "Information");

        evaluate(&mut conn, "s1", a, &[(q, 4)]);
        // another student's evaluations do not count
        evaluate(&mut conn, "s2", b, &[(q, 2)]);

        let progress = Progress::of_student("s1", &mut conn).unwrap();
        assert_eq!(progress.total_instructors, 3);
        assert_eq!(progress.evaluated_count, 1);
        assert_eq!(progress.remaining_count, 2);
        assert_eq!(
            progress
                .remaining_instructors
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>(),
            // Liskov before Shannon
            vec![b, c]
        );
        assert!(!progress.is_complete());
    }

    #[test]
    fn counts_add_up_once_everyone_is_evaluated() {
        let mut conn = memory_conn();
        register_student(&mut conn, "s1", true);
        let q = add_question(&mut conn, "Clarity");
        let a = add_instructor(&mut conn, "Alan", "Turing", "Computability");
        let b = add_instructor(&mut conn, "Barbara", "Liskov", "Abstraction");
        evaluate(&mut conn, "s1", a, &[(q, 5)]);
        evaluate(&mut conn, "s1", b, &[(q, 3)]);

        let progress = Progress::of_student("s1", &mut conn).unwrap();
        assert_eq!(
            progress.evaluated_count + progress.remaining_count,
            progress.total_instructors
        );
        assert!(progress.remaining_instructors.is_empty());
        assert!(progress.is_complete());
    }
}
