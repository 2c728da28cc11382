//! Fills a database with demonstration data: a handful of teachers,
//! instructors, questions and approved students, some of whom have already
//! submitted evaluations.

use std::collections::HashMap;

use clap::Parser;
use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::MigrationHarness;
use rand::Rng;
use tally::{
    MIGRATIONS,
    admin::Admin,
    evaluations::submit::{EvaluationSubmission, submit_evaluation},
    instructors::Instructor,
    questions::Question,
    students::{Registration, Student},
    teachers::Teacher,
};

#[derive(Parser)]
pub struct Seed {
    database_url: Option<String>,
    /// Number of students to register.
    #[clap(long, default_value_t = 20)]
    students: u32,
}

const QUESTIONS: [&str; 5] = [
    "The instructor explains the material clearly.",
    "The instructor is well prepared for class.",
    "The instructor encourages questions and participation.",
    "Assessments reflect what was taught.",
    "I would recommend this instructor to other students.",
];

const INSTRUCTORS: [(&str, &str, &str); 4] = [
    ("Ada", "Lovelace", "Analytical Engines"),
    ("Alan", "Turing", "Computability"),
    ("Grace", "Hopper", "Compilers"),
    ("Edsger", "Dijkstra", "Algorithms"),
];

const REMARKS: [&str; 4] = [
    "Great lectures.",
    "The pace was a little fast.",
    "Very helpful during office hours.",
    "",
];

fn main() {
    let args = Seed::parse();
    let db_url = if let Some(url) = args.database_url {
        url
    } else {
        std::env::var("DATABASE_URL").expect(
            "please either set `DATABASE_URL` or pass a database url",
        )
    };

    let mut conn = SqliteConnection::establish(&db_url).unwrap();
    conn.batch_execute("PRAGMA foreign_keys = ON;").unwrap();
    conn.run_pending_migrations(MIGRATIONS).unwrap();

    if Admin::by_username("admin", &mut conn).unwrap().is_none() {
        Admin::create("admin", "password", &mut conn).unwrap();
    }

    let question_ids = QUESTIONS
        .iter()
        .map(|text| Question::add(text, &mut conn).unwrap())
        .collect::<Vec<_>>();

    let teachers = [
        Teacher::add("mhamilton", "password", "Margaret", "Hamilton", &mut conn)
            .unwrap(),
        Teacher::add("dknuth", "password", "Donald", "Knuth", &mut conn)
            .unwrap(),
    ];

    let instructor_ids = INSTRUCTORS
        .iter()
        .enumerate()
        .map(|(i, (first, last, course))| {
            let id = Instructor::add(first, last, course, &mut conn).unwrap();
            Instructor::assign_teacher(
                id,
                Some(teachers[i % teachers.len()]),
                &mut conn,
            )
            .unwrap();
            id
        })
        .collect::<Vec<_>>();

    let mut rng = rand::rng();
    for n in 1..=args.students {
        let school_id = format!("S{n:04}");
        let email = format!("{}@example.com", school_id.to_lowercase());
        let year_level = ((n % 4) + 1).to_string();
        Student::register(
            &Registration {
                school_id: &school_id,
                password: "password",
                first_name: "Student",
                last_name: &n.to_string(),
                email: &email,
                year_level: &year_level,
            },
            &mut conn,
        )
        .unwrap();
        Student::approve(&school_id, &mut conn).unwrap();

        for instructor in &instructor_ids {
            if !rng.random_bool(0.6) {
                continue;
            }

            let ratings = question_ids
                .iter()
                .map(|q| (q.to_string(), rng.random_range(1..=5).to_string()))
                .collect::<HashMap<_, _>>();
            let instructor = instructor.to_string();
            let remarks = REMARKS[rng.random_range(0..REMARKS.len())];

            submit_evaluation(
                EvaluationSubmission {
                    student_id: &school_id,
                    instructor: Some(&instructor),
                    ratings: &ratings,
                    remarks: Some(remarks),
                },
                &mut conn,
            )
            .unwrap();
        }
    }

    println!(
        "seeded {} students, {} instructors and {} questions",
        args.students,
        instructor_ids.len(),
        question_ids.len()
    );
}
