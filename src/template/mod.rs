//! Templating code.
//!
//! This defines the [`Page`] item, which every HTML response is wrapped in.
//! It renders the navigation bar for whichever roles the session holds, and
//! the notices that were queued for this page.

use hypertext::prelude::*;

use crate::{auth::Session, flash::FlashMessage, widgets::alert::Notices};

pub struct Page<R: Renderable> {
    title: Option<String>,
    body: Option<R>,
    session: Session,
    notices: Vec<FlashMessage>,
}

impl<R: Renderable> Page<R> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: R) -> Self {
        self.body = Some(body);
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    pub fn notices(mut self, notices: Vec<FlashMessage>) -> Self {
        self.notices = notices;
        self
    }
}

impl<R: Renderable> Default for Page<R> {
    fn default() -> Self {
        Self {
            title: None,
            body: None,
            session: Session::default(),
            notices: Vec::new(),
        }
    }
}

impl<R: Renderable> Renderable for Page<R> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let title = match &self.title {
            Some(title) => format!("{title} | Instructor Evaluation"),
            None => "Instructor Evaluation".to_string(),
        };

        maud! {
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (title) }
                    link
                        href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css"
                        rel="stylesheet"
                        crossorigin="anonymous";
                    meta
                        name="viewport"
                        content="width=device-width, initial-scale=1";
                }
                body class="d-flex flex-column vh-100" {
                    nav class="navbar navbar-expand"
                        style="background-color: #1f3b5a;"
                        data-bs-theme="dark" {
                        div class="container-fluid" {
                            a class="navbar-brand text-white" href="/" {
                                "Instructor Evaluation"
                            }
                            ul class="navbar-nav" style="display: flex; gap: 1rem;" {
                                @if let Some(student) = &self.session.student {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/dashboard" { (student.name) }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/evaluate" { "Evaluate" }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/logout" { "Log out" }
                                    }
                                }
                                @if let Some(teacher) = &self.session.teacher {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/teacher_dashboard" { (teacher.name) }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/teacher_logout" { "Log out (teacher)" }
                                    }
                                }
                                @if let Some(admin) = &self.session.admin {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/admin_dashboard" { (admin.name) }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/admin_logout" { "Log out (admin)" }
                                    }
                                }
                                @if self.session.is_empty() {
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/?tab=login" { "Student login" }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/teacher_login" { "Teacher login" }
                                    }
                                    li class="nav-item" {
                                        a class="nav-link text-white" href="/admin_login" { "Admin login" }
                                    }
                                }
                            }
                        }
                    }
                    div class="container flex-grow-1 mt-3" {
                        Notices messages=(&self.notices);
                        @if let Some(body) = &self.body {
                            (body)
                        }
                    }
                }
            }
        }
        .render_to(buffer)
    }
}
