use hypertext::prelude::*;

use crate::evaluations::report::InstructorReport;

/// Per-question averages and the remarks left for an instructor. Admins also
/// see the year level of the student who left each remark.
pub struct ReportTables<'a> {
    pub report: &'a InstructorReport,
    pub show_year_level: bool,
}

impl Renderable for ReportTables<'_> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        let instructor = &self.report.instructor;

        maud! {
            h1 class="h2" { (instructor.full_name()) }
            p class="text-muted" { (instructor.course) }

            h2 class="h4 mt-4" { "Ratings" }
            @if self.report.questions.is_empty() {
                p { "No evaluation questions have been set up." }
            } @else {
                table class="table table-striped" {
                    thead {
                        tr {
                            th scope="col" { "Question" }
                            th scope="col" { "Average rating" }
                            th scope="col" { "Responses" }
                        }
                    }
                    tbody {
                        @for stat in &self.report.questions {
                            tr {
                                td { (stat.text) }
                                td { (stat.average.to_string()) }
                                td { (stat.responses) }
                            }
                        }
                    }
                }
            }

            h2 class="h4 mt-4" { "Remarks" }
            @if self.report.remarks.is_empty() {
                p { "No remarks yet." }
            } @else {
                ul class="list-group" {
                    @for remark in &self.report.remarks {
                        li class="list-group-item" {
                            p class="mb-1" { (remark.remarks) }
                            small class="text-muted" {
                                (remark.submitted_at.format("%Y-%m-%d %H:%M").to_string())
                                @if self.show_year_level {
                                    (format!(" (year {})", remark.year_level))
                                }
                            }
                        }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}
