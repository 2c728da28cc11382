use hypertext::prelude::*;
use serde::Deserialize;

/// What [`StaffLoginForm`] submits.
#[derive(Deserialize)]
pub struct StaffCredentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Username and password form used by the staff login pages.
pub struct StaffLoginForm<'a> {
    pub heading: &'a str,
    pub action: &'a str,
}

impl Renderable for StaffLoginForm<'_> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            div class="row justify-content-center" {
                div class="col-md-6" {
                    h1 class="h3 mb-3" { (self.heading) }
                    form method="post" action=(self.action) {
                        div class="mb-3" {
                            label for="username" class="form-label" { "Username" }
                            input type="text" class="form-control" id="username"
                                name="username" required;
                        }
                        div class="mb-3" {
                            label for="password" class="form-label" { "Password" }
                            input type="password" class="form-control" id="password"
                                name="password" required;
                        }
                        button type="submit" class="btn btn-primary" { "Log in" }
                    }
                }
            }
        }
        .render_to(buffer);
    }
}
