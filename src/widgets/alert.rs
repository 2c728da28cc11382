use hypertext::prelude::*;

use crate::flash::FlashMessage;

/// The notices queued for a page, one alert each.
pub struct Notices<'a> {
    pub messages: &'a [FlashMessage],
}

impl Renderable for Notices<'_> {
    fn render_to(
        &self,
        buffer: &mut hypertext::Buffer<hypertext::context::Node>,
    ) {
        maud! {
            @for message in self.messages {
                div class=(message.kind.alert_class()) role="alert" {
                    (message.msg)
                }
            }
        }
        .render_to(buffer);
    }
}
