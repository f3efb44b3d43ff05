use super::{subscriber_email::SubscriberEmail, subscriber_name::SubscriberName};

pub(crate) const SIGNUP_SOURCE: &str = "Website";

pub(crate) struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: Option<SubscriberName>,
    /// RFC 3339, UTC.
    pub signed_up_at: String,
}

impl NewSubscriber {
    pub(crate) fn new(
        email: SubscriberEmail,
        name: Option<SubscriberName>,
    ) -> Result<Self, time::error::Format> {
        Ok(Self {
            email,
            name,
            signed_up_at: super::now_rfc3339()?,
        })
    }
}
