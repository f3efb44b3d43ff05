mod conference;
mod content;
mod debug;
mod events;
mod health;
mod home;
mod subscriptions;

pub(crate) use conference::*;
pub(crate) use content::*;
pub(crate) use debug::*;
pub(crate) use events::*;
pub(crate) use health::*;
pub(crate) use home::*;
pub(crate) use subscriptions::*;
