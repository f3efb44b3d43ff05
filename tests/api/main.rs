mod content;
mod events;
mod subscriptions;
