mod auth;
mod client;
mod health_check;
mod helpers;
mod subscriptions;
