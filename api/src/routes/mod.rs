pub mod accounts;
pub mod ai;
pub mod contacts;
pub mod health;
pub mod messages;
pub mod profiles;
pub mod recommendations;
pub mod search;
