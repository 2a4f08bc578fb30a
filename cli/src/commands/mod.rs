pub mod accounts;
pub mod contacts;
pub mod health;
pub mod message;
pub mod profile;
pub mod recommend;
pub mod search;
pub mod session;
