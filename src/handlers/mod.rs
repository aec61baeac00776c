pub mod fallback;
pub mod health;
pub mod login;
pub mod notes;
pub mod users;
