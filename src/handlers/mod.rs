pub mod health;
pub mod index;
pub mod info;
pub mod users;
