pub mod auth;
pub mod driver;
pub mod rating;
pub mod ride;
pub mod rider;
