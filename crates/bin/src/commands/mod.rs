pub mod community;
pub mod health;
pub mod serve;
