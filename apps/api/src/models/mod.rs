pub mod persona;
pub mod user;
