pub mod game;
pub mod studio;
pub mod user;
