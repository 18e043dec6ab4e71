pub mod game;
pub mod shared;
pub mod studio;
pub mod user;
