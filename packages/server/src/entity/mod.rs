pub mod game;
pub mod role;
pub mod studio;
pub mod user;
pub mod user_role;
