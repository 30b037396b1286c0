mod user;

pub use user::{User, UserUpdate, UsersPage};
