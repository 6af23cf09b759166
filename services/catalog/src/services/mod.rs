//! Service layer: validation plus the friend-graph and likes engines

pub mod films;
pub mod users;

pub use films::FilmService;
pub use users::UserService;
