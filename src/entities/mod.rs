pub mod prelude;

pub mod actors;
pub mod movie_actors;
pub mod movies;
pub mod users;
