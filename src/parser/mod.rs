pub mod movie_file;

pub use movie_file::{ParsedMovie, parse_movie_file};
