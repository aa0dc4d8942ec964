mod import;

pub use import::cmd_import;
