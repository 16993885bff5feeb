pub mod api_connection;
pub mod cli;
pub mod config;
pub mod dietary;
pub mod fallback;
pub mod generation;
pub mod prompt_builder;
pub mod recipe;
pub mod recipe_parser;
