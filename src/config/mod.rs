pub mod prompt;
pub mod secret;
