pub mod list;
pub mod new;
pub mod path;
pub mod rm;
pub mod status;
