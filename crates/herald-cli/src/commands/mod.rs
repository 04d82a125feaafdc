pub mod generate;
pub mod helpers;
pub mod strip_deprecated;
pub mod teams;
