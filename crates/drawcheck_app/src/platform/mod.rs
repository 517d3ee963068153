pub mod effects;
pub mod logging;
