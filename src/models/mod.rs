pub mod plugin;
pub mod vulnerability;
