pub mod appointment;
pub mod palette;
