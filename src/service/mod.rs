pub mod appointment_source;
pub mod loading_gate;
pub mod scheduler_cache;
