pub mod colour_map;
pub mod display_sink;
pub mod idle_work;
