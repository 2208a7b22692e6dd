pub mod stats_panel;
pub mod typing_area;
