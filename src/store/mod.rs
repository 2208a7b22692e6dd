pub mod csv_export;
pub mod history;
pub mod stats_file;
