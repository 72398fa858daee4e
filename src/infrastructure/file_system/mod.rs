pub mod local_export_source;

pub use local_export_source::LocalExportSource;
