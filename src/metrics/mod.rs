pub mod collector;
pub mod exporter;

pub use collector::AddonMetrics;
pub use exporter::gather_text;
