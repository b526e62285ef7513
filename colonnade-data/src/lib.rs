pub mod chart;
pub mod color;
pub mod convert;
pub mod error;
pub mod format_num;
pub mod formatter;
pub mod schema;
pub mod selection;
pub mod view;

pub use chart::ChartData;
pub use convert::{convert, ConvertOptions};
