mod tables;

pub use self::tables::{comparison as print_comparison_report, cutflow as print_cutflow_report};
