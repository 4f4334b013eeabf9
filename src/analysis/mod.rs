pub mod aggregate;
pub mod cutflow;
pub mod pipeline;

pub use self::aggregate::{GroupTotals, SampleResult};
pub use self::cutflow::Cutflow;
pub use self::pipeline::Analysis;
