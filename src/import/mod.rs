pub mod conversion;
pub mod definition;
pub mod structured;
pub mod tabular;

pub use conversion::*;
pub use definition::*;
pub use tabular::{StepRow, TabularWorkflow};
