pub mod element;
pub mod fragment;
pub mod procedure;
pub mod writer;

pub use element::Element;
pub use fragment::{step_element, steps_element};
pub use procedure::{CAPABILITIES, ProcedureDocument};
