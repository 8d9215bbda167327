pub mod condition;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use condition::{Condition, Difficulty, Modality};
pub use phase::Section;
pub use stimulus::{Align, Letter, Placed, Rgba, Shape};
pub use trial::{Feedback, Key, ResponseKey, Trial, TrialRecord, TrialState};
