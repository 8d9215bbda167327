pub mod config;
pub mod error;
pub mod export;
pub mod instructions;
pub mod io;
pub mod layout;
pub mod recorder;
pub mod scripted;
pub mod sequence;
pub mod session;
pub mod state;
pub mod training;

pub use config::{ExperimentConfig, KeyMap};
pub use error::{AudioError, ExperimentError, ExportError, SequenceError};
pub use export::ExportFormat;
pub use io::{AbortToken, AudioPlayer, Display, InputSource, KeyPress};
pub use recorder::ResponseRecorder;
pub use sequence::{Sequence, SequenceSpec, generate};
pub use session::{BreakScreen, Interlude, Session};
pub use state::TrialMode;
pub use training::{DEMO_1, DEMO_2, Demo};
