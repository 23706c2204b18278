mod gesture_sequencer;
pub use gesture_sequencer::*;

mod models;
pub use models::*;

mod sequencer_config;
pub use sequencer_config::*;
