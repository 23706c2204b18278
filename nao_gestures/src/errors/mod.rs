mod gesture_error;
pub use gesture_error::*;
