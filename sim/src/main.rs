// Runs the look / point / look-and-point smoke test against the simulated robot.
// Run with: cargo run -p sim -- [--fast] [config.json]

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nao_gestures::{GestureConfig, GestureError, GestureRobot, WaitPolicy};
use sim::SimulatedRobot;
use tracing::info;

/// Looks, points, then looks and points at a fixed target on a simulated NAO.
#[derive(Parser, Debug)]
#[command(name = "sim", version)]
struct CommandLineArguments {
    /// Skip the hold after each motion
    #[arg(long)]
    fast: bool,
    /// JSON gesture configuration; NAO defaults when omitted
    config: Option<PathBuf>,
}

impl CommandLineArguments {
    fn gesture_config(&self) -> Result<GestureConfig, GestureError> {
        let config = match &self.config {
            Some(path) => GestureConfig::load(path)?,
            None => GestureConfig::default(),
        };
        Ok(if self.fast {
            config.with_waits(WaitPolicy::immediate())
        } else {
            config
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let config = CommandLineArguments::parse().gesture_config()?;

    let robot = Arc::new(SimulatedRobot::from_config(&config));
    let gestures = GestureRobot::new(config, robot.clone(), robot)?;
    info!("Hold times {:?}", gestures.sequencer().config().waits);

    gestures.speak("Watch this").await?;
    gestures.test_movements().await?;

    let state = gestures.sequencer().actuator().snapshot().await;
    info!(
        "Done: {} commands, stance {:?}, head {:?}",
        state.journal.len(),
        state.stance,
        state.head
    );
    println!("{}", serde_json::to_string_pretty(&state.journal)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_flag_and_config_path() {
        let args = CommandLineArguments::try_parse_from(["sim", "--fast", "nao.json"]).unwrap();
        assert!(args.fast);
        assert_eq!(args.config, Some(PathBuf::from("nao.json")));

        let args = CommandLineArguments::try_parse_from(["sim"]).unwrap();
        assert!(!args.fast);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = CommandLineArguments::try_parse_from(["sim", "--fats"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_fast_zeroes_every_hold() {
        let args = CommandLineArguments::try_parse_from(["sim", "--fast"]).unwrap();
        let config = args.gesture_config().unwrap();
        assert_eq!(config.waits, WaitPolicy::immediate());
    }
}
