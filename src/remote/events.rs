use std::str::FromStr;

/// Transport action posted by the remote control form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    Play,
    Pause,
    Stop,
}

impl RemoteCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteCommand::Play => "Play",
            RemoteCommand::Pause => "Pause",
            RemoteCommand::Stop => "Stop",
        }
    }
}

impl FromStr for RemoteCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "play" => Ok(RemoteCommand::Play),
            "pause" => Ok(RemoteCommand::Pause),
            "stop" => Ok(RemoteCommand::Stop),
            _ => Err(anyhow::anyhow!("Unknown remote action: {}", s)),
        }
    }
}
