// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use std::str::FromStr;

/// The commands accepted on stdin.
pub const HELP: &str = "Commands: start, pause, resume, stop, speed <m/s>, quit";

/// A command typed by the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    /// New travel speed in meters per second.
    Speed(f64),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command \"{0}\"")]
    Unknown(String),

    #[error("Missing speed, use: speed <m/s>")]
    MissingSpeed,

    #[error("Invalid speed \"{0}\"")]
    InvalidSpeed(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Unknown(String::new()));
        };
        let command = match name.to_lowercase().as_str() {
            "start" => Command::Start,
            "pause" => Command::Pause,
            "resume" => Command::Resume,
            "stop" => Command::Stop,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "speed" => {
                let value = words.next().ok_or(CommandError::MissingSpeed)?;
                match value.parse::<f64>() {
                    Ok(speed) if speed.is_finite() && speed >= 0.0 => Command::Speed(speed),
                    _ => return Err(CommandError::InvalidSpeed(value.to_string())),
                }
            }
            _ => return Err(CommandError::Unknown(s.trim().to_string())),
        };
        if let Some(extra) = words.next() {
            return Err(CommandError::Unknown(format!("{name} {extra}")));
        }
        Ok(command)
    }
}
