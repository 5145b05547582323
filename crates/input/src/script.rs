//! Plain-text intent scripts for headless runs.
//!
//! One line per frame. Each word on a line is an intent, applied in order:
//!
//! ```text
//! # comment
//! right x5          # five frames, one release step each
//! up* up*           # two repeat steps in a single frame
//! jump adventure
//! wait 30           # thirty idle frames
//! quit
//! ```
//!
//! Words: `up` `down` `left` `right` (append `*` for a key-repeat step),
//! `jump`, `follow` `top` `tower` `adventure`, `quit`, `noop`. A trailing `xN`
//! repeats the line's frame `N` times. `wait N` is `N` empty frames.

use tilehop_common::{CameraMode, Direction, Intent};

/// Upper bound on the frames one script may expand to.
pub const MAX_SCRIPT_FRAMES: usize = 1_000_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown intent `{word}`")]
    UnknownIntent { line: usize, word: String },
    #[error("line {line}: bad frame count `{value}`")]
    BadCount { line: usize, value: String },
    #[error("line {line}: script exceeds {limit} frames")]
    TooLong { line: usize, limit: usize },
}

fn parse_word(word: &str) -> Option<Intent> {
    let (name, repeat) = match word.strip_suffix('*') {
        Some(name) => (name, true),
        None => (word, false),
    };
    let direction = match name {
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        _ => None,
    };
    if let Some(direction) = direction {
        return Some(Intent::Move { direction, repeat });
    }
    if repeat {
        return None;
    }
    Some(match name {
        "jump" => Intent::Jump,
        "follow" => Intent::SwitchCamera(CameraMode::Follow),
        "top" => Intent::SwitchCamera(CameraMode::Top),
        "tower" => Intent::SwitchCamera(CameraMode::Tower),
        "adventure" => Intent::SwitchCamera(CameraMode::Adventure),
        "quit" => Intent::Quit,
        "noop" => Intent::Noop,
        _ => return None,
    })
}

fn parse_count(line: usize, value: &str) -> Result<usize, ScriptError> {
    value
        .parse::<usize>()
        .ok()
        .filter(|&n| n <= MAX_SCRIPT_FRAMES)
        .ok_or_else(|| ScriptError::BadCount {
            line,
            value: value.to_string(),
        })
}

fn ensure_room(line: usize, used: usize, more: usize) -> Result<(), ScriptError> {
    if used + more > MAX_SCRIPT_FRAMES {
        return Err(ScriptError::TooLong {
            line,
            limit: MAX_SCRIPT_FRAMES,
        });
    }
    Ok(())
}

/// Parse a script into per-frame intent batches.
pub fn parse_script(text: &str) -> Result<Vec<Vec<Intent>>, ScriptError> {
    let mut frames = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let body = raw.split('#').next().unwrap_or_default();
        let mut words: Vec<&str> = body.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        if words[0] == "wait" {
            let count = match words.get(1) {
                Some(v) if words.len() == 2 => parse_count(line, v)?,
                _ => {
                    return Err(ScriptError::BadCount {
                        line,
                        value: body.trim().to_string(),
                    });
                }
            };
            ensure_room(line, frames.len(), count)?;
            frames.extend(std::iter::repeat_with(Vec::new).take(count));
            continue;
        }

        let mut times = 1;
        if let Some(&last) = words.last() {
            if let Some(n) = last.strip_prefix('x').filter(|n| !n.is_empty()) {
                times = parse_count(line, n)?;
                words.pop();
            }
        }

        let intents = words
            .iter()
            .map(|w| {
                parse_word(w).ok_or_else(|| ScriptError::UnknownIntent {
                    line,
                    word: w.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        ensure_room(line, frames.len(), times)?;
        frames.extend(std::iter::repeat_n(intents, times));
    }
    tracing::debug!(frames = frames.len(), "script parsed");
    Ok(frames)
}
