//! Gesture directions and the actions bound to them
//!
//! A swipe and an arrow key resolve to the same `Direction`, which the
//! `GestureActionMap` turns into a `GestureAction`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::words::Difficulty;

/// Minimum displacement, in logical pixels, for a touch to count as a swipe
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Largest step accepted by a move action
pub const MAX_MOVE_STEPS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "arrowup" => Ok(Direction::Up),
            "down" | "arrowdown" => Ok(Direction::Down),
            "left" | "arrowleft" => Ok(Direction::Left),
            "right" | "arrowright" => Ok(Direction::Right),
            other => Err(format!("unknown direction '{}'", other)),
        }
    }
}

/// Everything a gesture can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GestureAction {
    None,
    Flip,
    ReadAloud,
    /// Move the current card forward by 1..=5 places
    Move(u8),
    SendToBack { reverse: bool, blur: bool },
    Hide,
    Mark(Difficulty),
}

impl GestureAction {
    /// The bindable actions, in menu order
    pub const ALL: [GestureAction; 16] = [
        GestureAction::None,
        GestureAction::Flip,
        GestureAction::ReadAloud,
        GestureAction::Move(1),
        GestureAction::Move(2),
        GestureAction::Move(3),
        GestureAction::Move(4),
        GestureAction::Move(5),
        GestureAction::SendToBack { reverse: false, blur: false },
        GestureAction::SendToBack { reverse: true, blur: false },
        GestureAction::SendToBack { reverse: false, blur: true },
        GestureAction::SendToBack { reverse: true, blur: true },
        GestureAction::Hide,
        GestureAction::Mark(Difficulty::Easy),
        GestureAction::Mark(Difficulty::Medium),
        GestureAction::Mark(Difficulty::Hard),
    ];

    /// Deferred actions wait for the answer to be revealed before running
    pub fn is_deferred(&self) -> bool {
        matches!(self, GestureAction::Move(_) | GestureAction::SendToBack { .. })
    }

    pub fn label(&self) -> String {
        match self {
            GestureAction::None => "None".to_string(),
            GestureAction::Flip => "Flip Card".to_string(),
            GestureAction::ReadAloud => "Read Aloud".to_string(),
            GestureAction::Move(n) => format!("Move +{}", n),
            GestureAction::SendToBack { reverse: false, blur: false } => "Send to Back".to_string(),
            GestureAction::SendToBack { reverse: true, blur: false } => "Reverse & Back".to_string(),
            GestureAction::SendToBack { reverse: false, blur: true } => "Back & Blur".to_string(),
            GestureAction::SendToBack { reverse: true, blur: true } => "Reverse, Back & Blur".to_string(),
            GestureAction::Hide => "Hide Card".to_string(),
            GestureAction::Mark(Difficulty::Unmarked) => "Clear Mark".to_string(),
            GestureAction::Mark(d) => format!("Mark as {}", capitalize(d.as_str())),
        }
    }

    /// The action after this one in `ALL`, wrapping around
    pub fn next(&self) -> GestureAction {
        let pos = Self::ALL.iter().position(|a| a == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for GestureAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureAction::None => f.write_str("none"),
            GestureAction::Flip => f.write_str("flip"),
            GestureAction::ReadAloud => f.write_str("readAloud"),
            GestureAction::Move(n) => write!(f, "move-{}", n),
            GestureAction::SendToBack { reverse: false, blur: false } => f.write_str("sendToBack"),
            GestureAction::SendToBack { reverse: true, blur: false } => f.write_str("reverseAndBack"),
            GestureAction::SendToBack { reverse: false, blur: true } => f.write_str("backAndBlur"),
            GestureAction::SendToBack { reverse: true, blur: true } => f.write_str("reverseBackAndBlur"),
            GestureAction::Hide => f.write_str("hide"),
            GestureAction::Mark(Difficulty::Unmarked) => f.write_str("clearMark"),
            GestureAction::Mark(Difficulty::Easy) => f.write_str("markEasy"),
            GestureAction::Mark(Difficulty::Medium) => f.write_str("markMedium"),
            GestureAction::Mark(Difficulty::Hard) => f.write_str("markHard"),
        }
    }
}

impl FromStr for GestureAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim() {
            "none" => GestureAction::None,
            "flip" => GestureAction::Flip,
            "readAloud" => GestureAction::ReadAloud,
            "sendToBack" => GestureAction::SendToBack { reverse: false, blur: false },
            "reverseAndBack" => GestureAction::SendToBack { reverse: true, blur: false },
            "backAndBlur" => GestureAction::SendToBack { reverse: false, blur: true },
            "reverseBackAndBlur" => GestureAction::SendToBack { reverse: true, blur: true },
            "hide" => GestureAction::Hide,
            "clearMark" => GestureAction::Mark(Difficulty::Unmarked),
            "markEasy" => GestureAction::Mark(Difficulty::Easy),
            "markMedium" => GestureAction::Mark(Difficulty::Medium),
            "markHard" => GestureAction::Mark(Difficulty::Hard),
            other => {
                let steps = other
                    .strip_prefix("move-")
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=MAX_MOVE_STEPS).contains(n))
                    .ok_or_else(|| format!("unknown gesture action '{}'", other))?;
                GestureAction::Move(steps)
            }
        };
        Ok(action)
    }
}

impl TryFrom<String> for GestureAction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GestureAction> for String {
    fn from(value: GestureAction) -> Self {
        value.to_string()
    }
}

/// Which action each direction triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureActionMap {
    pub up: GestureAction,
    pub down: GestureAction,
    pub left: GestureAction,
    pub right: GestureAction,
}

impl Default for GestureActionMap {
    fn default() -> Self {
        Self {
            up: GestureAction::Flip,
            down: GestureAction::ReadAloud,
            left: GestureAction::SendToBack { reverse: false, blur: false },
            right: GestureAction::Move(1),
        }
    }
}

impl GestureActionMap {
    pub fn action_for(&self, direction: Direction) -> GestureAction {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn set(&mut self, direction: Direction, action: GestureAction) {
        match direction {
            Direction::Up => self.up = action,
            Direction::Down => self.down = action,
            Direction::Left => self.left = action,
            Direction::Right => self.right = action,
        }
    }
}

/// Classify a displacement as a swipe direction.
///
/// The larger axis wins (ties go vertical); displacements whose larger
/// component does not exceed `threshold` are not swipes.
pub fn resolve_swipe(dx: f32, dy: f32, threshold: f32) -> Option<Direction> {
    let (abs_dx, abs_dy) = (dx.abs(), dy.abs());
    if abs_dx.max(abs_dy) <= threshold {
        return None;
    }
    if abs_dx > abs_dy {
        Some(if dx > 0.0 { Direction::Right } else { Direction::Left })
    } else {
        Some(if dy > 0.0 { Direction::Down } else { Direction::Up })
    }
}

/// Pairs a touch start with its touch end
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
    threshold: f32,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        Self { start: None, threshold }
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold;
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish a touch; returns the swipe direction if the movement was long enough
    pub fn touch_end(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (sx, sy) = self.start.take()?;
        resolve_swipe(x - sx, y - sy, self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_swipe() {
        assert_eq!(resolve_swipe(80.0, 10.0, 50.0), Some(Direction::Right));
        assert_eq!(resolve_swipe(-80.0, 10.0, 50.0), Some(Direction::Left));
        assert_eq!(resolve_swipe(5.0, 60.0, 50.0), Some(Direction::Down));
        assert_eq!(resolve_swipe(5.0, -60.0, 50.0), Some(Direction::Up));
        assert_eq!(resolve_swipe(50.0, 0.0, 50.0), None);
        assert_eq!(resolve_swipe(30.0, -40.0, 50.0), None);
        assert_eq!(resolve_swipe(70.0, 70.0, 50.0), Some(Direction::Down));
    }

    #[test]
    fn test_tracker_needs_start() {
        let mut tracker = SwipeTracker::default();
        assert_eq!(tracker.touch_end(200.0, 0.0), None);

        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(20.0, 110.0), Some(Direction::Left));
        assert_eq!(tracker.touch_end(0.0, 0.0), None);
    }

    #[test]
    fn test_action_names_round_trip() {
        for action in GestureAction::ALL {
            let name = action.to_string();
            assert_eq!(name.parse::<GestureAction>().unwrap(), action, "{}", name);
        }
        assert_eq!("move-3".parse::<GestureAction>().unwrap(), GestureAction::Move(3));
        assert!("move-0".parse::<GestureAction>().is_err());
        assert!("move-6".parse::<GestureAction>().is_err());
        assert!("teleport".parse::<GestureAction>().is_err());
    }

    #[test]
    fn test_deferred_split() {
        assert!(GestureAction::Move(2).is_deferred());
        assert!(GestureAction::SendToBack { reverse: true, blur: true }.is_deferred());
        assert!(!GestureAction::Flip.is_deferred());
        assert!(!GestureAction::Hide.is_deferred());
        assert!(!GestureAction::Mark(Difficulty::Hard).is_deferred());
    }

    #[test]
    fn test_default_map_and_serde() {
        let mut map = GestureActionMap::default();
        assert_eq!(map.action_for(Direction::Up), GestureAction::Flip);
        assert_eq!(map.action_for(Direction::Right), GestureAction::Move(1));

        map.set(Direction::Down, GestureAction::Hide);
        let json = serde_json::to_value(map).unwrap();
        assert_eq!(json["down"], "hide");
        assert_eq!(json["left"], "sendToBack");

        let back: GestureActionMap = serde_json::from_value(json).unwrap();
        assert_eq!(back, map);

        let partial: GestureActionMap = serde_json::from_str("{\"up\":\"markHard\"}").unwrap();
        assert_eq!(partial.up, GestureAction::Mark(Difficulty::Hard));
        assert_eq!(partial.down, GestureAction::ReadAloud);
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(GestureAction::None.next(), GestureAction::Flip);
        assert_eq!(GestureAction::Mark(Difficulty::Hard).next(), GestureAction::None);
    }
}
