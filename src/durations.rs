use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// The fixed set of session lengths a user can pick from.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub enum SessionLength {
    #[strum(to_string = "5 min")]
    Five,
    #[strum(to_string = "10 min")]
    Ten,
    #[strum(to_string = "15 min")]
    Fifteen,
    #[default]
    #[strum(to_string = "30 min")]
    Thirty,
    #[strum(to_string = "60 min")]
    Sixty,
    #[strum(to_string = "90 min")]
    Ninety,
    #[strum(to_string = "120 min")]
    HundredTwenty,
}

impl SessionLength {
    /// Display order of the duration selector, longest first.
    pub const ALL: [SessionLength; 7] = [
        SessionLength::HundredTwenty,
        SessionLength::Ninety,
        SessionLength::Sixty,
        SessionLength::Thirty,
        SessionLength::Fifteen,
        SessionLength::Ten,
        SessionLength::Five,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            SessionLength::Five => 5,
            SessionLength::Ten => 10,
            SessionLength::Fifteen => 15,
            SessionLength::Thirty => 30,
            SessionLength::Sixty => 60,
            SessionLength::Ninety => 90,
            SessionLength::HundredTwenty => 120,
        }
    }

    pub fn total_seconds(self) -> u64 {
        self.minutes() as u64 * 60
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            SessionLength::HundredTwenty => "Two-hour deep-focus block, good for large, complex projects (take a longer break afterwards).",
            SessionLength::Ninety => "Classic ultradian-aligned deep work, excellent for focused creative or learning sessions.",
            SessionLength::Sixty => "Sustained attention for long-form work. Balance intensity with a medium break.",
            SessionLength::Thirty => "Great for time-boxed tasks and maintaining momentum without fatigue.",
            SessionLength::Fifteen => "Quick bursts to overcome inertia or do small but focused tasks.",
            SessionLength::Ten => "Micro-sprints for short chores or transitions between projects.",
            SessionLength::Five => "Tiny bursts for micro-tasks, good for warmups and refocusing.",
        }
    }

    /// Suggested break lengths in minutes, shortest first.
    pub fn break_recommendations(self) -> &'static [u32] {
        match self {
            SessionLength::HundredTwenty => &[15, 20, 30],
            SessionLength::Ninety => &[15, 20],
            SessionLength::Sixty => &[10, 15],
            SessionLength::Thirty => &[5, 10],
            SessionLength::Fifteen => &[3, 5],
            SessionLength::Ten => &[2, 3],
            SessionLength::Five => &[1, 2],
        }
    }

    /// Every break option offered for this length: the recommendations followed by "No break".
    pub fn break_options(self) -> Vec<BreakChoice> {
        self.break_recommendations()
            .iter()
            .map(|&m| BreakChoice::Minutes(m))
            .chain(std::iter::once(BreakChoice::NoBreak))
            .collect()
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|&l| l == self).unwrap_or(0)
    }

    /// Next entry in display order, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous entry in display order, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TryFrom<u32> for SessionLength {
    type Error = FlowError;

    fn try_from(minutes: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|l| l.minutes() == minutes)
            .ok_or(FlowError::UnsupportedDuration(minutes))
    }
}

impl From<SessionLength> for u32 {
    fn from(l: SessionLength) -> Self {
        l.minutes()
    }
}

impl std::str::FromStr for SessionLength {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches("min").trim();
        let minutes = trimmed
            .parse::<u32>()
            .map_err(|_| FlowError::InvalidDuration(s.trim().to_string()))?;
        Self::try_from(minutes)
    }
}

/// A break picked after (or before) a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakChoice {
    Minutes(u32),
    NoBreak,
}

impl std::fmt::Display for BreakChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BreakChoice::Minutes(m) => write!(f, "{m} min"),
            BreakChoice::NoBreak => f.write_str("No break"),
        }
    }
}

impl BreakChoice {
    pub fn minutes(self) -> u32 {
        match self {
            BreakChoice::Minutes(m) => m,
            BreakChoice::NoBreak => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_all_lengths_in_display_order() {
        let minutes: Vec<u32> = SessionLength::ALL.iter().map(|l| l.minutes()).collect();
        assert_eq!(minutes, vec![120, 90, 60, 30, 15, 10, 5]);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(SessionLength::Five.total_seconds(), 300);
        assert_eq!(SessionLength::HundredTwenty.total_seconds(), 7200);
    }

    #[test]
    fn test_ninety_break_options() {
        assert_eq!(SessionLength::Ninety.break_recommendations(), &[15, 20]);
        assert_eq!(
            SessionLength::Ninety.break_options(),
            vec![
                BreakChoice::Minutes(15),
                BreakChoice::Minutes(20),
                BreakChoice::NoBreak
            ]
        );
    }

    #[test]
    fn test_every_length_has_recommendations_and_tooltip() {
        for l in SessionLength::ALL {
            assert!(!l.break_recommendations().is_empty());
            assert!(!l.tooltip().is_empty());
        }
    }

    #[test]
    fn test_try_from_rejects_unsupported() {
        assert_matches!(SessionLength::try_from(25), Err(FlowError::UnsupportedDuration(25)));
        assert_eq!(SessionLength::try_from(60).unwrap(), SessionLength::Sixty);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("15".parse::<SessionLength>().unwrap(), SessionLength::Fifteen);
        assert_eq!("90min".parse::<SessionLength>().unwrap(), SessionLength::Ninety);
        assert!("abc".parse::<SessionLength>().is_err());
    }

    #[test]
    fn test_from_str_reports_the_bad_input() {
        let err = "soon".parse::<SessionLength>().unwrap_err();
        assert_matches!(&err, FlowError::InvalidDuration(text) if text == "soon");
        assert!(err.to_string().contains("\"soon\""));
        assert!(!err.to_string().contains("0 minutes"));

        assert_matches!("25".parse::<SessionLength>(), Err(FlowError::UnsupportedDuration(25)));
    }

    #[test]
    fn test_next_prev_wrap() {
        assert_eq!(SessionLength::HundredTwenty.prev(), SessionLength::Five);
        assert_eq!(SessionLength::Five.next(), SessionLength::HundredTwenty);
        assert_eq!(SessionLength::Thirty.next(), SessionLength::Fifteen);
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionLength::Thirty.to_string(), "30 min");
        assert_eq!(BreakChoice::Minutes(5).to_string(), "5 min");
        assert_eq!(BreakChoice::NoBreak.to_string(), "No break");
    }

    #[test]
    fn test_serde_as_minutes() {
        let json = serde_json::to_string(&SessionLength::Sixty).unwrap();
        assert_eq!(json, "60");
        let back: SessionLength = serde_json::from_str("10").unwrap();
        assert_eq!(back, SessionLength::Ten);
        assert!(serde_json::from_str::<SessionLength>("11").is_err());
    }
}
