//! Weekly time grid.
//!
//! A slot is a (day, start time) pair from a fixed weekly grid. Day names
//! and start times are closed, explicitly enumerated formats: `Monday` ..
//! `Friday` and zero-padded `HH:MM`. Nothing here guesses formats from
//! free text.
//!
//! # Ordering
//! `TimeSlot`'s `Ord` is chronological (Monday first, then start time).
//! Reports that must match the historic string-sorted output use
//! [`TimeSlot::label_cmp`] instead, which compares `"Friday"` before
//! `"Monday"`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days, Monday first.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Zero-based position in the week.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }

    /// Whether two days are consecutive weekdays (Friday/Monday are not).
    pub fn is_adjacent(self, other: Day) -> bool {
        self.index().abs_diff(other.index()) == 1
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| SlotParseError::UnknownDay(s.to_string()))
    }
}

/// Error parsing a day, start time, or slot label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SlotParseError {
    #[error("unknown day '{0}' (expected Monday..Friday)")]
    UnknownDay(String),
    #[error("invalid start time '{0}' (expected HH:MM)")]
    InvalidTime(String),
    #[error("invalid slot label '{0}' (expected '<Day> HH:MM')")]
    InvalidLabel(String),
}

/// Start time of a slot, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StartTime {
    hour: u8,
    minute: u8,
}

impl StartTime {
    /// Creates a start time. Returns `None` outside 00:00..=23:59.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes since midnight.
    #[inline]
    pub fn minutes(self) -> u32 {
        self.hour as u32 * 60 + self.minute as u32
    }
}

impl fmt::Display for StartTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for StartTime {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SlotParseError::InvalidTime(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(err());
        }
        if !bytes[..2].iter().chain(&bytes[3..]).all(u8::is_ascii_digit) {
            return Err(err());
        }
        let hour: u8 = s[..2].parse().map_err(|_| err())?;
        let minute: u8 = s[3..].parse().map_err(|_| err())?;
        StartTime::new(hour, minute).ok_or_else(err)
    }
}

impl TryFrom<String> for StartTime {
    type Error = SlotParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StartTime> for String {
    fn from(value: StartTime) -> Self {
        value.to_string()
    }
}

/// A weekly slot: (day, start time). Identity is exactly this pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Day,
    pub start: StartTime,
}

impl TimeSlot {
    /// Creates a slot.
    pub fn new(day: Day, start: StartTime) -> Self {
        Self { day, start }
    }

    /// Convenience constructor from `"HH:MM"`.
    pub fn at(day: Day, start: &str) -> Result<Self, SlotParseError> {
        Ok(Self::new(day, start.parse()?))
    }

    /// Boundary label, e.g. `"Monday 08:30"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.day, self.start)
    }

    /// Lexicographic comparison on (day name, start string).
    pub fn label_cmp(&self, other: &Self) -> Ordering {
        self.day
            .name()
            .cmp(other.day.name())
            .then_with(|| self.start.cmp(&other.start))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.start)
    }
}

impl FromStr for TimeSlot {
    type Err = SlotParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, start) = s
            .split_once(' ')
            .ok_or_else(|| SlotParseError::InvalidLabel(s.to_string()))?;
        Ok(Self::new(day.parse()?, start.parse()?))
    }
}

/// A slot together with its end time, as exchanged at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDef {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub end: StartTime,
}

/// The full slot universe for a deployment.
///
/// Slots are kept in chronological order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGrid {
    slots: Vec<SlotDef>,
}

impl SlotGrid {
    /// Builds a grid; duplicate (day, start) pairs keep the first definition.
    pub fn new(mut slots: Vec<SlotDef>) -> Self {
        slots.sort_by_key(|d| d.slot);
        slots.dedup_by_key(|d| d.slot);
        Self { slots }
    }

    /// Cartesian product of days and `(start, end)` bands.
    pub fn from_bands(days: &[Day], bands: &[(StartTime, StartTime)]) -> Self {
        let slots = days
            .iter()
            .flat_map(|&day| {
                bands.iter().map(move |&(start, end)| SlotDef {
                    slot: TimeSlot::new(day, start),
                    end,
                })
            })
            .collect();
        Self::new(slots)
    }

    /// Five days × six two-hour bands starting 08:30.
    pub fn standard() -> Self {
        let bands: Vec<(StartTime, StartTime)> = (0..6u8)
            .filter_map(|i| {
                let start = StartTime::new(8 + 2 * i, 30)?;
                let end = StartTime::new(10 + 2 * i, 30)?;
                Some((start, end))
            })
            .collect();
        Self::from_bands(&Day::ALL, &bands)
    }

    /// Tuesday and Wednesday 14:30, the administrative blackout used
    /// by earlier deployments.
    pub fn legacy_exclusions() -> Vec<TimeSlot> {
        StartTime::new(14, 30)
            .map(|t| vec![TimeSlot::new(Day::Tuesday, t), TimeSlot::new(Day::Wednesday, t)])
            .unwrap_or_default()
    }

    /// Slot definitions, chronological.
    pub fn defs(&self) -> &[SlotDef] {
        &self.slots
    }

    /// Slots, chronological.
    pub fn slots(&self) -> impl Iterator<Item = TimeSlot> + '_ {
        self.slots.iter().map(|d| d.slot)
    }

    pub fn contains(&self, slot: &TimeSlot) -> bool {
        self.slots.binary_search_by(|d| d.slot.cmp(slot)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for SlotGrid {
    fn default() -> Self {
        Self::standard()
    }
}
