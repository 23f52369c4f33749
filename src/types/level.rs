// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inclusive level ranges for fan speed, mist and warm mist levels.

use std::fmt;

use crate::error::ValidationError;

/// An inclusive range of legal levels, e.g. fan speeds `1..=4`.
///
/// # Examples
///
/// ```
/// use vesync_lib::types::LevelRange;
///
/// let speeds = LevelRange::new(1, 3);
/// assert!(speeds.contains(2));
/// assert_eq!(speeds.bump(3), 1);
/// assert!(speeds.validate("fan speed", 4).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LevelRange {
    min: u8,
    max: u8,
}

impl LevelRange {
    /// Creates a range. `min` must not exceed `max`.
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Returns the lowest legal level.
    #[must_use]
    pub const fn min(&self) -> u8 {
        self.min
    }

    /// Returns the highest legal level.
    #[must_use]
    pub const fn max(&self) -> u8 {
        self.max
    }

    /// Returns `true` if `level` lies within the range.
    #[must_use]
    pub const fn contains(&self, level: u8) -> bool {
        level >= self.min && level <= self.max
    }

    /// Returns the number of legal levels.
    #[must_use]
    pub const fn len(&self) -> usize {
        (self.max - self.min) as usize + 1
    }

    /// Always `false`; ranges contain at least one level.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over every legal level in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> {
        self.min..=self.max
    }

    /// Validates a caller-supplied level.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` when `level` is outside the range.
    pub fn validate(&self, field: &'static str, level: u8) -> Result<u8, ValidationError> {
        if self.contains(level) {
            Ok(level)
        } else {
            Err(ValidationError::OutOfRange {
                field,
                min: i64::from(self.min),
                max: i64::from(self.max),
                actual: i64::from(level),
            })
        }
    }

    /// Advances `current` one step, wrapping from the top back to the minimum.
    ///
    /// A current level outside the range restarts at the minimum.
    #[must_use]
    pub const fn bump(&self, current: u8) -> u8 {
        if current < self.min || current >= self.max {
            self.min
        } else {
            current + 1
        }
    }
}

impl fmt::Display for LevelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Returns the level after `current` in `levels`, wrapping to the first.
///
/// Unlike [`LevelRange::bump`] this works on arbitrary ordered level lists
/// such as warm mist `[0, 1, 2, 3]`. A `current` that is not in the list
/// also restarts at the first level. Returns `None` for an empty list.
#[must_use]
pub fn bump_level<T: Copy + PartialEq>(current: T, levels: &[T]) -> Option<T> {
    let first = *levels.first()?;
    match levels.iter().position(|l| *l == current) {
        Some(idx) if idx + 1 < levels.len() => Some(levels[idx + 1]),
        _ => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_wraps_at_top() {
        let range = LevelRange::new(1, 3);
        assert_eq!(range.bump(1), 2);
        assert_eq!(range.bump(2), 3);
        assert_eq!(range.bump(3), 1);
    }

    #[test]
    fn bump_out_of_range_restarts() {
        let range = LevelRange::new(1, 4);
        assert_eq!(range.bump(0), 1);
        assert_eq!(range.bump(9), 1);
    }

    #[test]
    fn validate_reports_bounds() {
        let range = LevelRange::new(1, 9);
        assert_eq!(range.validate("mist level", 9), Ok(9));
        assert_eq!(
            range.validate("mist level", 10),
            Err(ValidationError::OutOfRange {
                field: "mist level",
                min: 1,
                max: 9,
                actual: 10
            })
        );
    }

    #[test]
    fn len_and_iter() {
        let range = LevelRange::new(0, 3);
        assert_eq!(range.len(), 4);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(range.to_string(), "[0, 3]");
    }

    #[test]
    fn bump_level_over_list() {
        let levels = [1, 2, 3];
        assert_eq!(bump_level(3, &levels), Some(1));
        assert_eq!(bump_level(1, &levels), Some(2));
        assert_eq!(bump_level(7, &levels), Some(1));
        assert_eq!(bump_level(1, &[] as &[u8]), None);
    }
}
