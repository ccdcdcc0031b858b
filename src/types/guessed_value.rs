//! A value paired with how confident we are in it.
//!
//! Updates from weaker sources never replace a value from a stronger one,
//! except explicit user input which always wins.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Provenance of a guessed value, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuessQuality {
    /// Nothing has been offered yet.
    Invalid,
    /// Derived from the archive file name.
    Fallback,
    /// Typed by the user before the install started.
    Preset,
    /// Read from companion metadata.
    Meta,
    /// Interpreted from the content or a well-formed download name.
    Good,
    /// Explicitly entered while resolving the install.
    User,
}

/// Normalizes a candidate value. `None` rejects the update.
pub type ValueFilter<T> = fn(&T) -> Option<T>;

#[derive(Clone)]
pub struct GuessedValue<T> {
    value: T,
    quality: GuessQuality,
    filter: Option<ValueFilter<T>>,
}

impl<T: Default> Default for GuessedValue<T> {
    fn default() -> Self {
        Self {
            value: T::default(),
            quality: GuessQuality::Invalid,
            filter: None,
        }
    }
}

impl<T: Clone> GuessedValue<T> {
    pub fn new(value: T, quality: GuessQuality) -> Self {
        Self {
            value,
            quality,
            filter: None,
        }
    }

    /// Install a filter applied to every later update.
    pub fn set_filter(&mut self, filter: ValueFilter<T>) {
        self.filter = Some(filter);
    }

    /// Offer a new value. Returns true if it replaced the current one.
    pub fn update(&mut self, value: T, quality: GuessQuality) -> bool {
        if quality != GuessQuality::User && quality < self.quality {
            return false;
        }
        let accepted = match self.filter {
            Some(filter) => filter(&value),
            None => Some(value),
        };
        match accepted {
            Some(value) => {
                self.value = value;
                self.quality = quality;
                true
            }
            None => false,
        }
    }

    pub fn quality(&self) -> GuessQuality {
        self.quality
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for GuessedValue<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for GuessedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuessedValue")
            .field("value", &self.value)
            .field("quality", &self.quality)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for GuessedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
