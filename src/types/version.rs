//! Version strings as found in mod metadata.
//!
//! Two forms exist: explicit dotted versions (`1.2.10`, `v3.0b`) and the date
//! stamp `d<year>.<month>.<day>` used when nothing better is known.

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^d(\d{4})\.(\d{1,2})\.(\d{1,2})$").expect("valid date version regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Scheme {
    Date { year: u32, month: u32, day: u32 },
    Regular { parts: Vec<u64>, suffix: String },
}

#[derive(Debug, Clone)]
pub struct VersionInfo {
    raw: String,
    scheme: Scheme,
}

impl VersionInfo {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(caps) = DATE_RE.captures(trimmed) {
            let num = |idx: usize| caps[idx].parse::<u32>().unwrap_or(0);
            return Self {
                raw: trimmed.to_string(),
                scheme: Scheme::Date {
                    year: num(1),
                    month: num(2),
                    day: num(3),
                },
            };
        }

        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        let mut parts = Vec::new();
        let mut suffix = String::new();
        let mut segments = body.split('.');
        while let Some(segment) = segments.next() {
            let digits_end = segment
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(segment.len());
            if digits_end > 0 {
                parts.push(segment[..digits_end].parse::<u64>().unwrap_or(u64::MAX));
            }
            if digits_end < segment.len() {
                let rest: Vec<&str> = segments.collect();
                suffix = segment[digits_end..].to_string();
                if !rest.is_empty() {
                    suffix.push('.');
                    suffix.push_str(&rest.join("."));
                }
                break;
            }
        }

        Self {
            raw: trimmed.to_string(),
            scheme: Scheme::Regular { parts, suffix },
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self.scheme, Scheme::Date { .. })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.scheme, &other.scheme) {
            (
                Scheme::Date {
                    year: y1,
                    month: m1,
                    day: d1,
                },
                Scheme::Date {
                    year: y2,
                    month: m2,
                    day: d2,
                },
            ) => (y1, m1, d1).cmp(&(y2, m2, d2)),
            // A date stamp is only a placeholder for a missing version.
            (Scheme::Date { .. }, Scheme::Regular { .. }) => Ordering::Less,
            (Scheme::Regular { .. }, Scheme::Date { .. }) => Ordering::Greater,
            (
                Scheme::Regular {
                    parts: p1,
                    suffix: s1,
                },
                Scheme::Regular {
                    parts: p2,
                    suffix: s2,
                },
            ) => {
                let len = p1.len().max(p2.len());
                for idx in 0..len {
                    let a = p1.get(idx).copied().unwrap_or(0);
                    let b = p2.get(idx).copied().unwrap_or(0);
                    match a.cmp(&b) {
                        Ordering::Equal => continue,
                        unequal => return unequal,
                    }
                }
                // "1.0" is a release, "1.0b" a pre-release of it
                match (s1.is_empty(), s2.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => s1.to_lowercase().cmp(&s2.to_lowercase()),
                }
            }
        }
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for VersionInfo {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionInfo {}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
