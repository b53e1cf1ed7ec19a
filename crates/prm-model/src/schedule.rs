//! # Schedules — Constant, Ruleset, and Compact
//!
//! Schedules drive loads, availability, and control setpoints. Rules read
//! them in three ways: as a full year of hourly values (operating hours,
//! sizing extremes), as design-day profiles (heating setpoints), and by
//! object type (EMS actuator component types).
//!
//! ## Design
//!
//! Day profiles are lists of `(until_hour, value)` pairs in the EnergyPlus
//! convention: each value holds from the previous breakpoint up to and
//! excluding `until_hour`. Annual evaluation walks a calendar year with
//! `chrono`, using a non-leap assumed year so every schedule yields 8760
//! hourly values.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use prm_core::ScheduleId;

/// Calendar year used when a schedule is expanded to hourly values.
pub const ASSUMED_YEAR: i32 = 2009;

/// A `(until_hour, value)` breakpoint in a day profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeValue {
    /// Hour of day (0, 24] up to which `value` applies.
    pub until_hour: f64,
    /// Schedule value.
    pub value: f64,
}

/// A 24-hour profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDay {
    /// Profile name.
    pub name: String,
    /// Breakpoints in ascending `until_hour` order.
    pub values: Vec<TimeValue>,
}

impl ScheduleDay {
    /// A profile holding one value all day.
    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            values: vec![TimeValue {
                until_hour: 24.0,
                value,
            }],
        }
    }

    /// A profile from `(until_hour, value)` pairs.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(f64, f64)]) -> Self {
        Self {
            name: name.into(),
            values: pairs
                .iter()
                .map(|&(until_hour, value)| TimeValue { until_hour, value })
                .collect(),
        }
    }

    /// Value in effect at `hour` (0.0 ≤ hour < 24.0).
    pub fn value_at(&self, hour: f64) -> f64 {
        self.values
            .iter()
            .find(|tv| hour < tv.until_hour)
            .or_else(|| self.values.last())
            .map(|tv| tv.value)
            .unwrap_or(0.0)
    }

    /// The 24 hourly values, sampled at each hour's midpoint.
    pub fn hourly_values(&self) -> [f64; 24] {
        let mut out = [0.0; 24];
        for (h, slot) in out.iter_mut().enumerate() {
            *slot = self.value_at(h as f64 + 0.5);
        }
        out
    }

    /// Smallest and largest breakpoint values.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut iter = self.values.iter().map(|tv| tv.value);
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// A month/day calendar point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
}

impl MonthDay {
    /// Construct a month/day point.
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

/// A rule overriding the default day within a date range on selected weekdays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRule {
    /// Rule name.
    pub name: String,
    /// First date the rule applies.
    pub start: MonthDay,
    /// Last date the rule applies. A range with `end < start` wraps the new year.
    pub end: MonthDay,
    /// Applicable weekdays, Monday first.
    pub weekdays: [bool; 7],
    /// The profile applied on matching days.
    pub day: ScheduleDay,
}

impl ScheduleRule {
    /// Weekday flags for Monday through Friday.
    pub const WEEKDAYS: [bool; 7] = [true, true, true, true, true, false, false];
    /// Weekday flags for Saturday and Sunday.
    pub const WEEKENDS: [bool; 7] = [false, false, false, false, false, true, true];
    /// Every day of the week.
    pub const ALL_DAYS: [bool; 7] = [true; 7];

    /// Whether this rule covers `date`.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        let md = MonthDay::of(date);
        let in_range = if self.start <= self.end {
            self.start <= md && md <= self.end
        } else {
            md >= self.start || md <= self.end
        };
        in_range && self.weekdays[date.weekday().num_days_from_monday() as usize]
    }
}

/// A default day refined by prioritized rules and design-day overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRuleset {
    /// Profile used when no rule applies.
    pub default_day: ScheduleDay,
    /// Rules in priority order; the first match wins.
    #[serde(default)]
    pub rules: Vec<ScheduleRule>,
    /// Profile used on cooling design days.
    #[serde(default)]
    pub summer_design_day: Option<ScheduleDay>,
    /// Profile used on heating design days.
    #[serde(default)]
    pub winter_design_day: Option<ScheduleDay>,
}

impl ScheduleRuleset {
    /// The profile in effect on `date`.
    pub fn day_for(&self, date: NaiveDate) -> &ScheduleDay {
        self.rules
            .iter()
            .find(|r| r.applies_to(date))
            .map(|r| &r.day)
            .unwrap_or(&self.default_day)
    }
}

/// One period of a compact schedule, covering dates up to and including `through`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactPeriod {
    /// Last date of the period.
    pub through: MonthDay,
    /// Profile applied every day in the period.
    pub day: ScheduleDay,
}

/// Schedule body variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleKind {
    /// One value for the whole year.
    Constant {
        /// Schedule value.
        value: f64,
    },
    /// Default day with rules.
    Ruleset(ScheduleRuleset),
    /// Sequential periods with one profile each.
    Compact {
        /// Periods in date order.
        periods: Vec<CompactPeriod>,
    },
}

/// Which design-day profile to inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignDay {
    /// Cooling (summer) design day.
    Cooling,
    /// Heating (winter) design day.
    Heating,
}

/// A named schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Identifier.
    pub id: ScheduleId,
    /// Unique name.
    pub name: String,
    /// Body.
    pub kind: ScheduleKind,
}

impl Schedule {
    /// A constant schedule.
    pub fn constant(name: impl Into<String>, value: f64) -> Self {
        Self {
            id: ScheduleId::new(),
            name: name.into(),
            kind: ScheduleKind::Constant { value },
        }
    }

    /// A ruleset schedule with only a default day.
    pub fn ruleset(name: impl Into<String>, default_day: ScheduleDay) -> Self {
        Self {
            id: ScheduleId::new(),
            name: name.into(),
            kind: ScheduleKind::Ruleset(ScheduleRuleset {
                default_day,
                rules: Vec::new(),
                summer_design_day: None,
                winter_design_day: None,
            }),
        }
    }

    /// A ruleset schedule holding one value on every day, design days included.
    pub fn constant_ruleset(name: impl Into<String>, value: f64) -> Self {
        let name = name.into();
        let day = ScheduleDay::constant(format!("{name} Default"), value);
        Self {
            id: ScheduleId::new(),
            kind: ScheduleKind::Ruleset(ScheduleRuleset {
                default_day: day.clone(),
                rules: Vec::new(),
                summer_design_day: Some(day.clone()),
                winter_design_day: Some(day),
            }),
            name,
        }
    }

    /// The EnergyPlus object type, as used for EMS actuator component types.
    pub fn idd_type(&self) -> &'static str {
        match self.kind {
            ScheduleKind::Constant { .. } => "Schedule:Constant",
            ScheduleKind::Ruleset(_) => "Schedule:Year",
            ScheduleKind::Compact { .. } => "Schedule:Compact",
        }
    }

    /// Ruleset body, if this is a ruleset schedule.
    pub fn as_ruleset(&self) -> Option<&ScheduleRuleset> {
        match &self.kind {
            ScheduleKind::Ruleset(r) => Some(r),
            _ => None,
        }
    }

    /// Mutable ruleset body, if this is a ruleset schedule.
    pub fn as_ruleset_mut(&mut self) -> Option<&mut ScheduleRuleset> {
        match &mut self.kind {
            ScheduleKind::Ruleset(r) => Some(r),
            _ => None,
        }
    }

    /// Hourly values for `date`.
    pub fn hourly_values_on(&self, date: NaiveDate) -> [f64; 24] {
        match &self.kind {
            ScheduleKind::Constant { value } => [*value; 24],
            ScheduleKind::Ruleset(r) => r.day_for(date).hourly_values(),
            ScheduleKind::Compact { periods } => {
                let md = MonthDay::of(date);
                periods
                    .iter()
                    .find(|p| md <= p.through)
                    .or_else(|| periods.last())
                    .map(|p| p.day.hourly_values())
                    .unwrap_or([0.0; 24])
            }
        }
    }

    /// Hourly values for every day of `year`, in chronological order.
    pub fn annual_hourly_values(&self, year: i32) -> Vec<f64> {
        let Some(jan1) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Vec::new();
        };
        let mut out = Vec::with_capacity(8784);
        for date in jan1.iter_days().take_while(|d| d.year() == year) {
            out.extend_from_slice(&self.hourly_values_on(date));
        }
        out
    }

    /// The 8760 hourly values of the assumed year.
    pub fn values_8760(&self) -> Vec<f64> {
        self.annual_hourly_values(ASSUMED_YEAR)
    }

    /// Number of hours in the assumed year whose value exceeds `threshold`.
    pub fn annual_hours_above(&self, threshold: f64) -> f64 {
        self.values_8760().iter().filter(|v| **v > threshold).count() as f64
    }

    /// Most frequent hourly value on weekdays (Monday-Friday) of the assumed
    /// year. Ties resolve to the value seen first.
    pub fn weekday_mode(&self) -> Option<f64> {
        let jan1 = NaiveDate::from_ymd_opt(ASSUMED_YEAR, 1, 1)?;
        let mut counts: Vec<(f64, usize)> = Vec::new();
        for date in jan1.iter_days().take_while(|d| d.year() == ASSUMED_YEAR) {
            if date.weekday().num_days_from_monday() >= 5 {
                continue;
            }
            for v in self.hourly_values_on(date) {
                match counts.iter_mut().find(|(seen, _)| *seen == v) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((v, 1)),
                }
            }
        }
        let mut best: Option<(f64, usize)> = None;
        for (v, n) in counts {
            if best.map_or(true, |(_, bn)| n > bn) {
                best = Some((v, n));
            }
        }
        best.map(|(v, _)| v)
    }

    /// Minimum and maximum of the design-day profile.
    ///
    /// Ruleset schedules without an explicit design-day profile fall back to
    /// the extremes over the whole year.
    pub fn design_day_min_max(&self, design_day: DesignDay) -> Option<(f64, f64)> {
        match &self.kind {
            ScheduleKind::Constant { value } => Some((*value, *value)),
            ScheduleKind::Ruleset(r) => {
                let dd = match design_day {
                    DesignDay::Cooling => r.summer_design_day.as_ref(),
                    DesignDay::Heating => r.winter_design_day.as_ref(),
                };
                match dd {
                    Some(day) => day.min_max(),
                    None => self.annual_min_max(),
                }
            }
            ScheduleKind::Compact { .. } => self.annual_min_max(),
        }
    }

    /// Extremes over the assumed year.
    pub fn annual_min_max(&self) -> Option<(f64, f64)> {
        let values = self.values_8760();
        let mut iter = values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
