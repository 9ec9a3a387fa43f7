// src/instruments/exercise.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseType {
    European,
    American,
    Bermudan,
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseType::European => write!(f, "European"),
            ExerciseType::American => write!(f, "American"),
            ExerciseType::Bermudan => write!(f, "Bermudan"),
        }
    }
}

/// Exercise schedule of an option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exercise {
    European { date: NaiveDate },
    American { earliest: NaiveDate, latest: NaiveDate },
    Bermudan { dates: Vec<NaiveDate> },
}

impl Exercise {
    pub fn exercise_type(&self) -> ExerciseType {
        match self {
            Exercise::European { .. } => ExerciseType::European,
            Exercise::American { .. } => ExerciseType::American,
            Exercise::Bermudan { .. } => ExerciseType::Bermudan,
        }
    }

    /// Last exercise date; `None` for an empty Bermudan schedule
    pub fn last_date(&self) -> Option<NaiveDate> {
        match self {
            Exercise::European { date } => Some(*date),
            Exercise::American { latest, .. } => Some(*latest),
            Exercise::Bermudan { dates } => dates.iter().max().copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last_dates() {
        assert_eq!(
            Exercise::European { date: date(2025, 6, 30) }.last_date(),
            Some(date(2025, 6, 30))
        );
        let bermudan = Exercise::Bermudan {
            dates: vec![date(2025, 3, 31), date(2025, 12, 31), date(2025, 6, 30)],
        };
        assert_eq!(bermudan.last_date(), Some(date(2025, 12, 31)));
        assert_eq!(bermudan.exercise_type(), ExerciseType::Bermudan);
        assert_eq!(Exercise::Bermudan { dates: vec![] }.last_date(), None);
    }
}
