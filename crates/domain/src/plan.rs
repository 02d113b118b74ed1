use std::{cmp::Ordering, convert::Infallible, str::FromStr};

use chrono::NaiveDate;
use derive_more::{AsRef, Deref, Display};

use crate::{ReadError, UserID};

#[allow(async_fn_in_trait)]
pub trait PlanService {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn get_plan(&self, id: &PlanID) -> Result<Plan, ReadError>;

    async fn get_active_plan(&self) -> Result<Option<Plan>, ReadError> {
        Ok(select_active_plan(self.get_plans().await?))
    }
}

#[allow(async_fn_in_trait)]
pub trait PlanRepository {
    async fn read_plans(&self) -> Result<Vec<Plan>, ReadError>;
    async fn read_plan(&self, id: &PlanID) -> Result<Plan, ReadError>;
}

/// Picks the plan that is active and not expired.
///
/// If the backend ever reports more than one, the plan that started last wins, then the one
/// valid the longest. Remaining ties keep the list order.
#[must_use]
pub fn select_active_plan(plans: Vec<Plan>) -> Option<Plan> {
    plans
        .into_iter()
        .filter(Plan::is_current)
        .reduce(|selected, plan| match plan.start.cmp(&selected.start) {
            Ordering::Greater => plan,
            Ordering::Equal if plan.end > selected.end => plan,
            _ => selected,
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanID,
    pub student: StudentRef,
    pub instructor: Option<InstructorRef>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub active: bool,
    pub expired: bool,
    pub goals: Vec<String>,
    pub nutrition_notes: Option<String>,
    pub workouts: Vec<Workout>,
}

impl Plan {
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.active && !self.expired
    }

    #[must_use]
    pub fn workout(&self, index: usize) -> Option<&Workout> {
        self.workouts.get(index)
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PlanID(String);

impl PlanID {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PlanID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlanID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl FromStr for PlanID {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRef {
    pub id: UserID,
    pub name: String,
    pub code: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructorRef {
    pub id: UserID,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub color: String,
    pub parts: Vec<Part>,
    pub notes: Option<String>,
}

impl Workout {
    #[must_use]
    pub fn num_exercises(&self) -> usize {
        self.parts.iter().map(|p| p.exercises.len()).sum()
    }

    /// All exercises in part order, tagged with their position in the workout.
    #[must_use]
    pub fn exercises(&self) -> Vec<WorkoutExercise> {
        self.parts
            .iter()
            .enumerate()
            .flat_map(|(part_index, part)| {
                part.exercises
                    .iter()
                    .enumerate()
                    .map(move |(exercise_index, exercise)| WorkoutExercise {
                        part_index,
                        exercise_index,
                        part_name: part.name.clone(),
                        exercise: exercise.clone(),
                    })
            })
            .collect()
    }
}

/// The letter a workout is known by: A for the first, B for the second, and so on.
#[must_use]
pub fn workout_letter(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => char::from(b'A' + i).to_string(),
        _ => format!("{}", index + 1),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: Option<String>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub objective: String,
    pub equipment: String,
    pub prescription: Prescription,
    pub details: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prescription {
    Sets(Vec<SetTarget>),
    Duration(u32),
}

impl Prescription {
    #[must_use]
    pub fn sets(&self) -> &[SetTarget] {
        match self {
            Prescription::Sets(sets) => sets,
            Prescription::Duration(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTarget {
    pub series: u32,
    pub reps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutExercise {
    pub part_index: usize,
    pub exercise_index: usize,
    pub part_name: Option<String>,
    pub exercise: Exercise,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn plan(id: &str, active: bool, expired: bool, start: NaiveDate, end: NaiveDate) -> Plan {
        Plan {
            id: id.into(),
            student: StudentRef {
                id: "s1".into(),
                name: "Alice".to_string(),
                code: Some(1),
            },
            instructor: None,
            start,
            end,
            active,
            expired,
            goals: vec![],
            nutrition_notes: None,
            workouts: vec![],
        }
    }

    fn exercise(objective: &str) -> Exercise {
        Exercise {
            objective: objective.to_string(),
            equipment: String::new(),
            prescription: Prescription::Sets(vec![SetTarget {
                series: 1,
                reps: 10,
            }]),
            details: None,
            order: 1,
        }
    }

    #[rstest]
    #[case(true, false, true)]
    #[case(true, true, false)]
    #[case(false, false, false)]
    #[case(false, true, false)]
    fn test_plan_is_current(#[case] active: bool, #[case] expired: bool, #[case] expected: bool) {
        assert_eq!(
            plan("p", active, expired, date(2024, 1, 1), date(2024, 6, 1)).is_current(),
            expected
        );
    }

    #[test]
    fn test_select_active_plan_none() {
        assert_eq!(select_active_plan(vec![]), None);
        assert_eq!(
            select_active_plan(vec![
                plan("a", false, false, date(2024, 1, 1), date(2024, 6, 1)),
                plan("b", true, true, date(2024, 1, 1), date(2024, 6, 1)),
            ]),
            None
        );
    }

    #[rstest]
    #[case::single(
        vec![
            plan("a", false, false, date(2024, 1, 1), date(2024, 6, 1)),
            plan("b", true, false, date(2023, 1, 1), date(2023, 6, 1)),
        ],
        "b"
    )]
    #[case::latest_start(
        vec![
            plan("a", true, false, date(2024, 1, 1), date(2024, 6, 1)),
            plan("b", true, false, date(2024, 2, 1), date(2024, 3, 1)),
        ],
        "b"
    )]
    #[case::latest_end(
        vec![
            plan("a", true, false, date(2024, 1, 1), date(2024, 6, 1)),
            plan("b", true, false, date(2024, 1, 1), date(2024, 7, 1)),
        ],
        "b"
    )]
    #[case::list_order(
        vec![
            plan("a", true, false, date(2024, 1, 1), date(2024, 6, 1)),
            plan("b", true, false, date(2024, 1, 1), date(2024, 6, 1)),
        ],
        "a"
    )]
    fn test_select_active_plan(#[case] plans: Vec<Plan>, #[case] expected: &str) {
        assert_eq!(
            select_active_plan(plans).map(|p| p.id),
            Some(PlanID::from(expected))
        );
    }

    #[test]
    fn test_workout_exercises() {
        let workout = Workout {
            color: "#ff0000".to_string(),
            parts: vec![
                Part {
                    name: Some("Aquecimento".to_string()),
                    exercises: vec![exercise("Esteira")],
                },
                Part {
                    name: None,
                    exercises: vec![],
                },
                Part {
                    name: None,
                    exercises: vec![exercise("Supino"), exercise("Remada")],
                },
            ],
            notes: None,
        };

        assert_eq!(workout.num_exercises(), 3);
        assert_eq!(
            workout.exercises(),
            vec![
                WorkoutExercise {
                    part_index: 0,
                    exercise_index: 0,
                    part_name: Some("Aquecimento".to_string()),
                    exercise: exercise("Esteira"),
                },
                WorkoutExercise {
                    part_index: 2,
                    exercise_index: 0,
                    part_name: None,
                    exercise: exercise("Supino"),
                },
                WorkoutExercise {
                    part_index: 2,
                    exercise_index: 1,
                    part_name: None,
                    exercise: exercise("Remada"),
                },
            ]
        );
    }

    #[rstest]
    #[case(0, "A")]
    #[case(1, "B")]
    #[case(25, "Z")]
    #[case(26, "27")]
    fn test_workout_letter(#[case] index: usize, #[case] expected: &str) {
        assert_eq!(workout_letter(index), expected);
    }

    #[test]
    fn test_prescription_sets() {
        let sets = vec![
            SetTarget {
                series: 1,
                reps: 12,
            },
            SetTarget {
                series: 2,
                reps: 10,
            },
        ];
        assert_eq!(Prescription::Sets(sets.clone()).sets(), sets.as_slice());
        assert!(Prescription::Duration(60).sets().is_empty());
    }

    #[test]
    fn test_plan_id_from_str() {
        assert_eq!("abc".parse::<PlanID>(), Ok(PlanID::from("abc")));
        assert!(PlanID::default().is_empty());
    }
}
