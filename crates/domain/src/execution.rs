use chrono::{DateTime, Utc};
use derive_more::{AsRef, Deref, Display};
use log::debug;

use crate::{CreateError, PlanID, ReadError, UserID};

#[allow(async_fn_in_trait)]
pub trait ExecutionService {
    async fn get_executions(&self) -> Result<Vec<Execution>, ReadError>;
    async fn create_execution(&self, execution: Execution) -> Result<(), CreateError>;
    async fn complete_exercise(&self, completion: ExerciseCompletion) -> Result<(), CreateError>;

    /// The first `count` executions as listed by the backend.
    ///
    /// A backend without an executions endpoint is treated as having no executions.
    async fn get_recent_executions(&self, count: usize) -> Result<Vec<Execution>, ReadError> {
        match self.get_executions().await {
            Ok(executions) => Ok(executions.into_iter().take(count).collect()),
            Err(ReadError::NotFound) => {
                debug!("executions not available");
                Ok(vec![])
            }
            Err(err) => Err(err),
        }
    }
}

#[allow(async_fn_in_trait)]
pub trait ExecutionRepository {
    async fn read_executions(&self) -> Result<Vec<Execution>, ReadError>;
    async fn create_execution(&self, execution: &Execution) -> Result<(), CreateError>;
    async fn create_exercise_completion(
        &self,
        completion: &ExerciseCompletion,
    ) -> Result<(), CreateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub id: Option<ExecutionID>,
    pub student: UserID,
    pub plan: PlanID,
    pub workout_index: usize,
    pub workout_color: String,
    pub date: DateTime<Utc>,
    pub exercises: Vec<ExecutionExercise>,
    pub duration_minutes: Option<u32>,
    pub completed: bool,
}

impl Execution {
    #[must_use]
    pub fn num_completed_exercises(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }
}

#[derive(AsRef, Deref, Display, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionID(String);

impl From<&str> for ExecutionID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExecutionID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionExercise {
    pub exercise_index: usize,
    pub part_index: usize,
    pub completed: bool,
    pub performed_series: Vec<u32>,
    pub performed_reps: Vec<u32>,
    pub notes: Option<String>,
}

/// Marks a single exercise of a workout as done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseCompletion {
    pub plan: PlanID,
    pub workout_index: usize,
    pub part_index: usize,
    pub exercise_index: usize,
    pub notes: String,
}
