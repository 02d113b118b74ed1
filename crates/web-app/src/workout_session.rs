//! Workout session
//!
//! The exercises of one workout are taken from the fetched plan and presented one at a time. The
//! progress of each exercise is kept in an overlay keyed by the exercise position, so the fetched
//! data is never modified. Completing an exercise is a two-step process: `begin_completion`
//! yields the request to be sent and blocks the exercise until the outcome is reported back by
//! `complete_succeeded` or `complete_failed`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use effort_domain::{
    Execution, ExecutionExercise, ExerciseCompletion, Plan, PlanID, UserID, WorkoutExercise,
    format_duration,
};
use log::{error, warn};

pub const SAVE_FAILED_MESSAGE: &str = "Erro ao salvar. Tente novamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Active,
    Paused,
    Finished,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompletionState {
    #[default]
    Pending,
    Saving,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Progress {
    state: CompletionState,
    notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutSession {
    plan: PlanID,
    student: UserID,
    workout_index: usize,
    workout_color: String,
    exercises: Vec<WorkoutExercise>,
    progress: BTreeMap<usize, Progress>,
    current: usize,
    elapsed: u64,
    phase: Phase,
}

impl WorkoutSession {
    /// Prepares the session for the workout at `workout_index`.
    ///
    /// A missing workout results in a session without exercises.
    #[must_use]
    pub fn new(plan: &Plan, workout_index: usize) -> Self {
        let (workout_color, exercises) = match plan.workout(workout_index) {
            Some(workout) => (workout.color.clone(), workout.exercises()),
            None => {
                error!(
                    "workout {workout_index} not found in plan {} with {} workouts",
                    plan.id,
                    plan.workouts.len()
                );
                (String::new(), vec![])
            }
        };

        Self {
            plan: plan.id.clone(),
            student: plan.student.id.clone(),
            workout_index,
            workout_color,
            exercises,
            progress: BTreeMap::new(),
            current: 0,
            elapsed: 0,
            phase: Phase::Ready,
        }
    }

    #[must_use]
    pub fn workout_index(&self) -> usize {
        self.workout_index
    }

    #[must_use]
    pub fn workout_color(&self) -> &str {
        &self.workout_color
    }

    #[must_use]
    pub fn exercises(&self) -> &[WorkoutExercise] {
        &self.exercises
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    #[must_use]
    pub fn elapsed_display(&self) -> String {
        format_duration(self.elapsed)
    }

    pub fn start(&mut self) {
        if self.phase == Phase::Ready {
            self.phase = Phase::Active;
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Active => Phase::Paused,
            Phase::Paused => Phase::Active,
            phase => phase,
        };
    }

    /// Advances the stopwatch by one second while the session is running.
    pub fn tick(&mut self) {
        if self.phase == Phase::Active {
            self.elapsed += 1;
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_exercise(&self) -> Option<&WorkoutExercise> {
        self.exercises.get(self.current)
    }

    pub fn go_to(&mut self, position: usize) {
        if position < self.exercises.len() {
            self.current = position;
        }
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current + 1 < self.exercises.len()
    }

    pub fn previous(&mut self) {
        if self.has_previous() {
            self.current -= 1;
        }
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.current += 1;
        }
    }

    #[must_use]
    pub fn state(&self, position: usize) -> CompletionState {
        self.progress
            .get(&position)
            .map(|p| p.state)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_completed(&self, position: usize) -> bool {
        self.state(position) == CompletionState::Completed
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.progress
            .values()
            .any(|p| p.state == CompletionState::Saving)
    }

    #[must_use]
    pub fn notes(&self, position: usize) -> &str {
        self.progress.get(&position).map_or("", |p| p.notes.as_str())
    }

    /// Notes can only be changed until the exercise is submitted.
    pub fn set_notes(&mut self, position: usize, notes: &str) {
        if position >= self.exercises.len() || self.state(position) != CompletionState::Pending {
            return;
        }
        self.progress.entry(position).or_default().notes = notes.to_string();
    }

    /// Marks the exercise as being saved and returns the completion to be sent.
    ///
    /// Returns `None` if the exercise is unknown, already completed or already being saved.
    pub fn begin_completion(&mut self, position: usize) -> Option<ExerciseCompletion> {
        if self.phase == Phase::Finished || self.state(position) != CompletionState::Pending {
            return None;
        }
        let exercise = self.exercises.get(position)?;
        let completion = ExerciseCompletion {
            plan: self.plan.clone(),
            workout_index: self.workout_index,
            part_index: exercise.part_index,
            exercise_index: exercise.exercise_index,
            notes: self.notes(position).to_string(),
        };
        self.progress.entry(position).or_default().state = CompletionState::Saving;
        Some(completion)
    }

    /// Locks the exercise and moves on to the next one if it is the current one.
    pub fn complete_succeeded(&mut self, position: usize) {
        let Some(progress) = self.progress.get_mut(&position) else {
            return;
        };
        if progress.state != CompletionState::Saving {
            return;
        }
        progress.state = CompletionState::Completed;
        if position == self.current {
            self.next();
        }
    }

    /// Reopens the exercise and returns the message to be shown.
    pub fn complete_failed(&mut self, position: usize) -> &'static str {
        if let Some(progress) = self.progress.get_mut(&position) {
            if progress.state == CompletionState::Saving {
                progress.state = CompletionState::Pending;
            }
        }
        warn!("failed to save completion of exercise {position}");
        SAVE_FAILED_MESSAGE
    }

    #[must_use]
    pub fn num_completed(&self) -> usize {
        self.progress
            .values()
            .filter(|p| p.state == CompletionState::Completed)
            .count()
    }

    #[must_use]
    pub fn all_completed(&self) -> bool {
        self.num_completed() == self.exercises.len()
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Você concluiu {} de {} exercícios.",
            self.num_completed(),
            self.exercises.len()
        )
    }

    /// Stops the session and records it as an execution at `date`.
    pub fn finish(&mut self, date: DateTime<Utc>) -> Execution {
        self.phase = Phase::Finished;

        Execution {
            id: None,
            student: self.student.clone(),
            plan: self.plan.clone(),
            workout_index: self.workout_index,
            workout_color: self.workout_color.clone(),
            date,
            exercises: self
                .exercises
                .iter()
                .enumerate()
                .map(|(position, e)| {
                    let sets = e.exercise.prescription.sets();
                    let notes = self.notes(position);
                    ExecutionExercise {
                        exercise_index: e.exercise_index,
                        part_index: e.part_index,
                        completed: self.is_completed(position),
                        performed_series: sets.iter().map(|s| s.series).collect(),
                        performed_reps: sets.iter().map(|s| s.reps).collect(),
                        notes: (!notes.is_empty()).then(|| notes.to_string()),
                    }
                })
                .collect(),
            duration_minutes: Some(u32::try_from(self.elapsed / 60).unwrap_or(u32::MAX)),
            completed: self.all_completed(),
        }
    }
}
