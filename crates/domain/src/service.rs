use log::{debug, error};

use crate::{
    CreateError, Credentials, Execution, ExecutionRepository, ExecutionService, ExerciseCompletion,
    FirstAccessError, LoginError, Plan, PlanID, PlanRepository, PlanService, ReadError, Session,
    SessionRepository, SessionService, StorageError, UpdateError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

/// Failures that are part of normal operation and only worth a debug message.
trait Expected {
    fn is_expected(&self) -> bool;
}

impl Expected for ReadError {
    fn is_expected(&self) -> bool {
        matches!(
            self,
            ReadError::NotFound | ReadError::Storage(StorageError::NoConnection)
        )
    }
}

impl Expected for CreateError {
    fn is_expected(&self) -> bool {
        matches!(self, CreateError::Storage(StorageError::NoConnection))
    }
}

impl Expected for UpdateError {
    fn is_expected(&self) -> bool {
        matches!(self, UpdateError::Storage(StorageError::NoConnection))
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        if let Err(ref err) = result {
            if err.is_expected() {
                debug!("failed to {} {}: {err}", $action, $entity);
            } else {
                error!("failed to {} {}: {err}", $action, $entity);
            }
        }
        result
    }};
}

impl<R: SessionRepository> SessionService for Service<R> {
    async fn request_session(&self, credentials: Credentials) -> Result<Session, LoginError> {
        let session = log_on_error!(
            self.repository.request_session(&credentials),
            "request",
            "session"
        )?;
        session.require_student()
    }

    async fn define_initial_password(
        &self,
        credentials: Credentials,
    ) -> Result<(), FirstAccessError> {
        log_on_error!(
            self.repository.define_password(&credentials),
            "define",
            "password"
        )?;
        Ok(())
    }
}

impl<R: PlanRepository> PlanService for Service<R> {
    async fn get_plans(&self) -> Result<Vec<Plan>, ReadError> {
        log_on_error!(self.repository.read_plans(), "get", "plans")
    }

    async fn get_plan(&self, id: &PlanID) -> Result<Plan, ReadError> {
        log_on_error!(self.repository.read_plan(id), "get", "plan")
    }
}

impl<R: ExecutionRepository> ExecutionService for Service<R> {
    async fn get_executions(&self) -> Result<Vec<Execution>, ReadError> {
        log_on_error!(self.repository.read_executions(), "get", "executions")
    }

    async fn create_execution(&self, execution: Execution) -> Result<(), CreateError> {
        log_on_error!(
            self.repository.create_execution(&execution),
            "create",
            "execution"
        )
    }

    async fn complete_exercise(&self, completion: ExerciseCompletion) -> Result<(), CreateError> {
        log_on_error!(
            self.repository.create_exercise_completion(&completion),
            "create",
            "exercise completion"
        )
    }
}
