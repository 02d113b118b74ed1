//! REST
//!
//! Client of the Effort Academy API. Every response body is an object carrying a `sucesso` flag
//! and, for rejected requests, a `mensagem` meant for the user. All requests except the
//! authentication ones carry the bearer token of the stored session.
//!
//! Each request is bound to an `AbortController`. Dropping the future of a pending request, e.g.
//! because the page that started it was left, aborts the request.

use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use effort_domain as domain;
use gloo_net::http::{Request, RequestBuilder, Response};
use log::{error, warn};
use serde::{
    Deserialize, Serialize,
    de::{DeserializeOwned, IgnoredAny},
};
use serde_json::Value;

use crate::local_storage::LocalStorage;

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error>;
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
        request.send().await
    }
}

#[derive(Clone)]
pub struct REST<S: SendRequest> {
    pub sender: S,
    pub base_url: String,
}

impl REST<GlooNetSendRequest> {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            sender: GlooNetSendRequest,
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Auth {
    None,
    Bearer,
}

impl<S: SendRequest> REST<S> {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, domain::StorageError> {
        self.fetch(Request::get(&self.url(path)), None, Auth::Bearer)
            .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
        auth: Auth,
    ) -> Result<T, domain::StorageError> {
        let body = serde_json::to_value(body)
            .map_err(|err| domain::StorageError::Other(Box::new(err)))?;
        self.fetch(Request::post(&self.url(path)), Some(body), auth)
            .await
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        body: Option<Value>,
        auth: Auth,
    ) -> Result<T, domain::StorageError> {
        let token = if auth == Auth::Bearer {
            LocalStorage.token()
        } else {
            None
        };
        let builder = match token {
            Some(ref token) => builder.header("Authorization", &token.bearer()),
            None => builder,
        };

        let abort = AbortOnDrop::new();
        let signal = abort.signal();
        let builder = builder.abort_signal(signal.as_ref());

        let request = match body {
            Some(body) => builder.json(&body),
            None => builder.build(),
        }
        .map_err(|err| domain::StorageError::Other(Box::new(err)))?;

        let response = self
            .sender
            .send_request(request)
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|_| domain::StorageError::NoConnection)?;
        abort.disarm();

        parse_response(status, &text, token.is_some())
    }
}

/// Aborts the bound request when dropped before being disarmed.
struct AbortOnDrop(Option<web_sys::AbortController>);

impl AbortOnDrop {
    fn new() -> Self {
        Self(
            web_sys::AbortController::new()
                .inspect_err(|err| warn!("failed to create abort controller: {err:?}"))
                .ok(),
        )
    }

    fn signal(&self) -> Option<web_sys::AbortSignal> {
        self.0.as_ref().map(web_sys::AbortController::signal)
    }

    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(controller) = self.0.take() {
            controller.abort();
        }
    }
}

/// Interprets the status and body of a response.
///
/// A 401 response to a request that carried a token means the session is no longer valid. Any
/// other unsuccessful status or a `sucesso` flag set to `false` rejects the request. A missing
/// flag is accepted.
fn parse_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    authenticated: bool,
) -> Result<T, domain::StorageError> {
    let value = if body.trim().is_empty() {
        Some(Value::Null)
    } else {
        serde_json::from_str::<Value>(body).ok()
    };
    let message = value
        .as_ref()
        .and_then(|v| v.get("mensagem"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if status == 401 && authenticated {
        return Err(domain::StorageError::NoSession);
    }

    if !(200..300).contains(&status) {
        return Err(domain::StorageError::Rejected { status, message });
    }

    let Some(value) = value else {
        return Err(domain::StorageError::Other(
            anyhow!("invalid JSON in response with status {status}").into(),
        ));
    };

    if value.get("sucesso").and_then(Value::as_bool) == Some(false) {
        return Err(domain::StorageError::Rejected { status, message });
    }

    serde_json::from_value(value)
        .context("unexpected response")
        .map_err(|err| domain::StorageError::Other(err.into()))
}

fn read_error(err: domain::StorageError) -> domain::ReadError {
    match err {
        domain::StorageError::Rejected { status: 404, .. } => domain::ReadError::NotFound,
        err => domain::ReadError::Storage(err),
    }
}

fn other(err: anyhow::Error) -> Box<dyn std::error::Error> {
    err.into()
}

impl<S: SendRequest> domain::SessionRepository for REST<S> {
    async fn request_session(
        &self,
        credentials: &domain::Credentials,
    ) -> Result<domain::Session, domain::ReadError> {
        let response: LoginResponse = self
            .post(
                "/api/auth/login",
                &Credentials::from(credentials),
                Auth::None,
            )
            .await
            .map_err(read_error)?;
        Ok(domain::Session::try_from(response).map_err(other)?)
    }

    async fn define_password(
        &self,
        credentials: &domain::Credentials,
    ) -> Result<(), domain::UpdateError> {
        let _: IgnoredAny = self
            .post(
                "/api/auth/primeiro-acesso",
                &Credentials::from(credentials),
                Auth::None,
            )
            .await?;
        Ok(())
    }
}

impl<S: SendRequest> domain::PlanRepository for REST<S> {
    async fn read_plans(&self) -> Result<Vec<domain::Plan>, domain::ReadError> {
        let response: PlansResponse = self.get("/api/fichas").await.map_err(read_error)?;
        Ok(response.plans())
    }

    async fn read_plan(&self, id: &domain::PlanID) -> Result<domain::Plan, domain::ReadError> {
        let response: PlanResponse = self
            .get(&format!("/api/fichas/{id}"))
            .await
            .map_err(read_error)?;
        let plan = response
            .ficha
            .or(response.dados)
            .ok_or(domain::ReadError::NotFound)?;
        Ok(domain::Plan::try_from(plan)
            .with_context(|| format!("failed to convert plan {id}"))
            .map_err(other)?)
    }
}

impl<S: SendRequest> domain::ExecutionRepository for REST<S> {
    async fn read_executions(&self) -> Result<Vec<domain::Execution>, domain::ReadError> {
        let response: ExecutionsResponse =
            self.get("/api/execucoes").await.map_err(read_error)?;
        Ok(response.executions())
    }

    async fn create_execution(
        &self,
        execution: &domain::Execution,
    ) -> Result<(), domain::CreateError> {
        let _: IgnoredAny = self
            .post("/api/execucoes", &Execution::from(execution), Auth::Bearer)
            .await?;
        Ok(())
    }

    async fn create_exercise_completion(
        &self,
        completion: &domain::ExerciseCompletion,
    ) -> Result<(), domain::CreateError> {
        let _: IgnoredAny = self
            .post(
                "/api/execucoes/exercicio",
                &ExerciseCompletion::from(completion),
                Auth::Bearer,
            )
            .await?;
        Ok(())
    }
}

/// Accepts a plain date as well as a timestamp, of which only the date in UTC is used.
fn parse_api_date(value: &str) -> Result<NaiveDate, anyhow::Error> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|d| d.with_timezone(&Utc).date_naive()))
        .with_context(|| format!("invalid date \"{value}\""))
}

fn parse_api_timestamp(value: &str) -> Result<DateTime<Utc>, anyhow::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .with_context(|| format!("invalid timestamp \"{value}\""))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub senha: String,
}

impl From<&domain::Credentials> for Credentials {
    fn from(value: &domain::Credentials) -> Self {
        Self {
            email: value.email.to_string(),
            senha: value.password.as_ref().clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub usuario: User,
    pub token: String,
}

impl TryFrom<LoginResponse> for domain::Session {
    type Error = anyhow::Error;

    fn try_from(value: LoginResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            user: value.usuario.into(),
            token: domain::Token::new(&value.token)
                .map_err(|err| anyhow!("missing token: {err}"))?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub nome: String,
    pub email: String,
    pub tipo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_aluno: Option<u32>,
    #[serde(default = "default_true")]
    pub ativo: bool,
}

fn default_true() -> bool {
    true
}

impl From<&domain::User> for User {
    fn from(value: &domain::User) -> Self {
        Self {
            id: value.id.to_string(),
            nome: value.name.clone(),
            email: value.email.clone(),
            tipo: value.kind.to_string(),
            codigo_aluno: value.student_code,
            ativo: value.active,
        }
    }
}

impl From<User> for domain::User {
    fn from(value: User) -> Self {
        Self {
            id: value.id.into(),
            name: value.nome,
            email: value.email,
            kind: value.tipo.as_str().into(),
            student_code: value.codigo_aluno,
            active: value.ativo,
        }
    }
}

/// Items of a list are kept as raw values, so that a single malformed item does not fail the
/// whole response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlansResponse {
    #[serde(default)]
    pub fichas: Vec<Value>,
}

impl PlansResponse {
    #[must_use]
    pub fn plans(self) -> Vec<domain::Plan> {
        convert_items::<Plan, _>(self.fichas, "plan")
    }
}

/// Single plans are returned under `ficha` by some backend versions and under `dados` by others.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlanResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ficha: Option<Plan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dados: Option<Plan>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExecutionsResponse {
    #[serde(default)]
    pub execucoes: Vec<Value>,
}

impl ExecutionsResponse {
    #[must_use]
    pub fn executions(self) -> Vec<domain::Execution> {
        convert_items::<Execution, _>(self.execucoes, "execution")
    }
}

/// Converts each item on its own and skips those that cannot be converted.
fn convert_items<T, D>(values: Vec<Value>, kind: &str) -> Vec<D>
where
    T: DeserializeOwned,
    D: TryFrom<T, Error = anyhow::Error>,
{
    values
        .into_iter()
        .filter_map(|value| {
            let id = value
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            serde_json::from_value::<T>(value)
                .map_err(anyhow::Error::from)
                .and_then(D::try_from)
                .inspect_err(|err| error!("failed to convert {kind} {id}: {err:#}"))
                .ok()
        })
        .collect()
}

/// A referenced document, either populated or given by its id only.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Reference {
    Populated {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        nome: String,
        #[serde(
            rename = "codigoAluno",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        codigo_aluno: Option<u32>,
    },
    Id(String),
}

impl Reference {
    fn id(&self) -> &str {
        match self {
            Reference::Populated { id, .. } | Reference::Id(id) => id,
        }
    }
}

impl From<Reference> for domain::StudentRef {
    fn from(value: Reference) -> Self {
        match value {
            Reference::Populated {
                id,
                nome,
                codigo_aluno,
            } => Self {
                id: id.into(),
                name: nome,
                code: codigo_aluno,
            },
            Reference::Id(id) => Self {
                id: id.into(),
                name: String::new(),
                code: None,
            },
        }
    }
}

impl From<Reference> for domain::InstructorRef {
    fn from(value: Reference) -> Self {
        match value {
            Reference::Populated { id, nome, .. } => Self {
                id: id.into(),
                name: nome,
            },
            Reference::Id(id) => Self {
                id: id.into(),
                name: String::new(),
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(rename = "_id")]
    pub id: String,
    pub aluno: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub professor_referencia: Option<Reference>,
    pub data_inicio: String,
    pub data_validade: String,
    #[serde(default)]
    pub ativa: bool,
    #[serde(default)]
    pub vencida: bool,
    #[serde(default)]
    pub objetivos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anotacoes_nutricao: Option<String>,
    #[serde(default)]
    pub treinos: Vec<Workout>,
}

impl TryFrom<Plan> for domain::Plan {
    type Error = anyhow::Error;

    fn try_from(value: Plan) -> Result<Self, Self::Error> {
        Ok(Self {
            start: parse_api_date(&value.data_inicio).context("invalid start")?,
            end: parse_api_date(&value.data_validade).context("invalid end")?,
            id: value.id.into(),
            student: value.aluno.into(),
            instructor: value.professor_referencia.map(Into::into),
            active: value.ativa,
            expired: value.vencida,
            goals: value.objetivos,
            nutrition_notes: value.anotacoes_nutricao.filter(|n| !n.is_empty()),
            workouts: value.treinos.into_iter().map(Into::into).collect(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    #[serde(default)]
    pub cor: String,
    #[serde(default)]
    pub partes: Vec<Part>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

impl From<Workout> for domain::Workout {
    fn from(value: Workout) -> Self {
        Self {
            color: value.cor,
            parts: value.partes.into_iter().map(Into::into).collect(),
            notes: value.observacoes.filter(|n| !n.is_empty()),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(default)]
    pub exercicios: Vec<Exercise>,
}

impl From<Part> for domain::Part {
    fn from(value: Part) -> Self {
        Self {
            name: value.nome.filter(|n| !n.is_empty()),
            exercises: value.exercicios.into_iter().map(Into::into).collect(),
        }
    }
}

/// An objective or equipment, given by name or as a populated catalog entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Named {
    Text(String),
    Object {
        #[serde(default)]
        nome: String,
    },
}

impl From<Named> for String {
    fn from(value: Named) -> Self {
        match value {
            Named::Text(name) | Named::Object { nome: name } => name,
        }
    }
}

pub(crate) const DURATION_KIND: &str = "tempo";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub objetivo: Named,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipamento: Option<Named>,
    #[serde(default)]
    pub series: Vec<u32>,
    #[serde(default)]
    pub repeticoes: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detalhes: Option<String>,
    #[serde(default)]
    pub ordem: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo_segundos: Option<u32>,
}

impl From<Exercise> for domain::Exercise {
    fn from(value: Exercise) -> Self {
        let objective = String::from(value.objetivo);
        let prescription = if value.tipo.as_deref() == Some(DURATION_KIND) {
            domain::Prescription::Duration(value.tempo_segundos.unwrap_or_default())
        } else {
            if value.series.len() != value.repeticoes.len() {
                warn!(
                    "exercise \"{objective}\" has {} series but {} repetition counts",
                    value.series.len(),
                    value.repeticoes.len()
                );
            }
            domain::Prescription::Sets(
                value
                    .series
                    .into_iter()
                    .zip(value.repeticoes)
                    .map(|(series, reps)| domain::SetTarget { series, reps })
                    .collect(),
            )
        };
        Self {
            objective,
            equipment: value.equipamento.map(String::from).unwrap_or_default(),
            prescription,
            details: value.detalhes.filter(|d| !d.is_empty()),
            order: value.ordem,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub aluno: Reference,
    pub ficha: Reference,
    pub treino_index: usize,
    #[serde(default)]
    pub treino_cor: String,
    pub data_execucao: String,
    #[serde(default)]
    pub exercicios: Vec<ExecutionExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duracao_minutos: Option<u32>,
    #[serde(default)]
    pub concluido: bool,
}

impl From<&domain::Execution> for Execution {
    fn from(value: &domain::Execution) -> Self {
        Self {
            id: value.id.as_ref().map(ToString::to_string),
            aluno: Reference::Id(value.student.to_string()),
            ficha: Reference::Id(value.plan.to_string()),
            treino_index: value.workout_index,
            treino_cor: value.workout_color.clone(),
            data_execucao: value.date.to_rfc3339_opts(SecondsFormat::Millis, true),
            exercicios: value
                .exercises
                .iter()
                .map(ExecutionExercise::from)
                .collect(),
            duracao_minutos: value.duration_minutes,
            concluido: value.completed,
        }
    }
}

impl TryFrom<Execution> for domain::Execution {
    type Error = anyhow::Error;

    fn try_from(value: Execution) -> Result<Self, Self::Error> {
        Ok(Self {
            date: parse_api_timestamp(&value.data_execucao)?,
            id: value.id.map(Into::into),
            student: value.aluno.id().into(),
            plan: value.ficha.id().into(),
            workout_index: value.treino_index,
            workout_color: value.treino_cor,
            exercises: value.exercicios.into_iter().map(Into::into).collect(),
            duration_minutes: value.duracao_minutos,
            completed: value.concluido,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionExercise {
    pub exercicio_index: usize,
    pub parte_index: usize,
    #[serde(default)]
    pub concluido: bool,
    #[serde(default)]
    pub series_realizadas: Vec<u32>,
    #[serde(default)]
    pub repeticoes_realizadas: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

impl From<&domain::ExecutionExercise> for ExecutionExercise {
    fn from(value: &domain::ExecutionExercise) -> Self {
        Self {
            exercicio_index: value.exercise_index,
            parte_index: value.part_index,
            concluido: value.completed,
            series_realizadas: value.performed_series.clone(),
            repeticoes_realizadas: value.performed_reps.clone(),
            observacoes: value.notes.clone(),
        }
    }
}

impl From<ExecutionExercise> for domain::ExecutionExercise {
    fn from(value: ExecutionExercise) -> Self {
        Self {
            exercise_index: value.exercicio_index,
            part_index: value.parte_index,
            completed: value.concluido,
            performed_series: value.series_realizadas,
            performed_reps: value.repeticoes_realizadas,
            notes: value.observacoes,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseCompletion {
    pub ficha_id: String,
    pub treino_index: usize,
    pub parte_index: usize,
    pub exercicio_index: usize,
    pub anotacoes: String,
}

impl From<&domain::ExerciseCompletion> for ExerciseCompletion {
    fn from(value: &domain::ExerciseCompletion) -> Self {
        Self {
            ficha_id: value.plan.to_string(),
            treino_index: value.workout_index,
            parte_index: value.part_index,
            exercicio_index: value.exercise_index,
            anotacoes: value.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::tests::data::{EXECUTION, EXERCISE_COMPLETION, PLAN, PLAN_2, USER};

    #[test]
    fn test_parse_response() {
        assert_eq!(
            parse_response::<PlansResponse>(
                200,
                &json!({ "sucesso": true, "fichas": [Plan::from(&*PLAN)] }).to_string(),
                true
            )
            .unwrap()
            .plans(),
            vec![PLAN.clone()]
        );
    }

    #[test]
    fn test_plans_response_skips_malformed_plans() {
        let mut invalid_date = Plan::from(&*PLAN_2);
        invalid_date.data_validade = "01/12/2023".to_string();
        let body = json!({
            "sucesso": true,
            "fichas": [
                {
                    "_id": "p0",
                    "aluno": "u1",
                    "dataInicio": "2023-06-01",
                    "dataValidade": "2023-12-01",
                    "vencida": true,
                    "treinos": [
                        { "partes": [{ "exercicios": [{ "objetivo": null, "ordem": 1 }] }] }
                    ]
                },
                Plan::from(&*PLAN),
                invalid_date,
            ]
        });

        assert_eq!(
            parse_response::<PlansResponse>(200, &body.to_string(), true)
                .unwrap()
                .plans(),
            vec![PLAN.clone()]
        );
    }

    #[test]
    fn test_executions_response_skips_malformed_executions() {
        let body = json!({
            "sucesso": true,
            "execucoes": [
                Execution::from(&*EXECUTION),
                { "_id": "e2", "aluno": "u1", "ficha": "p1", "treinoIndex": "A" },
                {
                    "_id": "e3",
                    "aluno": "u1",
                    "ficha": "p1",
                    "treinoIndex": 0,
                    "dataExecucao": "ontem"
                },
            ]
        });

        assert_eq!(
            parse_response::<ExecutionsResponse>(200, &body.to_string(), true)
                .unwrap()
                .executions(),
            vec![EXECUTION.clone()]
        );
    }

    #[rstest]
    #[case(200, "")]
    #[case(201, r#"{"sucesso":true}"#)]
    #[case(204, "")]
    #[case(200, r#"{"mensagem":"Salvo"}"#)]
    fn test_parse_response_acknowledgement(#[case] status: u16, #[case] body: &str) {
        assert!(parse_response::<IgnoredAny>(status, body, true).is_ok());
    }

    #[rstest]
    #[case(400, r#"{"sucesso":false,"mensagem":"Email já cadastrado"}"#, false, Some("Email já cadastrado"))]
    #[case(401, r#"{"sucesso":false,"mensagem":"Email ou senha incorretos"}"#, false, Some("Email ou senha incorretos"))]
    #[case(200, r#"{"sucesso":false,"mensagem":"Ficha inativa"}"#, true, Some("Ficha inativa"))]
    #[case(500, "Internal Server Error", true, None)]
    #[case(404, "", true, None)]
    fn test_parse_response_rejected(
        #[case] status: u16,
        #[case] body: &str,
        #[case] authenticated: bool,
        #[case] expected_message: Option<&str>,
    ) {
        match parse_response::<IgnoredAny>(status, body, authenticated) {
            Err(domain::StorageError::Rejected {
                status: rejected_status,
                message,
            }) => {
                assert_eq!(rejected_status, status);
                assert_eq!(message.as_deref(), expected_message);
            }
            result => panic!("unexpected result: {result:?}"),
        }
    }

    #[test]
    fn test_parse_response_no_session() {
        assert!(matches!(
            parse_response::<IgnoredAny>(401, r#"{"mensagem":"Token inválido"}"#, true),
            Err(domain::StorageError::NoSession)
        ));
    }

    #[test]
    fn test_parse_response_invalid() {
        assert!(matches!(
            parse_response::<PlansResponse>(200, "<html></html>", true),
            Err(domain::StorageError::Other(_))
        ));
        assert!(matches!(
            parse_response::<LoginResponse>(200, r#"{"sucesso":true}"#, false),
            Err(domain::StorageError::Other(_))
        ));
    }

    #[test]
    fn test_read_error() {
        assert!(matches!(
            read_error(domain::StorageError::Rejected {
                status: 404,
                message: None
            }),
            domain::ReadError::NotFound
        ));
        assert!(matches!(
            read_error(domain::StorageError::NoConnection),
            domain::ReadError::Storage(domain::StorageError::NoConnection)
        ));
    }

    #[test]
    fn test_plan_from_backend() {
        let plan = serde_json::from_value::<Plan>(json!({
            "_id": "65f0c1",
            "aluno": { "_id": "s1", "nome": "Alice", "codigoAluno": 1042 },
            "professorReferencia": { "_id": "t1", "nome": "Carlos" },
            "dataInicio": "2024-01-15T00:00:00.000Z",
            "dataValidade": "2024-07-15",
            "ativa": true,
            "vencida": false,
            "objetivos": ["Hipertrofia", "Condicionamento"],
            "anotacoesNutricao": "",
            "treinos": [
                {
                    "cor": "#3b82f6",
                    "observacoes": "Descanso de 60s",
                    "partes": [
                        {
                            "nome": "Aquecimento",
                            "exercicios": [
                                {
                                    "objetivo": { "_id": "o1", "nome": "Esteira" },
                                    "equipamento": { "_id": "q1", "nome": "Esteira" },
                                    "tipo": "tempo",
                                    "tempoSegundos": 600,
                                    "ordem": 1
                                }
                            ]
                        },
                        {
                            "exercicios": [
                                {
                                    "objetivo": "Supino reto",
                                    "equipamento": "Barra",
                                    "series": [1, 2, 3],
                                    "repeticoes": [12, 10, 8],
                                    "detalhes": "Cadência 2-0-2",
                                    "ordem": 2
                                },
                                {
                                    "objetivo": "Crucifixo",
                                    "equipamento": null,
                                    "series": [1, 2, 3],
                                    "repeticoes": [15, 12],
                                    "ordem": 3
                                }
                            ]
                        }
                    ]
                }
            ]
        }))
        .unwrap();

        let plan = domain::Plan::try_from(plan).unwrap();

        assert_eq!(plan.id, domain::PlanID::from("65f0c1"));
        assert_eq!(plan.student.code, Some(1042));
        assert_eq!(
            plan.instructor.as_ref().map(|i| i.name.clone()),
            Some("Carlos".to_string())
        );
        assert_eq!(plan.start, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(plan.end, NaiveDate::from_ymd_opt(2024, 7, 15).unwrap());
        assert!(plan.is_current());
        assert_eq!(plan.nutrition_notes, None);

        let workout = &plan.workouts[0];
        assert_eq!(workout.notes, Some("Descanso de 60s".to_string()));
        assert_eq!(workout.num_exercises(), 3);

        let exercises = workout.exercises();
        assert_eq!(
            exercises[0].exercise,
            domain::Exercise {
                objective: "Esteira".to_string(),
                equipment: "Esteira".to_string(),
                prescription: domain::Prescription::Duration(600),
                details: None,
                order: 1,
            }
        );
        assert_eq!(exercises[0].part_name, Some("Aquecimento".to_string()));
        assert_eq!(
            exercises[1].exercise.prescription.sets(),
            &[
                domain::SetTarget {
                    series: 1,
                    reps: 12
                },
                domain::SetTarget {
                    series: 2,
                    reps: 10
                },
                domain::SetTarget {
                    series: 3,
                    reps: 8
                },
            ]
        );
        assert_eq!(exercises[2].part_name, None);
        assert_eq!(exercises[2].exercise.equipment, "");
        assert_eq!(exercises[2].exercise.prescription.sets().len(), 2);
    }

    #[test]
    fn test_plan_with_invalid_date() {
        let mut plan = Plan::from(&*PLAN);
        plan.data_validade = "15/07/2024".to_string();
        assert!(domain::Plan::try_from(plan).is_err());
    }

    #[test]
    fn test_plan_conversion() {
        assert_eq!(
            domain::Plan::try_from(Plan::from(&*PLAN)).unwrap(),
            PLAN.clone()
        );
    }

    #[test]
    fn test_plan_response_envelopes() {
        let plan = Plan::from(&*PLAN);
        let ficha = serde_json::from_value::<PlanResponse>(
            json!({ "sucesso": true, "ficha": plan.clone() }),
        )
        .unwrap();
        let dados = serde_json::from_value::<PlanResponse>(
            json!({ "sucesso": true, "dados": plan.clone() }),
        )
        .unwrap();
        assert_eq!(ficha.ficha.or(ficha.dados), Some(plan.clone()));
        assert_eq!(dados.ficha.or(dados.dados), Some(plan));
    }

    #[test]
    fn test_login_response() {
        let response = serde_json::from_value::<LoginResponse>(json!({
            "sucesso": true,
            "usuario": {
                "_id": "u1",
                "nome": "Alice",
                "email": "alice@example.com",
                "tipo": "aluno",
                "codigoAluno": 7,
                "ativo": true
            },
            "token": "abc.def.ghi"
        }))
        .unwrap();
        let session = domain::Session::try_from(response).unwrap();
        assert_eq!(session.user, USER.clone());
        assert_eq!(session.token.bearer(), "Bearer abc.def.ghi");
    }

    #[test]
    fn test_login_response_of_instructor() {
        let response = serde_json::from_value::<LoginResponse>(json!({
            "usuario": {
                "_id": "t1",
                "nome": "Carlos",
                "email": "carlos@example.com",
                "tipo": "professor"
            },
            "token": "abc"
        }))
        .unwrap();
        let session = domain::Session::try_from(response).unwrap();
        assert!(!session.user.is_student());
        assert!(session.user.active);
    }

    #[test]
    fn test_login_response_without_token() {
        let response = LoginResponse {
            usuario: User::from(&*USER),
            token: " ".to_string(),
        };
        assert_eq!(
            domain::Session::try_from(response)
                .map_err(|err| err.to_string())
                .err(),
            Some("missing token: no session".to_string())
        );
    }

    #[test]
    fn test_execution_payload() {
        assert_eq!(
            serde_json::to_value(Execution::from(&*EXECUTION)).unwrap(),
            json!({
                "aluno": "u1",
                "ficha": "p1",
                "treinoIndex": 1,
                "treinoCor": "#0000ff",
                "dataExecucao": "2024-03-01T18:30:00.000Z",
                "exercicios": [
                    {
                        "exercicioIndex": 0,
                        "parteIndex": 0,
                        "concluido": true,
                        "seriesRealizadas": [1, 2, 3],
                        "repeticoesRealizadas": [12, 10, 8],
                        "observacoes": "20kg"
                    },
                    {
                        "exercicioIndex": 1,
                        "parteIndex": 0,
                        "concluido": false,
                        "seriesRealizadas": [1],
                        "repeticoesRealizadas": [15]
                    }
                ],
                "duracaoMinutos": 42,
                "concluido": false
            })
        );
    }

    #[test]
    fn test_execution_from_backend() {
        let execution = serde_json::from_value::<Execution>(json!({
            "_id": "e1",
            "aluno": { "_id": "u1", "nome": "Alice" },
            "ficha": "p1",
            "treinoIndex": 1,
            "treinoCor": "#0000ff",
            "dataExecucao": "2024-03-01T15:30:00.000-03:00",
            "exercicios": [],
            "concluido": true
        }))
        .unwrap();
        let execution = domain::Execution::try_from(execution).unwrap();
        assert_eq!(execution.id, Some("e1".into()));
        assert_eq!(execution.student, domain::UserID::from("u1"));
        assert_eq!(execution.date, EXECUTION.date);
        assert_eq!(execution.duration_minutes, None);
        assert!(execution.completed);
    }

    #[test]
    fn test_exercise_completion_payload() {
        assert_eq!(
            serde_json::to_value(ExerciseCompletion::from(&*EXERCISE_COMPLETION)).unwrap(),
            json!({
                "fichaId": "p1",
                "treinoIndex": 1,
                "parteIndex": 1,
                "exercicioIndex": 0,
                "anotacoes": "20kg"
            })
        );
    }

    #[test]
    fn test_credentials_payload() {
        assert_eq!(
            serde_json::to_value(Credentials::from(
                &domain::Credentials::new("alice@example.com", "secret").unwrap()
            ))
            .unwrap(),
            json!({ "email": "alice@example.com", "senha": "secret" })
        );
    }

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use std::cell::RefCell;

        use effort_domain::{
            ExecutionRepository, PlanRepository, SessionRepository, StorageError,
        };
        use effort_web_app::SessionStorage;
        use pretty_assertions::assert_eq;
        use wasm_bindgen_test::wasm_bindgen_test;

        use crate::tests::data::SESSION;

        use super::*;

        #[wasm_bindgen_test]
        async fn test_request_session() {
            LocalStorage.delete_session().unwrap();

            let rest = rest_with_response(Some(
                Response::builder().status(200).json(&json!({
                    "sucesso": true,
                    "usuario": User::from(&*USER),
                    "token": "t0k3n",
                })),
            ));
            let session = rest
                .request_session(&domain::Credentials::new("alice@example.com", "secret").unwrap())
                .await
                .unwrap();

            assert_eq!(session, SESSION.clone());

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(request.url(), "http://localhost:3000/api/auth/login");
            assert_eq!(request.headers().get("Authorization"), None);
        }

        #[wasm_bindgen_test]
        async fn test_request_session_rejected() {
            LocalStorage.write_session(&SESSION).unwrap();

            let result = rest_with_response(Some(
                Response::builder().status(401).json(&json!({
                    "sucesso": false,
                    "mensagem": "Email ou senha incorretos",
                })),
            ))
            .request_session(&domain::Credentials::new("alice@example.com", "wrong").unwrap())
            .await;

            assert!(matches!(
                result,
                Err(domain::ReadError::Storage(StorageError::Rejected { status: 401, message: Some(ref m) }))
                    if m == "Email ou senha incorretos"
            ));

            LocalStorage.delete_session().unwrap();
        }

        #[wasm_bindgen_test]
        async fn test_request_session_no_connection() {
            assert!(matches!(
                rest_with_response(None)
                    .request_session(
                        &domain::Credentials::new("alice@example.com", "secret").unwrap()
                    )
                    .await,
                Err(domain::ReadError::Storage(StorageError::NoConnection))
            ));
        }

        #[wasm_bindgen_test]
        async fn test_define_password() {
            let rest = rest_with_response(Some(
                Response::builder()
                    .status(200)
                    .json(&json!({ "sucesso": true })),
            ));
            rest.define_password(&domain::Credentials::new("alice@example.com", "secret").unwrap())
                .await
                .unwrap();

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(
                request.url(),
                "http://localhost:3000/api/auth/primeiro-acesso"
            );
        }

        #[wasm_bindgen_test]
        async fn test_read_plans() {
            LocalStorage.write_session(&SESSION).unwrap();

            let rest = rest_with_response(Some(Response::builder().status(200).json(&json!({
                "sucesso": true,
                "fichas": [Plan::from(&*PLAN), Plan::from(&*PLAN_2)],
            }))));

            assert_eq!(
                rest.read_plans().await.unwrap(),
                vec![PLAN.clone(), PLAN_2.clone()]
            );

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(request.url(), "http://localhost:3000/api/fichas");
            assert_eq!(
                request.headers().get("Authorization"),
                Some("Bearer t0k3n".to_string())
            );

            LocalStorage.delete_session().unwrap();
        }

        #[wasm_bindgen_test]
        async fn test_read_plans_expired_session() {
            LocalStorage.write_session(&SESSION).unwrap();

            assert!(matches!(
                rest_with_response(Some(
                    Response::builder()
                        .status(401)
                        .json(&json!({ "sucesso": false, "mensagem": "Token inválido" })),
                ))
                .read_plans()
                .await,
                Err(domain::ReadError::Storage(StorageError::NoSession))
            ));

            LocalStorage.delete_session().unwrap();
        }

        #[wasm_bindgen_test]
        async fn test_read_plan() {
            let rest = rest_with_response(Some(Response::builder().status(200).json(&json!({
                "sucesso": true,
                "dados": Plan::from(&*PLAN),
            }))));

            assert_eq!(rest.read_plan(&PLAN.id).await.unwrap(), PLAN.clone());

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(request.url(), "http://localhost:3000/api/fichas/p1");
        }

        #[wasm_bindgen_test]
        async fn test_read_plan_not_found() {
            assert!(matches!(
                rest_with_response(Some(
                    Response::builder().status(404).body::<Option<&str>>(None),
                ))
                .read_plan(&PLAN.id)
                .await,
                Err(domain::ReadError::NotFound)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_read_executions() {
            let rest = rest_with_response(Some(Response::builder().status(200).json(&json!({
                "sucesso": true,
                "execucoes": [Execution::from(&*EXECUTION)],
            }))));

            assert_eq!(rest.read_executions().await.unwrap(), vec![EXECUTION.clone()]);
        }

        #[wasm_bindgen_test]
        async fn test_read_executions_not_found() {
            assert!(matches!(
                rest_with_response(Some(
                    Response::builder().status(404).body::<Option<&str>>(None),
                ))
                .read_executions()
                .await,
                Err(domain::ReadError::NotFound)
            ));
        }

        #[wasm_bindgen_test]
        async fn test_create_execution() {
            let rest = rest_with_response(Some(
                Response::builder()
                    .status(201)
                    .json(&json!({ "sucesso": true })),
            ));
            rest.create_execution(&EXECUTION).await.unwrap();

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(request.url(), "http://localhost:3000/api/execucoes");
        }

        #[wasm_bindgen_test]
        async fn test_create_exercise_completion() {
            let rest = rest_with_response(Some(
                Response::builder()
                    .status(200)
                    .json(&json!({ "sucesso": true })),
            ));
            rest.create_exercise_completion(&EXERCISE_COMPLETION)
                .await
                .unwrap();

            let request = rest.sender.request.borrow_mut().take().unwrap();
            assert_eq!(
                request.url(),
                "http://localhost:3000/api/execucoes/exercicio"
            );
        }

        #[wasm_bindgen_test]
        async fn test_create_exercise_completion_rejected() {
            assert!(matches!(
                rest_with_response(Some(
                    Response::builder()
                        .status(500)
                        .json(&json!({ "sucesso": false, "mensagem": "Erro interno" })),
                ))
                .create_exercise_completion(&EXERCISE_COMPLETION)
                .await,
                Err(domain::CreateError::Storage(StorageError::Rejected { status: 500, .. }))
            ));
        }

        fn rest_with_response(
            response: Option<Result<Response, gloo_net::Error>>,
        ) -> REST<MockSendRequest> {
            REST {
                sender: MockSendRequest {
                    request: RefCell::new(None),
                    response: RefCell::new(response),
                },
                base_url: "http://localhost:3000".to_string(),
            }
        }

        struct MockSendRequest {
            request: RefCell<Option<Request>>,
            response: RefCell<Option<Result<Response, gloo_net::Error>>>,
        }

        impl SendRequest for MockSendRequest {
            async fn send_request(&self, request: Request) -> Result<Response, gloo_net::Error> {
                *self.request.borrow_mut() = Some(request);
                (*self.response.borrow_mut())
                    .take()
                    .unwrap_or(Err(gloo_net::Error::GlooError("no response".to_string())))
            }
        }
    }
}
