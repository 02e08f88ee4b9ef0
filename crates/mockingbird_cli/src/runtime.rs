//! Runtime host: runs interviewer calls off the loop thread and feeds results back as events.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use interview_api::{ChatRequest, FeedbackRequest, InterviewApiClient, InterviewApiConfig};
use mockingbird::{
    ChatTurn, EnvConfig, InterviewHost, Question, RequestId, SessionError, SessionEvent,
};
use tracing::{debug, warn};

use crate::questions::QuestionPicker;

pub type BackendFuture = Pin<Box<dyn Future<Output = Result<String, SessionError>> + Send>>;

/// The interviewer service as seen by the host.
pub trait InterviewBackend: Send + Sync {
    /// Checked before a call is started; an error here never reaches the network.
    fn ready(&self) -> Result<(), SessionError> {
        Ok(())
    }

    fn chat(&self, turn: ChatTurn) -> BackendFuture;

    fn feedback(&self, history: String) -> BackendFuture;
}

/// [`InterviewBackend`] over HTTP. A client that failed to build is kept as its error so the
/// session can report it in-band instead of refusing to start.
pub struct HttpBackend {
    client: Result<InterviewApiClient, SessionError>,
}

impl HttpBackend {
    pub fn new(client: InterviewApiClient) -> Self {
        Self { client: Ok(client) }
    }

    pub fn from_config(config: &EnvConfig) -> Self {
        let mut api_config = InterviewApiConfig::new(config.api_url.clone())
            .with_timeout(Duration::from_secs(config.timeout_sec))
            .with_user_agent(concat!("mockingbird/", env!("CARGO_PKG_VERSION")));
        if let Some(api_key) = config.api_key.as_deref() {
            api_config = api_config.with_api_key(api_key);
        }

        let client = InterviewApiClient::new(api_config).map_err(SessionError::from);
        if let Err(error) = &client {
            warn!(%error, "interviewer client unavailable");
        }
        Self { client }
    }

    fn client(&self) -> Result<InterviewApiClient, SessionError> {
        self.client.clone()
    }
}

impl InterviewBackend for HttpBackend {
    fn ready(&self) -> Result<(), SessionError> {
        self.client.as_ref().map(|_| ()).map_err(Clone::clone)
    }

    fn chat(&self, turn: ChatTurn) -> BackendFuture {
        let client = self.client();
        Box::pin(async move {
            let request = ChatRequest::from_turn(&turn);
            let client = client?;
            client.send_chat(&request).await.map_err(SessionError::from)
        })
    }

    fn feedback(&self, history: String) -> BackendFuture {
        let client = self.client();
        Box::pin(async move {
            let request = FeedbackRequest::new(history);
            let client = client?;
            client.generate_feedback(&request).await.map_err(SessionError::from)
        })
    }
}

/// Implements [`InterviewHost`] on top of a tokio runtime.
///
/// Every call gets the next [`RequestId`] and resolves into exactly one event on `events`.
/// Render and stop requests are latched in flags that the loop drains after each event.
pub struct RuntimeController {
    runtime: Option<tokio::runtime::Runtime>,
    backend: Arc<dyn InterviewBackend>,
    events: Sender<SessionEvent>,
    next_request_id: AtomicU64,
    render_requested: AtomicBool,
    stop_requested: AtomicBool,
    questions: QuestionPicker,
}

impl RuntimeController {
    pub fn new(
        backend: Arc<dyn InterviewBackend>,
        events: Sender<SessionEvent>,
        questions: QuestionPicker,
    ) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("mockingbird-net")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            backend,
            events,
            next_request_id: AtomicU64::new(1),
            render_requested: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            questions,
        })
    }

    /// Returns and clears a pending render request.
    pub fn take_render_request(&self) -> bool {
        self.render_requested.swap(false, Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    fn spawn(
        &self,
        future: BackendFuture,
        resolve: fn(RequestId, Result<String, SessionError>) -> SessionEvent,
    ) -> Result<RequestId, SessionError> {
        let Some(runtime) = self.runtime.as_ref() else {
            return Err(SessionError::ConfigurationError(
                "runtime already shut down".to_string(),
            ));
        };

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let events = self.events.clone();
        runtime.spawn(async move {
            let result = future.await;
            if let Err(error) = &result {
                debug!(request_id, %error, "interviewer call failed");
            }
            // The loop may already be gone during shutdown.
            let _ = events.send(resolve(request_id, result));
        });
        Ok(request_id)
    }
}

impl InterviewHost for RuntimeController {
    fn start_chat(&mut self, turn: ChatTurn) -> Result<RequestId, SessionError> {
        self.backend.ready()?;
        let future = self.backend.chat(turn);
        self.spawn(future, |request_id, result| SessionEvent::ChatResolved {
            request_id,
            result,
        })
    }

    fn start_feedback(&mut self, history: String) -> Result<RequestId, SessionError> {
        self.backend.ready()?;
        let future = self.backend.feedback(history);
        self.spawn(future, |request_id, result| SessionEvent::FeedbackResolved {
            request_id,
            result,
        })
    }

    fn pick_question(&mut self) -> Question {
        self.questions.pick()
    }

    fn request_render(&mut self) {
        self.render_requested.store(true, Ordering::SeqCst);
    }

    fn request_stop(&mut self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }
}

impl Drop for RuntimeController {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
