// src/quiz/runner.rs

//! Runs one quiz session as a tokio task.
//!
//! The actor owns the session reducer, the mounted widget and its revert
//! timer. User commands, timer expiries and completion results all arrive on
//! one channel, so exactly one event is applied at a time.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::{broadcast, mpsc, oneshot};
use uuid::Uuid;

use crate::{
    client::LearningApi,
    config::{
        COMPLETED_SESSION_LINGER_SECS, NOTICE_CHANNEL_CAPACITY, REVERT_DELAY_MS,
        SESSION_IDLE_TIMEOUT_SECS,
    },
    error::AppError,
    models::{
        answer_key::AnswerKey,
        item::{ItemContent, ItemScope},
        session::{CompletionStatus, SessionSnapshot},
    },
    progress::{CompletionBus, ItemCompleted},
    quiz::{
        Cue, RevertTicket, Signal, WidgetEffect,
        session::{Banner, QuizSession, SessionEffect, SessionEvent},
        timer::FeedbackTimer,
        widget::{QuestionWidget, WidgetInput},
    },
};

/// Transient UI notifications (toasts, banners, sounds, confetti).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionNotice {
    Answer(Signal),
    WrongCleared,
    Cue(Cue),
    Celebrate,
    ItemCompleted,
    CompletionFailed(String),
}

/// Collaborators and knobs shared by every session.
#[derive(Clone)]
pub struct SessionDeps {
    pub api: Arc<dyn LearningApi>,
    pub bus: CompletionBus,
    pub revert_delay: Duration,
    /// Shuts the session down after this long without a command.
    pub idle_timeout: Duration,
    /// Shorter idle window once the item completion has been written.
    pub completed_linger: Duration,
    /// Fixes the shuffle of matching questions.
    pub seed: Option<u64>,
}

impl SessionDeps {
    pub fn new(api: Arc<dyn LearningApi>, bus: CompletionBus) -> Self {
        Self {
            api,
            bus,
            revert_delay: Duration::from_millis(REVERT_DELAY_MS),
            idle_timeout: Duration::from_secs(SESSION_IDLE_TIMEOUT_SECS),
            completed_linger: Duration::from_secs(COMPLETED_SESSION_LINGER_SECS),
            seed: None,
        }
    }

    pub fn with_revert_delay(mut self, revert_delay: Duration) -> Self {
        self.revert_delay = revert_delay;
        self
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn with_completed_linger(mut self, completed_linger: Duration) -> Self {
        self.completed_linger = completed_linger;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

type Reply = oneshot::Sender<Result<SessionSnapshot, AppError>>;

enum Command {
    Input(WidgetInput, Reply),
    Continue(Reply),
    Dismiss(Banner, Reply),
    RetryCompletion(Reply),
    Snapshot(Reply),
    Close(oneshot::Sender<()>),
    RevertElapsed { question: usize, ticket: RevertTicket },
    CompletionFinished(Result<(), AppError>),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Input(input, _) => write!(f, "Input({:?})", input),
            Command::Continue(_) => write!(f, "Continue"),
            Command::Dismiss(banner, _) => write!(f, "Dismiss({:?})", banner),
            Command::RetryCompletion(_) => write!(f, "RetryCompletion"),
            Command::Snapshot(_) => write!(f, "Snapshot"),
            Command::Close(_) => write!(f, "Close"),
            Command::RevertElapsed { question, ticket } => {
                write!(f, "RevertElapsed({}, {:?})", question, ticket)
            }
            Command::CompletionFinished(result) => write!(f, "CompletionFinished({:?})", result),
        }
    }
}

/// Cheap, cloneable handle to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::UnboundedSender<Command>,
    notices: broadcast::Sender<SessionNotice>,
}

impl SessionHandle {
    /// Starts a session for `item` and mounts its first question.
    pub fn spawn(item: ItemContent, deps: SessionDeps) -> Self {
        let id = Uuid::new_v4();
        let (commands, receiver) = mpsc::unbounded_channel();
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);

        if item.question_count != item.exam.quizzes.len() {
            tracing::warn!(
                item = %item.id,
                "Item claims {} questions but carries {}; using the carried quizzes",
                item.question_count,
                item.exam.quizzes.len()
            );
        }

        let rng = match deps.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let actor = SessionActor {
            id,
            item_id: item.id,
            scope: item.scope,
            session: QuizSession::new(item.exam.quizzes.len()),
            quizzes: item.exam.quizzes,
            widget: None,
            timer: None,
            rng,
            completion: CompletionStatus::NotStarted,
            celebrations: 0,
            api: deps.api,
            bus: deps.bus,
            revert_delay: deps.revert_delay,
            idle_timeout: deps.idle_timeout,
            completed_linger: deps.completed_linger,
            commands: commands.downgrade(),
            notices: notices.clone(),
        };
        tokio::spawn(actor.run(receiver));

        Self {
            id,
            commands,
            notices,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotice> {
        self.notices.subscribe()
    }

    pub async fn click_choice(&self, index: usize) -> Result<SessionSnapshot, AppError> {
        self.request(|reply| Command::Input(WidgetInput::Choice(index), reply))
            .await
    }

    pub async fn select_left(&self, index: usize) -> Result<SessionSnapshot, AppError> {
        self.request(|reply| Command::Input(WidgetInput::Left(index), reply))
            .await
    }

    pub async fn select_right(&self, index: usize) -> Result<SessionSnapshot, AppError> {
        self.request(|reply| Command::Input(WidgetInput::Right(index), reply))
            .await
    }

    pub async fn advance(&self) -> Result<SessionSnapshot, AppError> {
        self.request(Command::Continue).await
    }

    pub async fn dismiss(&self, banner: Banner) -> Result<SessionSnapshot, AppError> {
        self.request(|reply| Command::Dismiss(banner, reply)).await
    }

    pub async fn retry_completion(&self) -> Result<SessionSnapshot, AppError> {
        self.request(Command::RetryCompletion).await
    }

    pub async fn snapshot(&self) -> Result<SessionSnapshot, AppError> {
        self.request(Command::Snapshot).await
    }

    /// Tears the session down. Pending timers are cancelled before this returns.
    pub async fn close(&self) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Close(done)).is_ok() {
            let _ = wait.await;
        }
    }

    async fn request<F>(&self, build: F) -> Result<SessionSnapshot, AppError>
    where
        F: FnOnce(Reply) -> Command,
    {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| self.closed_error())?;
        response.await.map_err(|_| self.closed_error())?
    }

    /// Resolves once the session task has stopped, however it stopped.
    pub async fn closed(&self) {
        self.commands.closed().await
    }

    fn closed_error(&self) -> AppError {
        AppError::NotFound(format!("Quiz session {} is closed", self.id))
    }
}

struct SessionActor {
    id: Uuid,
    item_id: String,
    scope: ItemScope,
    quizzes: Vec<AnswerKey>,
    session: QuizSession,
    widget: Option<QuestionWidget>,
    timer: Option<FeedbackTimer>,
    rng: StdRng,
    completion: CompletionStatus,
    celebrations: u32,
    api: Arc<dyn LearningApi>,
    bus: CompletionBus,
    revert_delay: Duration,
    idle_timeout: Duration,
    completed_linger: Duration,
    commands: mpsc::WeakUnboundedSender<Command>,
    notices: broadcast::Sender<SessionNotice>,
}

impl SessionActor {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        tracing::info!(session = %self.id, item = %self.item_id, "Quiz session started");
        let effects = self.session.start();
        self.run_session_effects(effects);

        loop {
            let Ok(received) = tokio::time::timeout(self.idle_window(), receiver.recv()).await
            else {
                tracing::info!(session = %self.id, "Quiz session idle, shutting down");
                break;
            };
            let Some(command) = received else {
                break;
            };
            tracing::trace!(session = %self.id, ?command, "session command");
            match command {
                Command::Input(input, reply) => {
                    let result = self.handle_input(input);
                    let _ = reply.send(result);
                }
                Command::Continue(reply) => {
                    let effects = self.session.apply(SessionEvent::Continue);
                    self.run_session_effects(effects);
                    let _ = reply.send(Ok(self.snapshot()));
                }
                Command::Dismiss(banner, reply) => {
                    self.session.apply(SessionEvent::Dismiss(banner));
                    let _ = reply.send(Ok(self.snapshot()));
                }
                Command::RetryCompletion(reply) => {
                    let result = self.retry_completion();
                    let _ = reply.send(result);
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(Ok(self.snapshot()));
                }
                Command::RevertElapsed { question, ticket } => {
                    self.revert_elapsed(question, ticket);
                }
                Command::CompletionFinished(result) => self.completion_finished(result),
                Command::Close(done) => {
                    self.teardown();
                    let _ = done.send(());
                    break;
                }
            }
        }

        self.teardown();
        tracing::info!(session = %self.id, "Quiz session closed");
    }

    fn idle_window(&self) -> Duration {
        match self.completion {
            CompletionStatus::Succeeded => self.completed_linger,
            _ => self.idle_timeout,
        }
    }

    fn teardown(&mut self) {
        self.timer = None;
        self.widget = None;
    }

    fn handle_input(&mut self, input: WidgetInput) -> Result<SessionSnapshot, AppError> {
        let widget = self.widget.as_mut().ok_or_else(|| {
            AppError::Conflict("Quiz is already completed".to_string())
        })?;
        let effects = widget.handle(input)?;
        self.run_widget_effects(effects);
        Ok(self.snapshot())
    }

    fn revert_elapsed(&mut self, question: usize, ticket: RevertTicket) {
        let Some(widget) = self.widget.as_mut().filter(|w| w.index() == question) else {
            tracing::debug!(session = %self.id, question, "ignoring revert for unmounted question");
            return;
        };
        let effects = widget.revert_elapsed(ticket);
        self.timer = None;
        self.run_widget_effects(effects);
    }

    fn run_widget_effects(&mut self, effects: Vec<WidgetEffect>) {
        for effect in effects {
            match effect {
                WidgetEffect::Emit(signal) => {
                    tracing::debug!(session = %self.id, question = self.session.current_index(), ?signal, "answer resolved");
                    self.notify(SessionNotice::Answer(signal));
                    let follow_up = self.session.apply(SessionEvent::Signal(signal));
                    self.run_session_effects(follow_up);
                }
                WidgetEffect::ClearWrongSignal => {
                    self.session.apply(SessionEvent::WrongCleared);
                    self.notify(SessionNotice::WrongCleared);
                }
                WidgetEffect::ScheduleRevert(ticket) => self.schedule_revert(ticket),
                WidgetEffect::Play(cue) => self.notify(SessionNotice::Cue(cue)),
            }
        }
    }

    fn schedule_revert(&mut self, ticket: RevertTicket) {
        let Some(commands) = self.commands.upgrade() else {
            return;
        };
        let question = self.session.current_index();
        // Replacing the previous timer aborts it.
        self.timer = Some(FeedbackTimer::schedule(self.revert_delay, move || {
            let _ = commands.send(Command::RevertElapsed { question, ticket });
        }));
    }

    fn run_session_effects(&mut self, effects: Vec<SessionEffect>) {
        for effect in effects {
            match effect {
                SessionEffect::MountQuestion(index) => self.mount(index),
                SessionEffect::CompleteItem => {
                    self.teardown();
                    tracing::info!(session = %self.id, item = %self.item_id, "All questions answered, completing item");
                    self.start_completion();
                }
                SessionEffect::Celebrate => {
                    self.celebrations += 1;
                    self.notify(SessionNotice::Celebrate);
                }
            }
        }
    }

    fn mount(&mut self, index: usize) {
        self.timer = None;
        self.widget = self
            .quizzes
            .get(index)
            .map(|key| QuestionWidget::mount(index, key, &mut self.rng));
    }

    /// Writes the completion, then broadcasts it. Continue never waits on this.
    fn start_completion(&mut self) {
        let Some(commands) = self.commands.upgrade() else {
            return;
        };
        self.completion = CompletionStatus::Pending;

        let api = self.api.clone();
        let bus = self.bus.clone();
        let item_id = self.item_id.clone();
        let scope = self.scope.clone();
        tokio::spawn(async move {
            let result = api.mark_item_complete(&item_id).await;
            if result.is_ok() {
                let listeners = bus.publish(ItemCompleted {
                    item_id,
                    scope,
                    completed_at: Utc::now(),
                });
                tracing::debug!("completion delivered to {} views", listeners);
            }
            let _ = commands.send(Command::CompletionFinished(result));
        });
    }

    fn completion_finished(&mut self, result: Result<(), AppError>) {
        match result {
            Ok(()) => {
                tracing::info!(session = %self.id, item = %self.item_id, "Item marked complete");
                self.completion = CompletionStatus::Succeeded;
                self.notify(SessionNotice::ItemCompleted);
            }
            Err(e) => {
                tracing::error!(session = %self.id, item = %self.item_id, "Failed to mark item complete: {}", e);
                let message = e.to_string();
                self.completion = CompletionStatus::Failed {
                    message: message.clone(),
                };
                self.notify(SessionNotice::CompletionFailed(message));
            }
        }
    }

    fn retry_completion(&mut self) -> Result<SessionSnapshot, AppError> {
        if !matches!(self.completion, CompletionStatus::Failed { .. }) {
            return Err(AppError::Conflict(
                "Only a failed completion can be retried".to_string(),
            ));
        }
        tracing::info!(session = %self.id, item = %self.item_id, "Retrying item completion");
        self.start_completion();
        Ok(self.snapshot())
    }

    fn notify(&self, notice: SessionNotice) {
        // No subscribers is fine: notices are transient.
        let _ = self.notices.send(notice);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            item_id: self.item_id.clone(),
            current_index: self.session.current_index(),
            total: self.session.total(),
            phase: self.session.phase(),
            right_signal: self.session.right_signal(),
            wrong_signal: self.session.wrong_signal(),
            completed: self.session.is_completed(),
            completion: self.completion.clone(),
            celebrations: self.celebrations,
            question: self.widget.as_ref().map(QuestionWidget::view),
        }
    }
}
