//! Session host: an isolated Tokio task that owns one game session.
//!
//! The host runs the session as an actor. Commands arrive over a bounded
//! mpsc channel, countdown beats come from a [`TickClock`], and every
//! notification the session produces is forwarded to an unbounded
//! channel owned by the presentation layer. Nothing else ever touches
//! the session, so no locking is needed.

use std::path::Path;

use quizforge_bank::{BankError, QuestionBank};
use quizforge_clock::{TickClock, TickInfo};
use quizforge_game::{
    GameError, GameSession, Intent, Notification, SessionConfig, SessionSnapshot,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::QuizError;

/// Capacity of the command channel. Senders wait when it is full.
pub const COMMAND_CHANNEL_SIZE: usize = 64;

/// Where the host delivers notifications.
pub type NotificationSender = mpsc::UnboundedSender<Notification>;

/// Commands sent to the host task.
///
/// Variants carrying a `oneshot::Sender` expect an answer on it.
enum HostCommand {
    /// Apply an intent; rejections are only logged.
    Intent(Intent),

    /// Apply an intent and report whether it was accepted.
    Request {
        intent: Intent,
        reply: oneshot::Sender<Result<(), GameError>>,
    },

    /// Read the whole session state.
    Snapshot {
        reply: oneshot::Sender<SessionSnapshot>,
    },

    /// Install a freshly loaded question bank.
    InstallBank(QuestionBank),

    /// The bank could not be loaded.
    BankFailed(String),

    /// Stop the host.
    Shutdown,
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Front end to a running host. Cheap to clone.
#[derive(Clone)]
pub struct QuizHandle {
    sender: mpsc::Sender<HostCommand>,
}

impl QuizHandle {
    /// Forwards an intent (fire-and-forget).
    ///
    /// A rejected intent is a silent no-op, exactly as with
    /// [`GameSession::apply`].
    pub async fn send(&self, intent: Intent) -> Result<(), QuizError> {
        self.command(HostCommand::Intent(intent)).await
    }

    /// Forwards an intent and waits for the verdict.
    ///
    /// Notifications still go to the notification channel, and all of
    /// them have been sent by the time this returns.
    pub async fn request(&self, intent: Intent) -> Result<(), QuizError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(HostCommand::Request {
            intent,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| QuizError::Unavailable)??;
        Ok(())
    }

    /// Reads the current session state.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, QuizError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command(HostCommand::Snapshot { reply: reply_tx })
            .await?;
        reply_rx.await.map_err(|_| QuizError::Unavailable)
    }

    /// Installs an already loaded bank.
    pub async fn install_bank(&self, bank: QuestionBank) -> Result<(), QuizError> {
        self.command(HostCommand::InstallBank(bank)).await
    }

    /// Reads and parses a bank file, then installs it.
    ///
    /// On failure the host emits [`Notification::BankUnavailable`] and the
    /// session stays unable to start. The error is also returned so the
    /// caller may report it.
    pub async fn load_bank(&self, path: impl AsRef<Path>) -> Result<(), QuizError> {
        let path = path.as_ref();
        match read_bank(path).await {
            Ok(bank) => {
                info!(path = %path.display(), questions = bank.len(), "question bank loaded");
                self.install_bank(bank).await
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "question bank unavailable");
                self.command(HostCommand::BankFailed(e.to_string())).await?;
                Err(e.into())
            }
        }
    }

    /// Tells the host to stop.
    pub async fn shutdown(&self) -> Result<(), QuizError> {
        self.command(HostCommand::Shutdown).await
    }

    /// Completes once the host task has stopped.
    pub async fn closed(&self) {
        self.sender.closed().await;
    }

    /// Whether the host task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn command(&self, cmd: HostCommand) -> Result<(), QuizError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| QuizError::Unavailable)
    }
}

async fn read_bank(path: &Path) -> Result<QuestionBank, BankError> {
    let data = tokio::fs::read(path).await?;
    QuestionBank::from_json_slice(&data)
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// What woke the actor up.
enum Wake {
    Command(Option<HostCommand>),
    Tick(TickInfo),
}

struct HostActor {
    session: GameSession,
    clock: TickClock,
    receiver: mpsc::Receiver<HostCommand>,
    notifier: NotificationSender,
}

impl HostActor {
    async fn run(mut self) {
        info!(
            unit_ms = self.clock.unit().as_millis() as u64,
            "quiz host started"
        );

        loop {
            let wake = tokio::select! {
                cmd = self.receiver.recv() => Wake::Command(cmd),
                info = self.clock.wait_for_tick() => Wake::Tick(info),
            };

            let mut verdict = None;
            let notes = match wake {
                Wake::Command(Some(HostCommand::Intent(intent))) => self.session.apply(intent),
                Wake::Command(Some(HostCommand::Request { intent, reply })) => {
                    match self.session.try_apply(intent) {
                        Ok(notes) => {
                            verdict = Some((reply, Ok(())));
                            notes
                        }
                        Err(reason) => {
                            debug!(%reason, "requested intent rejected");
                            verdict = Some((reply, Err(reason)));
                            Vec::new()
                        }
                    }
                }
                Wake::Command(Some(HostCommand::Snapshot { reply })) => {
                    let _ = reply.send(self.session.snapshot());
                    continue;
                }
                Wake::Command(Some(HostCommand::InstallBank(bank))) => {
                    self.session.install_bank(bank)
                }
                Wake::Command(Some(HostCommand::BankFailed(reason))) => {
                    vec![Notification::BankUnavailable(reason)]
                }
                Wake::Command(Some(HostCommand::Shutdown)) => {
                    info!("quiz host shutting down");
                    break;
                }
                Wake::Command(None) => {
                    debug!("all handles dropped");
                    break;
                }
                Wake::Tick(info) => self.on_tick(info),
            };

            self.sync_clock(&notes);
            self.dispatch(notes);

            // Reply last, so the caller sees every notification first.
            if let Some((reply, result)) = verdict {
                let _ = reply.send(result);
            }
        }

        info!("quiz host stopped");
    }

    /// Feeds a beat to the session, plus any beats the clock skipped,
    /// stopping early if the question changed.
    fn on_tick(&mut self, info: TickInfo) -> Vec<Notification> {
        let mut notes = Vec::new();
        for _ in 0..=info.ticks_skipped {
            let step = self.session.tick();
            let new_question = has_new_question(&step);
            notes.extend(step);
            if new_question || !self.session.timer_running() {
                break;
            }
        }
        notes
    }

    /// Keeps exactly one beat source live while a countdown runs.
    fn sync_clock(&mut self, notes: &[Notification]) {
        if !self.session.timer_running() {
            self.clock.disarm();
        } else if has_new_question(notes) || !self.clock.is_armed() {
            self.clock.arm();
        }
    }

    /// Forwards notifications. Silently drops them if the receiver is
    /// gone.
    fn dispatch(&self, notes: Vec<Notification>) {
        for note in notes {
            let _ = self.notifier.send(note);
        }
    }
}

fn has_new_question(notes: &[Notification]) -> bool {
    notes
        .iter()
        .any(|n| matches!(n, Notification::QuestionChanged { .. }))
}

// ---------------------------------------------------------------------------
// Spawning
// ---------------------------------------------------------------------------

/// Spawns a host for a fresh session built from `config`.
///
/// The session starts without a question bank; follow up with
/// [`QuizHandle::load_bank`] or [`QuizHandle::install_bank`].
pub fn spawn_host(config: SessionConfig, notifier: NotificationSender) -> QuizHandle {
    spawn_session(GameSession::new(config), notifier)
}

/// Spawns a host for an already built session (for example one with a
/// seeded RNG or a preinstalled bank).
///
/// The clock's unit is taken from the session's `tick_unit`.
pub fn spawn_session(session: GameSession, notifier: NotificationSender) -> QuizHandle {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

    let actor = HostActor {
        clock: TickClock::with_unit(session.config().tick_unit),
        session,
        receiver: rx,
        notifier,
    };

    tokio::spawn(actor.run());

    QuizHandle { sender: tx }
}
