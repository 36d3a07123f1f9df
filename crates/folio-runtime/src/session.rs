//! Carousel session - one tokio task owning the navigation controller
//!
//! Every controller call happens on the session task, so user commands and
//! timer deadlines are strictly serialized. The task sleeps until the
//! controller's earliest deadline; the deadline is recomputed after every
//! event, so a cancelled timer simply stops being awaited.

use std::sync::Weak;
use std::time::Duration;

use folio_core::{
    Direction, DisplaySink, FolioError, FolioResult, MovePolicy, PageId, PageProvider,
    SessionTime,
};
use folio_time::SessionClock;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::{CarouselConfig, NavigationController, NavigationSnapshot};

/// Commands accepted by the session task
#[derive(Debug)]
pub enum Command {
    Go(Direction),
    InteractionBegan,
    InteractionChanged,
    InteractionEnded,
    SetInterval(Option<Duration>),
    TransitionFinished { page: PageId, completed: bool },
    Query(oneshot::Sender<NavigationSnapshot>),
    Shutdown,
}

/// Entry point for async carousel sessions
pub struct Carousel;

impl Carousel {
    /// Spawn a session on the current tokio runtime.
    ///
    /// Setup runs on the session task before any command is handled. The
    /// session ends on `shutdown` or once every handle has been dropped.
    pub fn spawn<P, S>(
        provider: P,
        policy: Option<Weak<dyn MovePolicy>>,
        sink: S,
        config: CarouselConfig,
    ) -> FolioResult<CarouselHandle>
    where
        P: PageProvider + Send + 'static,
        S: DisplaySink + Send + 'static,
    {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.command_buffer);
        let (snapshot_tx, snapshot_rx) = watch::channel(NavigationSnapshot::default());

        tokio::spawn(run_session(provider, policy, sink, config, rx, snapshot_tx));

        Ok(CarouselHandle {
            commands: tx,
            snapshots: snapshot_rx,
        })
    }
}

/// Handle to a running carousel session
#[derive(Clone, Debug)]
pub struct CarouselHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<NavigationSnapshot>,
}

impl CarouselHandle {
    pub async fn go_next(&self) -> FolioResult<()> {
        self.send(Command::Go(Direction::Next)).await
    }

    pub async fn go_previous(&self) -> FolioResult<()> {
        self.send(Command::Go(Direction::Previous)).await
    }

    pub async fn interaction_began(&self) -> FolioResult<()> {
        self.send(Command::InteractionBegan).await
    }

    pub async fn interaction_changed(&self) -> FolioResult<()> {
        self.send(Command::InteractionChanged).await
    }

    pub async fn interaction_ended(&self) -> FolioResult<()> {
        self.send(Command::InteractionEnded).await
    }

    /// Change the auto-swipe interval; `None` or zero disables auto-advance
    pub async fn set_interval(&self, interval: Option<Duration>) -> FolioResult<()> {
        self.send(Command::SetInterval(interval)).await
    }

    pub async fn finish_transition(&self, page: PageId, completed: bool) -> FolioResult<()> {
        self.send(Command::TransitionFinished { page, completed })
            .await
    }

    /// Snapshot taken on the session task, after every queued command
    pub async fn query(&self) -> FolioResult<NavigationSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Query(tx)).await?;
        rx.await.map_err(|_| FolioError::SessionClosed)
    }

    pub async fn current(&self) -> FolioResult<Option<PageId>> {
        Ok(self.query().await?.current)
    }

    /// Latest published snapshot, without a round trip
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavigationSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    /// Stop the session and wait until it has torn down.
    ///
    /// Shutting down an already closed session is not an error.
    pub async fn shutdown(&self) -> FolioResult<()> {
        match self.send(Command::Shutdown).await {
            Ok(()) | Err(FolioError::SessionClosed) => {}
            Err(e) => return Err(e),
        }
        self.commands.closed().await;
        Ok(())
    }

    async fn send(&self, command: Command) -> FolioResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| FolioError::SessionClosed)
    }
}

/// Provider view with the config overrides applied
struct ConfiguredProvider<'a> {
    inner: &'a dyn PageProvider,
    config: &'a CarouselConfig,
}

impl PageProvider for ConfiguredProvider<'_> {
    fn pages(&self) -> Vec<PageId> {
        self.inner.pages()
    }

    fn is_cyclic(&self) -> bool {
        self.config
            .cyclic
            .unwrap_or_else(|| self.inner.is_cyclic())
    }

    fn swipe_interval(&self) -> Option<Duration> {
        match self.config.swipe_interval_override() {
            Some(interval) => interval,
            None => self.inner.swipe_interval(),
        }
    }
}

fn session_now(clock: &SessionClock) -> SessionTime {
    clock.now_at(Instant::now().into_std())
}

/// Sleep until `deadline`, or forever when nothing is scheduled
async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Apply one command. Returns `false` when the session should stop.
fn apply<S: DisplaySink>(
    controller: &mut NavigationController<S>,
    command: Command,
    now: SessionTime,
) -> bool {
    trace!(?command, ?now, "session command");
    match command {
        Command::Go(direction) => {
            controller.go_to(direction, now);
        }
        Command::InteractionBegan => controller.interaction_began(now),
        Command::InteractionChanged => controller.interaction_changed(now),
        Command::InteractionEnded => controller.interaction_ended(now),
        Command::SetInterval(interval) => controller.set_swipe_interval(interval, now),
        Command::TransitionFinished { page, completed } => {
            controller.finish_transition(page, completed);
        }
        Command::Query(reply) => {
            // Caller may have given up waiting
            let _ = reply.send(controller.snapshot());
        }
        Command::Shutdown => return false,
    }
    true
}

async fn run_session<P, S>(
    provider: P,
    policy: Option<Weak<dyn MovePolicy>>,
    sink: S,
    config: CarouselConfig,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<NavigationSnapshot>,
) where
    P: PageProvider + Send,
    S: DisplaySink + Send,
{
    let clock = SessionClock::starting_at(Instant::now().into_std());
    let mut controller = NavigationController::with_quiet_period(sink, config.quiet_period());
    if let Some(policy) = policy {
        controller.set_policy(policy);
    }

    {
        let view = ConfiguredProvider {
            inner: &provider,
            config: &config,
        };
        controller.setup(&view, session_now(&clock));
    }
    snapshots.send_replace(controller.snapshot());

    loop {
        let deadline = controller.next_deadline();
        let wake_at = deadline.map(|t| Instant::from_std(clock.instant_at(t)));

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("all carousel handles dropped");
                    break;
                };
                if !apply(&mut controller, command, session_now(&clock)) {
                    debug!("carousel shutdown requested");
                    break;
                }
            }
            _ = sleep_until_deadline(wake_at) => {
                // Never observe time before the deadline
                let now = session_now(&clock);
                let now = deadline.map_or(now, |d| now.max(d));
                controller.poll(now);
            }
        }

        snapshots.send_replace(controller.snapshot());
    }

    controller.teardown();
    snapshots.send_replace(controller.snapshot());
}
