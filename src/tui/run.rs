//! TUI effects boundary: event loop, terminal lifecycle, key mapping,
//! operation workers.
//!
//! This is the only module with side effects. It wires the pure layers
//! (state, update, view) to the real terminal via crossterm and ratatui.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key events
//! - Operation workers: one per launch, each sends exactly one outcome
//!
//! The event loop is the only owner of `MenuState`. It consumes events in
//! arrival order and never blocks on a worker.

use std::io;
use std::ops::ControlFlow;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::config::Config;
use crate::operations::Operation;
use crate::outcome::Outcome;
use crate::registry::{MenuAction, Registry};

use super::state::{AppEvent, Effect, Event, MenuState, Transition};
use super::update::update;
use super::view::{render, Chrome};

/// Thread-name prefix for operation workers.
const WORKER_PREFIX: &str = "op-";

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a menu event.
///
/// Returns None for keys that don't map to anything, and for
/// release/repeat events reported by some terminals.
pub fn map_key(key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Event::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Event::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Event::MoveDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Event::Activate),
        KeyCode::Char('q') | KeyCode::Esc => Some(Event::Quit),
        _ => None,
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// The event loop's owned state: menu state, item list, outcome sender.
///
/// Split from the terminal so the dispatch protocol can be driven
/// directly in tests.
pub struct Session {
    state: MenuState,
    registry: Registry,
    outcomes: mpsc::Sender<AppEvent>,
}

impl Session {
    pub fn new(
        registry: Registry,
        idle_status: impl Into<String>,
        outcomes: mpsc::Sender<AppEvent>,
    ) -> Self {
        Session {
            state: MenuState::new(idle_status),
            registry,
            outcomes,
        }
    }

    pub fn state(&self) -> &MenuState {
        &self.state
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Apply one event and carry out its effect.
    ///
    /// Breaks when the loop should end.
    pub fn dispatch(&mut self, event: Event) -> ControlFlow<()> {
        let launched_before = self.state.last_launched;
        let cursor = self.state.cursor;

        let Transition { state, effect } =
            update(std::mem::take(&mut self.state), &event, &self.registry);
        self.state = state;

        match (&event, effect) {
            (Event::Activate, Effect::None) => {
                tracing::debug!(
                    cursor,
                    busy = self.state.busy,
                    "activation ignored"
                );
            }
            (Event::OutcomeReceived(outcome), _) => match launched_before {
                Some(index) => tracing::info!(
                    index,
                    success = outcome.is_success(),
                    status = outcome.message(),
                    "operation reported"
                ),
                None => tracing::warn!(
                    status = outcome.message(),
                    "outcome with no launched item"
                ),
            },
            _ => {}
        }

        match effect {
            Effect::None => ControlFlow::Continue(()),
            Effect::Launch(index) => {
                self.launch(index);
                ControlFlow::Continue(())
            }
            Effect::Terminate => {
                if self.state.busy {
                    // Not cancelled, not awaited.
                    tracing::warn!(
                        index = self.state.last_launched,
                        "exiting with an operation still running"
                    );
                }
                ControlFlow::Break(())
            }
        }
    }

    fn launch(&self, index: usize) {
        let Some(item) = self.registry.get(index) else {
            return;
        };
        match &item.action {
            MenuAction::Run(op) => {
                tracing::info!(index, label = %item.label, operation = op.name(), "launching");
                spawn_operation(Arc::clone(op), self.outcomes.clone());
            }
            MenuAction::Exit => {}
        }
    }
}

// ============================================================================
// BACKGROUND THREADS
// ============================================================================

/// Run `op` on a worker thread and send its single outcome to `tx`.
///
/// Returns immediately. A panicking operation, or a worker that cannot be
/// started, still yields exactly one failure outcome.
pub fn spawn_operation(op: Arc<dyn Operation>, tx: mpsc::Sender<AppEvent>) {
    let name = op.name().to_string();
    let worker_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("{}{}", WORKER_PREFIX, name))
        .spawn(move || {
            let started = Instant::now();
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| op.run()))
                .unwrap_or_else(|_| Outcome::failed(format!("{} crashed unexpectedly", op.name())));
            tracing::info!(
                operation = op.name(),
                success = outcome.is_success(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "operation finished"
            );
            // Receiver gone means the menu already exited.
            let _ = worker_tx.send(AppEvent::Outcome(outcome));
        });

    if let Err(e) = spawned {
        tracing::error!(operation = %name, error = %e, "failed to start worker");
        let _ = tx.send(AppEvent::Outcome(Outcome::failed(format!(
            "Failed to start {} - {}",
            name, e
        ))));
    }
}

/// Spawn a thread that reads crossterm events and forwards key events to the channel.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(TermEvent::Key(key)) => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(_) => {} // ignore mouse, resize, etc.
                Err(e) => {
                    let _ = tx.send(AppEvent::InputError(e));
                    break;
                }
            }
        }
    });
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
///
/// Worker panics are logged only: the menu keeps running and the worker
/// reports a failure outcome.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let on_worker = thread::current()
            .name()
            .is_some_and(|n| n.starts_with(WORKER_PREFIX));
        if on_worker {
            tracing::error!(panic = %panic_info, "operation panicked");
            return;
        }
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the menu until the user quits or picks the terminal item.
///
/// Sets up the terminal, starts the key reader, and loops: draw, block on
/// the next event, dispatch. Operations still running at exit are
/// abandoned.
pub fn run(registry: Registry, config: &Config) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let chrome = Chrome::from(config);

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx.clone());
    let mut session = Session::new(registry, config.idle_status.clone(), tx);

    let result = event_loop(&mut terminal, &mut session, &chrome, &rx);

    finish(result, restore_terminal())
}

/// The loop's error wins over a failed terminal restore.
fn finish(result: io::Result<()>, restored: io::Result<()>) -> io::Result<()> {
    result?;
    restored
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session,
    chrome: &Chrome,
    rx: &mpsc::Receiver<AppEvent>,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(session.state(), session.registry(), chrome, frame))?;

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => return Ok(()), // all senders dropped
        };

        let event = match event {
            AppEvent::Key(key) => match map_key(key) {
                Some(e) => e,
                None => continue,
            },
            AppEvent::Outcome(outcome) => Event::OutcomeReceived(outcome),
            AppEvent::InputError(e) => {
                tracing::error!(error = %e, "terminal input failed");
                return Err(e);
            }
        };

        if session.dispatch(event).is_break() {
            return Ok(());
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::MenuItem;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    struct Counting {
        runs: AtomicUsize,
        outcome: Outcome,
    }

    impl Counting {
        fn new(outcome: Outcome) -> Arc<Self> {
            Arc::new(Counting {
                runs: AtomicUsize::new(0),
                outcome,
            })
        }
    }

    impl Operation for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn run(&self) -> Outcome {
            self.runs.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct Panicking;

    impl Operation for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn run(&self) -> Outcome {
            panic!("operation blew up");
        }
    }

    /// Blocks until released, so a test controls when the outcome lands.
    struct Gated(Arc<Barrier>);

    impl Operation for Gated {
        fn name(&self) -> &str {
            "gated"
        }

        fn run(&self) -> Outcome {
            self.0.wait();
            Outcome::succeeded("released")
        }
    }

    fn session_with(
        ops: Vec<Arc<dyn Operation>>,
    ) -> (Session, mpsc::Receiver<AppEvent>) {
        let mut items: Vec<MenuItem> = ops
            .into_iter()
            .enumerate()
            .map(|(i, op)| MenuItem::operation(format!("Op {}", i), "Working...", op))
            .collect();
        items.push(MenuItem::exit("Exit"));
        let registry = Registry::new(items).unwrap();
        let (tx, rx) = mpsc::channel();
        (Session::new(registry, "Choose", tx), rx)
    }

    fn next_outcome(rx: &mpsc::Receiver<AppEvent>) -> Outcome {
        match rx.recv_timeout(WAIT).expect("worker should report") {
            AppEvent::Outcome(outcome) => outcome,
            other => panic!("Expected Outcome, got {:?}", other),
        }
    }

    // -- Key mapping --

    #[test]
    fn ctrl_c_maps_to_quit() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Event::Quit));
    }

    #[test]
    fn q_and_esc_map_to_quit() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(map_key(q), Some(Event::Quit));
        assert_eq!(map_key(esc), Some(Event::Quit));
    }

    #[test]
    fn vim_keys_map_to_movement() {
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let k = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(map_key(j), Some(Event::MoveDown));
        assert_eq!(map_key(k), Some(Event::MoveUp));
    }

    #[test]
    fn arrow_keys_map_to_movement() {
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(map_key(up), Some(Event::MoveUp));
        assert_eq!(map_key(down), Some(Event::MoveDown));
    }

    #[test]
    fn enter_and_space_activate() {
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(map_key(enter), Some(Event::Activate));
        assert_eq!(map_key(space), Some(Event::Activate));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key), None);
    }

    #[test]
    fn unmapped_key_returns_none() {
        let key = KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE);
        assert_eq!(map_key(key), None);
    }

    // -- Dispatch protocol --

    #[test]
    fn launch_delivers_one_outcome_and_completes_row() {
        let op = Counting::new(Outcome::succeeded("done"));
        let (mut session, rx) = session_with(vec![op.clone() as Arc<dyn Operation>]);

        assert!(session.dispatch(Event::Activate).is_continue());
        assert!(session.state().busy);
        assert_eq!(session.state().status, "Working...");

        let outcome = next_outcome(&rx);
        assert_eq!(outcome.message(), "Success: done");
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

        assert!(session.dispatch(Event::OutcomeReceived(outcome)).is_continue());
        assert!(!session.state().busy);
        assert!(session.state().is_completed(0));
        assert_eq!(op.runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_activation_while_busy_launches_nothing() {
        let gate = Arc::new(Barrier::new(2));
        let first: Arc<dyn Operation> = Arc::new(Gated(gate.clone()));
        let second = Counting::new(Outcome::succeeded("never"));
        let (mut session, rx) = session_with(vec![first, second.clone() as Arc<dyn Operation>]);

        let _ = session.dispatch(Event::Activate);
        let _ = session.dispatch(Event::MoveDown);
        let _ = session.dispatch(Event::Activate);
        assert_eq!(session.state().last_launched, Some(0));

        gate.wait();
        let outcome = next_outcome(&rx);
        let _ = session.dispatch(Event::OutcomeReceived(outcome));

        assert!(session.state().is_completed(0));
        assert!(!session.state().is_completed(1));
        assert_eq!(second.runs.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_operation_reports_failure() {
        let (mut session, rx) = session_with(vec![Arc::new(Panicking) as Arc<dyn Operation>]);

        let _ = session.dispatch(Event::Activate);
        let outcome = next_outcome(&rx);
        assert!(!outcome.is_success());
        assert!(outcome.message().starts_with("Error:"));

        let _ = session.dispatch(Event::OutcomeReceived(outcome));
        assert!(!session.state().busy);
    }

    #[test]
    fn terminal_item_breaks_loop() {
        let (mut session, rx) = session_with(vec![]);
        assert!(session.dispatch(Event::Activate).is_break());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn quit_while_busy_breaks_without_waiting() {
        let gate = Arc::new(Barrier::new(2));
        let gated: Arc<dyn Operation> = Arc::new(Gated(gate.clone()));
        let (mut session, _rx) = session_with(vec![gated]);

        let _ = session.dispatch(Event::Activate);
        assert!(session.dispatch(Event::Quit).is_break());
        assert!(session.state().busy);

        // Let the abandoned worker finish.
        gate.wait();
    }

    #[test]
    fn loop_error_wins_over_restore_error() {
        let looped = io::Error::other("draw failed");
        let restored = io::Error::other("restore failed");
        let err = finish(Err(looped), Err(restored)).unwrap_err();
        assert_eq!(err.to_string(), "draw failed");

        let err = finish(Ok(()), Err(io::Error::other("restore failed"))).unwrap_err();
        assert_eq!(err.to_string(), "restore failed");
        assert!(finish(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn stray_outcome_is_tolerated() {
        let (mut session, _rx) = session_with(vec![]);
        let flow = session.dispatch(Event::OutcomeReceived(Outcome::failed("late")));
        assert!(flow.is_continue());
        assert_eq!(session.state().status, "Error: late");
        assert!(session.state().completed.is_empty());
    }
}
