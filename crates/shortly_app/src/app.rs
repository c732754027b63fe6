use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use shortly_core::{update, AppState, Msg};
use shortly_engine::{EngineHandle, FileStorage, KeyValueStorage, LinkStore};
use shortly_logging::{shortly_info, shortly_warn};

use crate::clipboard::{ClipboardWriter, SystemClipboard};
use crate::commands::{self, UserCommand, HELP};
use crate::config::AppConfig;
use crate::effects::{self, EffectRunner};
use crate::render;

/// Everything the main loop reacts to, in arrival order.
#[derive(Debug)]
pub enum LoopEvent {
    Msg(Msg),
    Line(String),
    Alert(String),
    InputClosed,
}

pub fn run(config: AppConfig, data_dir: PathBuf) -> anyhow::Result<()> {
    shortly_info!("Starting with data dir {:?}", data_dir);
    let store = LinkStore::new(FileStorage::new(&data_dir));

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let (engine_tx, engine_rx) = mpsc::channel();
    let engine = EngineHandle::new(config.shorten_settings(), engine_tx)
        .context("failed to start the shortening engine")?;
    effects::spawn_engine_forwarder(engine_rx, event_tx.clone());
    spawn_ticker(event_tx.clone());
    spawn_stdin_reader(event_tx.clone());

    let mut runner = EffectRunner::new(engine, store, SystemClipboard::new(), event_tx);
    let restored = runner.load_links();
    let mut shell = Shell::new(runner, io::stdout());
    writeln!(shell.out, "{HELP}\n")?;
    shell.dispatch(Msg::RestoreLinks(restored))?;
    shell.run(event_rx)?;

    if shell.state.is_submitting() {
        shortly_warn!("Exiting with a shortening request still in flight");
    }
    Ok(())
}

// Background tick to expire copy feedback.
fn spawn_ticker(events: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let interval = Duration::from_millis(250);
        while events
            .send(LoopEvent::Msg(Msg::Tick { now: Instant::now() }))
            .is_ok()
        {
            thread::sleep(interval);
        }
    });
}

fn spawn_stdin_reader(events: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(LoopEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    shortly_warn!("Failed to read stdin: {}", err);
                    break;
                }
            }
        }
        let _ = events.send(LoopEvent::InputClosed);
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

struct Shell<S, C, W> {
    state: AppState,
    runner: EffectRunner<S, C>,
    out: W,
    input_closed: bool,
}

impl<S, C, W> Shell<S, C, W>
where
    S: KeyValueStorage,
    C: ClipboardWriter,
    W: Write,
{
    fn new(runner: EffectRunner<S, C>, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
            input_closed: false,
        }
    }

    /// Processes events until the user quits, or input has ended and no
    /// submission is left to wait for.
    fn run(&mut self, events: mpsc::Receiver<LoopEvent>) -> io::Result<()> {
        for event in events {
            match event {
                LoopEvent::Msg(msg) => self.dispatch(msg)?,
                LoopEvent::Line(line) => {
                    if self.handle_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                LoopEvent::Alert(message) => eprintln!("*** {message} ***"),
                LoopEvent::InputClosed => self.input_closed = true,
            }
            if self.input_closed && !self.state.is_submitting() {
                break;
            }
        }
        self.out.flush()
    }

    fn handle_line(&mut self, line: &str) -> io::Result<Flow> {
        let command = match commands::parse(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(self.out, "  {err}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            UserCommand::Quit => return Ok(Flow::Quit),
            UserCommand::Help => writeln!(self.out, "{HELP}")?,
            UserCommand::List => self.render()?,
            UserCommand::Shorten(text) => {
                if self.state.is_submitting() {
                    writeln!(self.out, "  Still shortening the previous link...")?;
                } else {
                    let edited = self.apply(Msg::InputChanged(text));
                    let submitted = self.apply(Msg::SubmitClicked);
                    if edited || submitted {
                        self.render()?;
                    }
                }
            }
            UserCommand::Copy(row) => match self.state.link_id_at(row - 1) {
                Some(link_id) => self.dispatch(Msg::CopyClicked { link_id })?,
                None => writeln!(self.out, "  No link in row {row}")?,
            },
            UserCommand::Delete(row) => match self.state.link_id_at(row - 1) {
                Some(link_id) => self.dispatch(Msg::DeleteClicked { link_id })?,
                None => writeln!(self.out, "  No link in row {row}")?,
            },
        }
        Ok(Flow::Continue)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        if self.apply(msg) {
            self.render()?;
        }
        Ok(())
    }

    /// Runs one update and its effects; returns whether the view changed.
    fn apply(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let dirty = state.consume_dirty();
        self.state = state;
        self.runner.enqueue(effects);
        dirty
    }

    fn render(&mut self) -> io::Result<()> {
        for line in render::render(&self.state.view()) {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shortly_core::{LinkCollection, LinkRecord};
    use shortly_engine::{MemoryStorage, ShortenError, Shortener};

    use super::*;
    use crate::clipboard::fake::FakeClipboard;

    struct EchoShortener;

    #[async_trait::async_trait]
    impl Shortener for EchoShortener {
        async fn shorten(&self, raw_url: &str) -> Result<String, ShortenError> {
            Ok(format!("https://short.test/{}", raw_url.len()))
        }
    }

    type TestShell = Shell<MemoryStorage, FakeClipboard, Vec<u8>>;

    fn shell(
        clipboard: FakeClipboard,
    ) -> (TestShell, mpsc::Sender<LoopEvent>, mpsc::Receiver<LoopEvent>) {
        shell_with_links(clipboard, LinkCollection::new())
    }

    /// Shell restored from storage that already holds `stored`, as at start-up.
    fn shell_with_links(
        clipboard: FakeClipboard,
        stored: LinkCollection,
    ) -> (TestShell, mpsc::Sender<LoopEvent>, mpsc::Receiver<LoopEvent>) {
        let (event_tx, event_rx) = mpsc::channel();
        let (engine_tx, engine_rx) = mpsc::channel();
        let engine = EngineHandle::with_shortener(Arc::new(EchoShortener), engine_tx).unwrap();
        effects::spawn_engine_forwarder(engine_rx, event_tx.clone());
        let store = LinkStore::new(MemoryStorage::new());
        if !stored.is_empty() {
            store.save(&stored);
        }
        let mut runner = EffectRunner::new(engine, store, clipboard, event_tx.clone());
        let restored = runner.load_links();
        let mut shell = Shell::new(runner, Vec::new());
        shell.dispatch(Msg::RestoreLinks(restored)).unwrap();
        (shell, event_tx, event_rx)
    }

    fn output(shell: &TestShell) -> String {
        String::from_utf8_lossy(&shell.out).into_owned()
    }

    #[test]
    fn piped_input_waits_for_in_flight_submission() {
        let (mut shell, tx, rx) = shell(FakeClipboard::default());
        tx.send(LoopEvent::Line("example.com".to_string())).unwrap();
        tx.send(LoopEvent::InputClosed).unwrap();

        shell.run(rx).unwrap();

        assert!(!shell.state.is_submitting());
        let expected = LinkCollection::from(vec![LinkRecord::new(
            "example.com",
            "https://short.test/11",
        )]);
        assert_eq!(shell.state.collection(), expected);
        assert_eq!(shell.runner.store().load(), expected);
        assert!(output(&shell).contains("1. example.com  ->  https://short.test/11  [Copy]"));
    }

    #[test]
    fn copy_and_delete_by_row_number() {
        let clipboard = FakeClipboard::default();
        let (mut shell, tx, rx) = shell_with_links(
            clipboard.clone(),
            LinkCollection::from(vec![
                LinkRecord::new("a.com", "https://s/a"),
                LinkRecord::new("b.com", "https://s/b"),
            ]),
        );

        tx.send(LoopEvent::Line("copy 2".to_string())).unwrap();
        tx.send(LoopEvent::Line("delete 1".to_string())).unwrap();
        tx.send(LoopEvent::Line("delete 9".to_string())).unwrap();
        tx.send(LoopEvent::Line("quit".to_string())).unwrap();
        shell.run(rx).unwrap();

        assert_eq!(*clipboard.writes.lock().unwrap(), vec!["https://s/b"]);
        let expected = LinkCollection::from(vec![LinkRecord::new("b.com", "https://s/b")]);
        assert_eq!(shell.state.collection(), expected);
        assert_eq!(shell.runner.store().load(), expected);
        let out = output(&shell);
        assert!(out.contains("No link in row 9"));
    }

    #[test]
    fn stored_list_tracks_adds_and_deletes_in_order() {
        let (mut shell, tx, rx) = shell_with_links(
            FakeClipboard::default(),
            LinkCollection::from(vec![LinkRecord::new("a.com", "https://s/a")]),
        );

        // The delete lands before or after the shorten result; either way
        // row 1 is a.com when it runs.
        tx.send(LoopEvent::Line("bb.com".to_string())).unwrap();
        tx.send(LoopEvent::Line("delete 1".to_string())).unwrap();
        tx.send(LoopEvent::InputClosed).unwrap();
        shell.run(rx).unwrap();

        let expected = LinkCollection::from(vec![LinkRecord::new(
            "bb.com",
            "https://short.test/6",
        )]);
        assert_eq!(shell.state.collection(), expected);
        assert_eq!(shell.runner.store().load(), expected);
    }

    #[test]
    fn empty_line_shows_validation_message() {
        let (mut shell, tx, rx) = shell(FakeClipboard::default());
        tx.send(LoopEvent::Line(String::new())).unwrap();
        tx.send(LoopEvent::InputClosed).unwrap();

        shell.run(rx).unwrap();

        assert!(output(&shell).contains("! Please add a link"));
        assert_eq!(shell.state.link_count(), 0);
    }
}
