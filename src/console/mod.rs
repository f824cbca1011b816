//! Console adapter: owns the terminal for the length of a session.
//!
//! The terminal is switched to raw mode on the alternate screen with the
//! cursor hidden and line wrap off; mouse capture is optional. Every draw
//! call goes through a cached colour pair. Dropping the console restores the terminal,
//! so an early return or a panic never leaves it in raw mode.

pub mod color;
pub mod event;
#[cfg(test)]
pub(crate) mod script;

use std::io::{self, BufWriter, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{self, MoveTo},
    event::{self as term_event, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Colors, Print, ResetColor, SetColors},
    terminal::{self, Clear, ClearType, DisableLineWrap, EnableLineWrap},
};

pub use color::{ColorPairs, Ink, PairId};
pub use event::{ConsoleEvent, Flow, KeyDelay, MouseButtons, MouseReport, MouseTracker};

/// Callbacks driven by [`run_loop`]. Unimplemented ones keep the
/// loop going.
pub trait EventHandler {
    fn on_key(&mut self, _screen: &mut dyn Screen, _key: KeyEvent) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    fn on_mouse(&mut self, _screen: &mut dyn Screen, _report: MouseReport) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    fn on_resize(&mut self, _screen: &mut dyn Screen, _rows: u16, _cols: u16) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }

    fn on_idle(&mut self, _screen: &mut dyn Screen) -> anyhow::Result<Flow> {
        Ok(Flow::Continue)
    }
}

/// A surface text can be drawn on. The console is one; tests record into
/// another.
pub trait Canvas {
    fn draw_text(&mut self, row: u16, col: u16, text: &str, fg: Ink, bg: Ink) -> io::Result<()>;
}

/// What the game needs from a terminal besides drawing: size, refresh and
/// input.
pub trait Screen: Canvas {
    fn width(&self) -> u16;
    fn height(&self) -> u16;
    fn clear(&mut self) -> io::Result<()>;
    fn refresh(&mut self) -> io::Result<()>;
    fn beep(&mut self) -> io::Result<()>;

    /// Write `text` with the default colours.
    fn print(&mut self, row: u16, col: u16, text: &str) -> io::Result<()>;

    /// See [`KeyDelay::from_threshold`].
    fn set_key_delay(&mut self, threshold_ms: i32);

    /// Read one event under the current key delay. `Some(blocking)` switches
    /// the delay first.
    fn poll_key(&mut self, blocking: Option<bool>) -> io::Result<ConsoleEvent>;
}

/// Poll, dispatch, sleep; until a handler answers [`Flow::Stop`].
pub fn run_loop<H: EventHandler>(screen: &mut dyn Screen, poll_interval: Duration, handler: &mut H) -> anyhow::Result<()> {
    loop {
        screen.set_key_delay(0);
        let flow = match screen.poll_key(None)? {
            ConsoleEvent::Resize { rows, cols } => handler.on_resize(screen, rows, cols)?,
            ConsoleEvent::Mouse(report) => handler.on_mouse(screen, report)?,
            ConsoleEvent::Key(key) => handler.on_key(screen, key)?,
            ConsoleEvent::Idle => handler.on_idle(screen)?,
        };
        if flow == Flow::Stop {
            return Ok(());
        }
        thread::sleep(poll_interval);
    }
}

pub struct Console {
    writer: BufWriter<Stdout>,
    width: u16,
    height: u16,
    fore: Ink,
    back: Ink,
    pairs: ColorPairs,
    delay: KeyDelay,
    mouse: MouseTracker,
    mouse_capture: bool,
    /// A resize seen while flushing typeahead, delivered on the next read.
    pending_resize: Option<(u16, u16)>,
    active: bool,
}

impl Console {
    /// Take over the terminal. `fore`/`back` form the default pair. Mouse
    /// events are only reported with `capture_mouse`.
    pub fn open(fore: Ink, back: Ink, capture_mouse: bool) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut console = Console {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            width: 0,
            height: 0,
            fore,
            back,
            pairs: ColorPairs::new(fore, back),
            delay: KeyDelay::Immediate,
            mouse: MouseTracker::default(),
            mouse_capture: capture_mouse,
            pending_resize: None,
            active: true,
        };
        execute!(
            console.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        if capture_mouse {
            execute!(console.writer, EnableMouseCapture)?;
        }

        let (w, h) = terminal::size().unwrap_or((80, 24));
        console.width = w;
        console.height = h;
        Ok(console)
    }

    /// Give the terminal back. Safe to call more than once.
    pub fn shutdown(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        restore(&mut self.writer, self.mouse_capture, terminal::disable_raw_mode)
    }

    // ── Screen ──

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        queue!(self.writer, cursor::Hide)
    }

    pub fn show_cursor(&mut self) -> io::Result<()> {
        queue!(self.writer, cursor::Show)
    }

    pub fn put_cursor(&mut self, row: u16, col: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(col, row))
    }

    pub fn set_fore_color(&mut self, ink: Ink) {
        self.fore = ink;
    }

    pub fn set_back_color(&mut self, ink: Ink) {
        self.back = ink;
    }

    pub fn color_pairs(&self) -> &ColorPairs {
        &self.pairs
    }

    fn pair_colors(&mut self, fg: Ink, bg: Ink) -> Colors {
        let id = self.pairs.resolve(fg, bg);
        self.pairs.colors(id)
            .unwrap_or_else(|| Colors::new(fg.to_color(), bg.to_color()))
    }

    // ── Input ──

    fn read_event(&mut self) -> io::Result<ConsoleEvent> {
        loop {
            let ready = match self.delay {
                KeyDelay::Blocking => true,
                KeyDelay::Immediate => term_event::poll(Duration::ZERO)?,
                KeyDelay::Timeout(wait) => term_event::poll(wait)?,
            };
            if !ready {
                return Ok(ConsoleEvent::Idle);
            }
            if let Some(event) = self.translate(term_event::read()?) {
                return Ok(event);
            }
            if self.delay != KeyDelay::Blocking {
                return Ok(ConsoleEvent::Idle);
            }
        }
    }

    fn translate(&mut self, event: Event) -> Option<ConsoleEvent> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Some(ConsoleEvent::Key(key)),
            Event::Mouse(mouse) => self.mouse.decode(&mouse, Instant::now()).map(ConsoleEvent::Mouse),
            Event::Resize(cols, rows) => Some(self.resized(cols, rows)),
            _ => None,
        }
    }

    fn resized(&mut self, cols: u16, rows: u16) -> ConsoleEvent {
        self.width = cols;
        self.height = rows;
        ConsoleEvent::Resize { rows, cols }
    }

    fn flush_input(&mut self) -> io::Result<()> {
        while term_event::poll(Duration::ZERO)? {
            if let Event::Resize(cols, rows) = term_event::read()? {
                self.pending_resize = Some((cols, rows));
            }
        }
        Ok(())
    }
}

impl Canvas for Console {
    /// Write `text` at (row, col). Anything past the right edge or below the
    /// last row is dropped; the bottom-right cell is written without
    /// scrolling since line wrap is off.
    fn draw_text(&mut self, row: u16, col: u16, text: &str, fg: Ink, bg: Ink) -> io::Result<()> {
        let Some(clipped) = clip(text, row, col, self.width, self.height) else {
            return Ok(());
        };
        let colors = self.pair_colors(fg, bg);
        queue!(self.writer, MoveTo(col, row), SetColors(colors), Print(clipped))
    }
}

impl Screen for Console {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn clear(&mut self) -> io::Result<()> {
        let colors = self.pair_colors(self.fore, self.back);
        queue!(self.writer, SetColors(colors), Clear(ClearType::All))
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn beep(&mut self) -> io::Result<()> {
        queue!(self.writer, Print('\x07'))?;
        self.writer.flush()
    }

    fn print(&mut self, row: u16, col: u16, text: &str) -> io::Result<()> {
        let (fore, back) = (self.fore, self.back);
        self.draw_text(row, col, text, fore, back)
    }

    fn set_key_delay(&mut self, threshold_ms: i32) {
        self.delay = KeyDelay::from_threshold(threshold_ms);
    }

    /// Any input still buffered after the read is thrown away so held keys
    /// don't pile up; a resize among it is kept for the next call.
    fn poll_key(&mut self, blocking: Option<bool>) -> io::Result<ConsoleEvent> {
        if let Some(blocking) = blocking {
            self.delay = KeyDelay::from_blocking(blocking);
        }
        if let Some((cols, rows)) = self.pending_resize.take() {
            return Ok(self.resized(cols, rows));
        }
        let event = self.read_event()?;
        self.flush_input()?;
        Ok(event)
    }
}

impl Drop for Console {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

/// Undo what [`Console::open`] switched on. `leave_raw` runs even when
/// writing the escape sequences fails.
fn restore<W: Write>(
    writer: &mut W,
    mouse_capture: bool,
    leave_raw: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    let screen = reset_screen(writer, mouse_capture);
    let raw = leave_raw();
    screen.and(raw)
}

fn reset_screen<W: Write>(writer: &mut W, mouse_capture: bool) -> io::Result<()> {
    if mouse_capture {
        queue!(writer, DisableMouseCapture)?;
    }
    execute!(
        writer,
        ResetColor,
        EnableLineWrap,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )
}

/// The part of `text` that fits on screen when written at (row, col).
fn clip(text: &str, row: u16, col: u16, width: u16, height: u16) -> Option<&str> {
    if row >= height || col >= width {
        return None;
    }
    let room = (width - col) as usize;
    let end = text.char_indices().nth(room).map_or(text.len(), |(i, _)| i);
    Some(&text[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::script::{char_key, ScriptedScreen};
    use crossterm::event::KeyCode;

    /// Counts callbacks; stops on the key `stop_on`, or after `idle_limit`
    /// idle polls.
    #[derive(Default)]
    struct Tally {
        keys: Vec<char>,
        mice: usize,
        resizes: Vec<(u16, u16)>,
        idles: usize,
        stop_on: Option<char>,
        idle_limit: usize,
    }

    impl EventHandler for Tally {
        fn on_key(&mut self, _screen: &mut dyn Screen, key: KeyEvent) -> anyhow::Result<Flow> {
            let KeyCode::Char(c) = key.code else { return Ok(Flow::Continue) };
            self.keys.push(c);
            Ok(if self.stop_on == Some(c) { Flow::Stop } else { Flow::Continue })
        }

        fn on_mouse(&mut self, _screen: &mut dyn Screen, _report: MouseReport) -> anyhow::Result<Flow> {
            self.mice += 1;
            Ok(Flow::Continue)
        }

        fn on_resize(&mut self, _screen: &mut dyn Screen, rows: u16, cols: u16) -> anyhow::Result<Flow> {
            self.resizes.push((rows, cols));
            Ok(Flow::Continue)
        }

        fn on_idle(&mut self, _screen: &mut dyn Screen) -> anyhow::Result<Flow> {
            self.idles += 1;
            Ok(if self.idles == self.idle_limit { Flow::Stop } else { Flow::Continue })
        }
    }

    // ── Event loop ──

    #[test]
    fn loop_dispatches_until_a_handler_stops_it() {
        let click = MouseReport { row: 3, col: 4, buttons: MouseButtons::BUTTON1_CLICKED };
        let mut screen = ScriptedScreen::new(80, 24, [
            ConsoleEvent::Resize { rows: 30, cols: 100 },
            ConsoleEvent::Mouse(click),
            char_key('a'),
            char_key('q'),
            char_key('z'),
        ]);
        let mut tally = Tally { stop_on: Some('q'), ..Tally::default() };
        run_loop(&mut screen, Duration::ZERO, &mut tally).unwrap();

        assert_eq!(tally.resizes, vec![(30, 100)]);
        assert_eq!(tally.mice, 1);
        assert_eq!(tally.keys, vec!['a', 'q']);
        assert_eq!(screen.remaining(), 1);
    }

    #[test]
    fn loop_polls_without_blocking() {
        let mut screen = ScriptedScreen::new(80, 24, Vec::new());
        screen.set_key_delay(-1);
        let mut tally = Tally { idle_limit: 3, ..Tally::default() };
        run_loop(&mut screen, Duration::ZERO, &mut tally).unwrap();

        assert_eq!(tally.idles, 3);
        assert_eq!(screen.polls, vec![KeyDelay::Immediate; 3]);
    }

    #[test]
    fn handler_error_ends_the_loop() {
        struct Failing;
        impl EventHandler for Failing {
            fn on_key(&mut self, _screen: &mut dyn Screen, _key: KeyEvent) -> anyhow::Result<Flow> {
                anyhow::bail!("level file vanished")
            }
        }
        let mut screen = ScriptedScreen::new(80, 24, [char_key('x'), char_key('y')]);
        let err = run_loop(&mut screen, Duration::ZERO, &mut Failing).unwrap_err();
        assert_eq!(err.to_string(), "level file vanished");
        assert_eq!(screen.remaining(), 1);
    }

    // ── Teardown ──

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn raw_mode_is_left_even_if_the_screen_cannot_be_reset() {
        let mut left_raw = false;
        let result = restore(&mut ClosedPipe, false, || {
            left_raw = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(left_raw);
    }

    #[test]
    fn raw_mode_error_is_reported() {
        let mut out = Vec::new();
        let result = restore(&mut out, false, || Err(io::Error::other("tcsetattr")));
        assert_eq!(result.unwrap_err().to_string(), "tcsetattr");
        assert!(!out.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn mouse_reporting_is_turned_off_only_if_it_was_on() {
        let mut out = Vec::new();
        restore(&mut out, false, || Ok(())).unwrap();
        assert!(!String::from_utf8_lossy(&out).contains("?1000l"));

        let mut out = Vec::new();
        restore(&mut out, true, || Ok(())).unwrap();
        assert!(String::from_utf8_lossy(&out).contains("?1000l"));
    }

    // ── Clipping ──

    #[test]
    fn clip_keeps_text_that_fits() {
        assert_eq!(clip("abc", 0, 0, 10, 5), Some("abc"));
    }

    #[test]
    fn clip_cuts_at_right_edge() {
        assert_eq!(clip("abcdef", 1, 7, 10, 5), Some("abc"));
    }

    #[test]
    fn clip_allows_bottom_right_cell() {
        assert_eq!(clip("xy", 4, 9, 10, 5), Some("x"));
    }

    #[test]
    fn clip_drops_offscreen_positions() {
        assert_eq!(clip("abc", 5, 0, 10, 5), None);
        assert_eq!(clip("abc", 0, 10, 10, 5), None);
    }

    #[test]
    fn clip_counts_chars_not_bytes() {
        assert_eq!(clip("☻♦♦", 0, 8, 10, 5), Some("☻♦"));
    }
}
