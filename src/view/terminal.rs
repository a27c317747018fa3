//! Terminal control for the interactive UI: raw input, the alternate screen and the terminal size.
//!
//! The [Terminal] guard restores the terminal when dropped, also when unwinding from a panic.

use crate::util::*;
use std::sync::Mutex;

const ENTER_ALTERNATE_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALTERNATE_SCREEN: &str = "\x1b[?1049l";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const RESET_STYLE: &str = "\x1b[0m";

/// Used when the size can't be queried from the terminal or the environment.
pub const FALLBACK_SIZE: (usize, usize) = (80, 24);

/// What has to be undone to give the terminal back, set while a [Terminal] is active.
///
/// Kept in a static so the stop signal handler can restore the terminal before a forced exit.
static ACTIVE_STATE: Mutex<Option<SavedState>> = Mutex::new(None);

struct SavedState {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,
    /// Logging to stderr would draw over the UI, it is off until the terminal is restored.
    log_level: log::LevelFilter,
}

/// Guard that keeps the terminal in the state needed by the interactive UI.
pub struct Terminal {
    stdout: io::Stdout,
}

impl Terminal {
    /// Switch stdin to non-blocking raw input and show the alternate screen.
    pub fn enter() -> io::Result<Self> {
        let mut terminal = Self {
            stdout: io::stdout(),
        };
        let saved = SavedState {
            #[cfg(unix)]
            original_termios: Some(sys::enable_raw_input()?),
            log_level: log::max_level(),
        };
        log::trace!("Entering alternate screen, logging is off until it is left");
        set_active_state(saved);
        write!(
            terminal.stdout,
            "{ENTER_ALTERNATE_SCREEN}{HIDE_CURSOR}{CLEAR_SCREEN}"
        )?;
        terminal.stdout.flush()?;
        Ok(terminal)
    }

    /// The size of the terminal as `(columns, rows)`.
    ///
    /// Asks the terminal first, then checks the `COLUMNS` and `LINES` environment variables,
    /// and finally falls back to [FALLBACK_SIZE].
    pub fn size(&self) -> (usize, usize) {
        #[cfg(unix)]
        if let Some(size) = sys::window_size() {
            return size;
        }
        size_from_env(env::var("COLUMNS").ok(), env::var("LINES").ok()).unwrap_or(FALLBACK_SIZE)
    }

    /// Returns all bytes typed since the last call, without blocking.
    pub fn poll_keys(&mut self) -> io::Result<Vec<u8>> {
        #[cfg(unix)]
        {
            sys::read_available()
        }
        #[cfg(not(unix))]
        {
            Ok(Vec::new())
        }
    }

    /// Draw a frame from the top left corner of the screen.
    pub fn draw(&mut self, frame: &[String]) -> io::Result<()> {
        let mut lock = self.stdout.lock();
        write!(lock, "{CURSOR_HOME}")?;
        let last_idx = frame.len().saturating_sub(1);
        for (idx, line) in frame.iter().enumerate() {
            // A newline after the last row would scroll the screen
            if idx == last_idx {
                write!(lock, "{line}{RESET_STYLE}")?;
            } else {
                write!(lock, "{line}{RESET_STYLE}\r\n")?;
            }
        }
        lock.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if restore_active_terminal(&mut self.stdout) {
            log::trace!("Left alternate screen");
        }
    }
}

fn set_active_state(saved: SavedState) {
    let mut active = ACTIVE_STATE
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *active = Some(saved);
    log::set_max_level(log::LevelFilter::Off);
}

/// Give the terminal back if a [Terminal] is active: show the cursor, leave the alternate screen and restore the input settings.
///
/// Returns false if there was nothing to restore. Only the first call after [Terminal::enter] does anything,
/// so this can be called from the stop signal handler while the [Terminal] guard is still alive.
pub fn restore_active_terminal(out: &mut impl Write) -> bool {
    let saved = ACTIVE_STATE
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .take();
    let Some(saved) = saved else {
        return false;
    };
    let _ = write!(out, "{RESET_STYLE}{SHOW_CURSOR}{LEAVE_ALTERNATE_SCREEN}");
    let _ = out.flush();
    log::set_max_level(saved.log_level);
    #[cfg(unix)]
    if let Some(original) = saved.original_termios {
        if let Err(e) = sys::restore(&original) {
            log::warn!("Failed to restore terminal settings: {e}");
        }
    }
    true
}

/// Parse the terminal size from the `COLUMNS` and `LINES` environment variables.
pub fn size_from_env(columns: Option<String>, lines: Option<String>) -> Option<(usize, usize)> {
    let cols = columns?.trim().parse::<usize>().ok()?;
    let rows = lines?.trim().parse::<usize>().ok()?;
    (cols > 0 && rows > 0).then_some((cols, rows))
}

#[cfg(unix)]
mod sys {
    use std::io;

    pub(super) fn enable_raw_input() -> io::Result<libc::termios> {
        // SAFETY: termios is a plain C struct that tcgetattr fills in completely
        let mut original: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: valid fd and pointer to an owned termios
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        let mut raw = original;
        // ISIG stays on so Ctrl+C still reaches the signal handler
        raw.c_lflag &= !(libc::ICANON | libc::ECHO);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 0;
        // SAFETY: valid fd and pointer to an initialized termios
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, &raw) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(original)
    }

    pub(super) fn restore(original: &libc::termios) -> io::Result<()> {
        // SAFETY: valid fd and pointer to an initialized termios
        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub(super) fn window_size() -> Option<(usize, usize)> {
        // SAFETY: winsize is a plain C struct
        let mut size: libc::winsize = unsafe { std::mem::zeroed() };
        // SAFETY: TIOCGWINSZ writes a winsize through the pointer
        let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut size) };
        (rc == 0 && size.ws_col > 0 && size.ws_row > 0)
            .then_some((usize::from(size.ws_col), usize::from(size.ws_row)))
    }

    pub(super) fn read_available() -> io::Result<Vec<u8>> {
        let mut keys = Vec::new();
        let mut buf = [0_u8; 64];
        loop {
            // SAFETY: reads at most buf.len() bytes into buf
            let n = unsafe {
                libc::read(
                    libc::STDIN_FILENO,
                    buf.as_mut_ptr().cast::<libc::c_void>(),
                    buf.len(),
                )
            };
            match n {
                n if n > 0 => keys.extend_from_slice(&buf[..n as usize]),
                0 => return Ok(keys),
                _ => {
                    let err = io::Error::last_os_error();
                    return match err.kind() {
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(keys),
                        _ => Err(err),
                    };
                }
            }
        }
    }
}
