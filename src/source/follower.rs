//! Contains the [LogFollower] that tails the stream file and sends what it finds to the controller as [StatType]s.
//!
//! The stream file might not exist yet when the follower starts, and a restarted experiment unlinks it and creates a new one.
//! Both are handled by polling: a missing file is retried, and an open file whose link count dropped to 0,
//! or whose path now points to a different file, is abandoned so the new file is opened.
//! Every time a file is opened a [StatType::Reset] is sent, discarding the data of the previous file.

use crate::util::*;
use std::fs::File;

/// Time to wait between polls of a missing file or a file at EOF.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Spawns a thread running a [LogFollower] on `path`.
///
/// If `follow` is false, the file is read once to the end and the thread exits.
pub fn spawn_follower(
    path: PathBuf,
    follow: bool,
    stop_flag: Arc<AtomicBool>,
    stats_send: flume::Sender<StatType>,
) -> io::Result<JoinHandle<()>> {
    Builder::new().name("follower".to_string()).spawn(move || {
        let mut follower = LogFollower::new(path, follow, stop_flag, stats_send);
        follower.run();
    })
}

/// Identifies the file a path points to, to tell when it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileIdentity {
    dev: u64,
    ino: u64,
}

impl FileIdentity {
    #[cfg(unix)]
    fn of(metadata: &fs::Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn of(_metadata: &fs::Metadata) -> Option<Self> {
        None
    }
}

/// Number of hard links to an open file, `None` if the platform doesn't tell.
#[cfg(unix)]
fn link_count(metadata: &fs::Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;
    Some(metadata.nlink())
}

#[cfg(not(unix))]
fn link_count(_metadata: &fs::Metadata) -> Option<u64> {
    None
}

struct OpenLog {
    file: File,
    identity: Option<FileIdentity>,
    /// Bytes of a line that is not terminated yet.
    partial_line: Vec<u8>,
    line_number: u64,
}

/// Reads the stream file, following it as it grows and across experiment restarts.
pub struct LogFollower {
    path: PathBuf,
    follow: bool,
    stop_flag: Arc<AtomicBool>,
    stats_send: flume::Sender<StatType>,
    poll_interval: Duration,
    log: Option<OpenLog>,
    last_open_error: Option<io::ErrorKind>,
    last_read_error: Option<io::ErrorKind>,
}

impl LogFollower {
    /// Creates a new [LogFollower], nothing is opened until [LogFollower::run] is called.
    pub fn new(
        path: PathBuf,
        follow: bool,
        stop_flag: Arc<AtomicBool>,
        stats_send: flume::Sender<StatType>,
    ) -> Self {
        Self {
            path,
            follow,
            stop_flag,
            stats_send,
            poll_interval: POLL_INTERVAL,
            log: None,
            last_open_error: None,
            last_read_error: None,
        }
    }

    /// Set the time to wait between polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Runs until the stop flag is set or the controller hangs up. In read once mode it also returns at the end of the file.
    pub fn run(&mut self) {
        while !self.stop_flag.load(Ordering::SeqCst) {
            let Some(mut log) = self.log.take() else {
                match self.open() {
                    Ok(true) => continue,
                    Ok(false) => {
                        thread::sleep(self.poll_interval);
                        continue;
                    }
                    Err(_) => return,
                }
            };

            if self.follow && self.is_stale(&log) {
                log::info!(
                    "Stream file {} was removed or replaced, waiting for a new one",
                    self.path.display()
                );
                continue;
            }

            match self.read_available(&mut log) {
                Ok(ReadOutcome::Data) => {
                    self.last_read_error = None;
                    self.log = Some(log);
                }
                Ok(ReadOutcome::Eof) if self.follow => {
                    self.last_read_error = None;
                    self.log = Some(log);
                    thread::sleep(self.poll_interval);
                }
                Ok(ReadOutcome::Eof) => {
                    // An unterminated last line is complete once the file is done
                    let partial = std::mem::take(&mut log.partial_line);
                    if !partial.is_empty() {
                        log.line_number += 1;
                        let _ = self.process_line(log.line_number, &partial);
                    }
                    log::debug!("End of stream file reached after {} lines", log.line_number);
                    return;
                }
                Ok(ReadOutcome::Disconnected) => {
                    log::trace!("Controller disconnected, stopping follower");
                    return;
                }
                Err(e) if !self.follow => {
                    let _ = self.emit(StatType::Fatal(
                        format!("Failed reading {}: {e}", self.path.display()).into(),
                    ));
                    return;
                }
                Err(e) => {
                    // Keep the file open and retry later, reporting once per kind of error
                    self.log = Some(log);
                    if self.last_read_error != Some(e.kind()) {
                        self.last_read_error = Some(e.kind());
                        if !self.emit(StatType::Error(
                            format!("Failed reading {}: {e}", self.path.display()).into(),
                        )) {
                            return;
                        }
                    }
                    thread::sleep(self.poll_interval);
                }
            }
        }
        log::trace!("Stopping follower thread");
    }

    /// Try to open the stream file.
    ///
    /// Returns `Ok(true)` if the file was opened, `Ok(false)` if it should be retried later,
    /// and `Err` if the follower should stop.
    fn open(&mut self) -> Result<bool, ()> {
        match File::open(&self.path) {
            Ok(file) => {
                let identity = file.metadata().ok().as_ref().and_then(FileIdentity::of);
                log::info!("Opened stream file {}", self.path.display());
                self.last_open_error = None;
                self.last_read_error = None;
                self.log = Some(OpenLog {
                    file,
                    identity,
                    partial_line: Vec::new(),
                    line_number: 0,
                });
                if self.emit(StatType::Reset) {
                    Ok(true)
                } else {
                    Err(())
                }
            }
            Err(e) if !self.follow => {
                let _ = self.emit(StatType::Fatal(
                    format!("Cannot open stream file {}: {e}", self.path.display()).into(),
                ));
                Err(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                if self.last_open_error != Some(e.kind()) {
                    log::debug!("Waiting for stream file {}", self.path.display());
                    self.last_open_error = Some(e.kind());
                }
                Ok(false)
            }
            Err(e) => {
                // Only report once per kind of error to not flood the controller while waiting
                if self.last_open_error == Some(e.kind()) {
                    return Ok(false);
                }
                self.last_open_error = Some(e.kind());
                if self.emit(StatType::Error(
                    format!("Cannot open stream file {}: {e}", self.path.display()).into(),
                )) {
                    Ok(false)
                } else {
                    Err(())
                }
            }
        }
    }

    /// The open file was unlinked, or the path now points to another file.
    fn is_stale(&self, log: &OpenLog) -> bool {
        if let Ok(metadata) = log.file.metadata() {
            if link_count(&metadata) == Some(0) {
                return true;
            }
        }
        match fs::metadata(&self.path) {
            Ok(metadata) => match (log.identity, FileIdentity::of(&metadata)) {
                (Some(open), Some(current)) => open != current,
                _ => false,
            },
            Err(e) => e.kind() == io::ErrorKind::NotFound,
        }
    }

    fn read_available(&self, log: &mut OpenLog) -> io::Result<ReadOutcome> {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let bytes_read = match log.file.read(&mut buf) {
            Ok(0) => return Ok(ReadOutcome::Eof),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(ReadOutcome::Data),
            Err(e) => return Err(e),
        };

        log.partial_line.extend_from_slice(&buf[..bytes_read]);
        let mut consumed = 0;
        while let Some(newline_pos) = log.partial_line[consumed..]
            .iter()
            .position(|&b| b == b'\n')
        {
            let line_end = consumed + newline_pos;
            log.line_number += 1;
            if !self.process_line(log.line_number, &log.partial_line[consumed..line_end]) {
                return Ok(ReadOutcome::Disconnected);
            }
            consumed = line_end + 1;
        }
        let _ = log.partial_line.drain(..consumed);
        Ok(ReadOutcome::Data)
    }

    /// Returns false if the controller hung up.
    fn process_line(&self, line_number: u64, raw_line: &[u8]) -> bool {
        let line = String::from_utf8_lossy(raw_line);
        match record::parse_line(&line) {
            Ok(LogLine::RunHeader(header)) => {
                log::debug!("Line {line_number}: new run `{header}`");
                self.emit(StatType::RunStarted)
            }
            Ok(LogLine::Iteration { energy }) => self.emit(StatType::Energy(energy)),
            Ok(LogLine::Other) => {
                log::trace!("Line {line_number}: ignored");
                true
            }
            Err(e) => self.emit(StatType::Error(
                format!("{}:{line_number}: {e}", self.path.display()).into(),
            )),
        }
    }

    /// Returns false if the controller hung up.
    fn emit(&self, stat: StatType) -> bool {
        self.stats_send.send(stat).is_ok()
    }
}

enum ReadOutcome {
    Data,
    Eof,
    Disconnected,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use temp_dir::TempDir;

    const TEST_POLL: Duration = Duration::from_millis(5);
    const RECV_TIMEOUT: Duration = Duration::from_secs(5);

    fn read_once(path: PathBuf) -> Vec<StatType> {
        let (send, recv) = flume::unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let mut follower = LogFollower::new(path, false, stop_flag, send).with_poll_interval(TEST_POLL);
        follower.run();
        drop(follower);
        recv.drain().collect()
    }

    fn recv_until(recv: &flume::Receiver<StatType>, expect: &StatType) -> Vec<StatType> {
        let mut seen = Vec::new();
        loop {
            let stat = recv
                .recv_timeout(RECV_TIMEOUT)
                .unwrap_or_else(|e| panic!("Timed out waiting for {expect:?}, got {seen:?}: {e}"));
            let done = &stat == expect;
            seen.push(stat);
            if done {
                return seen;
            }
        }
    }

    #[test]
    fn test_read_once_events() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.child("vqe_stream.json");
        fs::write(
            &path,
            "# run 1\n{'energy': -1.1}\n{'energy': -1.2}\nnoise\n# run 2\n{'energy': -1.3}",
        )
        .unwrap();

        let events = read_once(path);
        assert_eq!(
            events,
            vec![
                StatType::Reset,
                StatType::RunStarted,
                StatType::Energy(-1.1),
                StatType::Energy(-1.2),
                StatType::RunStarted,
                StatType::Energy(-1.3),
            ]
        );
    }

    #[test]
    fn test_read_once_reports_malformed_line_number() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.child("vqe_stream.json");
        fs::write(&path, "# run\n{'energy': 'x'}\n{'energy': -1.0}\n").unwrap();

        let events = read_once(path);
        assert_eq!(events.len(), 4);
        match &events[2] {
            StatType::Error(msg) => assert!(msg.contains(":2:"), "{msg}"),
            other => panic!("Expected an error, got {other:?}"),
        }
        assert_eq!(events[3], StatType::Energy(-1.0));
    }

    #[test]
    fn test_read_once_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let events = read_once(tmp.child("missing.json"));
        assert_eq!(events.len(), 1);
        match &events[0] {
            StatType::Fatal(msg) => assert!(msg.contains("missing.json"), "{msg}"),
            other => panic!("Expected a fatal error, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_waits_for_file_and_partial_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.child("vqe_stream.json");
        let (send, recv) = flume::unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let path = path.clone();
            let stop_flag = stop_flag.clone();
            move || {
                LogFollower::new(path, true, stop_flag, send)
                    .with_poll_interval(TEST_POLL)
                    .run()
            }
        });

        thread::sleep(TEST_POLL * 4);
        let mut file = File::create(&path).unwrap();
        assert_eq!(recv_until(&recv, &StatType::Reset), vec![StatType::Reset]);

        write!(file, "# run 1\n{{'energy': -1.").unwrap();
        file.flush().unwrap();
        assert_eq!(
            recv_until(&recv, &StatType::RunStarted),
            vec![StatType::RunStarted]
        );
        write!(file, "25}}\n").unwrap();
        file.flush().unwrap();
        assert_eq!(
            recv_until(&recv, &StatType::Energy(-1.25)),
            vec![StatType::Energy(-1.25)]
        );

        stop_flag.store(true, Ordering::SeqCst);
        handle.join().unwrap();
    }

    #[test]
    fn test_follow_detects_restarted_experiment() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.child("vqe_stream.json");
        fs::write(&path, "# run 1\n{'energy': -1.0}\n").unwrap();
        let (send, recv) = flume::unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let path = path.clone();
            let stop_flag = stop_flag.clone();
            move || {
                LogFollower::new(path, true, stop_flag, send)
                    .with_poll_interval(TEST_POLL)
                    .run()
            }
        });

        assert_eq!(
            recv_until(&recv, &StatType::Energy(-1.0)),
            vec![
                StatType::Reset,
                StatType::RunStarted,
                StatType::Energy(-1.0)
            ]
        );

        // A restarted `ck run` unlinks the file and writes a new one
        fs::remove_file(&path).unwrap();
        fs::write(&path, "# run 1\n{'energy': -2.0}\n").unwrap();

        assert_eq!(
            recv_until(&recv, &StatType::Energy(-2.0)),
            vec![
                StatType::Reset,
                StatType::RunStarted,
                StatType::Energy(-2.0)
            ]
        );

        stop_flag.store(true, Ordering::SeqCst);
        handle.join().unwrap();
    }

    #[test]
    fn test_read_once_unreadable_path_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.child("vqe_stream.json");
        fs::create_dir(&dir).unwrap();

        let events = read_once(dir);
        assert_eq!(events.len(), 2, "{events:?}");
        assert_eq!(events[0], StatType::Reset);
        match &events[1] {
            StatType::Fatal(msg) => assert!(msg.contains("Failed reading"), "{msg}"),
            other => panic!("Expected a fatal error, got {other:?}"),
        }
    }

    #[test]
    fn test_follow_unreadable_path_reports_once() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.child("vqe_stream.json");
        fs::create_dir(&dir).unwrap();
        let (send, recv) = flume::unbounded();
        let stop_flag = Arc::new(AtomicBool::new(false));

        let handle = thread::spawn({
            let stop_flag = stop_flag.clone();
            move || {
                LogFollower::new(dir, true, stop_flag, send)
                    .with_poll_interval(TEST_POLL)
                    .run()
            }
        });

        // Many polls of the same failing read
        thread::sleep(TEST_POLL * 20);
        stop_flag.store(true, Ordering::SeqCst);
        handle.join().unwrap();

        let events: Vec<StatType> = recv.drain().collect();
        assert_eq!(events.len(), 2, "{events:?}");
        assert_eq!(events[0], StatType::Reset);
        assert!(matches!(events[1], StatType::Error(_)), "{events:?}");
    }

    #[test]
    fn test_follower_stops_when_controller_hangs_up() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.child("vqe_stream.json");
        fs::write(&path, "# run 1\n{'energy': -1.0}\n").unwrap();
        let (send, recv) = flume::unbounded();
        drop(recv);
        let stop_flag = Arc::new(AtomicBool::new(false));

        // Would loop forever if the disconnect was not noticed
        LogFollower::new(path, true, stop_flag, send)
            .with_poll_interval(TEST_POLL)
            .run();
    }
}
