//! Contains the [Controller] that collects stats from the follower and presents them.
//! It also controls the stop flag, which is used to stop the follower if a fatal error occurs, if the config contains a max number of errors to tolerate,
//! or if the user quits the terminal UI.
//!
//! In interactive mode the controller drives the terminal UI, redrawing the [Dashboard] every refresh period.
//! In summary mode it collects everything the follower reads and prints a summary report using the [Report][crate::stats::stats_report::report::Report] struct when the follower is done.
//!
//! Also contains the convenience [init_controller] function, which spawns a thread with the [Controller] running, and returns the thread handle, the channel to send stats to, and the flags.

use crate::util::*;
use flume::TryRecvError;

/// Spawns a thread with the [Controller] running, and returns the thread handle, the channel to send stats to, the stop flag, and the any errors flag.
///
/// The thread returns true if a fatal error was reported.
pub fn init_controller<C: Config + 'static>(
    config: &'static C,
) -> (
    JoinHandle<bool>,
    flume::Sender<StatType>,
    Arc<AtomicBool>,
    Arc<AtomicBool>,
) {
    log::trace!("Initializing controller");
    let mut controller = Controller::new(config);
    let stats_send_chan = controller.send_channel();
    let thread_stop_flag = controller.end_processing_flag();
    let any_errors_flag = controller.any_errors_flag();

    let controller_thread = Builder::new()
        .name("controller".to_string())
        .spawn(move || controller.run())
        .expect("Failed to spawn controller thread");
    (
        controller_thread,
        stats_send_chan,
        thread_stop_flag,
        any_errors_flag,
    )
}

/// The Controller receives stats, shows them live in the terminal UI or summarizes them at the end of execution.
pub struct Controller<C: Config + 'static> {
    stats_collector: StatsCollector,
    /// Time from [Controller] is instantiated, to the follower disconnected its [StatType] producer channel.
    pub processing_time: Instant,
    config: &'static C,
    max_tolerate_errors: u32,
    // The channel where stats are received from the follower.
    stats_recv_chan: flume::Receiver<StatType>,
    // Has to be an option so that it can be set to None when the event loop starts.
    // The summary loop only breaks once every sender is dropped, including this one.
    stats_send_chan: Option<flume::Sender<StatType>>,
    end_processing_flag: Arc<AtomicBool>,
    any_errors_flag: Arc<AtomicBool>,
    // Only in interactive mode
    dashboard: Option<Dashboard>,
}

impl<C: Config + 'static> Controller<C> {
    /// Creates a new [Controller] from a [Config].
    pub fn new(global_config: &'static C) -> Self {
        let (stats_send_chan, stats_recv_chan): (
            flume::Sender<StatType>,
            flume::Receiver<StatType>,
        ) = flume::unbounded();
        Controller {
            stats_collector: StatsCollector::default(),
            processing_time: Instant::now(),
            config: global_config,
            max_tolerate_errors: global_config.max_tolerate_errors(),
            stats_recv_chan,
            stats_send_chan: Some(stats_send_chan),
            end_processing_flag: Arc::new(AtomicBool::new(false)),
            any_errors_flag: Arc::new(AtomicBool::new(false)),
            dashboard: if global_config.summary() {
                None
            } else {
                Some(Dashboard::new(global_config))
            },
        }
    }

    /// Returns a clone of the channel that is used to send stats to the Controller.
    pub fn send_channel(&self) -> flume::Sender<StatType> {
        match self.stats_send_chan.as_ref() {
            Some(send_chan) => send_chan.clone(),
            None => {
                log::error!("Controller send channel is none, most likely it is already running and does not accept new producers");
                panic!("Controller send channel is none, most likely it is already running and does not accept new producers");
            }
        }
    }

    /// Returns a cloned reference to the end processing flag.
    pub fn end_processing_flag(&self) -> Arc<AtomicBool> {
        self.end_processing_flag.clone()
    }

    /// Returns a cloned reference to the any errors flag
    ///
    /// The flag is set if there's any errors in the stream file at the end of processing.
    pub fn any_errors_flag(&self) -> Arc<AtomicBool> {
        self.any_errors_flag.clone()
    }

    /// Returns the stats collected so far.
    pub fn stats_collector(&self) -> &StatsCollector {
        &self.stats_collector
    }

    /// Starts the event loop for the Controller, returns true if a fatal error was reported.
    ///
    /// Blocks until the follower disconnects, or in interactive mode, until the user quits or the stop flag is set.
    pub fn run(&mut self) -> bool {
        // Set the send stats channel to none so that the loop breaks when the follower drops its channel.
        self.stats_send_chan = None;

        if self.dashboard.is_some() {
            if let Err(e) = self.run_interactive() {
                self.update(StatType::Fatal(
                    format!("Terminal UI failed: {e}").into(),
                ));
            }
            // The follower is stopped whatever ended the UI
            self.end_processing_flag.store(true, Ordering::SeqCst);
        } else {
            while let Ok(stats_update) = self.stats_recv_chan.recv() {
                self.update(stats_update);
            }
            self.stats_collector.finalize();
        }

        if let Some(fatal) = self.stats_collector.fatal_err() {
            log::error!("FATAL: {fatal}\nShutting down...");
        }
        if self.stats_collector.any_errors() {
            self.any_errors_flag.store(true, Ordering::SeqCst);
        }

        if self.config.stats_output_mode() == DataOutputMode::Stdout {
            log::info!("Stats output is being piped, skipping report summary printout.");
        } else if self.stats_collector.source_opened() {
            self.print();
        } else {
            log::debug!("Stream file was never opened, skipping report summary printout.");
        }

        let mut fatal = self.stats_collector.fatal_err().is_some();

        // Stats collector will serialize and write out stats if the config specifies it
        let stats_output_mode = self.config.stats_output_mode();
        if stats_output_mode != DataOutputMode::None {
            if let Some(format) = self.config.stats_output_format() {
                if let Err(e) = self.stats_collector.write_stats(&stats_output_mode, format) {
                    log::error!("FATAL: Failed to write stats to {stats_output_mode}: {e}");
                    fatal = true;
                }
            }
        }

        fatal
    }

    /// Drives the terminal UI until the stop flag is set, the user quits, or the follower disconnects.
    fn run_interactive(&mut self) -> io::Result<()> {
        let refresh_period = Duration::from_millis(self.config.refresh_ms());
        let mut terminal = Terminal::enter()?;
        'ui: loop {
            let disconnected = self.drain_pending();
            if disconnected {
                log::trace!("Follower disconnected");
            }
            if disconnected || self.end_processing_flag.load(Ordering::SeqCst) {
                break 'ui;
            }

            for key in terminal.poll_keys()? {
                if let Some(dashboard) = self.dashboard.as_mut() {
                    if dashboard.handle_key(key) == KeyAction::Quit {
                        log::debug!("Quit requested");
                        break 'ui;
                    }
                }
            }

            if let Some(dashboard) = self.dashboard.as_ref() {
                let (cols, rows) = terminal.size();
                terminal.draw(&dashboard.render(&self.stats_collector, cols, rows))?;
            }
            thread::sleep(refresh_period);
        }
        Ok(())
    }

    /// Handles every stat already in the channel without blocking, returns true if the follower disconnected.
    fn drain_pending(&mut self) -> bool {
        loop {
            match self.stats_recv_chan.try_recv() {
                Ok(stats_update) => self.update(stats_update),
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return true,
            }
        }
    }

    fn update(&mut self, stat: StatType) {
        match stat {
            StatType::Reset => {
                log::info!("Stream file (re)opened, discarding previous data");
                self.stats_collector.collect(stat);
            }
            StatType::RunStarted | StatType::Energy(_) => self.stats_collector.collect(stat),
            StatType::Error(msg) => {
                // Stop processing any error messages
                if self.stats_collector.fatal_err().is_some() {
                    log::trace!("Fatal error already seen, ignoring error: {msg}");
                    return;
                }
                self.report_error(&msg);
                self.stats_collector.collect(StatType::Error(msg));

                if self.max_tolerate_errors > 0 {
                    log::trace!("Error count: {}", self.stats_collector.err_count());
                    if self.stats_collector.err_count() == u64::from(self.max_tolerate_errors) {
                        log::trace!("Errors reached maximum tolerated errors, exiting...");
                        self.end_processing_flag.store(true, Ordering::SeqCst);
                    }
                }
            }
            StatType::Fatal(err) => {
                // Stop processing any error messages
                if self.stats_collector.fatal_err().is_some() {
                    log::trace!("Fatal error already seen, ignoring error: {err}");
                    return;
                }
                self.end_processing_flag.store(true, Ordering::SeqCst);
                self.stats_collector.collect(StatType::Fatal(err));
            }
        }
    }

    /// Shows the error in the dashboard in interactive mode, logs it otherwise.
    fn report_error(&mut self, msg: &str) {
        if self.config.mute_errors() {
            return;
        }
        match self.dashboard.as_mut() {
            Some(dashboard) => dashboard.push_error(msg.into()),
            None => stats::display_error(msg, self.config),
        }
    }

    /// Builds and prints the report
    fn print(&self) {
        stats::stats_report::make_report(&self.stats_collector, self.processing_time.elapsed())
            .print();
    }
}
