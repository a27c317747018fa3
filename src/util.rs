//! Miscellaneous utility functions
pub mod lib;

pub(crate) use {
    crate::{
        config::{
            inputoutput::{DataOutputFormat, DataOutputMode},
            prelude::*,
            Cfg,
        },
        source::{
            locate::{self, Provider},
            record::{self, LogLine},
        },
        stats::{
            self,
            convergence::Convergence,
            error_stats::ErrorStats,
            stats_collector::StatsCollector,
            StatType,
        },
        view::{
            canvas::{Canvas, CellStyle},
            dashboard::{Dashboard, KeyAction},
            plot::EnergyPlot,
            terminal::Terminal,
        },
    },
    flume,
    itertools::Itertools,
    owo_colors::OwoColorize,
    regex::Regex,
    ringbuffer::{ConstGenericRingBuffer, RingBuffer},
    serde::{Deserialize, Serialize},
    std::{
        env, fmt, fs,
        io::{self, IsTerminal, Read, Write},
        path::{Path, PathBuf},
        process::ExitCode,
        str::FromStr,
        sync::{
            atomic::{AtomicBool, Ordering},
            Arc, OnceLock,
        },
        thread::{self, Builder, JoinHandle},
        time::{Duration, Instant},
    },
};
