//! Contains the terminal UI: the [Dashboard][dashboard::Dashboard] layout with its
//! [EnergyPlot][plot::EnergyPlot], drawn to a [Canvas][canvas::Canvas] and shown on the [Terminal][terminal::Terminal].

pub mod canvas;
pub mod dashboard;
pub mod plot;
pub mod terminal;
