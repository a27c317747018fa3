//! Contains the Trait [DisplayOpt] for all options of how the convergence is presented

/// Energy axis range used before any data widens it.
pub const DEFAULT_Y_RANGE: (f64, f64) = (-1.7, -1.6);

/// Trait for all display options set by the user.
pub trait DisplayOpt {
    /// Read the stream file once and print a summary, instead of following it in the terminal UI.
    fn summary(&self) -> bool;
    /// Refresh period of the terminal UI in milliseconds.
    fn refresh_ms(&self) -> u64;
    /// Initial `(min, max)` of the energy axis.
    fn y_range(&self) -> (f64, f64);
    /// Mark previous runs with their run number instead of a dot.
    fn numerical_markers(&self) -> bool;
    /// Start with colours enabled.
    fn color(&self) -> bool;
}

impl<T> DisplayOpt for &T
where
    T: DisplayOpt,
{
    fn summary(&self) -> bool {
        (*self).summary()
    }
    fn refresh_ms(&self) -> u64 {
        (*self).refresh_ms()
    }
    fn y_range(&self) -> (f64, f64) {
        (*self).y_range()
    }
    fn numerical_markers(&self) -> bool {
        (*self).numerical_markers()
    }
    fn color(&self) -> bool {
        (*self).color()
    }
}

impl<T> DisplayOpt for Box<T>
where
    T: DisplayOpt,
{
    fn summary(&self) -> bool {
        (**self).summary()
    }
    fn refresh_ms(&self) -> u64 {
        (**self).refresh_ms()
    }
    fn y_range(&self) -> (f64, f64) {
        (**self).y_range()
    }
    fn numerical_markers(&self) -> bool {
        (**self).numerical_markers()
    }
    fn color(&self) -> bool {
        (**self).color()
    }
}

impl<T> DisplayOpt for std::sync::Arc<T>
where
    T: DisplayOpt,
{
    fn summary(&self) -> bool {
        (**self).summary()
    }
    fn refresh_ms(&self) -> u64 {
        (**self).refresh_ms()
    }
    fn y_range(&self) -> (f64, f64) {
        (**self).y_range()
    }
    fn numerical_markers(&self) -> bool {
        (**self).numerical_markers()
    }
    fn color(&self) -> bool {
        (**self).color()
    }
}
