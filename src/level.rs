#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Firehose diagnostics, below everything else
    Paranoid = 0,
    /// Print-style debugging, written to the sink by default
    Debug = 1,
    /// Normal operational messages
    Log = 2,
    /// Suspicious condition
    Warning = 3,
    /// Unrecoverable runtime error
    FatalError = 4,
}

impl Level {
    /// Number of levels; callback tables are indexed by `Level as usize`.
    pub const COUNT: usize = 5;
}
