//! Solver diagnostics on stderr, gated by a verbosity level.

/// How much diagnostic output the solver emits.
///
/// Levels are ordered: a configured level also admits everything below
/// it, so `Checks` prints placements as well as rejection diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only.
    #[default]
    Silent,
    /// Placements, strategy results and the schedule dump.
    Changes,
    /// Empty-domain diagnostics and dead-end reports.
    Checks,
    /// Per-expansion search internals.
    Debug,
}

impl Verbosity {
    /// Maps a repeated `-v` flag count to a level; anything past `-vvv`
    /// stays at `Debug`.
    pub fn from_flag_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Silent,
            1 => Verbosity::Changes,
            2 => Verbosity::Checks,
            _ => Verbosity::Debug,
        }
    }

    /// Whether messages tagged `level` should be emitted under this
    /// configuration.
    pub fn allows(self, level: Verbosity) -> bool {
        self >= level
    }
}

/// Emits one diagnostic line on stderr when the configured verbosity
/// reaches the named level; free otherwise.
///
/// ```ignore
/// solver_log!(verbosity, Changes, "scheduled {} events", n);
/// ```
#[macro_export]
macro_rules! solver_log {
    ($verbosity:expr, $level:ident, $($arg:tt)*) => {
        if $verbosity.allows($crate::logging::Verbosity::$level) {
            eprintln!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(Verbosity::Silent < Verbosity::Changes);
        assert!(Verbosity::Changes < Verbosity::Checks);
        assert!(Verbosity::Checks < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn test_allows_admits_lower_levels() {
        assert!(Verbosity::Debug.allows(Verbosity::Changes));
        assert!(Verbosity::Checks.allows(Verbosity::Checks));
        assert!(!Verbosity::Silent.allows(Verbosity::Changes));
        assert!(!Verbosity::Changes.allows(Verbosity::Debug));
    }

    #[test]
    fn test_flag_count_mapping() {
        assert_eq!(Verbosity::from_flag_count(0), Verbosity::Silent);
        assert_eq!(Verbosity::from_flag_count(1), Verbosity::Changes);
        assert_eq!(Verbosity::from_flag_count(2), Verbosity::Checks);
        assert_eq!(Verbosity::from_flag_count(3), Verbosity::Debug);
        assert_eq!(Verbosity::from_flag_count(200), Verbosity::Debug);
    }

    #[test]
    fn test_macro_compiles_at_every_level() {
        let verbosity = Verbosity::Silent;
        solver_log!(verbosity, Changes, "placed {}", 1);
        solver_log!(verbosity, Checks, "rejected {}", 2);
        solver_log!(verbosity, Debug, "expanded {}", 3);
    }
}
