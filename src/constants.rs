/// Milliseconds per second
pub const MILLIS_PER_SECOND: f64 = 1000.0;

/// Puzzles per session unless MAX_PUZZLES says otherwise
pub const DEFAULT_MAX_PUZZLES: u32 = 10;

/// 0 = Easy, 1 = Medium, 2 = Hard
pub const DEFAULT_START_DIFFICULTY: i64 = 1;

/// Probability of a plain two-operand puzzle at each level
pub const SIMPLE_PROBABILITY_EASY: f64 = 1.0;
pub const SIMPLE_PROBABILITY_MEDIUM: f64 = 0.5;
pub const SIMPLE_PROBABILITY_HARD: f64 = 0.3;

/// Factor range for the multiplication/division parts of a puzzle
pub const MIN_FACTOR: i64 = 2;
pub const MAX_FACTOR: i64 = 10;

pub const LOG_FILE_PREFIX: &str = "math-adventures";
