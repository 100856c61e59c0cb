use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::adaptive::types::DifficultyLevel;
use crate::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub display: String,
    pub answer: i64,
    pub difficulty: DifficultyLevel,
}

impl Puzzle {
    pub fn is_correct(&self, answer: i64) -> bool {
        self.answer == answer
    }
}

struct LevelSpec {
    min: i64,
    max: i64,
    operations: &'static [Operation],
    max_operands: usize,
    simple_probability: f64,
}

fn level_spec(level: DifficultyLevel) -> LevelSpec {
    use Operation::*;
    match level {
        DifficultyLevel::Easy => LevelSpec {
            min: 1,
            max: 10,
            operations: &[Add, Subtract],
            max_operands: 2,
            simple_probability: SIMPLE_PROBABILITY_EASY,
        },
        DifficultyLevel::Medium => LevelSpec {
            min: 1,
            max: 20,
            operations: &[Add, Subtract, Multiply],
            max_operands: 3,
            simple_probability: SIMPLE_PROBABILITY_MEDIUM,
        },
        DifficultyLevel::Hard => LevelSpec {
            min: 10,
            max: 50,
            operations: &[Add, Subtract, Multiply, Divide],
            max_operands: 4,
            simple_probability: SIMPLE_PROBABILITY_HARD,
        },
    }
}

#[derive(Debug, Clone, Copy)]
enum ComplexShape {
    MultiplicationFirst,
    DivisionFirst,
    Parentheses,
    Mixed,
}

/// Generates arithmetic puzzles whose answers are always non-negative
/// integers. Multi-operand puzzles follow the usual order of operations.
pub struct PuzzleGenerator<R: Rng = StdRng> {
    rng: R,
}

impl PuzzleGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for PuzzleGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PuzzleGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn generate(&mut self, level: DifficultyLevel) -> Puzzle {
        let spec = level_spec(level);
        let (display, answer) =
            if spec.max_operands < 3 || self.rng.gen_bool(spec.simple_probability) {
                self.simple(&spec)
            } else {
                self.complex(&spec, level)
            };
        Puzzle {
            display,
            answer,
            difficulty: level,
        }
    }

    fn simple(&mut self, spec: &LevelSpec) -> (String, i64) {
        let op = *spec
            .operations
            .choose(&mut self.rng)
            .unwrap_or(&Operation::Add);
        match op {
            Operation::Add => {
                let a = self.rng.gen_range(spec.min..=spec.max);
                let b = self.rng.gen_range(spec.min..=spec.max);
                (format!("{a} + {b}"), a + b)
            }
            Operation::Subtract => {
                let x = self.rng.gen_range(spec.min..=spec.max);
                let y = self.rng.gen_range(spec.min..=spec.max);
                let (a, b) = (x.max(y), x.min(y));
                (format!("{a} - {b}"), a - b)
            }
            Operation::Multiply => {
                let a = self.rng.gen_range(1..=MAX_FACTOR);
                let b = self.rng.gen_range(1..=MAX_FACTOR);
                (format!("{a} × {b}"), a * b)
            }
            Operation::Divide => {
                let divisor = self.rng.gen_range(1..=MAX_FACTOR);
                let quotient = self.rng.gen_range(1..=MAX_FACTOR);
                (format!("{} ÷ {divisor}", divisor * quotient), quotient)
            }
        }
    }

    fn complex(&mut self, spec: &LevelSpec, level: DifficultyLevel) -> (String, i64) {
        let mut operands = self.rng.gen_range(3..=spec.max_operands);
        let shapes: &[ComplexShape] = if level == DifficultyLevel::Medium {
            operands = operands.min(3);
            &[ComplexShape::MultiplicationFirst, ComplexShape::Parentheses]
        } else {
            &[
                ComplexShape::MultiplicationFirst,
                ComplexShape::DivisionFirst,
                ComplexShape::Parentheses,
                ComplexShape::Mixed,
            ]
        };
        let shape = *shapes
            .choose(&mut self.rng)
            .unwrap_or(&ComplexShape::MultiplicationFirst);

        match shape {
            ComplexShape::DivisionFirst if spec.operations.contains(&Operation::Divide) => {
                self.division_first(spec)
            }
            ComplexShape::MultiplicationFirst => self.multiplication_first(spec),
            ComplexShape::Parentheses if operands == 3 => self.parentheses(spec),
            ComplexShape::Parentheses => self.parentheses_pair(spec),
            ComplexShape::Mixed if operands == 4 => self.mixed(spec),
            _ => self.multiplication_first(spec),
        }
    }

    fn factor(&mut self) -> i64 {
        self.rng.gen_range(MIN_FACTOR..=MAX_FACTOR)
    }

    // a + b × c
    fn multiplication_first(&mut self, spec: &LevelSpec) -> (String, i64) {
        let a = self.rng.gen_range(spec.min..=spec.max);
        let (b, c) = (self.factor(), self.factor());
        (format!("{a} + {b} × {c}"), a + b * c)
    }

    // a - b ÷ c, with a bumped up until the result is non-negative
    fn division_first(&mut self, spec: &LevelSpec) -> (String, i64) {
        let c = self.factor();
        let quotient = self.factor();
        let b = c * quotient;
        let mut a = self.rng.gen_range(spec.min..=spec.max);
        if a < quotient {
            a = quotient + self.rng.gen_range(5..=10);
        }
        (format!("{a} - {b} ÷ {c}"), a - quotient)
    }

    // (a ± b) × c or (a ± b) + c
    fn parentheses(&mut self, spec: &LevelSpec) -> (String, i64) {
        let x = self.rng.gen_range(spec.min..=spec.max);
        let y = self.rng.gen_range(spec.min..=spec.max);
        let c = self.factor();

        let (a, b, inner_symbol, inner) = if self.rng.gen_bool(0.5) {
            (x, y, "+", x + y)
        } else {
            let (a, b) = (x.max(y), x.min(y));
            (a, b, "-", a - b)
        };

        if self.rng.gen_bool(0.5) {
            (format!("({a} {inner_symbol} {b}) × {c}"), inner * c)
        } else {
            (format!("({a} {inner_symbol} {b}) + {c}"), inner + c)
        }
    }

    // (a + b) × (c - d)
    fn parentheses_pair(&mut self, spec: &LevelSpec) -> (String, i64) {
        let mut draw = || self.rng.gen_range(spec.min..=spec.max);
        let (w, x, y, z) = (draw(), draw(), draw(), draw());
        let (a, b) = (w.max(x), w.min(x));
        let (c, d) = (y.max(z), y.min(z));
        (format!("({a} + {b}) × ({c} - {d})"), (a + b) * (c - d))
    }

    // a + b × c - d
    fn mixed(&mut self, spec: &LevelSpec) -> (String, i64) {
        let mut a = self.rng.gen_range(spec.min..=spec.max);
        let (b, c) = (self.factor(), self.factor());
        let d = self.rng.gen_range(spec.min..=spec.max.min(20).max(spec.min));
        if a + b * c - d < 0 {
            a += d - (a + b * c) + self.rng.gen_range(5..=15);
        }
        (format!("{a} + {b} × {c} - {d}"), a + b * c - d)
    }
}
