use std::io::{self, BufRead, Write};
use std::time::Instant;

use math_adventures::adaptive::engine::{AdaptiveSession, SessionSummary};
use math_adventures::adaptive::insights::Insights;
use math_adventures::adaptive::types::{DifficultyLevel, StrategyKind};
use math_adventures::config::{load_adaptive_config, Config};
use math_adventures::constants::MILLIS_PER_SECOND;
use math_adventures::logging::{init_tracing, LogConfig};
use math_adventures::puzzle::{Puzzle, PuzzleGenerator};

const RULE: &str = "============================================================";

fn main() {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    if let Err(e) = init_tracing(&LogConfig {
        log_level: config.log_level.clone(),
        enable_file_logs: config.enable_file_logs,
        log_dir: config.log_dir.clone(),
    }) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let adaptive_config = match load_adaptive_config(&config.adaptive) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load adaptive config");
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut game = Game {
        session: AdaptiveSession::new(adaptive_config),
        puzzles: PuzzleGenerator::new(),
        strategy: config.strategy,
        max_puzzles: config.max_puzzles,
        current: DifficultyLevel::from_clamped(config.start_difficulty),
        input: io::stdin().lock(),
    };

    if let Err(e) = game.run() {
        tracing::error!(error = %e, "Session aborted");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

struct Game<I: BufRead> {
    session: AdaptiveSession,
    puzzles: PuzzleGenerator,
    strategy: StrategyKind,
    max_puzzles: u32,
    current: DifficultyLevel,
    input: I,
}

impl<I: BufRead> Game<I> {
    fn run(&mut self) -> io::Result<()> {
        let Some(name) = self.welcome()? else {
            return Ok(());
        };
        println!("\nLet's start, {name}!");

        for round in 0..self.max_puzzles {
            let puzzle = self.puzzles.generate(self.current);
            self.show_puzzle(&puzzle);

            let started = Instant::now();
            let Some(answer) = self.read_answer()? else {
                println!("\nInput closed, ending the session early.");
                break;
            };
            let elapsed_ms = started.elapsed().as_secs_f64() * MILLIS_PER_SECOND;

            let correct = puzzle.is_correct(answer);
            if let Err(e) = self
                .session
                .record_attempt(correct, elapsed_ms, self.current.index())
            {
                tracing::error!(error = %e, "Could not record attempt");
            }

            show_feedback(correct, puzzle.answer, elapsed_ms);
            self.show_stats();

            if round + 1 < self.max_puzzles {
                self.adapt();
            }
        }

        show_summary(&name, &self.session.summary(self.current));
        Ok(())
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        print!("{text}");
        io::stdout().flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn welcome(&mut self) -> io::Result<Option<String>> {
        println!("\n{RULE}");
        println!("  MATH ADVENTURES - ADAPTIVE LEARNING");
        println!("{RULE}");
        println!("\nThis quiz adapts to your pace.\n");

        let name = loop {
            match self.prompt("Enter your name: ")? {
                None => return Ok(None),
                Some(name) if !name.is_empty() => break name,
                Some(_) => continue,
            }
        };

        println!("\nChoose starting difficulty:");
        println!("0 - Easy (1-10, +/-)");
        println!("1 - Medium (1-20, +/-/×)");
        println!("2 - Hard (10-50, +/-/×/÷)");
        loop {
            let Some(raw) = self.prompt("\nYour choice (0-2): ")? else {
                return Ok(None);
            };
            match raw.parse::<i64>().map(DifficultyLevel::try_from) {
                Ok(Ok(level)) => {
                    self.current = level;
                    return Ok(Some(name));
                }
                Ok(Err(_)) => println!("Please enter 0, 1, or 2"),
                Err(_) => println!("Please enter a valid number"),
            }
        }
    }

    fn show_puzzle(&self, puzzle: &Puzzle) {
        println!("\n------------------------------------------------------------");
        println!("Difficulty: {}", puzzle.difficulty.as_str().to_uppercase());
        println!("\n  {} = ?\n", puzzle.display);
    }

    fn read_answer(&mut self) -> io::Result<Option<i64>> {
        loop {
            let Some(raw) = self.prompt("Your answer: ")? else {
                return Ok(None);
            };
            match raw.parse::<i64>() {
                Ok(answer) => return Ok(Some(answer)),
                Err(_) => println!("Please enter a valid number"),
            }
        }
    }

    fn show_stats(&self) {
        let stats = self.session.aggregate_stats();
        println!("\n{RULE}");
        println!("CURRENT SESSION STATS");
        println!("{RULE}");
        println!(
            "Correct: {} | Incorrect: {} | Accuracy: {:.1}%",
            stats.correct_count, stats.incorrect_count, stats.accuracy_percent
        );
        println!("{RULE}");
    }

    fn adapt(&mut self) {
        let decision = self.session.decide(self.current, self.strategy);
        if decision.next != self.current {
            let change = if decision.next > self.current {
                "increased"
            } else {
                "decreased"
            };
            println!("\nDifficulty {change} to {}!", decision.next);
        }
        self.current = decision.next;
    }
}

fn show_feedback(correct: bool, answer: i64, elapsed_ms: f64) {
    if correct {
        println!("\nCorrect! Great job!");
    } else {
        println!("\nNot quite. The correct answer was {answer}");
    }
    println!("Time taken: {:.1} seconds", elapsed_ms / MILLIS_PER_SECOND);
}

fn show_summary(name: &str, summary: &SessionSummary) {
    let stats = &summary.stats;
    println!("\n\n{RULE}");
    println!("SESSION SUMMARY - {}", name.to_uppercase());
    println!("{RULE}");

    println!("\nPerformance Metrics:");
    println!("   Total Questions: {}", stats.total);
    println!("   Correct Answers: {}", stats.correct_count);
    println!("   Accuracy: {:.1}%", stats.accuracy_percent);
    println!(
        "   Average Time: {:.1} seconds",
        stats.average_response_time_ms / MILLIS_PER_SECOND
    );

    if !summary.transitions.is_empty() {
        println!("\nDifficulty Changes:");
        for t in &summary.transitions {
            println!(
                "   Question {}: {} -> {}",
                t.occurred_at_sequence_number, t.from, t.to
            );
        }
    }

    match &summary.insights {
        Insights::Profile {
            style,
            strengths,
            focus_areas,
            ..
        } => {
            println!("\nLearning Style: {}", style.as_str());
            if !strengths.is_empty() {
                println!("   Strengths: {strengths:?}");
            }
            if !focus_areas.is_empty() {
                println!("   Work on: {focus_areas:?}");
            }
        }
        Insights::InsufficientData { .. } => {
            println!("\nPlay a few more rounds to see your learning style.");
        }
    }

    println!("\nFinal Difficulty Level: {}", summary.final_difficulty);
    println!(
        "\nRecommendation: Start your next session at {} level",
        summary.final_difficulty
    );
    println!("\n{RULE}");
    println!("Thank you for playing Math Adventures!");
    println!("{RULE}\n");
}
