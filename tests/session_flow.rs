use math_adventures::adaptive::config::AdaptiveConfig;
use math_adventures::adaptive::engine::AdaptiveSession;
use math_adventures::adaptive::insights::Insights;
use math_adventures::adaptive::ledger::LedgerError;
use math_adventures::adaptive::types::*;
use math_adventures::constants::MILLIS_PER_SECOND;

fn session_with(history: &[(bool, f64)], difficulty: i64) -> AdaptiveSession {
    let mut session = AdaptiveSession::new(AdaptiveConfig::default());
    for &(correct, secs) in history {
        session
            .record_attempt(correct, secs * MILLIS_PER_SECOND, difficulty)
            .expect("valid attempt");
    }
    session
}

#[test]
fn high_performance_moves_up() {
    let session = session_with(&[(true, 3.0), (true, 2.5), (true, 4.0)], 1);
    assert_eq!(
        session.next_difficulty(DifficultyLevel::Medium, StrategyKind::RuleBased),
        DifficultyLevel::Hard
    );
}

#[test]
fn two_out_of_three_moves_down() {
    let session = session_with(&[(true, 6.0), (true, 7.0), (false, 8.0)], 1);
    let decision = session.decide(DifficultyLevel::Medium, StrategyKind::RuleBased);
    assert_eq!(decision.delta, -1);
    assert_eq!(decision.next, DifficultyLevel::Easy);
}

#[test]
fn struggling_moves_down() {
    let session = session_with(&[(false, 10.0), (true, 12.0), (false, 9.0)], 1);
    assert_eq!(
        session.next_difficulty(DifficultyLevel::Medium, StrategyKind::RuleBased),
        DifficultyLevel::Easy
    );
}

#[test]
fn empty_session_views() {
    let session = AdaptiveSession::new(AdaptiveConfig::default());
    assert_eq!(session.aggregate_stats(), AggregateStats::default());
    assert!(session.assessment().is_insufficient_data);
    assert!(matches!(
        session.insights(),
        Insights::InsufficientData { attempts: 0, .. }
    ));
    assert!(session.transitions().is_empty());
    for kind in [StrategyKind::RuleBased, StrategyKind::PatternMatching] {
        for level in DifficultyLevel::ALL {
            assert_eq!(session.next_difficulty(level, kind), level);
        }
    }
}

#[test]
fn rejected_attempts_surface_invalid_attempt() {
    let mut session = AdaptiveSession::new(AdaptiveConfig::default());
    let err = session.record_attempt(true, -1.0, 0).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAttempt { .. }));
    assert!(err.to_string().starts_with("invalid attempt"));
    assert!(session.record_attempt(true, 1000.0, -1).is_err());
}

#[test]
fn simulated_session_tracks_transitions() {
    let mut session = AdaptiveSession::new(AdaptiveConfig::default());
    let mut current = DifficultyLevel::Easy;

    // fast and correct until the top, then wrong answers drag it back down
    let script = [
        (true, 2000.0),
        (true, 2500.0),
        (true, 2000.0),
        (true, 2200.0),
        (true, 3000.0),
        (false, 15000.0),
        (false, 14000.0),
        (false, 16000.0),
    ];
    for (correct, time_ms) in script {
        session
            .record_attempt(correct, time_ms, current.index())
            .expect("valid attempt");
        current = session.next_difficulty(current, StrategyKind::PatternMatching);
    }

    let transitions = session.transitions();
    assert!(transitions
        .iter()
        .any(|t| t.direction == Direction::Up && t.to == DifficultyLevel::Hard));
    assert!(transitions.iter().any(|t| t.direction == Direction::Down));
    assert!(current < DifficultyLevel::Hard);

    let summary = session.summary(current);
    assert_eq!(summary.stats.total, script.len());
    assert_eq!(summary.final_difficulty, current);
    let json = serde_json::to_value(&summary).expect("summary serializes");
    assert_eq!(json["insights"]["status"], "profile");
    assert!(json["insights"]["focusAreas"].is_array());
}
