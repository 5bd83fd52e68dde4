//! Session manager tests: whole exchanges as a client would drive them.

use magic_ball::{CardKind, DealError, GameType, MoveRequest, Occupant, Rejection, Side, Tile};
use magic_ball_server::{NewGameOptions, ServerConfig, SessionError, SessionManager};
use std::thread;

fn tile(s: &str) -> Tile {
    s.parse().unwrap()
}

fn push(from: &str, to: &str) -> MoveRequest {
    MoveRequest::Push {
        source_tile: tile(from),
        target_tile: tile(to),
    }
}

fn manager() -> SessionManager {
    SessionManager::new(ServerConfig::default().with_seed(Some(1)))
}

#[test]
fn test_human_vs_human_push_exchange() {
    let manager = manager();
    manager
        .new_game("default", &NewGameOptions::new(GameType::HumanVsHuman))
        .unwrap();

    manager.apply_move("default", &push("C5", "C4")).unwrap();
    manager.apply_move("default", &push("C1", "C2")).unwrap();
    let outcome = manager.apply_move("default", &push("C4", "C3")).unwrap();

    let state = outcome.game_state;
    assert_eq!(state.current_player(), Side::Black);
    assert_eq!(state.board().occupant_at(tile("C3")), Occupant::Pawn(Side::White));
    assert_eq!(state.board().occupant_at(tile("C4")), Occupant::Empty);

    let err = manager.apply_move("default", &push("C2", "C3")).unwrap_err();
    assert_eq!(err, SessionError::Rejected(Rejection::InvalidTarget));
    assert_eq!(err.code(), "invalid-target");
    assert_eq!(manager.get_state("default").unwrap(), state);
}

#[test]
fn test_human_vs_ai_automated_opening() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsAi);
    options.human_player_side = Some(Side::Black);

    let state = manager.new_game("ai", &options).unwrap();
    assert_eq!(state.current_player(), Side::White);
    assert_eq!(state.human_side(), Side::Black);

    let outcome = manager.apply_automated_move("ai").unwrap();
    assert_eq!(outcome.game_state.current_player(), Side::Black);
    assert_eq!(outcome.game_state.history().len(), 1);
    assert!(!outcome.move_description.is_empty());

    // The human cannot ask the automated side to move on their turn
    assert_eq!(
        manager.apply_automated_move("ai").unwrap_err(),
        SessionError::Rejected(Rejection::NotYourTurn)
    );
}

#[test]
fn test_client_cannot_move_for_ai() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsAi);
    options.human_player_side = Some(Side::Black);
    manager.new_game("ai", &options).unwrap();

    assert_eq!(
        manager.apply_move("ai", &push("C5", "C4")).unwrap_err(),
        SessionError::Rejected(Rejection::NotYourTurn)
    );
}

#[test]
fn test_unknown_session() {
    let manager = manager();
    let err = manager.get_state("nobody").unwrap_err();
    assert_eq!(
        err,
        SessionError::NoSession {
            session_id: "nobody".to_string()
        }
    );
    assert_eq!(err.code(), "no-session");
}

#[test]
fn test_invalid_hand_setup() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsHuman);
    options.white_cards = Some(vec!["jump".to_string(), "teleport".to_string()]);

    let err = manager.new_game("default", &options).unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidSetup(DealError::UnknownCard { .. })
    ));
    assert_eq!(err.code(), "invalid-setup");
    assert!(manager.list_sessions().is_empty());
}

#[test]
fn test_same_card_in_both_hands_is_rejected() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsHuman);
    options.white_cards = Some(vec!["jump".to_string()]);
    options.black_cards = Some(vec!["jump".to_string()]);

    assert!(matches!(
        manager.new_game("default", &options),
        Err(SessionError::InvalidSetup(DealError::Overlap { .. }))
    ));
}

#[test]
fn test_marker_selection() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsHuman);
    options.white_cards = Some(vec!["charge".to_string()]);
    options.black_cards = Some(vec![]);
    manager.new_game("default", &options).unwrap();

    // C5 can charge to C3 or C2
    let moves = manager.card_moves("default", 0).unwrap();
    assert_eq!(moves.card, CardKind::Charge);
    assert_eq!(
        moves
            .moves
            .iter()
            .filter(|mv| mv.tile_marker_1 == tile("C5"))
            .count(),
        2
    );

    assert_eq!(
        manager
            .apply_marker_move("default", 0, tile("C5"), None)
            .unwrap_err(),
        SessionError::Rejected(Rejection::AmbiguousMove)
    );
    assert_eq!(
        manager
            .apply_marker_move("default", 0, tile("C5"), Some(tile("A1")))
            .unwrap_err(),
        SessionError::Rejected(Rejection::InvalidMoveIndex)
    );

    let outcome = manager
        .apply_marker_move("default", 0, tile("C5"), Some(tile("C2")))
        .unwrap();
    let board = outcome.game_state.board();
    assert_eq!(board.occupant_at(tile("C2")), Occupant::Pawn(Side::White));
    assert_eq!(board.occupant_at(tile("C5")), Occupant::Empty);
    assert!(outcome.game_state.white_hand().cards()[0].already_used);

    let hands = manager.cards("default").unwrap();
    assert!(hands.white_cards[0].already_used);
    assert!(hands.black_cards.is_empty());
}

#[test]
fn test_card_moves_for_missing_card() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsHuman);
    options.white_cards = Some(vec!["jump".to_string()]);
    manager.new_game("default", &options).unwrap();

    assert_eq!(
        manager.card_moves("default", 5).unwrap_err(),
        SessionError::Rejected(Rejection::UnknownOrUsedCard)
    );
}

#[test]
fn test_new_game_replaces_session() {
    let manager = manager();
    manager
        .new_game("default", &NewGameOptions::new(GameType::HumanVsHuman))
        .unwrap();
    manager.apply_move("default", &push("A5", "A4")).unwrap();

    let state = manager
        .new_game("default", &NewGameOptions::new(GameType::HumanVsHuman))
        .unwrap();
    assert!(state.history().is_empty());
    assert_eq!(manager.list_sessions(), ["default".to_string()]);
}

#[test]
fn test_sessions_are_independent() {
    let manager = manager();
    let handles: Vec<_> = (0..4)
        .map(|n| {
            let manager = manager.clone();
            thread::spawn(move || {
                let id = format!("player-{n}");
                manager
                    .new_game(&id, &NewGameOptions::new(GameType::HumanVsHuman))
                    .unwrap();
                manager.apply_move(&id, &push("B5", "B4")).unwrap();
                manager.get_state(&id).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let state = handle.join().unwrap();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.current_player(), Side::Black);
    }
    assert_eq!(manager.list_sessions().len(), 4);
}

#[test]
fn test_legal_moves_lists_pushes() {
    let manager = manager();
    let mut options = NewGameOptions::new(GameType::HumanVsHuman);
    options.white_cards = Some(vec![]);
    options.black_cards = Some(vec![]);
    manager.new_game("default", &options).unwrap();

    let moves = manager.legal_moves("default").unwrap();
    assert_eq!(moves.len(), 5);
    assert!(moves.contains(&push("E5", "E4")));
}
