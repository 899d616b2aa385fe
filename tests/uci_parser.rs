use raywalk::uci::{parse_uci_command, UciCommand};

#[test]
fn test_parse_full_go_command() {
    let line = "go wtime 300000 btime 290000 movetime 1000 depth 6";
    assert_eq!(
        parse_uci_command(line),
        UciCommand::Go {
            wtime: Some(300000),
            btime: Some(290000),
            movetime: Some(1000),
            depth: Some(6),
        }
    );
}

#[test]
fn test_go_ignores_unsupported_tokens() {
    match parse_uci_command("go infinite winc 100 depth 3 nodes 5000") {
        UciCommand::Go { depth, wtime, .. } => {
            assert_eq!(depth, Some(3));
            assert_eq!(wtime, None);
        }
        other => panic!("Expected Go command, got: {:?}", other),
    }
}

#[test]
fn test_go_bad_numbers_are_dropped() {
    match parse_uci_command("go depth deep wtime -5") {
        UciCommand::Go { depth, wtime, .. } => {
            assert_eq!(depth, None);
            assert_eq!(wtime, None);
        }
        other => panic!("Expected Go command, got: {:?}", other),
    }
}

#[test]
fn test_parse_position_startpos_moves() {
    assert_eq!(
        parse_uci_command("position startpos moves e2e4 e7e5 g1f3"),
        UciCommand::Position {
            fen: None,
            moves: vec!["e2e4".into(), "e7e5".into(), "g1f3".into()],
        }
    );
    assert_eq!(
        parse_uci_command("position startpos"),
        UciCommand::Position {
            fen: None,
            moves: vec![],
        }
    );
}

#[test]
fn test_parse_position_fen_without_counters() {
    assert_eq!(
        parse_uci_command("position fen 4k3/8/8/8/8/8/8/4K3 w - -"),
        UciCommand::Position {
            fen: Some("4k3/8/8/8/8/8/8/4K3 w - -".to_string()),
            moves: vec![],
        }
    );
}

#[test]
fn test_parse_setoption() {
    assert_eq!(
        parse_uci_command("setoption name Hash value 128"),
        UciCommand::SetOption {
            name: "Hash".to_string(),
            value: Some("128".to_string()),
        }
    );
}

#[test]
fn test_simple_commands() {
    assert_eq!(parse_uci_command("uci"), UciCommand::Uci);
    assert_eq!(parse_uci_command("  isready  "), UciCommand::IsReady);
    assert_eq!(parse_uci_command("ucinewgame"), UciCommand::UciNewGame);
    assert_eq!(parse_uci_command("quit"), UciCommand::Quit);
    assert_eq!(parse_uci_command("perft"), UciCommand::Perft(None));
    assert_eq!(
        parse_uci_command("ponderhit"),
        UciCommand::Unknown("ponderhit".to_string())
    );
}
