//! Player registry tests: validation, lookups, orderings, stat recording.

use gridmatch::{
    EntityKind, Error, GameConcluded, ParticipantResult, Player, PlayerRegistry, PlayerUpdate,
};

/// Records one concluded match directly against the registry.
fn conclude(
    registry: &PlayerRegistry,
    winner: Option<&Player>,
    results: &[(&Player, usize)],
) {
    let event = GameConcluded {
        game_id: "g1".to_string(),
        winner_id: winner.map(|p| p.id().clone()),
        participants: results
            .iter()
            .map(|(p, moves)| ParticipantResult::new(p.id().clone(), *moves))
            .collect(),
    };
    registry.record_result(&event);
}

/// Gives `player` `wins` recorded wins, `moves` total moves spread evenly.
fn seed_wins(registry: &PlayerRegistry, player: &Player, wins: u64, moves_per_win: usize) {
    for _ in 0..wins {
        let event = GameConcluded {
            game_id: "seed".to_string(),
            winner_id: Some(player.id().clone()),
            participants: vec![ParticipantResult::new(player.id().clone(), moves_per_win)],
        };
        registry.record_result(&event);
    }
}

#[test]
fn test_create_player_with_zeroed_stats() {
    let registry = PlayerRegistry::new();
    let player = registry.create("Alice", "alice@example.com").unwrap();

    assert_eq!(player.name(), "Alice");
    assert_eq!(player.email(), "alice@example.com");
    assert_eq!(*player.stats().games_played(), 0);
    assert_eq!(*player.stats().games_won(), 0);
    assert_eq!(*player.stats().total_moves(), 0);
    assert_eq!(player.stats().win_rate(), 0.0);
}

#[test]
fn test_create_trims_name_and_normalizes_email() {
    let registry = PlayerRegistry::new();
    let player = registry
        .create("  Alice  ", "  Alice@Example.COM ")
        .unwrap();
    assert_eq!(player.name(), "Alice");
    assert_eq!(player.email(), "alice@example.com");
}

#[test]
fn test_create_rejects_malformed_email() {
    let registry = PlayerRegistry::new();
    let err = registry.create("Alice", "bad-email").unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_create_rejects_blank_name() {
    let registry = PlayerRegistry::new();
    assert!(matches!(
        registry.create("   ", "alice@example.com"),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_duplicate_normalized_email_conflicts() {
    let registry = PlayerRegistry::new();
    registry.create("Alice", "alice@example.com").unwrap();
    let err = registry
        .create("Impostor", " ALICE@example.com ")
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[test]
fn test_get_by_email_normalizes_argument() {
    let registry = PlayerRegistry::new();
    let created = registry.create("Alice", "alice@example.com").unwrap();

    let found = registry.get_by_email(" ALICE@EXAMPLE.COM ").unwrap();
    assert_eq!(found.id(), created.id());
    assert!(registry.get_by_email("nobody@example.com").is_none());
}

#[test]
fn test_get_unknown_player_not_found() {
    let registry = PlayerRegistry::new();
    let err = registry.get("missing").unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound {
            kind: EntityKind::Player,
            ..
        }
    ));
}

#[test]
fn test_update_profile_fields() {
    let registry = PlayerRegistry::new();
    let player = registry.create("Alice", "alice@example.com").unwrap();

    let updated = registry
        .update(
            player.id(),
            PlayerUpdate {
                name: Some(" Alicia ".to_string()),
                email: Some("ALICIA@example.com".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.name(), "Alicia");
    assert_eq!(updated.email(), "alicia@example.com");
    assert!(updated.updated_at() >= player.updated_at());
}

#[test]
fn test_update_keeps_own_email() {
    let registry = PlayerRegistry::new();
    let player = registry.create("Alice", "alice@example.com").unwrap();

    // Re-submitting the player's own email is not a conflict.
    let updated = registry
        .update(
            player.id(),
            PlayerUpdate {
                name: None,
                email: Some("alice@example.com".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.email(), "alice@example.com");
}

#[test]
fn test_update_rejects_taken_email() {
    let registry = PlayerRegistry::new();
    registry.create("Alice", "alice@example.com").unwrap();
    let bob = registry.create("Bob", "bob@example.com").unwrap();

    let err = registry
        .update(
            bob.id(),
            PlayerUpdate {
                name: None,
                email: Some("alice@example.com".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { .. }));
}

#[test]
fn test_failed_update_changes_nothing() {
    let registry = PlayerRegistry::new();
    let player = registry.create("Alice", "alice@example.com").unwrap();

    // Valid name, invalid email: the whole update is rejected.
    let err = registry
        .update(
            player.id(),
            PlayerUpdate {
                name: Some("Alicia".to_string()),
                email: Some("not-an-email".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    assert_eq!(registry.get(player.id()).unwrap().name(), "Alice");
}

#[test]
fn test_update_unknown_player_not_found() {
    let registry = PlayerRegistry::new();
    assert!(matches!(
        registry.update("missing", PlayerUpdate::default()),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_delete_player() {
    let registry = PlayerRegistry::new();
    let player = registry.create("Alice", "alice@example.com").unwrap();
    registry.delete(player.id()).unwrap();
    assert!(matches!(
        registry.get(player.id()),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        registry.delete(player.id()),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn test_list_orders_by_wins_then_efficiency() {
    let registry = PlayerRegistry::new();
    let steady = registry.create("Steady", "steady@example.com").unwrap();
    let sharp = registry.create("Sharp", "sharp@example.com").unwrap();
    let novice = registry.create("Novice", "novice@example.com").unwrap();

    seed_wins(&registry, &steady, 2, 5); // 2 wins, 10 moves, efficiency 0.2
    seed_wins(&registry, &sharp, 2, 3); // 2 wins, 6 moves, efficiency ~0.33
    seed_wins(&registry, &novice, 1, 3); // 1 win

    let listed = registry.list();
    let ids: Vec<_> = listed.iter().map(|p| p.id().clone()).collect();
    assert_eq!(
        ids,
        vec![sharp.id().clone(), steady.id().clone(), novice.id().clone()]
    );
}

#[test]
fn test_search_by_name() {
    let registry = PlayerRegistry::new();
    let alice = registry.create("Alice", "alice@example.com").unwrap();
    let alicia = registry.create("alicia", "alicia@example.com").unwrap();
    registry.create("Bob", "bob@example.com").unwrap();
    seed_wins(&registry, &alicia, 1, 3);

    let found = registry.search_by_name("ALI", 10).unwrap();
    assert_eq!(found.len(), 2);
    // Ordered by wins: alicia has one, Alice none.
    assert_eq!(found[0].id(), alicia.id());
    assert_eq!(found[1].id(), alice.id());

    let found = registry.search_by_name("ali", 1).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), alicia.id());

    assert!(registry.search_by_name("zzz", 10).unwrap().is_empty());
}

#[test]
fn test_search_validates_query_and_limit() {
    let registry = PlayerRegistry::new();
    assert!(matches!(
        registry.search_by_name("", 10),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        registry.search_by_name("alice", 0),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        registry.search_by_name("alice", 101),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(registry.search_by_name("alice", 100).is_ok());
}

#[test]
fn test_leaderboards() {
    let registry = PlayerRegistry::new();
    let steady = registry.create("Steady", "steady@example.com").unwrap();
    let sharp = registry.create("Sharp", "sharp@example.com").unwrap();

    seed_wins(&registry, &steady, 3, 5); // 3 wins, efficiency 0.2
    seed_wins(&registry, &sharp, 2, 3); // 2 wins, efficiency ~0.33

    let by_wins = registry.top_by_wins(10).unwrap();
    assert_eq!(by_wins[0].id(), steady.id());
    assert_eq!(by_wins[1].id(), sharp.id());

    let by_efficiency = registry.top_by_efficiency(10).unwrap();
    assert_eq!(by_efficiency[0].id(), sharp.id());
    assert_eq!(by_efficiency[1].id(), steady.id());

    let top_one = registry.top_by_wins(1).unwrap();
    assert_eq!(top_one.len(), 1);

    assert!(matches!(
        registry.top_by_wins(0),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        registry.top_by_efficiency(200),
        Err(Error::InvalidArgument { .. })
    ));
}

#[test]
fn test_record_result_updates_both_sides() {
    let registry = PlayerRegistry::new();
    let winner = registry.create("Winner", "winner@example.com").unwrap();
    let loser = registry.create("Loser", "loser@example.com").unwrap();

    conclude(&registry, Some(&winner), &[(&winner, 3), (&loser, 2)]);

    let winner = registry.get(winner.id()).unwrap();
    assert_eq!(*winner.stats().games_played(), 1);
    assert_eq!(*winner.stats().games_won(), 1);
    assert_eq!(*winner.stats().games_lost(), 0);
    assert_eq!(*winner.stats().total_moves(), 3);
    assert_eq!(winner.stats().win_rate(), 100.0);
    assert_eq!(winner.stats().average_moves_per_win(), 3.0);

    let loser = registry.get(loser.id()).unwrap();
    assert_eq!(*loser.stats().games_played(), 1);
    assert_eq!(*loser.stats().games_lost(), 1);
    assert_eq!(*loser.stats().games_won(), 0);
    assert_eq!(*loser.stats().total_moves(), 2);
    assert_eq!(loser.stats().win_rate(), 0.0);
}

#[test]
fn test_record_result_draw() {
    let registry = PlayerRegistry::new();
    let a = registry.create("Ann", "ann@example.com").unwrap();
    let b = registry.create("Ben", "ben@example.com").unwrap();

    conclude(&registry, None, &[(&a, 5), (&b, 4)]);

    let a = registry.get(a.id()).unwrap();
    let b = registry.get(b.id()).unwrap();
    assert_eq!(*a.stats().games_drawn(), 1);
    assert_eq!(*b.stats().games_drawn(), 1);
    assert_eq!(*a.stats().games_won(), 0);
    assert_eq!(*a.stats().total_moves(), 5);
    assert_eq!(*b.stats().total_moves(), 4);
}

#[test]
fn test_record_result_skips_deleted_participant() {
    let registry = PlayerRegistry::new();
    let winner = registry.create("Winner", "winner@example.com").unwrap();
    let loser = registry.create("Loser", "loser@example.com").unwrap();
    registry.delete(loser.id()).unwrap();

    conclude(&registry, Some(&winner), &[(&winner, 3), (&loser, 2)]);

    let winner = registry.get(winner.id()).unwrap();
    assert_eq!(*winner.stats().games_won(), 1);
    assert!(matches!(
        registry.get(loser.id()),
        Err(Error::NotFound { .. })
    ));
}
