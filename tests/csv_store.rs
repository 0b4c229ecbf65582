use std::fs;

use league_desk::csv_store::CsvStore;
use league_desk::schedule::generate_fixtures;
use league_desk::store::{ScoreUpdate, SeasonStore};

fn teams(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn seasons_survive_a_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let names = teams(&["A", "B", "C"]);
    let fixtures = generate_fixtures(&names);

    let id = {
        let mut store = CsvStore::open(dir.path()).expect("open");
        store
            .create_season("2026", &names, &fixtures)
            .expect("create")
    };

    let store = CsvStore::open(dir.path()).expect("reopen");
    let seasons = store.list_seasons().expect("list");
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].id, id);
    assert_eq!(seasons[0].name, "2026");
    assert_eq!(seasons[0].team_count, 3);
    assert_eq!(seasons[0].fixture_count, 6);

    let stored = store.load_fixtures(id).expect("fixtures");
    assert_eq!(stored.len(), 6);
    assert_eq!(stored[0].home, "A");
    assert_eq!(stored[0].away, "B");
    assert!(stored.iter().all(|f| f.home_goals.is_none()));
}

#[test]
fn score_updates_persist_and_normalize() {
    let dir = tempfile::tempdir().expect("tempdir");
    let names = teams(&["A", "B"]);
    let mut store = CsvStore::open(dir.path()).expect("open");
    let id = store
        .create_season("2026", &names, &generate_fixtures(&names))
        .expect("create");
    let fixtures = store.load_fixtures(id).expect("fixtures");

    store
        .save_fixture_scores(
            id,
            &[
                ScoreUpdate {
                    fixture_id: fixtures[0].id,
                    home_goals: Some(2),
                    away_goals: Some(0),
                },
                // Half a pair must persist as unplayed.
                ScoreUpdate {
                    fixture_id: fixtures[1].id,
                    home_goals: None,
                    away_goals: Some(3),
                },
                // Unknown ids are ignored, not an error.
                ScoreUpdate {
                    fixture_id: 9999,
                    home_goals: Some(1),
                    away_goals: Some(1),
                },
            ],
        )
        .expect("save scores");

    let store = CsvStore::open(dir.path()).expect("reopen");
    let stored = store.load_fixtures(id).expect("fixtures after save");
    assert_eq!(stored[0].home_goals, Some(2));
    assert_eq!(stored[0].away_goals, Some(0));
    assert_eq!(stored[1].home_goals, None);
    assert_eq!(stored[1].away_goals, None);
}

#[test]
fn duplicate_season_name_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let names = teams(&["A", "B"]);
    let mut store = CsvStore::open(dir.path()).expect("open");
    store
        .create_season("2026", &names, &generate_fixtures(&names))
        .expect("create");
    assert!(
        store
            .create_season("2026", &names, &generate_fixtures(&names))
            .is_err()
    );
}

#[test]
fn delete_season_cascades_to_teams_and_fixtures() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = CsvStore::open(dir.path()).expect("open");
    let first_names = teams(&["A", "B"]);
    let first = store
        .create_season("2026", &first_names, &generate_fixtures(&first_names))
        .expect("create first");
    let second_names = teams(&["X", "Y", "Z"]);
    let second = store
        .create_season("2027", &second_names, &generate_fixtures(&second_names))
        .expect("create second");

    store.delete_season(first).expect("delete");

    let seasons = store.list_seasons().expect("list");
    assert_eq!(seasons.len(), 1);
    assert_eq!(seasons[0].id, second);
    assert!(store.load_fixtures(first).expect("gone").is_empty());
    assert_eq!(store.load_fixtures(second).expect("kept").len(), 6);

    assert!(store.delete_season(first).is_err());
}

#[test]
fn mangled_rows_degrade_instead_of_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("seasons.csv"),
        "season_id,name,created_at\n1,2026,2026-01-01T00:00:00+00:00\n",
    )
    .expect("write seasons");
    fs::write(
        dir.path().join("teams.csv"),
        "season_id,position,name\n1,0,A\n1,1,B\n",
    )
    .expect("write teams");
    // Row 2: junk score. Row 3: short row. Row 4: missing home team.
    // Row 5: unusable id. Only the last two are dropped.
    fs::write(
        dir.path().join("fixtures.csv"),
        "fixture_id,season_id,home,away,home_goals,away_goals\n\
         1,1,A,B,2,1\n\
         2,1,B,A,x,3\n\
         3,1,A,B\n\
         4,1,,B,1,1\n\
         oops,1,A,B,0,0\n",
    )
    .expect("write fixtures");

    let store = CsvStore::open(dir.path()).expect("open");
    let fixtures = store.load_fixtures(1).expect("load");
    assert_eq!(fixtures.len(), 3);

    assert_eq!(fixtures[0].home_goals, Some(2));
    assert_eq!(fixtures[0].away_goals, Some(1));
    // Junk and short rows read as unplayed.
    assert_eq!(fixtures[1].home_goals, None);
    assert_eq!(fixtures[1].away_goals, None);
    assert_eq!(fixtures[2].home_goals, None);
    assert_eq!(fixtures[2].away_goals, None);

    let seasons = store.list_seasons().expect("list");
    assert_eq!(seasons[0].fixture_count, 3);
    assert_eq!(seasons[0].team_count, 2);
}

#[test]
fn missing_files_read_as_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = CsvStore::open(dir.path()).expect("open");
    assert!(store.list_seasons().expect("list").is_empty());
    assert!(store.load_fixtures(1).expect("fixtures").is_empty());
}
