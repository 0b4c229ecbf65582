use crate::fixtures::Fixture;

/// Build the full double round-robin for the given teams: every ordered
/// (home, away) pair exactly once, in input index order, scores unset.
///
/// Fewer than two teams yields an empty list rather than an error; season
/// creation rejects that case before ever calling this.
pub fn generate_fixtures(team_names: &[String]) -> Vec<Fixture> {
    if team_names.len() < 2 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(team_names.len() * (team_names.len() - 1));
    for (i, home) in team_names.iter().enumerate() {
        for (j, away) in team_names.iter().enumerate() {
            if i == j {
                continue;
            }
            out.push(Fixture::unplayed(home, away));
        }
    }
    out
}
