/// Fuzzy directory search
///
/// Scores employees and teams against the query with normalized
/// Levenshtein similarity and returns the best matches across both
/// kinds. Matching is case-insensitive and tolerant of typos; "jhon"
/// still finds John.
///
/// # Endpoints
///
/// - `GET /api/search/fuzzy?q=...`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use skilltrack_shared::{
    auth::middleware::AuthContext,
    models::{employee::Employee, team::Team},
};
use strsim::levenshtein;

/// Matches below this similarity are dropped
const SCORE_THRESHOLD: f64 = 0.35;

/// Maximum results returned
const MAX_RESULTS: usize = 50;

/// Directory scan window; fuzzy search ranks, it does not paginate
const SCAN_LIMIT: i64 = 10_000;

/// Search query parameters
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// One scored match
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchResult {
    Employee {
        id: String,
        firstname: String,
        lastname: String,
        score: f64,
    },
    Team {
        id: String,
        team_name: String,
        score: f64,
    },
}

impl SearchResult {
    fn score(&self) -> f64 {
        match self {
            SearchResult::Employee { score, .. } | SearchResult::Team { score, .. } => *score,
        }
    }
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
}

/// Normalized Levenshtein similarity in [0, 1]
///
/// Two empty strings count as identical.
fn similarity(query: &str, candidate: &str) -> f64 {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    let max_len = query.chars().count().max(candidate.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein(&query, &candidate) as f64 / max_len as f64
}

/// Best similarity across several candidate strings
fn best_similarity<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>) -> f64 {
    candidates
        .into_iter()
        .map(|candidate| similarity(query, candidate))
        .fold(0.0, f64::max)
}

/// Fuzzy search over the company directory
///
/// Employees are scored on first name, last name, and full name; teams
/// on name and description. Results merge, sort by score, and cap at 50.
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty `q` parameter
pub async fn fuzzy_search(
    State(state): State<AppState>,
    auth: AuthContext,
    Query(params): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter q is required".to_string()))?
        .to_string();

    let employees = Employee::list(&state.db, auth.company_id, SCAN_LIMIT, 0).await?;
    let teams = Team::list(&state.db, auth.company_id, SCAN_LIMIT, 0).await?;

    let mut results: Vec<SearchResult> = Vec::new();

    for employee in employees {
        let full_name = employee.full_name();
        let score = best_similarity(
            &query,
            [
                employee.firstname.as_str(),
                employee.lastname.as_str(),
                full_name.as_str(),
            ],
        );
        if score > SCORE_THRESHOLD {
            results.push(SearchResult::Employee {
                id: employee.id,
                firstname: employee.firstname,
                lastname: employee.lastname,
                score,
            });
        }
    }

    for team in teams {
        let score = best_similarity(
            &query,
            std::iter::once(team.team_name.as_str())
                .chain(team.description.as_deref()),
        );
        if score > SCORE_THRESHOLD {
            results.push(SearchResult::Team {
                id: team.id,
                team_name: team.team_name,
                score,
            });
        }
    }

    results.sort_by(|a, b| {
        b.score()
            .partial_cmp(&a.score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results.truncate(MAX_RESULTS);

    Ok(Json(SearchResponse { query, results }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_one() {
        assert_eq!(similarity("john", "John"), 1.0);
    }

    #[test]
    fn empty_strings_count_as_identical() {
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn typo_still_scores_high() {
        let score = similarity("jhon", "john");
        assert!(score >= 0.5, "got {}", score);
    }

    #[test]
    fn unrelated_strings_score_low() {
        let score = similarity("marketing", "e7");
        assert!(score < SCORE_THRESHOLD, "got {}", score);
    }

    #[test]
    fn best_similarity_takes_the_maximum() {
        let score = best_similarity("lovelace", ["ada", "lovelace", "ada lovelace"]);
        assert_eq!(score, 1.0);
    }
}
