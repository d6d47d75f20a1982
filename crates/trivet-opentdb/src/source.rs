// SPDX-FileCopyrightText: 2026 Trivet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Open Trivia Database question source.
//!
//! [`OpenTdbSource`] owns the provider session: it lazily acquires a session
//! token, tracks which questions have been delivered in the current token
//! scope, perturbs repeated filter choices for variety, and retries a
//! bounded number of times before surfacing a typed failure.

use std::collections::HashSet;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use trivet_config::OpenTdbConfig;
use trivet_core::{
    Difficulty, Fingerprint, FormattedQuestion, HealthStatus, QuestionSource, TrivetError,
};

use crate::categories;
use crate::client::OpenTdbClient;
use crate::format::{format_question, normalize};
use crate::types::{RESPONSE_SUCCESS, RESPONSE_TOKEN_EXHAUSTED};

/// Mutable session state, guarded as a unit.
///
/// Everything the fetch cycle reads and writes lives behind one lock so the
/// check-refresh-mutate sequence is atomic with respect to other callers.
struct SessionState {
    token: Option<String>,
    seen: HashSet<Fingerprint>,
    served: u32,
    rng: StdRng,
}

/// Question source backed by the Open Trivia Database.
///
/// One instance per process; the session token and seen-set are created on
/// first use and live in memory only. A restart starts a fresh session,
/// which is a documented limitation rather than a defect.
pub struct OpenTdbSource {
    client: OpenTdbClient,
    batch_size: u8,
    token_soft_cap: u32,
    variety_probability: f64,
    state: Mutex<SessionState>,
}

impl OpenTdbSource {
    /// Creates a source from configuration with an entropy-seeded RNG.
    pub fn new(config: &OpenTdbConfig) -> Result<Self, TrivetError> {
        Self::build(config, StdRng::from_entropy())
    }

    /// Creates a source with a fixed RNG seed for deterministic behavior.
    pub fn with_rng_seed(config: &OpenTdbConfig, seed: u64) -> Result<Self, TrivetError> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &OpenTdbConfig, rng: StdRng) -> Result<Self, TrivetError> {
        let client = OpenTdbClient::new(
            config.base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )?;

        Ok(Self {
            client,
            batch_size: config.batch_size,
            token_soft_cap: config.token_soft_cap,
            variety_probability: config.variety_probability,
            state: Mutex::new(SessionState {
                token: None,
                seen: HashSet::new(),
                served: 0,
                rng,
            }),
        })
    }

    /// Ensures the session holds a usable token.
    ///
    /// Missing tokens are requested fresh. Once more than `token_soft_cap`
    /// questions have been served the token is reset and the seen-set
    /// cleared, keeping provider-side per-token state bounded.
    async fn ensure_token(&self, state: &mut SessionState) -> Result<(), TrivetError> {
        let Some(held) = state.token.clone() else {
            let token = self.client.request_token().await?;
            info!("acquired provider session token");
            state.token = Some(token);
            return Ok(());
        };

        if state.served > self.token_soft_cap {
            let token = self.client.reset_token(&held).await?;
            info!(served = state.served, "session token reset at soft cap");
            state.token = Some(token);
            state.seen.clear();
            state.served = 0;
        }
        Ok(())
    }

    /// Applies the variety perturbation to resolved filters.
    ///
    /// Each recognized filter is independently overridden with a uniform
    /// random supported value with probability `variety_probability`. An
    /// unrecognized input stays unfiltered; perturbation never narrows a
    /// no-filter request.
    fn perturb_filters(
        &self,
        rng: &mut StdRng,
        category_id: Option<u16>,
        difficulty: Option<Difficulty>,
    ) -> (Option<u16>, Option<Difficulty>) {
        let category_id = match category_id {
            Some(_) if rng.gen_bool(self.variety_probability) => {
                let id = categories::random_id(rng);
                debug!(category_id = id, "variety override on category");
                Some(id)
            }
            other => other,
        };

        let difficulty = match difficulty {
            Some(_) if rng.gen_bool(self.variety_probability) => {
                let d = *Difficulty::ALL
                    .choose(rng)
                    .unwrap_or(&Difficulty::Medium);
                debug!(difficulty = %d, "variety override on difficulty");
                Some(d)
            }
            other => other,
        };

        (category_id, difficulty)
    }

    /// Runs the bounded fetch cycle under the session lock.
    ///
    /// At most three round trips are made: the initial fetch, one retry with
    /// a different random category when the whole batch was already seen,
    /// and one retry of the original filters after a pool-exhaustion token
    /// refresh. The loop terminates by construction.
    async fn fetch_cycle(
        &self,
        state: &mut SessionState,
        category_id: Option<u16>,
        difficulty: Option<Difficulty>,
    ) -> Result<FormattedQuestion, TrivetError> {
        let mut current_category = category_id;
        let mut category_retry_done = false;
        let mut reset_retry_done = false;

        loop {
            let batch = self
                .client
                .fetch_batch(
                    self.batch_size,
                    current_category,
                    difficulty,
                    state.token.as_deref(),
                )
                .await?;

            match batch.response_code {
                RESPONSE_SUCCESS => {
                    let mut unseen = Vec::new();
                    for raw in batch.results {
                        let record = normalize(raw)?;
                        if !state.seen.contains(&Fingerprint::of(&record)) {
                            unseen.push(record);
                        }
                    }

                    if let Some(record) = unseen.choose(&mut state.rng) {
                        state.seen.insert(Fingerprint::of(record));
                        state.served += 1;
                        debug!(
                            served = state.served,
                            seen = state.seen.len(),
                            "question selected"
                        );
                        return Ok(format_question(record, &mut state.rng));
                    }

                    // Whole batch already seen. One switch to a different
                    // random category, keeping the requested difficulty.
                    if category_retry_done {
                        warn!("no unseen question after category-switch retry");
                        return Err(TrivetError::ProviderExhausted);
                    }
                    category_retry_done = true;
                    current_category =
                        Some(categories::random_id_excluding(&mut state.rng, current_category));
                    debug!(category_id = ?current_category, "all candidates seen, switching category");
                }
                RESPONSE_TOKEN_EXHAUSTED => {
                    // The provider served this token its whole pool for the
                    // current filters. Start a fresh session and retry the
                    // original filters once.
                    if reset_retry_done {
                        warn!("token pool exhausted after token refresh");
                        return Err(TrivetError::ProviderExhausted);
                    }
                    reset_retry_done = true;
                    let token = self.client.request_token().await?;
                    info!("token pool exhausted, fresh session token acquired");
                    state.token = Some(token);
                    state.seen.clear();
                    state.served = 0;
                    current_category = category_id;
                }
                code => {
                    return Err(TrivetError::ProviderUnreachable {
                        message: format!("provider answered with error code {code}"),
                        source: None,
                    });
                }
            }
        }
    }
}

#[async_trait]
impl QuestionSource for OpenTdbSource {
    fn name(&self) -> &str {
        "opentdb"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn next_question(
        &self,
        category: &str,
        difficulty: &str,
    ) -> Result<FormattedQuestion, TrivetError> {
        // Unrecognized inputs fall through to "no filter".
        let category_id = categories::category_id(category);
        let difficulty = Difficulty::from_str(difficulty).ok();

        let mut state = self.state.lock().await;
        self.ensure_token(&mut state).await?;

        let (category_id, difficulty) =
            self.perturb_filters(&mut state.rng, category_id, difficulty);

        self.fetch_cycle(&mut state, category_id, difficulty).await
    }

    async fn health_check(&self) -> Result<HealthStatus, TrivetError> {
        // One unfiltered single-question fetch without touching session state.
        match self.client.fetch_batch(1, None, None, None).await {
            Ok(batch) if batch.response_code == RESPONSE_SUCCESS && !batch.results.is_empty() => {
                Ok(HealthStatus::Healthy)
            }
            Ok(batch) => Ok(HealthStatus::Degraded(format!(
                "provider answered with code {}",
                batch.response_code
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), TrivetError> {
        // The HTTP pool closes with the client; nothing durable to flush.
        info!("question source shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> OpenTdbConfig {
        OpenTdbConfig {
            base_url: server.uri(),
            batch_size: 10,
            token_soft_cap: 100,
            variety_probability: 0.0,
            request_timeout_secs: 2,
        }
    }

    fn question(text: &str, correct: &str, incorrect: &[&str]) -> serde_json::Value {
        json!({
            "category": "Math",
            "type": "multiple",
            "difficulty": "easy",
            "question": text,
            "correct_answer": correct,
            "incorrect_answers": incorrect,
        })
    }

    fn batch(questions: Vec<serde_json::Value>) -> serde_json::Value {
        json!({"response_code": 0, "results": questions})
    }

    async fn mount_token(server: &MockServer, token: &str) {
        Mock::given(method("GET"))
            .and(path("/api_token.php"))
            .and(query_param("command", "request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response_code": 0,
                "token": token
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn returns_formatted_question_for_concrete_batch() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-a").await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("category", "9"))
            .and(query_param("difficulty", "easy"))
            .and(query_param("token", "tok-a"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch(vec![question("2+2=?", "4", &["3", "5", "22"])])),
            )
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 1).unwrap();
        let formatted = source.next_question("general", "easy").await.unwrap();

        assert_eq!(formatted.question, "2+2=?");
        assert_eq!(formatted.answer, "4");
        assert_eq!(formatted.options.len(), 4);
        for expected in ["4", "3", "5", "22"] {
            assert!(formatted.options.iter().any(|o| o == expected));
        }
        assert_eq!(formatted.quiz_type, "Math");
        assert_eq!(formatted.difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn unrecognized_filters_are_omitted_from_the_request() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-b").await;

        // The mock only matches requests without category/difficulty params,
        // so a match proves the filters were dropped.
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "10"))
            .and(query_param("token", "tok-b"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch(vec![question("Q?", "a", &["b", "c", "d"])])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 2).unwrap();
        let formatted = source.next_question("philosophy", "brutal").await.unwrap();
        assert_eq!(formatted.answer, "a");
    }

    #[tokio::test]
    async fn exhausted_pool_gets_fresh_token_and_empty_seen_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api_token.php"))
            .and(query_param("command", "request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response_code": 0,
                "token": "tok-old"
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api_token.php"))
            .and(query_param("command", "request"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response_code": 0,
                "token": "tok-new"
            })))
            .mount(&server)
            .await;

        // First fetch reports the pool exhausted, the retry with the fresh
        // token succeeds.
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("token", "tok-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_code": 4})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("token", "tok-new"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch(vec![question("Fresh?", "yes", &["no", "maybe", "n/a"])])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 3).unwrap();
        let formatted = source.next_question("general", "easy").await.unwrap();
        assert_eq!(formatted.answer, "yes");

        // The session restarted from scratch: new token, seen-set holding
        // only the question served after the refresh.
        let state = source.state.lock().await;
        assert_eq!(state.token.as_deref(), Some("tok-new"));
        assert_eq!(state.seen.len(), 1);
        assert_eq!(state.served, 1);
    }

    #[tokio::test]
    async fn connection_failure_is_unreachable_and_leaves_seen_set_untouched() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-c").await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batch(vec![question(
                "First?",
                "one",
                &["two", "three", "four"],
            )])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 4).unwrap();
        source.next_question("general", "easy").await.unwrap();

        let err = source.next_question("general", "easy").await.unwrap_err();
        assert!(matches!(err, TrivetError::ProviderUnreachable { .. }), "got: {err:?}");

        // The failed call must not have grown the seen-set.
        assert_eq!(source.state.lock().await.seen.len(), 1);
    }

    #[tokio::test]
    async fn slow_provider_times_out_as_unreachable_without_seen_set_mutation() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-slow").await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch(vec![question("Late?", "yes", &["no", "eh", "hm"])]))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let mut config = config_for(&server);
        config.request_timeout_secs = 1;
        let source = OpenTdbSource::with_rng_seed(&config, 12).unwrap();

        let err = source.next_question("general", "easy").await.unwrap_err();
        assert!(matches!(err, TrivetError::ProviderUnreachable { .. }), "got: {err:?}");

        let state = source.state.lock().await;
        assert!(state.seen.is_empty());
        assert_eq!(state.served, 0);
    }

    #[tokio::test]
    async fn all_seen_batch_triggers_exactly_one_category_switch() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-d").await;

        // The science category always answers with the same single question,
        // so the second call sees a fully-seen batch and must switch away.
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("category", "17"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batch(vec![question(
                "Only one?",
                "yes",
                &["no", "maybe", "n/a"],
            )])))
            .expect(2)
            .mount(&server)
            .await;

        let switch_responder = ResponseTemplate::new(200).set_body_json(batch(vec![question(
            "Different?",
            "indeed",
            &["nope", "nah", "never"],
        )]));
        for id in ["9", "23", "22", "21", "11"] {
            Mock::given(method("GET"))
                .and(path("/api.php"))
                .and(query_param("category", id))
                .respond_with(switch_responder.clone())
                .mount(&server)
                .await;
        }

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 5).unwrap();
        source.next_question("science", "easy").await.unwrap();

        let formatted = source.next_question("science", "easy").await.unwrap();
        assert_eq!(formatted.answer, "indeed");
    }

    #[tokio::test]
    async fn all_seen_after_category_switch_is_exhausted() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-e").await;

        // Every category serves the same question, so after the single
        // category switch there is still nothing unseen.
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(batch(vec![question(
                "Groundhog?",
                "day",
                &["week", "month", "year"],
            )])))
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 6).unwrap();
        source.next_question("science", "easy").await.unwrap();

        let err = source.next_question("science", "easy").await.unwrap_err();
        assert!(matches!(err, TrivetError::ProviderExhausted), "got: {err:?}");
    }

    #[tokio::test]
    async fn provider_error_code_is_unreachable() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-f").await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_code": 2})))
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 7).unwrap();
        let err = source.next_question("general", "easy").await.unwrap_err();
        assert!(matches!(err, TrivetError::ProviderUnreachable { .. }), "got: {err:?}");
    }

    #[tokio::test]
    async fn soft_cap_resets_token_and_seen_set() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-g").await;

        Mock::given(method("GET"))
            .and(path("/api_token.php"))
            .and(query_param("command", "reset"))
            .and(query_param("token", "tok-g"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response_code": 0,
                "token": "tok-g"
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Distinct question per call so the seen-set grows until the cap.
        for q in ["Q0?", "Q1?", "Q2?", "Q3?"] {
            Mock::given(method("GET"))
                .and(path("/api.php"))
                .respond_with(ResponseTemplate::new(200).set_body_json(batch(vec![question(
                    q,
                    "right",
                    &["w1", "w2", "w3"],
                )])))
                .up_to_n_times(1)
                .expect(1)
                .mount(&server)
                .await;
        }

        let mut config = config_for(&server);
        config.token_soft_cap = 2;
        let source = OpenTdbSource::with_rng_seed(&config, 8).unwrap();

        // Serving exactly the cap does not reset; only exceeding it does.
        for _ in 0..3 {
            source.next_question("general", "easy").await.unwrap();
        }
        assert_eq!(source.state.lock().await.seen.len(), 3);

        // Fourth call finds served > cap, resets, and starts a clean seen-set.
        source.next_question("general", "easy").await.unwrap();

        let state = source.state.lock().await;
        assert_eq!(state.served, 1);
        assert_eq!(state.seen.len(), 1);
    }

    #[tokio::test]
    async fn seeded_source_never_repeats_a_fingerprint() {
        let server = MockServer::start().await;
        mount_token(&server, "tok-h").await;

        // A pool of 120 distinct questions served ten at a time. Every call
        // must pick a question it has not delivered before.
        for chunk_start in (0..120).step_by(10) {
            let questions: Vec<serde_json::Value> = (chunk_start..chunk_start + 10)
                .map(|i| question(&format!("Question {i}?"), "right", &["w1", "w2", "w3"]))
                .collect();
            Mock::given(method("GET"))
                .and(path("/api.php"))
                .respond_with(ResponseTemplate::new(200).set_body_json(batch(questions)))
                .up_to_n_times(10)
                .mount(&server)
                .await;
        }

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 9).unwrap();
        let mut delivered = std::collections::HashSet::new();

        for _ in 0..100 {
            let formatted = source.next_question("general", "easy").await.unwrap();
            assert!(
                delivered.insert(formatted.question.clone()),
                "repeated question: {}",
                formatted.question
            );
        }
    }

    #[tokio::test]
    async fn health_check_reports_provider_state() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.php"))
            .and(query_param("amount", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(batch(vec![question("Up?", "yes", &["no", "eh", "hm"])])),
            )
            .mount(&server)
            .await;

        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 10).unwrap();
        assert_eq!(source.health_check().await.unwrap(), HealthStatus::Healthy);

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/api.php"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response_code": 2})))
            .mount(&server)
            .await;
        assert!(matches!(
            source.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn shutdown_is_clean() {
        let server = MockServer::start().await;
        let source = OpenTdbSource::with_rng_seed(&config_for(&server), 11).unwrap();
        source.shutdown().await.unwrap();
    }
}
