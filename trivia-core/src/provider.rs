//! Question provider adapter for the Open Trivia Database.
//!
//! One GET per session, no retries. The JSON payload is normalised into
//! [`Question`]s: incorrect answers first, the correct one appended, the set
//! shuffled, and every string entity-decoded. Every failure is reported as
//! [`FetchFailed`].

use std::time::Duration;

use rand::{rng, Rng};
use reqwest::Client;
use serde::Deserialize;

use crate::entities::decode_entities;
use crate::error::{FetchCause, FetchFailed};
use crate::shuffle::arrange_with;
use crate::types::{Answer, Difficulty, Question, Subject};

/// Public endpoint used when no other URL is configured.
pub const DEFAULT_URL: &str = "https://opentdb.com/api.php";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to reach the provider.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    pub url: String,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { url: DEFAULT_URL.to_owned(), timeout: DEFAULT_TIMEOUT }
    }
}

/// Fetches questions over HTTP. Cheap to clone; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct OpenTdbProvider {
    client: Client,
    config: ProviderConfig,
}

impl OpenTdbProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { client: Client::new(), config }
    }

    /// Requests `count` multiple-choice questions for `subject` at `difficulty`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailed`] on transport errors, a non-success status, a
    /// malformed payload, a provider error code, an empty result list, or a
    /// question that fails validation.
    pub async fn fetch(
        &self,
        subject: Subject,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, FetchFailed> {
        log::info!("fetching {count} {difficulty} questions for {subject}");

        let response = self
            .client
            .get(&self.config.url)
            .query(&[
                ("amount", count.to_string()),
                ("category", subject.category_id().to_string()),
                ("difficulty", difficulty.as_str().to_owned()),
                ("type", "multiple".to_owned()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(FetchCause::from)?;

        if !response.status().is_success() {
            return Err(FetchCause::Status(response.status()).into());
        }

        let body = response.text().await.map_err(FetchCause::from)?;
        let questions = parse_response(&body, &mut rng())?;
        log::info!("received {} questions", questions.len());
        Ok(questions)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    response_code: u8,
    results: Vec<ApiQuestion>,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question: String,
    correct_answer: String,
    incorrect_answers: Vec<String>,
}

/// Turns a provider response body into shuffled, decoded questions.
///
/// # Errors
///
/// Returns [`FetchFailed`] when the body is not the expected JSON, the
/// provider reports a non-zero `response_code`, there are no results, or any
/// question is invalid.
pub fn parse_response<R: Rng + ?Sized>(body: &str, rng: &mut R) -> Result<Vec<Question>, FetchFailed> {
    let payload: ApiResponse = serde_json::from_str(body).map_err(FetchCause::from)?;

    if payload.response_code != 0 {
        return Err(FetchCause::Provider(payload.response_code).into());
    }
    if payload.results.is_empty() {
        return Err(FetchCause::Empty.into());
    }

    payload
        .results
        .into_iter()
        .map(|raw| {
            let incorrect = raw
                .incorrect_answers
                .iter()
                .map(|text| Answer::incorrect(decode_entities(text)))
                .collect();
            let correct = Answer::correct(decode_entities(&raw.correct_answer));
            let answers = arrange_with(&mut *rng, correct, incorrect);
            Question::new(decode_entities(&raw.question), answers)
                .map_err(|e| FetchFailed::from(FetchCause::from(e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::error::Error as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn parses_and_decodes_a_result() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "easy",
                "category": "Science: Computers",
                "question": "What does &quot;HTML&quot; stand for?",
                "correct_answer": "Hypertext Markup Language",
                "incorrect_answers": ["Hyperlink &amp; Text", "Home Tool", "It&#039;s nothing"]
            }]
        }"#;

        let questions = parse_response(body, &mut seeded()).unwrap();
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.prompt(), "What does \"HTML\" stand for?");
        assert_eq!(q.answers().len(), 4);
        assert_eq!(q.answers()[q.correct_index()].text, "Hypertext Markup Language");
        assert!(q.answers().iter().any(|a| a.text == "Hyperlink & Text"));
        assert!(q.answers().iter().any(|a| a.text == "It's nothing"));
    }

    #[test]
    fn missing_response_code_is_treated_as_success() {
        let body = r#"{"results": [{"question": "q", "correct_answer": "a", "incorrect_answers": ["b"]}]}"#;
        assert_eq!(parse_response(body, &mut seeded()).unwrap().len(), 1);
    }

    #[test]
    fn malformed_payload_fails() {
        assert!(parse_response("<html>503</html>", &mut seeded()).is_err());
        assert!(parse_response(r#"{"response_code": 0}"#, &mut seeded()).is_err());
    }

    #[test]
    fn empty_results_fail() {
        let err = parse_response(r#"{"response_code": 0, "results": []}"#, &mut seeded()).unwrap_err();
        assert_eq!(err.summary(), "provider returned no questions");
    }

    #[test]
    fn provider_error_code_fails() {
        let err = parse_response(r#"{"response_code": 5, "results": []}"#, &mut seeded()).unwrap_err();
        assert_eq!(err.summary(), "provider reported error code 5");
    }

    #[test]
    fn question_without_incorrect_answers_fails() {
        let body = r#"{"response_code": 0, "results": [
            {"question": "q", "correct_answer": "a", "incorrect_answers": []}
        ]}"#;
        let err = parse_response(body, &mut seeded()).unwrap_err();
        assert!(err.summary().contains("invalid question"));
    }

    /// Serves one HTTP response on a local port. The task yields the request head.
    async fn serve_once(response: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api.php", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });
        (url, server)
    }

    fn provider_at(url: String) -> OpenTdbProvider {
        OpenTdbProvider::new(ProviderConfig { url, timeout: Duration::from_secs(5) })
    }

    fn cause(err: &FetchFailed) -> &FetchCause {
        err.source()
            .and_then(|source| source.downcast_ref::<FetchCause>())
            .expect("FetchFailed always has a cause")
    }

    #[tokio::test]
    async fn fetch_sends_the_query_and_parses_the_body() {
        let body = r#"{"response_code": 0, "results": [
            {"question": "Is &lt;div&gt; a block element?", "correct_answer": "Yes", "incorrect_answers": ["No"]}
        ]}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let (url, server) = serve_once(response).await;

        let questions = provider_at(url).fetch(Subject::Html, Difficulty::Hard, 10).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "Is <div> a block element?");

        let head = server.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api.php?"));
        for param in ["amount=10", "category=18", "difficulty=hard", "type=multiple"] {
            assert!(request_line.contains(param), "{param} missing from {request_line}");
        }
    }

    #[tokio::test]
    async fn error_status_fails_the_fetch() {
        let response =
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let (url, server) = serve_once(response.to_owned()).await;

        let err = provider_at(url).fetch(Subject::Css, Difficulty::Easy, 10).await.unwrap_err();
        assert!(err.summary().contains("status 503"), "{}", err.summary());
        assert!(matches!(cause(&err), FetchCause::Status(status) if status.as_u16() == 503));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_host_fails_the_fetch() {
        // Bind then drop to get a local port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api.php", listener.local_addr().unwrap());
        drop(listener);

        let err = provider_at(url).fetch(Subject::JavaScript, Difficulty::Medium, 10).await.unwrap_err();
        assert!(matches!(cause(&err), FetchCause::Transport(_)));
    }
}
