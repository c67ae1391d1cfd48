/* ------------------------------------------------------------------ */
/* HTTP endpoint: POST / → freshly sampled names with their NLL       */
/* ------------------------------------------------------------------ */

use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::{LINEAR_SAMPLE_COUNT, MAX_LEN};
use crate::error::{BigramError, Result};
use crate::eval::{score, NllScore};
use crate::sample::Sampler;
use crate::table::ProbabilityTable;
use crate::vocab::Vocabulary;

// Upper bound on names per request so one call cannot hog the loop.
const MAX_COUNT: usize = 1000;

#[derive(Deserialize)]
struct SampleRequest {
    #[serde(default = "default_count")]
    count: usize,
    seed: Option<u64>,
    #[serde(default = "default_max_len")]
    max_len: usize,
}

fn default_count() -> usize { LINEAR_SAMPLE_COUNT }
fn default_max_len() -> usize { MAX_LEN }

#[derive(Serialize)]
struct SampleResponse {
    names: Vec<String>,
    seed:  u64,
    #[serde(flatten)]
    nll:   NllScore,
}

fn error_body(msg: &str) -> String {
    serde_json::json!({ "error": msg }).to_string()
}

fn with_json(resp: Response<std::io::Cursor<Vec<u8>>>) -> Response<std::io::Cursor<Vec<u8>>> {
    match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(h) => resp.with_header(h),
        Err(()) => resp,
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(42)
}

/// Turn one request body into (status, JSON body). No I/O.
fn handle(body: &str, table: &ProbabilityTable, vocab: &Vocabulary, seed_fallback: u64) -> (u16, String) {
    let body = if body.trim().is_empty() { "{}" } else { body };
    let req: SampleRequest = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => return (400, error_body(&e.to_string())),
    };
    if req.count > MAX_COUNT {
        return (400, error_body(&format!("count must be at most {}", MAX_COUNT)));
    }

    let seed = req.seed.unwrap_or(seed_fallback);
    let result = Sampler::new(req.max_len).and_then(|sampler| {
        let names = sampler.generate(table, vocab, req.count, seed)?;
        let nll = score(&names, table, vocab)?;
        Ok(SampleResponse { names, seed, nll })
    });

    match result {
        Ok(resp) => match serde_json::to_string(&resp) {
            Ok(json) => (200, json),
            Err(e) => (500, error_body(&e.to_string())),
        },
        Err(e @ (BigramError::InvalidOption { .. } | BigramError::GenerationOverflow { .. })) => {
            (422, error_body(&e.to_string()))
        }
        Err(e) => (500, error_body(&e.to_string())),
    }
}

/// Route one request: only POST samples, everything else is 405.
fn respond(method: &Method, body: &str, table: &ProbabilityTable, vocab: &Vocabulary, seed_fallback: u64) -> (u16, String) {
    if *method != Method::Post {
        return (405, error_body("Method Not Allowed"));
    }
    handle(body, table, vocab, seed_fallback)
}

pub fn run_server(addr: &str, table: &ProbabilityTable, vocab: &Vocabulary) -> Result<()> {
    let server = Server::http(addr).map_err(|e| BigramError::InvalidOption {
        name: "addr",
        reason: format!("failed to bind {}: {}", addr, e),
    })?;

    log::info!("listening on http://{}", addr);
    println!("POST http://{}/ with JSON body:", addr);
    println!("  {{\"count\": 10, \"seed\": 7, \"max_len\": 32}}");

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        if request.as_reader().read_to_string(&mut body).is_err() {
            let _ = request.respond(
                with_json(Response::from_string(error_body("Failed to read request body")))
                    .with_status_code(StatusCode(400)),
            );
            continue;
        }

        let (status, json) = respond(request.method(), &body, table, vocab, clock_seed());
        log::info!("[serve] {} {} {} bytes -> {}", request.method(), request.url(), body.len(), status);
        let _ = request.respond(with_json(Response::from_string(json)).with_status_code(StatusCode(status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::TransitionPairs;
    use crate::stats::StatisticalEstimator;

    fn fitted() -> (Vocabulary, ProbabilityTable) {
        let corpus = ["ann", "mia", "emma"];
        let vocab = Vocabulary::build(&corpus).unwrap();
        let pairs = TransitionPairs::extract(&corpus, &vocab).unwrap();
        let table = StatisticalEstimator::default().fit(&pairs, vocab.len()).unwrap();
        (vocab, table)
    }

    #[test]
    fn seeded_request_is_reproducible() {
        let (vocab, table) = fitted();
        let body = r#"{"count": 5, "seed": 3, "max_len": 500}"#;
        let (s1, a) = handle(body, &table, &vocab, 0);
        let (s2, b) = handle(body, &table, &vocab, 99);
        assert_eq!((s1, s2), (200, 200));
        assert_eq!(a, b);

        let v: serde_json::Value = serde_json::from_str(&a).unwrap();
        assert_eq!(v["names"].as_array().unwrap().len(), 5);
        assert_eq!(v["seed"], 3);
        assert!(v["normalized_nll"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn empty_body_uses_defaults() {
        let (vocab, table) = fitted();
        let (status, json) = handle("", &table, &vocab, 11);
        assert_eq!(status, 200, "{json}");
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["seed"], 11);
    }

    #[test]
    fn only_post_is_routed_to_sampling() {
        let (vocab, table) = fitted();
        let (status, json) = respond(&Method::Get, "", &table, &vocab, 0);
        assert_eq!(status, 405);
        assert!(json.contains("Method Not Allowed"));
        assert_eq!(respond(&Method::Put, "{}", &table, &vocab, 0).0, 405);
        assert_eq!(respond(&Method::Post, r#"{"count": 2, "max_len": 500}"#, &table, &vocab, 0).0, 200);
    }

    #[test]
    fn bad_json_is_a_client_error() {
        let (vocab, table) = fitted();
        assert_eq!(handle("{nope", &table, &vocab, 0).0, 400);
        assert_eq!(handle(r#"{"count": 100000}"#, &table, &vocab, 0).0, 400);
        assert_eq!(handle(r#"{"max_len": 0}"#, &table, &vocab, 0).0, 422);
    }
}
