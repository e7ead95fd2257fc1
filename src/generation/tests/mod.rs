use super::*;
use crate::config::SunoConfig;
use crate::types::TrackRequest;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{Request, Respond, ResponseTemplate};


/// Test config with millisecond-scale timings so polling loops finish fast
fn test_config(base_url: &str, max_concurrent: usize) -> SunoConfig {
    SunoConfig {
        api_key: "sk-test".to_string(),
        base_url: base_url.to_string(),
        callback_url: "https://callback.test/hook".to_string(),
        model: "V5".to_string(),
        custom_mode: true,
        instrumental: true,
        poll_interval: Duration::from_millis(10),
        timeout: Duration::from_millis(200),
        max_concurrent,
    }
}

fn test_client(base_url: &str) -> SunoClient {
    SunoClient::new(test_config(base_url, 10)).expect("client should build")
}

fn test_client_with(base_url: &str, interval_ms: u64, timeout_ms: u64) -> SunoClient {
    let mut config = test_config(base_url, 10);
    config.poll_interval = Duration::from_millis(interval_ms);
    config.timeout = Duration::from_millis(timeout_ms);
    SunoClient::new(config).expect("client should build")
}

fn track_request(title: &str) -> TrackRequest {
    TrackRequest {
        prompt: "dreamy synthwave".to_string(),
        style: "80s synthwave".to_string(),
        title: title.to_string(),
        negative_tags: Some("vocals".to_string()),
    }
}

fn submit_envelope(task_id: &str) -> serde_json::Value {
    json!({ "code": 200, "msg": "success", "data": { "taskId": task_id } })
}

fn status_envelope(status: &str) -> serde_json::Value {
    json!({ "code": 200, "msg": "success", "data": { "status": status } })
}

fn success_envelope(title: &str) -> serde_json::Value {
    json!({
        "code": 200,
        "msg": "success",
        "data": {
            "status": "SUCCESS",
            "response": {
                "sunoData": [{
                    "id": format!("id-{title}"),
                    "audioUrl": format!("https://cdn.test/{title}.mp3"),
                    "imageUrl": format!("https://cdn.test/{title}.jpeg"),
                    "title": title,
                    "duration": 180.5
                }]
            }
        }
    })
}

/// Poll responder that replays a fixed script of envelope bodies, repeating
/// the last entry once the script runs out
struct SequenceResponder {
    polls: Arc<AtomicUsize>,
    script: Vec<serde_json::Value>,
}

impl SequenceResponder {
    fn new(script: Vec<serde_json::Value>) -> Self {
        assert!(!script.is_empty(), "script needs at least one entry");
        Self {
            polls: Arc::new(AtomicUsize::new(0)),
            script,
        }
    }

    fn polls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.polls)
    }
}

impl Respond for SequenceResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        let body = self.script.get(n).unwrap_or_else(|| {
            self.script.last().expect("script is non-empty")
        });
        ResponseTemplate::new(200).set_body_json(body.clone())
    }
}

/// Shared counters observed by the mock responders
///
/// `active` counts sequences between their submit call and their terminal
/// poll; `peak` records the highest value `active` ever reached, which is
/// how the admission-cap property is checked.
#[derive(Default)]
struct Gauge {
    active: AtomicUsize,
    peak: AtomicUsize,
    submits: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        self.submits.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn submits(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }
}

/// Submit responder that derives the task id from the request title, so the
/// poll responder can correlate without shared lookup tables
struct SubmitByTitle {
    gauge: Arc<Gauge>,
}

impl Respond for SubmitByTitle {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value =
            serde_json::from_slice(&request.body).expect("submit body should be JSON");
        let title = body["title"].as_str().expect("submit body should carry a title");
        self.gauge.enter();
        ResponseTemplate::new(200).set_body_json(submit_envelope(&format!("task-{title}")))
    }
}

/// Poll responder scripted by per-task poll count
///
/// Returns PENDING on the first poll and TEXT_SUCCESS after that, flipping
/// to SUCCESS on poll number `succeed_on`. A task whose title matches
/// `fail_title` instead fails on its first poll.
struct ScriptedPoll {
    counts: Arc<Mutex<HashMap<String, usize>>>,
    gauge: Arc<Gauge>,
    succeed_on: usize,
    fail_title: Option<String>,
}

impl ScriptedPoll {
    fn new(gauge: Arc<Gauge>, succeed_on: usize, fail_title: Option<&str>) -> Self {
        Self {
            counts: Arc::new(Mutex::new(HashMap::new())),
            gauge,
            succeed_on,
            fail_title: fail_title.map(str::to_string),
        }
    }

    fn counts(&self) -> Arc<Mutex<HashMap<String, usize>>> {
        Arc::clone(&self.counts)
    }
}

impl Respond for ScriptedPoll {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let task_id = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "taskId")
            .map(|(_, value)| value.to_string())
            .expect("poll should carry a taskId");
        let title = task_id
            .strip_prefix("task-")
            .expect("task ids are derived from titles")
            .to_string();

        let count = {
            let mut counts = self.counts.lock().expect("counts mutex");
            let entry = counts.entry(task_id).or_insert(0);
            *entry += 1;
            *entry
        };

        if self.fail_title.as_deref() == Some(title.as_str()) {
            self.gauge.exit();
            return ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "msg": "success",
                "data": {
                    "status": "GENERATE_AUDIO_FAILED",
                    "errorMessage": "audio generation failed upstream"
                }
            }));
        }

        if count >= self.succeed_on {
            self.gauge.exit();
            ResponseTemplate::new(200).set_body_json(success_envelope(&title))
        } else if count == 1 {
            ResponseTemplate::new(200).set_body_json(status_envelope("PENDING"))
        } else {
            ResponseTemplate::new(200).set_body_json(status_envelope("TEXT_SUCCESS"))
        }
    }
}
