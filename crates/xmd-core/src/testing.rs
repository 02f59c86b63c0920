//! Scripted in-process transport for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::cascade::Cascade;
use crate::config::XmdConfig;
use crate::dispatch::{Dispatcher, ErrorKind, FetchError, Request, Response, Transport};

#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Status(u32, Vec<u8>),
    Fail(ErrorKind),
}

impl Scripted {
    pub(crate) fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::Status(200, body.into())
    }
}

/// Answers by longest matching URL prefix; the last scripted answer for a
/// prefix repeats. Unknown URLs get a 404.
pub(crate) struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    log: Mutex<Vec<(Instant, Request)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    latency: Duration,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            latency: Duration::from_millis(50),
        }
    }

    pub(crate) fn script(&self, prefix: &str, answers: Vec<Scripted>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .insert(prefix.to_string(), answers.into());
        self
    }

    pub(crate) fn respond(&self, prefix: &str, status: u32, body: &str) -> &Self {
        self.script(prefix, vec![Scripted::Status(status, body.as_bytes().to_vec())])
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.log.lock().unwrap().iter().map(|(_, r)| r.clone()).collect()
    }

    pub(crate) fn request_times(&self) -> Vec<Instant> {
        self.log.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub(crate) fn count_for(&self, prefix: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, r)| r.url().starts_with(prefix))
            .count()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn next_answer(&self, url: &str) -> Scripted {
        let mut routes = self.routes.lock().unwrap();
        let key = routes
            .keys()
            .filter(|k| url.starts_with(k.as_str()))
            .max_by_key(|k| k.len())
            .cloned();
        let Some(key) = key else {
            return Scripted::Status(404, Vec::new());
        };
        let answers = routes.get_mut(&key).expect("key from map");
        if answers.len() > 1 {
            answers.pop_front().expect("non-empty")
        } else {
            answers
                .front()
                .cloned()
                .unwrap_or(Scripted::Status(404, Vec::new()))
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: &Request) -> Result<Response, FetchError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.log
            .lock()
            .unwrap()
            .push((Instant::now(), request.clone()));

        tokio::time::sleep(self.latency).await;
        let answer = self.next_answer(request.url());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match answer {
            Scripted::Status(status, body) => Ok(Response::new(status, body)),
            Scripted::Fail(kind) => Err(FetchError::transport(kind, "scripted failure")),
        }
    }
}

/// Config whose endpoints all live under `https://fake.test`.
pub(crate) fn fake_config() -> XmdConfig {
    let mut cfg = XmdConfig::default();
    cfg.endpoints.player_base = "https://fake.test/player".to_string();
    cfg.endpoints.post_base = "https://fake.test/post".to_string();
    cfg.endpoints.internal_api_base = "https://fake.test/internal".to_string();
    cfg.endpoints.mirror_base = "https://fake.test/mirror".to_string();
    cfg
}

/// Dispatcher over `transport` with the config's throttling parameters.
pub(crate) fn dispatcher(transport: &Arc<FakeTransport>, cfg: &XmdConfig) -> Arc<Dispatcher> {
    let transport: Arc<dyn Transport> = transport.clone();
    Arc::new(Dispatcher::from_config(transport, &cfg.dispatch))
}

/// Standard cascade over a fresh fake transport.
pub(crate) fn cascade(cfg: &XmdConfig) -> (Arc<FakeTransport>, Cascade) {
    let transport = Arc::new(FakeTransport::new());
    let cascade = Cascade::standard(dispatcher(&transport, cfg), cfg);
    (transport, cascade)
}
