//! CLI argument parsing and run orchestration

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use dizzy_core::{
    jobs_from_requests, DispatchConfig, Dispatcher, HttpRequester, PoolSizing, ProbeRequest,
    RequesterConfig, WordList,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::output::{self, ConsoleReporter};

/// dizzy - concurrent HTTP path prober
#[derive(Parser, Debug)]
#[command(name = "dizzy")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Example: dizzy http://localhost:8080 -w /path/to/wordlist -X GET -H '{\"Accept\": \"application/json\"}' -t 10"
)]
pub struct Cli {
    /// Target base URL
    pub url: String,

    /// Word list with one path segment per line ("-" reads stdin)
    #[arg(short, long, env = "DIZZY_WORDLIST")]
    pub wordlist: PathBuf,

    /// HTTP method used for every request
    #[arg(short = 'X', long, default_value = "GET", env = "DIZZY_METHOD")]
    pub method: String,

    /// Per-request timeout in seconds (0 falls back to 10)
    #[arg(short, long, default_value = "10", env = "DIZZY_TIMEOUT")]
    pub timeout: u64,

    /// Headers added to every request, as a JSON object
    #[arg(short = 'H', long)]
    pub headers: Option<String>,

    /// Hide results whose body has exactly this length
    #[arg(short, long)]
    pub length: Option<usize>,

    /// Only show non-2xx results
    #[arg(short, long)]
    pub failures_only: bool,

    /// Also probe the bare URL
    #[arg(long)]
    pub include_base: bool,

    /// Number of workers (default: one per three jobs)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Intake queue capacity (default: number of jobs)
    #[arg(long)]
    pub queue_size: Option<usize>,

    /// Largest batch handed to workers at once
    #[arg(long, default_value = "300")]
    pub batch_size: usize,

    /// Flush a partial batch after this many idle milliseconds
    #[arg(long, default_value = "100")]
    pub flush_interval_ms: u64,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Probe every word list entry against the target and print the results
    pub async fn run(&self) -> Result<()> {
        output::print_banner();

        let headers = parse_headers(self.headers.as_deref())?;
        let requests = self.load_requests()?;
        let jobs = jobs_from_requests(requests);
        let job_count = jobs.len();

        let config = RequesterConfig::new(
            Duration::from_secs(self.timeout),
            self.method.as_str(),
            headers,
            self.failures_only,
        )
        .with_excluded_length(self.length)
        .validated();

        let requester = HttpRequester::new(config, Arc::new(ConsoleReporter))
            .context("Failed to build HTTP requester")?;

        let mut dispatcher = Dispatcher::new(self.dispatch_config(job_count))
            .context("Invalid dispatcher configuration")?;

        tracing::debug!(
            url = %self.url,
            jobs = job_count,
            workers = dispatcher.config().worker_count,
            queue_capacity = dispatcher.config().queue_capacity,
            "Starting probe run"
        );

        let started = Local::now();
        output::print_start(job_count, started);
        output::print_header();

        dispatcher.run(Arc::new(requester))?;
        dispatcher.submit_all(jobs).await?;
        let summary = dispatcher.wait().await?;

        if summary.undelivered() > 0 {
            tracing::warn!(
                undelivered = summary.undelivered(),
                "Some jobs never reached a worker"
            );
        }

        output::print_finish(job_count, Local::now(), &summary);

        Ok(())
    }

    /// Requests for every word list entry, plus the bare URL if asked for
    fn load_requests(&self) -> Result<Vec<ProbeRequest>> {
        let word_list = WordList::from_path(&self.wordlist).with_context(|| {
            format!("Failed to load word list from: {}", self.wordlist.display())
        })?;

        let url = self.url.trim_end_matches('/');
        let mut requests = Vec::with_capacity(word_list.len() + 1);
        if self.include_base {
            requests.push(ProbeRequest::base(url));
        }
        requests.extend(word_list.to_requests(url));

        Ok(requests)
    }

    fn dispatch_config(&self, job_count: usize) -> DispatchConfig {
        let mut config = DispatchConfig::for_jobs(job_count, &PoolSizing::default());
        if let Some(workers) = self.workers {
            config = config.with_worker_count(workers);
        }
        if let Some(capacity) = self.queue_size {
            config = config.with_queue_capacity(capacity);
        }
        config.batch = config
            .batch
            .with_max_batch(self.batch_size)
            .with_flush_interval(Duration::from_millis(self.flush_interval_ms));
        config
    }
}

/// Parse the `-H` JSON object into a header map
pub fn parse_headers(raw: Option<&str>) -> Result<BTreeMap<String, String>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(BTreeMap::new()),
        Some(json) => serde_json::from_str(json)
            .with_context(|| format!("Headers must be a JSON object of strings, got: {}", json)),
    }
}
