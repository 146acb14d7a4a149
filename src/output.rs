//! Console output: banner, result rows and run summary

use chrono::{DateTime, Local};
use crossterm::style::Stylize;
use dizzy_core::{DispatchSummary, ProbeObserver, ProbeResponse, ProbeResult};

const BANNER: &str = r"                ___
           ____/ (_)_______  __  __
          / __  / /_  /_  / / / / /
         / /_/ / / / /_/ /_/ /_/ /
         \__,_/_/ /___/___/\__, /
                          /____/
          An unsung hero.    ";

const RULE: &str = "=================================================================";

/// Print the ASCII banner followed by a rule
pub fn print_banner() {
    println!("{}", BANNER.cyan().bold());
    println!("{}", marked(RULE).cyan().bold());
}

/// Print the run start line
pub fn print_start(job_count: usize, at: DateTime<Local>) {
    let line = format!("Running {} jobs at: {}", job_count, at.format("%H:%M:%S"));
    println!("{}", marked(&line).cyan().bold());
}

/// Print the column header row
pub fn print_header() {
    let line = format!(
        "{:<7} {:<20} {:<10} {:<15}",
        "Method", "Path", "Status", "Body Length"
    );
    println!("{}", marked(&line).magenta().bold());
}

/// Print the run finish line and outcome counts
pub fn print_finish(job_count: usize, at: DateTime<Local>, summary: &DispatchSummary) {
    let line = format!(
        "Finished {} jobs at: {}, total time taken: {:?}",
        job_count,
        at.format("%H:%M:%S"),
        summary.elapsed
    );
    println!("{}", marked(&line).cyan().bold());
    println!("{}", format_counts(summary).cyan().bold());
}

/// Outcome counts, success rate and throughput
pub fn format_counts(summary: &DispatchSummary) -> String {
    marked(&format!(
        "{} completed, {} failed ({:.1}% success, {:.1} jobs/s)",
        summary.workers.total_completed,
        summary.jobs_failed(),
        summary.workers.success_rate() * 100.0,
        summary.workers.jobs_per_second
    ))
}

/// Row for one probe outcome
pub fn format_result_line(method: &str, response: &ProbeResponse) -> String {
    let path = if response.segment.is_empty() {
        "/"
    } else {
        response.segment.as_str()
    };
    marked(&format!(
        "{:<7} {:<20} {:<10} {:<15}",
        method, path, response.status, response.body_length
    ))
}

fn marked(message: &str) -> String {
    format!("[+] {}", message)
}

/// Observer printing one cyan row per reported outcome
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProbeObserver for ConsoleReporter {
    fn on_outcome(&self, method: &str, outcome: &ProbeResult) {
        let response = match outcome {
            Ok(response) => response,
            Err(failure) => &failure.response,
        };
        println!("{}", format_result_line(method, response).cyan().bold());
    }
}
