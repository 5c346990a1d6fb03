// Standard library
use std::io::{self, Write};
use std::net::IpAddr;
use std::sync::Arc;

// 3rd party crates
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info};

// Project imports
use crate::geo::{place_label, Locator};
use crate::sources::{IpFamily, IpSource, QueryKind, QueryResult};

// Current module imports
use super::errors::PingError;
use super::functions::render;
use super::types::{
    AggregationState, CompletionPolicy, Entry, Pinger, ProgressLine, Recorded, RunMode, RunReport,
};

impl RunMode {
    /// Number of results the progress line counts towards.
    pub fn total(&self, sources: usize) -> usize {
        match self.policy {
            CompletionPolicy::First => 1,
            CompletionPolicy::All => sources,
        }
    }
}

impl AggregationState {
    /// Accounts for one delivered result. `label` is only called for an
    /// address that has not been seen before.
    pub fn record(&mut self, result: &QueryResult, label: impl FnOnce(&str) -> String) -> Recorded {
        self.completed += 1;

        if !result.is_usable() {
            return Recorded::Nothing;
        }
        if self.seen.iter().any(|e| e.address == result.address) {
            return Recorded::Duplicate;
        }

        self.seen.push(Entry {
            address: result.address.clone(),
            label: label(&result.address),
        });
        Recorded::New
    }

    /// Count shown on the progress line. A first-result run only ever counts
    /// the address it kept.
    pub fn displayed_completed(&self, mode: &RunMode, total: usize) -> usize {
        match mode.policy {
            CompletionPolicy::First => self.seen.len().min(total),
            CompletionPolicy::All => self.completed,
        }
    }

    pub fn render(&mut self, mode: &RunMode, total: usize) -> &str {
        let labels: Vec<&str> = self.seen.iter().map(|e| e.label.as_str()).collect();
        self.last_rendered = render(
            &labels,
            self.displayed_completed(mode, total),
            total,
            mode.raw,
        );
        &self.last_rendered
    }

    pub fn addresses(&self) -> Vec<String> {
        self.seen.iter().map(|e| e.address.clone()).collect()
    }
}

impl<W: Write> ProgressLine<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 0 }
    }

    /// Overwrites the current line, blanking what is left of a longer one.
    pub fn draw(&mut self, line: &str) -> io::Result<()> {
        let width = line.chars().count();
        if width == 0 && self.width == 0 {
            return Ok(());
        }
        let pad = self.width.saturating_sub(width);
        write!(self.out, "\r{}{:pad$}", line, "", pad = pad)?;
        self.out.flush()?;
        self.width = width;
        Ok(())
    }

    /// Terminates the line.
    pub fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl Pinger {
    pub fn new(sources: Vec<Arc<dyn IpSource>>, locator: Arc<dyn Locator>) -> Self {
        Self { sources, locator }
    }

    /// Runs every source once and writes the progress line to `out`.
    ///
    /// Returns only after every spawned task has delivered its result, in
    /// both completion policies.
    pub async fn run<W: Write>(&self, mode: &RunMode, out: &mut W) -> Result<RunReport, PingError> {
        let total = mode.total(self.sources.len());
        let mut state = AggregationState::default();
        let mut line = ProgressLine::new(out);
        line.draw(state.render(mode, total))?;

        let deadline = Instant::now() + mode.timeout;
        let (cancel_tx, _) = broadcast::channel::<()>(1);
        let mut tasks = JoinSet::new();
        for source in &self.sources {
            let cancel = match mode.policy {
                CompletionPolicy::First => Some(cancel_tx.subscribe()),
                CompletionPolicy::All => None,
            };
            tasks.spawn(query(Arc::clone(source), deadline, mode.family, cancel));
        }
        debug!(
            "Querying {} sources for an {} address, {:?} policy",
            self.sources.len(),
            mode.family,
            mode.policy
        );

        let mut cancelled = false;
        let mut delivered = 0;
        // dropping `tasks` on an early return aborts whatever is still running
        while let Some(joined) = tasks.join_next().await {
            let checked = joined
                .map_err(PingError::from)
                .and_then(|result| check_contract(&result, mode.family).map(|_| result));
            let result = match checked {
                Ok(result) => result,
                Err(e) => {
                    // leave the terminal on a fresh line for the error message
                    line.finish()?;
                    return Err(e);
                }
            };
            delivered += 1;
            debug!("{} delivered {:?} {:?}", result.source, result.kind, result.address);

            if cancelled {
                continue;
            }

            let recorded = state.record(&result, |address| self.label(address, mode.raw));
            match mode.policy {
                CompletionPolicy::All => {
                    line.draw(state.render(mode, total))?;
                }
                CompletionPolicy::First if recorded == Recorded::New => {
                    line.draw(state.render(mode, total))?;
                    info!("{} was the first to answer, cancelling the rest", result.source);
                    // receivers may all be gone if this was the last task
                    let _ = cancel_tx.send(());
                    cancelled = true;
                }
                CompletionPolicy::First => {}
            }
        }
        line.finish()?;

        Ok(RunReport {
            addresses: state.addresses(),
            completed: state.completed,
            total,
            delivered,
            line: state.last_rendered,
        })
    }

    fn label(&self, address: &str, raw: bool) -> String {
        if raw {
            return address.to_string();
        }
        place_label(address, &self.locator.locate(address))
    }
}

/// One source request, raced against the run's cancellation signal.
async fn query(
    source: Arc<dyn IpSource>,
    deadline: Instant,
    family: IpFamily,
    cancel: Option<broadcast::Receiver<()>>,
) -> QueryResult {
    let Some(mut cancel) = cancel else {
        return source.fetch(deadline, family).await;
    };

    tokio::select! {
        result = source.fetch(deadline, family) => result,
        _ = cancel.recv() => {
            debug!("{}: cancelled", source.name());
            QueryResult::failed(source.name(), QueryKind::Cancelled)
        }
    }
}

/// An `Ok` result must carry a well-formed address of the run's family.
fn check_contract(result: &QueryResult, family: IpFamily) -> Result<(), PingError> {
    if result.kind != QueryKind::Ok {
        return Ok(());
    }
    match result.address.parse::<IpAddr>() {
        Ok(ip) if IpFamily::of(&ip) == family => Ok(()),
        _ => Err(PingError::ContractViolation {
            source_name: result.source.clone(),
            address: result.address.clone(),
            family,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::{sleep, timeout_at};

    use crate::geo::errors::LocateError;

    const EXAMPLE: &str = "93.184.216.34";
    const NORWELL: &str = "93.184.216.34, Norwell, United States";

    enum Answer {
        Address(&'static str),
        Fail(QueryKind),
        /// Hangs until the deadline.
        Never,
    }

    struct StubSource {
        name: &'static str,
        delay: Duration,
        answer: Answer,
    }

    #[async_trait]
    impl IpSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, deadline: Instant, _family: IpFamily) -> QueryResult {
            let work = async {
                sleep(self.delay).await;
                match self.answer {
                    Answer::Address(address) => QueryResult::ok(self.name, address),
                    Answer::Fail(kind) => QueryResult::failed(self.name, kind),
                    Answer::Never => std::future::pending().await,
                }
            };
            timeout_at(deadline, work)
                .await
                .unwrap_or_else(|_| QueryResult::failed(self.name, QueryKind::Timeout))
        }
    }

    struct StubLocator(HashMap<&'static str, &'static str>);

    impl Locator for StubLocator {
        fn locate(&self, address: &str) -> Result<String, LocateError> {
            address
                .parse::<IpAddr>()
                .map_err(|_| LocateError::InvalidAddress)?;
            Ok(self.0.get(address).copied().unwrap_or_default().to_string())
        }
    }

    fn stub(name: &'static str, millis: u64, answer: Answer) -> Arc<dyn IpSource> {
        Arc::new(StubSource {
            name,
            delay: Duration::from_millis(millis),
            answer,
        })
    }

    fn pinger(sources: Vec<Arc<dyn IpSource>>) -> Pinger {
        let locator = StubLocator(HashMap::from([(EXAMPLE, "Norwell, United States")]));
        Pinger::new(sources, Arc::new(locator))
    }

    fn mode(policy: CompletionPolicy, raw: bool) -> RunMode {
        RunMode {
            policy,
            family: IpFamily::V4,
            raw,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_record_deduplicates() {
        let mut state = AggregationState::default();
        let label = |a: &str| a.to_string();

        assert_eq!(state.record(&QueryResult::ok("a", "1.1.1.1"), label), Recorded::New);
        assert_eq!(state.record(&QueryResult::ok("b", "1.1.1.1"), label), Recorded::Duplicate);
        assert_eq!(
            state.record(&QueryResult::failed("c", QueryKind::Timeout), label),
            Recorded::Nothing
        );
        assert_eq!(state.record(&QueryResult::ok("d", "8.8.8.8"), label), Recorded::New);

        assert_eq!(state.completed, 4);
        assert_eq!(state.addresses(), ["1.1.1.1", "8.8.8.8"]);
    }

    #[test]
    fn test_label_is_resolved_once() {
        let mut state = AggregationState::default();
        let mut calls = 0;
        for source in ["a", "b", "c"] {
            state.record(&QueryResult::ok(source, "1.1.1.1"), |a| {
                calls += 1;
                a.to_string()
            });
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_progress_line_blanks_longer_line() {
        let mut out = Vec::new();
        let mut line = ProgressLine::new(&mut out);
        line.draw("").unwrap();
        line.draw("93.184.216.34").unwrap();
        line.draw("1.1.1.1").unwrap();
        line.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\r93.184.216.34\r1.1.1.1      \n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_mode_waits_for_every_source() {
        let pinger = pinger(vec![
            stub("one", 10, Answer::Address(EXAMPLE)),
            stub("two", 0, Answer::Never),
            stub("three", 20, Answer::Address("0.0.0.0")),
            stub("four", 30, Answer::Fail(QueryKind::NetworkError)),
        ]);
        let mut out = Vec::new();
        let report = pinger
            .run(&mode(CompletionPolicy::All, false), &mut out)
            .await
            .unwrap();

        assert_eq!(report.completed, 4);
        assert_eq!(report.delivered, 4);
        assert_eq!(report.addresses, [EXAMPLE, "0.0.0.0"]);
        assert_eq!(report.line, format!("(4/4) {}. 0.0.0.0", NORWELL));

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("\r(0/4) \r(1/4) 93.184.216.34, Norwell, United States"));
        assert!(out.ends_with(&format!("\r(4/4) {}. 0.0.0.0\n", NORWELL)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_mode_duplicate_sources() {
        let pinger = pinger(vec![
            stub("one", 40, Answer::Address("1.1.1.1")),
            stub("two", 30, Answer::Address("1.1.1.1")),
            stub("three", 20, Answer::Address("1.1.1.1")),
            stub("four", 10, Answer::Address("1.1.1.1")),
        ]);
        let mut out = Vec::new();
        let report = pinger
            .run(&mode(CompletionPolicy::All, false), &mut out)
            .await
            .unwrap();

        assert_eq!(report.completed, 4);
        assert_eq!(report.addresses, ["1.1.1.1"]);
        assert_eq!(report.line, "(4/4) 1.1.1.1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_mode_does_not_wait_for_slow_sources() {
        let pinger = pinger(vec![
            stub("one", 0, Answer::Never),
            stub("two", 0, Answer::Address(EXAMPLE)),
            stub("three", 0, Answer::Never),
            stub("four", 0, Answer::Never),
        ]);
        let mut run_mode = mode(CompletionPolicy::First, false);
        run_mode.timeout = Duration::from_secs(30);

        let started = Instant::now();
        let mut out = Vec::new();
        let report = pinger.run(&run_mode, &mut out).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(report.delivered, 4);
        assert_eq!(report.total, 1);
        assert_eq!(report.addresses, [EXAMPLE]);
        assert_eq!(report.line, format!("(1/1) {}", NORWELL));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("\r(0/1) \r(1/1) {}\n", NORWELL)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_mode_ignores_failures_and_late_answers() {
        let pinger = pinger(vec![
            stub("one", 5, Answer::Fail(QueryKind::InvalidResponse)),
            stub("two", 10, Answer::Address("0.0.0.0")),
            stub("three", 20, Answer::Address(EXAMPLE)),
        ]);
        let mut out = Vec::new();
        let report = pinger
            .run(&mode(CompletionPolicy::First, false), &mut out)
            .await
            .unwrap();

        assert_eq!(report.delivered, 3);
        assert_eq!(report.addresses, ["0.0.0.0"]);
        assert_eq!(report.line, "(1/1) 0.0.0.0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_mode_without_any_answer() {
        let pinger = pinger(vec![
            stub("one", 0, Answer::Never),
            stub("two", 10, Answer::Fail(QueryKind::NetworkError)),
        ]);
        let mut out = Vec::new();
        let report = pinger
            .run(&mode(CompletionPolicy::First, false), &mut out)
            .await
            .unwrap();

        assert_eq!(report.delivered, 2);
        assert!(report.addresses.is_empty());
        assert_eq!(report.line, "(0/1) ");
        assert_eq!(String::from_utf8(out).unwrap(), "\r(0/1) \n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_raw_mode_prints_latest_address() {
        let pinger = pinger(vec![
            stub("one", 10, Answer::Address(EXAMPLE)),
            stub("two", 20, Answer::Address("1.1.1.1")),
        ]);
        let mut out = Vec::new();
        let report = pinger
            .run(&mode(CompletionPolicy::All, true), &mut out)
            .await
            .unwrap();

        assert_eq!(report.line, "1.1.1.1");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\r93.184.216.34\r1.1.1.1      \n"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_contract_violation_is_fatal() {
        let pinger = pinger(vec![
            stub("broken", 10, Answer::Address("a.b.c.d")),
            stub("slow", 0, Answer::Never),
        ]);
        let mut out = Vec::new();
        let err = pinger
            .run(&mode(CompletionPolicy::All, false), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PingError::ContractViolation { ref source_name, .. } if source_name == "broken"
        ));
        assert_eq!(String::from_utf8(out).unwrap(), "\r(0/2) \n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_family_mismatch_is_a_contract_violation() {
        let pinger = pinger(vec![stub("v4", 0, Answer::Address("1.1.1.1"))]);
        let mut run_mode = mode(CompletionPolicy::All, false);
        run_mode.family = IpFamily::V6;

        let mut out = Vec::new();
        assert!(pinger.run(&run_mode, &mut out).await.is_err());
    }
}
