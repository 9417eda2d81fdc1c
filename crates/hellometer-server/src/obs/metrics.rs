//! Minimal metrics registry for the server.
//!
//! Instruments are plain atomics so recording never takes a lock. Labeled
//! families are backed by `DashMap`; labels are flattened into sorted key
//! vectors to keep deterministic ordering. Durations are stored in
//! nanoseconds and rendered in seconds, the Prometheus base unit.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;

use hellometer_core::error::{HellometerError, Result};

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

/// `{a="b",le="0.01"}`, or empty when there is nothing to print.
fn label_block(key: &[(String, String)], le: Option<&str>) -> String {
    let mut parts: Vec<String> = key
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect();
    if let Some(le) = le {
        parts.push(format!("le=\"{le}\""));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", parts.join(","))
    }
}

fn nanos_as_secs(nanos: u64) -> f64 {
    nanos as f64 / 1e9
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// --------------------
// Counter
// --------------------

/// Monotonic counter.
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Increment by 1.
    pub fn increment(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "{} {}", name, self.count());
    }
}

// --------------------
// Timer
// --------------------

/// Options used when registering a timer.
#[derive(Debug, Clone)]
pub struct TimerOpts {
    percentile_histogram: bool,
    slos: Vec<Duration>,
    min_expected: Duration,
    max_expected: Duration,
}

impl Default for TimerOpts {
    fn default() -> Self {
        Self {
            percentile_histogram: false,
            slos: Vec::new(),
            min_expected: Duration::from_millis(1),
            max_expected: Duration::from_secs(30),
        }
    }
}

impl TimerOpts {
    /// Publish the generated percentile buckets between the expected bounds.
    pub fn percentile_histogram(mut self) -> Self {
        self.percentile_histogram = true;
        self
    }

    /// Add explicit bucket boundaries (service level objectives).
    pub fn slos(mut self, slos: impl IntoIterator<Item = Duration>) -> Self {
        self.slos.extend(slos);
        self
    }

    /// Sorted, deduplicated bucket upper bounds in nanoseconds.
    pub fn bucket_bounds(&self) -> Vec<u64> {
        let mut bounds: Vec<u64> = self.slos.iter().map(|d| duration_nanos(*d)).collect();
        if self.percentile_histogram {
            let min = duration_nanos(self.min_expected);
            let max = duration_nanos(self.max_expected);
            bounds.extend(
                percentile_buckets()
                    .into_iter()
                    .filter(|b| (min..=max).contains(b)),
            );
        }
        bounds.retain(|b| *b > 0);
        bounds.sort_unstable();
        bounds.dedup();
        bounds
    }
}

/// Generated bucket set for percentile estimation, in nanoseconds.
///
/// Each power-of-four interval `[4^k, 4^(k+1))` is split into steps of a
/// third of its lower bound, which keeps relative error roughly constant.
pub fn percentile_buckets() -> Vec<u64> {
    let mut out = vec![1, 2, 3];
    let mut exp = 2u32;
    while exp < 62 {
        let mut current = 1u64 << exp;
        let delta = current / 3;
        let next = (current << 2) - delta;
        while current < next {
            out.push(current);
            current += delta;
        }
        exp += 2;
    }
    out
}

/// Duration histogram with count, sum, and max.
#[derive(Debug)]
pub struct Timer {
    bounds: Arc<[u64]>,
    // non-cumulative; the last slot holds samples above every bound
    buckets: Box<[AtomicU64]>,
    count: AtomicU64,
    sum_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl Timer {
    pub fn new(bounds: Arc<[u64]>) -> Self {
        let buckets = (0..=bounds.len()).map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            buckets,
            count: AtomicU64::new(0),
            sum_nanos: AtomicU64::new(0),
            max_nanos: AtomicU64::new(0),
        }
    }

    pub fn record(&self, d: Duration) {
        let nanos = duration_nanos(d);
        let idx = self.bounds.partition_point(|b| *b < nanos);

        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_nanos.fetch_add(nanos, Ordering::Relaxed);
        self.max_nanos.fetch_max(nanos, Ordering::Relaxed);
        self.buckets[idx].fetch_add(1, Ordering::Relaxed);
    }

    /// Start timing; the sample is recorded when the guard stops or drops.
    pub fn start(&self) -> TimerSample<'_> {
        TimerSample {
            timer: self,
            started: Instant::now(),
            stopped: false,
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_nanos(self.sum_nanos.load(Ordering::Relaxed))
    }

    pub fn max(&self) -> Duration {
        Duration::from_nanos(self.max_nanos.load(Ordering::Relaxed))
    }

    pub fn bounds(&self) -> &[u64] {
        &self.bounds
    }

    /// Cumulative count per bucket bound (`le` semantics), excluding `+Inf`.
    pub fn cumulative_buckets(&self) -> Vec<(Duration, u64)> {
        let mut acc = 0u64;
        self.bounds
            .iter()
            .zip(self.buckets.iter())
            .map(|(b, c)| {
                acc += c.load(Ordering::Relaxed);
                (Duration::from_nanos(*b), acc)
            })
            .collect()
    }

    fn render(&self, name: &str, key: &[(String, String)], out: &mut String) {
        let mut cumulative = 0u64;
        for (le, count) in self.cumulative_buckets() {
            cumulative = count;
            let le = nanos_as_secs(duration_nanos(le)).to_string();
            let _ = writeln!(out, "{}_bucket{} {}", name, label_block(key, Some(le.as_str())), count);
        }
        let count = self.count().max(cumulative);
        let labels = label_block(key, None);
        if !self.bounds.is_empty() {
            let _ = writeln!(out, "{}_bucket{} {}", name, label_block(key, Some("+Inf")), count);
        }
        let _ = writeln!(out, "{}_count{} {}", name, labels, count);
        let _ = writeln!(out, "{}_sum{} {}", name, labels, self.total().as_secs_f64());
    }

    fn render_max(&self, name: &str, key: &[(String, String)], out: &mut String) {
        let _ = writeln!(out, "{}_max{} {}", name, label_block(key, None), self.max().as_secs_f64());
    }
}

/// In-flight timing started by [`Timer::start`].
///
/// Dropping an unstopped sample still records it, so a cancelled request
/// future never leaves a counted request without its timing.
#[must_use = "a sample records on drop; bind it to a variable"]
pub struct TimerSample<'a> {
    timer: &'a Timer,
    started: Instant,
    stopped: bool,
}

impl TimerSample<'_> {
    /// Record the elapsed time and return it.
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        let elapsed = self.started.elapsed();
        self.timer.record(elapsed);
        elapsed
    }
}

impl Drop for TimerSample<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.timer.record(self.started.elapsed());
        }
    }
}

/// Labeled family of timers sharing one bucket layout.
#[derive(Debug)]
pub struct TimerVec {
    bounds: Arc<[u64]>,
    map: DashMap<LabelKey, Timer>,
}

impl TimerVec {
    pub fn new(bounds: Arc<[u64]>) -> Self {
        Self {
            bounds,
            map: DashMap::new(),
        }
    }

    pub fn record(&self, labels: &[(&str, &str)], d: Duration) {
        let bounds = Arc::clone(&self.bounds);
        self.map
            .entry(label_key(labels))
            .or_insert_with(|| Timer::new(bounds))
            .record(d);
    }

    /// Sample count for one label set (0 when never recorded).
    #[cfg(test)]
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|t| t.count())
            .unwrap_or(0)
    }

    fn sorted_keys(&self) -> Vec<LabelKey> {
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        keys
    }

    fn render(&self, name: &str, out: &mut String) {
        for key in self.sorted_keys() {
            if let Some(t) = self.map.get(&key) {
                t.render(name, &key, out);
            }
        }
    }

    fn render_max(&self, name: &str, out: &mut String) {
        for key in self.sorted_keys() {
            if let Some(t) = self.map.get(&key) {
                t.render_max(name, &key, out);
            }
        }
    }
}

// --------------------
// Registry
// --------------------

#[derive(Clone)]
enum Meter {
    Counter(Arc<Counter>),
    Timer(Arc<Timer>),
    TimerVec(Arc<TimerVec>),
}

#[derive(Clone)]
struct Registered {
    help: &'static str,
    meter: Meter,
}

/// Process-wide set of named meters. Names are unique.
#[derive(Default)]
pub struct MetricsRegistry {
    meters: DashMap<&'static str, Registered>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(&self, name: &'static str, help: &'static str, meter: Meter) -> Result<()> {
        match self.meters.entry(name) {
            Entry::Occupied(_) => Err(HellometerError::Internal(format!(
                "meter already registered: {name}"
            ))),
            Entry::Vacant(v) => {
                v.insert(Registered { help, meter });
                tracing::debug!(meter = name, "meter registered");
                Ok(())
            }
        }
    }

    pub fn register_counter(&self, name: &'static str, help: &'static str) -> Result<Arc<Counter>> {
        let counter = Arc::new(Counter::default());
        self.register(name, help, Meter::Counter(Arc::clone(&counter)))?;
        Ok(counter)
    }

    pub fn register_timer(
        &self,
        name: &'static str,
        help: &'static str,
        opts: &TimerOpts,
    ) -> Result<Arc<Timer>> {
        let timer = Arc::new(Timer::new(opts.bucket_bounds().into()));
        self.register(name, help, Meter::Timer(Arc::clone(&timer)))?;
        Ok(timer)
    }

    pub fn register_timer_vec(
        &self,
        name: &'static str,
        help: &'static str,
        opts: &TimerOpts,
    ) -> Result<Arc<TimerVec>> {
        let vec = Arc::new(TimerVec::new(opts.bucket_bounds().into()));
        self.register(name, help, Meter::TimerVec(Arc::clone(&vec)))?;
        Ok(vec)
    }

    #[cfg(test)]
    pub fn is_registered(&self, name: &str) -> bool {
        self.meters.contains_key(name)
    }

    /// Render all registered meters plus caller-provided gauges in
    /// Prometheus text exposition format.
    pub fn render(&self, extra: &[(&str, f64)]) -> String {
        let mut meters: Vec<(&'static str, Registered)> = self
            .meters
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        meters.sort_by(|a, b| a.0.cmp(b.0));

        let mut out = String::new();
        for (name, reg) in meters {
            let help = escape_help(reg.help);
            match reg.meter {
                Meter::Counter(c) => {
                    let _ = writeln!(out, "# HELP {name} {help}\n# TYPE {name} counter");
                    c.render(name, &mut out);
                }
                Meter::Timer(t) => {
                    let kind = if t.bounds().is_empty() { "summary" } else { "histogram" };
                    let _ = writeln!(out, "# HELP {name} {help}\n# TYPE {name} {kind}");
                    t.render(name, &[], &mut out);
                    let _ = writeln!(out, "# HELP {name}_max {help}\n# TYPE {name}_max gauge");
                    t.render_max(name, &[], &mut out);
                }
                Meter::TimerVec(v) => {
                    let kind = if v.bounds.is_empty() { "summary" } else { "histogram" };
                    let _ = writeln!(out, "# HELP {name} {help}\n# TYPE {name} {kind}");
                    v.render(name, &mut out);
                    let _ = writeln!(out, "# HELP {name}_max {help}\n# TYPE {name}_max gauge");
                    v.render_max(name, &mut out);
                }
            }
        }

        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {k} gauge\n{k} {v}");
        }
        out
    }
}
