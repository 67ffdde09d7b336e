use owner_view_telemetry::{
    DEFAULT_LOG_FILTER, DebugFlag, LogEvent, LogLevel, Logger, ManualClock, MemorySink,
    ThrottleState, clear_throttle_state, create_logger, throttle_key,
};
use serde_json::json;
use std::sync::Arc;

struct Harness {
    flag: Arc<DebugFlag>,
    sink: Arc<MemorySink>,
    clock: Arc<ManualClock>,
    throttle: Arc<ThrottleState>,
    log: Logger,
}

fn harness(enabled: bool) -> Harness {
    let flag = Arc::new(DebugFlag::new(enabled));
    let sink = Arc::new(MemorySink::new());
    let clock = Arc::new(ManualClock::new(10_000));
    let throttle = Arc::new(ThrottleState::new());
    let log = create_logger("[Owner View] [Test]", flag.clone())
        .with_sink(sink.clone())
        .with_clock(clock.clone())
        .with_throttle(throttle.clone());
    Harness {
        flag,
        sink,
        clock,
        throttle,
        log,
    }
}

#[test]
fn gate_disabled_only_errors_are_emitted() {
    let h = harness(false);
    h.log.debug("debug", json!(null));
    h.log.debug_throttled("throttled", json!(null));
    h.log.info("info", json!(null));
    h.log.warn("warn", json!(null));
    h.log.group("group");
    h.log.group_collapsed("collapsed");
    h.log.group_end();
    h.log.time("timer");
    h.log.time_log("timer", json!(null));
    h.log.time_end("timer");
    h.log.table(json!([{ "id": 1 }]));
    h.log.error("boom", json!({ "reason": "lookup failed" }));

    let events = h.sink.events();
    assert_eq!(events.len(), 1);
    let records = h.sink.records();
    assert_eq!(records[0].level, LogLevel::Error);
    assert_eq!(records[0].prefix, "[Owner View] [Test]");
    assert_eq!(records[0].message, "boom");
    assert_eq!(records[0].context, json!({ "reason": "lookup failed" }));
    assert!(h.throttle.is_empty());
    assert_eq!(h.log.prefix(), "[Owner View] [Test]");
}

#[test]
fn gate_enabled_emits_every_level_with_context() {
    let h = harness(true);
    h.log.debug("d", json!({ "topicId": 123 }));
    h.log.info("i", json!(null));
    h.log.warn("w", json!("data missing"));
    h.log.error("e", json!(null));

    let levels: Vec<LogLevel> = h.sink.records().iter().map(|r| r.level).collect();
    assert_eq!(
        levels,
        vec![LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error]
    );
    assert_eq!(h.sink.records()[0].context, json!({ "topicId": 123 }));
}

#[test]
fn gate_is_read_on_every_call() {
    let h = harness(false);
    h.log.info("hidden", json!(null));
    h.flag.set(true);
    h.log.info("shown", json!(null));
    h.flag.set(false);
    h.log.info("hidden again", json!(null));

    let messages: Vec<String> = h.sink.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["shown".to_string()]);
}

#[test]
fn throttled_debug_emits_once_per_window() {
    let h = harness(true);
    h.log.debug_throttled("render check", json!(null));
    h.clock.advance(1_999);
    h.log.debug_throttled("render check", json!(null));
    assert_eq!(h.sink.records().len(), 1);
    assert_eq!(
        h.throttle
            .last_emitted_ms(&throttle_key("[Owner View] [Test]", "render check")),
        Some(10_000)
    );

    h.clock.advance(1);
    h.log.debug_throttled("render check", json!(null));
    assert_eq!(h.sink.records().len(), 2);
}

#[test]
fn throttled_debug_is_per_message() {
    let h = harness(true);
    h.log.debug_throttled("first", json!(null));
    h.clock.advance(10);
    h.log.debug_throttled("second", json!(null));
    h.clock.advance(10);
    h.log.debug_throttled("first", json!(null));
    h.log.debug_throttled("second", json!(null));

    let messages: Vec<String> = h.sink.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn throttled_debug_custom_window() {
    let h = harness(true);
    h.log.debug_throttled_with("poll", 100, json!(null));
    h.clock.advance(100);
    h.log.debug_throttled_with("poll", 100, json!(null));
    assert_eq!(h.sink.records().len(), 2);
}

#[test]
fn markers_carry_prefixed_labels() {
    let h = harness(true);
    h.log.group("Multi-step Flow");
    h.log.time("Operation");
    h.log.time_log("Operation", json!({ "step": 1 }));
    h.log.time_end("Operation");
    h.log.group_end();
    h.log.table(json!([{ "id": 1 }]));

    assert_eq!(
        h.sink.events(),
        vec![
            LogEvent::GroupStart {
                prefix: "[Owner View] [Test]".to_string(),
                label: "Multi-step Flow".to_string(),
                collapsed: false,
            },
            LogEvent::TimerStart {
                label: "[Owner View] [Test] Operation".to_string(),
            },
            LogEvent::TimerLog {
                label: "[Owner View] [Test] Operation".to_string(),
                context: json!({ "step": 1 }),
            },
            LogEvent::TimerEnd {
                label: "[Owner View] [Test] Operation".to_string(),
            },
            LogEvent::GroupEnd,
            LogEvent::Table {
                prefix: "[Owner View] [Test]".to_string(),
                data: json!([{ "id": 1 }]),
            },
        ]
    );
}

#[test]
fn record_serializes_for_host_console() {
    let h = harness(false);
    h.log.error("boom", json!({ "code": 7 }));
    let record = h.sink.records().remove(0);
    assert_eq!(
        serde_json::to_value(&record).expect("serialize"),
        json!({
            "level": "error",
            "prefix": "[Owner View] [Test]",
            "message": "boom",
            "context": { "code": 7 },
        })
    );
}

#[test]
fn tracing_sink_accepts_every_event() {
    owner_view_telemetry::init_tracing();
    let flag = Arc::new(DebugFlag::new(true));
    let log = Logger::new("[Owner View] [Tracing]", flag);
    log.group("flow");
    log.time("op");
    log.info("step", json!({ "n": 1 }));
    log.time_log("op", json!(null));
    log.time_end("op");
    log.time_end("never started");
    log.group_end();
    log.group_end();
    log.debug_throttled("tick", json!(null));
    log.error("failed", json!(null));
}

#[test]
fn clearing_global_throttle_state_reopens_the_window() {
    let flag = Arc::new(DebugFlag::new(true));
    let sink = Arc::new(MemorySink::new());
    let clock = Arc::new(ManualClock::new(50_000));
    // 使用进程级节流表，前缀唯一以免与其它用例冲突。
    let log = Logger::new("[Owner View] [Reset]", flag)
        .with_sink(sink.clone())
        .with_clock(clock.clone());

    log.debug_throttled("reset tick", json!(null));
    log.debug_throttled("reset tick", json!(null));
    assert_eq!(sink.records().len(), 1);

    clear_throttle_state();
    log.debug_throttled("reset tick", json!(null));
    assert_eq!(sink.records().len(), 2);
}

#[test]
fn default_filter_shows_debug_records_from_this_crate() {
    assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    assert!(DEFAULT_LOG_FILTER.starts_with("info"));
    assert!(DEFAULT_LOG_FILTER.contains("owner_view_telemetry=debug"));
}
