//! # Session Flow Tests
//!
//! Full sessions against the scripted driver, with driver events delivered
//! through the event loop as an application would run it.

use std::sync::Arc;
use std::time::Duration;

use etiqueta::error::JobStep;
use etiqueta::label::LabelConfig;
use etiqueta::printer::PrinterConfig;
use etiqueta::render::{self, RasterImage};
use etiqueta::session::{
    DeviceEvent, HeartbeatData, PrintSession, PrinterInfo, RecordingObserver,
    SessionConfig,
};
use etiqueta::transport::{MockDriver, MockScript};
use tokio::sync::mpsc;

use etiqueta::session::PrinterState::*;

struct Harness {
    session: Arc<PrintSession>,
    driver: Arc<MockDriver>,
    observer: Arc<RecordingObserver>,
    pump: tokio::task::JoinHandle<()>,
}

fn start(script: MockScript, config: SessionConfig) -> Harness {
    let (driver, events) = MockDriver::new(script);
    let driver = Arc::new(driver);
    let observer = Arc::new(RecordingObserver::new());
    let session = Arc::new(PrintSession::new(driver.clone(), observer.clone(), config));
    let pump = tokio::spawn({
        let session = Arc::clone(&session);
        async move { session.run_event_loop(events).await }
    });
    Harness {
        session,
        driver,
        observer,
        pump,
    }
}

fn d110() -> SessionConfig {
    SessionConfig::for_printer(&PrinterConfig::D110)
}

fn label() -> RasterImage {
    let config = LabelConfig {
        text: "2024-01-01".to_string(),
        width_mm: 20.0,
        height_mm: 10.0,
        ..Default::default()
    };
    render::render_label(&config, &PrinterConfig::D110).raster
}

fn info() -> PrinterInfo {
    PrinterInfo {
        model: Some("D110".to_string()),
        serial: Some("H1234".to_string()),
        software_version: Some("5.14".to_string()),
    }
}

#[tokio::test]
async fn test_connect_print_disconnect() {
    let h = start(MockScript::default().printer_info(info()).heartbeat(3), d110());

    h.session.connect().await;
    tokio::task::yield_now().await;

    assert_eq!(h.session.state(), Connected);
    assert_eq!(h.session.printer_info(), Some(info()));
    assert_eq!(h.session.charge_percent(), Some(75));

    h.session.print(label()).await;
    assert_eq!(h.session.state(), Connected);

    let progress = h.observer.progress();
    assert_eq!(progress.len(), 3);
    assert_eq!(progress[2].to_string(), "Page 1/1 - print 100%, feed 100%");

    h.session.disconnect().await;
    tokio::task::yield_now().await;

    assert_eq!(h.session.state(), Disconnected);
    assert_eq!(h.session.printer_info(), None);
    assert_eq!(
        h.observer.states(),
        vec![Connecting, Connected, Printing, Connected, Disconnected]
    );
    assert!(h.observer.errors().is_empty());
    assert_eq!(
        h.driver.calls(),
        vec![
            "connect",
            "new_print_task D110",
            "print_init",
            "page 80x160 copies=1",
            "print_page",
            "wait_for_finished",
            "print_end",
            "disconnect",
        ]
    );

    h.pump.abort();
}

#[tokio::test]
async fn test_failed_connect_blocks_printing() {
    let h = start(MockScript::default().fail_connect("device not found"), d110());

    h.session.connect().await;
    h.session.print(label()).await;
    tokio::task::yield_now().await;

    assert_eq!(h.session.state(), Disconnected);
    assert_eq!(h.observer.errors(), vec!["Connection failed: device not found"]);
    assert!(h.observer.progress().is_empty());
    assert_eq!(h.driver.calls(), vec!["connect"]);

    h.pump.abort();
}

#[tokio::test]
async fn test_failed_job_leaves_session_usable() {
    let script = MockScript::default().fail_at(JobStep::PrintEnd, "lid open");
    let h = start(script, d110());

    h.session.connect().await;
    h.session.print(label()).await;

    assert_eq!(h.session.state(), Connected);
    assert_eq!(h.observer.errors(), vec!["print_end failed: lid open"]);

    h.session.disconnect().await;
    assert_eq!(h.session.state(), Disconnected);

    h.pump.abort();
}

#[tokio::test]
async fn test_link_drop_during_job() {
    let config = d110().job_timeout(Duration::from_millis(50));
    let h = start(MockScript::default().hang_at(JobStep::WaitForFinished), config);

    h.session.connect().await;
    tokio::join!(h.session.print(label()), async {
        tokio::task::yield_now().await;
        h.session.handle_event(DeviceEvent::Disconnected);
    });

    // The timed-out job must not bring the dead link back to connected
    assert_eq!(h.session.state(), Disconnected);
    assert_eq!(
        h.observer.states(),
        vec![Connecting, Connected, Printing, Disconnected]
    );
    assert_eq!(h.observer.errors(), vec!["Timed out waiting for print job"]);

    h.pump.abort();
}

#[tokio::test]
async fn test_reconnect_waits_for_stale_job() {
    let config = d110().job_timeout(Duration::from_millis(50));
    let h = start(MockScript::default().hang_at(JobStep::WaitForFinished), config);

    h.session.connect().await;
    tokio::join!(h.session.print(label()), async {
        tokio::task::yield_now().await;
        h.session.handle_event(DeviceEvent::Disconnected);
        h.session.connect().await;
        assert_eq!(h.session.state(), Connected);
        assert!(h.session.job_in_progress());

        // The first job hasn't returned yet, so this one never starts
        h.session.print(label()).await;
        assert_eq!(h.session.state(), Connected);
    });

    let inits = |calls: Vec<String>| calls.iter().filter(|c| *c == "print_init").count();
    assert_eq!(inits(h.driver.calls()), 1);
    assert_eq!(
        h.observer.states(),
        vec![Connecting, Connected, Printing, Disconnected, Connecting, Connected]
    );
    assert_eq!(h.observer.errors(), vec!["Timed out waiting for print job"]);
    assert_eq!(h.session.state(), Connected);
    assert!(!h.session.job_in_progress());

    // Once the stale job is gone, printing works again
    h.session.print(label()).await;
    assert_eq!(inits(h.driver.calls()), 2);

    h.pump.abort();
}

#[tokio::test]
async fn test_disconnect_refused_while_printing() {
    let config = d110().job_timeout(Duration::from_millis(50));
    let h = start(MockScript::default().hang_at(JobStep::PrintPage), config);

    h.session.connect().await;
    tokio::join!(h.session.print(label()), async {
        tokio::task::yield_now().await;
        assert_eq!(h.session.state(), Printing);
        h.session.disconnect().await;
        assert_eq!(h.session.state(), Printing);
    });

    assert_eq!(h.session.state(), Connected);
    assert!(!h.driver.calls().contains(&"disconnect".to_string()));

    h.pump.abort();
}

#[tokio::test]
async fn test_event_loop_stops_when_channel_closes() {
    let (driver, _events) = MockDriver::new(MockScript::default());
    let observer = Arc::new(RecordingObserver::new());
    let session = PrintSession::new(Arc::new(driver), observer.clone(), d110());
    session.connect().await;

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(DeviceEvent::Heartbeat(HeartbeatData {
        charge_level: Some(1),
    }))
    .unwrap();
    tx.send(DeviceEvent::Disconnected).unwrap();
    drop(tx);

    session.run_event_loop(rx).await;

    assert_eq!(session.state(), Disconnected);
    assert_eq!(session.heartbeat(), None);
    assert_eq!(observer.states(), vec![Connecting, Connected, Disconnected]);
}
