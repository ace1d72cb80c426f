//! End-to-end press handling: pin → debounce → link → request → sink.

use bigredbutton::app::events::{PressOutcome, RequestOutcome, RequestStatus};
use bigredbutton::app::link::LinkState;
use bigredbutton::app::ports::Clock;
use bigredbutton::app::service::ButtonController;
use bigredbutton::error::LinkError;

use crate::mock_hw::*;

const OK_200: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\npressed";

// ── Happy path ────────────────────────────────────────────────

#[test]
fn press_sends_one_get_and_reports_once() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let link = ScriptedLink::up_after(2);
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, link.clone(), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    run_for(&mut ctl, &mut pin, &mut clock, &mut sink, 100);
    assert!(sink.outcomes.is_empty());

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 150);

    assert_eq!(sink.outcomes, vec![PressOutcome::Request(RequestOutcome::success(200))]);
    assert_eq!(ctl.press_count(), 1);
    assert_eq!(ctl.link_state(), LinkState::Connected);
    assert_eq!(link.joins(), 1);
    assert_eq!(transport.opens(), 1);
    assert_eq!(transport.closes(), 1);
    assert_eq!(
        transport.written(),
        b"GET /button/press.php?buttonId=1 HTTP/1.1\r\nHost: api.myhost.com\r\nConnection: close\r\n\r\n"
    );
    assert_eq!(
        transport.log.borrow().last_target,
        Some(("api.myhost.com".to_string(), 80))
    );
}

#[test]
fn connected_link_is_reused_across_presses() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let link = ScriptedLink::up_after(0);
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, link.clone(), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    for _ in 0..3 {
        press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    }

    assert_eq!(sink.outcomes.len(), 3);
    assert!(sink.outcomes.iter().all(PressOutcome::is_delivered));
    assert_eq!(link.joins(), 1);
    assert_eq!(transport.opens(), 3);
    assert_eq!(transport.closes(), 3);
}

#[test]
fn long_hold_and_release_produce_nothing_extra() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, ScriptedLink::up_after(0), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 3_000);
    run_for(&mut ctl, &mut pin, &mut clock, &mut sink, 1_000);

    assert_eq!(sink.outcomes.len(), 1);
    assert_eq!(transport.opens(), 1);
    assert!(!ctl.is_pressed());
}

#[test]
fn contact_bounce_yields_a_single_press() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, ScriptedLink::up_after(0), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    // 30 ms of chatter, each level shorter than the debounce window.
    for i in 0..6 {
        pin.level = if i % 2 == 0 { config.pressed_level() } else { !config.pressed_level() };
        run_for(&mut ctl, &mut pin, &mut clock, &mut sink, 5);
    }
    assert!(sink.outcomes.is_empty());

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(sink.outcomes.len(), 1);
}

#[test]
fn http_error_status_is_still_a_successful_request() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let transport = ScriptedTransport::http(&clock, b"HTTP/1.0 503 Service Unavailable\r\n\r\n");
    let mut ctl = ButtonController::new(&config, ScriptedLink::up_after(0), transport);
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);

    assert_eq!(sink.outcomes, vec![PressOutcome::Request(RequestOutcome::success(503))]);
    assert!(!sink.outcomes[0].is_delivered());
    assert_eq!(ctl.link_state(), LinkState::Connected);
}

// ── Failure paths ─────────────────────────────────────────────

#[test]
fn link_timeout_skips_the_request() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, ScriptedLink::never_up(), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    let before = clock.now_ms();
    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);

    assert_eq!(sink.outcomes, vec![PressOutcome::LinkFailed(LinkError::Timeout)]);
    assert_eq!(ctl.link_state(), LinkState::Failed);
    assert_eq!(transport.opens(), 0);
    assert!(clock.now_ms() - before >= config.link_timeout_ms as u64);
}

#[test]
fn failed_link_recovers_on_the_next_press() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let link = ScriptedLink::rejecting();
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, link.clone(), transport);
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(sink.outcomes, vec![PressOutcome::LinkFailed(LinkError::Refused)]);
    assert_eq!(ctl.link_state(), LinkState::Failed);

    {
        let mut s = link.script.borrow_mut();
        s.reject_joins = false;
        s.polls_until_up = Some(1);
    }
    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);

    assert_eq!(sink.outcomes[1], PressOutcome::Request(RequestOutcome::success(200)));
    assert_eq!(ctl.link_state(), LinkState::Connected);
    assert_eq!(link.joins(), 2);
}

#[test]
fn failed_request_drops_the_link() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let link = ScriptedLink::up_after(0);
    let transport = ScriptedTransport::unreachable(&clock);
    let mut ctl = ButtonController::new(&config, link.clone(), transport.clone());
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(
        sink.outcomes,
        vec![PressOutcome::Request(RequestOutcome::failed(RequestStatus::TransportError))]
    );
    assert_eq!(ctl.link_state(), LinkState::Disconnected);
    assert_eq!(link.disconnects(), 1);
    assert!(transport.written().is_empty());

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(link.joins(), 2);
    assert_eq!(sink.outcomes.len(), 2);
}

#[test]
fn lost_link_is_noticed_between_presses() {
    let config = test_config();
    let mut clock = FakeClock::new();
    let link = ScriptedLink::up_after(0);
    let transport = ScriptedTransport::http(&clock, OK_200);
    let mut ctl = ButtonController::new(&config, link.clone(), transport);
    let mut pin = LevelPin::idle(&config);
    let mut sink = RecordingSink::default();

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(ctl.link_state(), LinkState::Connected);

    link.drop_link();
    run_for(&mut ctl, &mut pin, &mut clock, &mut sink, TICK_MS);
    assert_eq!(ctl.link_state(), LinkState::Disconnected);

    press(&mut ctl, &config, &mut pin, &mut clock, &mut sink, 100);
    assert_eq!(link.joins(), 2);
    assert!(sink.outcomes[1].is_delivered());
}
