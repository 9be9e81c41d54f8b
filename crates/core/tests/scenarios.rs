use lane_rhythm_core::{
    dispatch, Cue, CueSequence, EventLog, FlowState, FrameInput, GameConfig, GameEvent,
    GameFlowController, Lane, ResolutionKind, RhythmError, SessionReset,
};

fn lane(index: u8) -> Lane {
    Lane::new(index).unwrap()
}

fn config(num_lives: u32) -> GameConfig {
    GameConfig {
        num_lives,
        start_delay: 0.0,
        ..GameConfig::default()
    }
}

fn begin(num_lives: u32, cues: Vec<Cue>) -> GameFlowController {
    let mut flow = GameFlowController::new(config(num_lives), CueSequence::new(cues)).unwrap();
    flow.begin(Some(0.0));
    flow
}

#[derive(Default)]
struct ResetCounter(usize);

impl SessionReset for ResetCounter {
    fn reset_session(&mut self) {
        self.0 += 1;
    }
}

/// Ticks at 100 Hz from `from` up to and including `to`.
fn run(flow: &mut GameFlowController, from: f64, to: f64, log: &mut EventLog) {
    let mut reset = ResetCounter::default();
    let mut frame = (from * 100.0).round() as i64;
    while frame as f64 / 100.0 <= to + 1e-9 {
        let events = flow.tick(&FrameInput::at(frame as f64 / 100.0));
        dispatch(&events, log, &mut reset);
        frame += 1;
    }
}

#[test]
fn window_boundaries_for_cue_at_five_seconds() {
    let mut flow = begin(5, vec![Cue::new(5.0, lane(2))]);

    assert!(flow.tick(&FrameInput::at(4.19)).is_empty());
    let events = flow.tick(&FrameInput::at(4.2));
    assert_eq!(
        events,
        vec![GameEvent::Activated {
            lane: lane(2),
            lyric: None
        }]
    );

    assert!(flow.tick(&FrameInput::at(5.8)).is_empty());
    assert!(flow.session().judge().active().is_some());

    let events = flow.tick(&FrameInput::at(5.81));
    assert_eq!(
        events,
        vec![
            GameEvent::Resolved {
                lane: lane(2),
                kind: ResolutionKind::Expired
            },
            GameEvent::LifeLost { remaining: 4 },
        ]
    );
}

#[test]
fn scenario_a_untouched_cue_costs_one_life() {
    let mut flow = begin(5, vec![Cue::new(5.0, lane(2))]);
    let mut log = EventLog::new();

    run(&mut flow, 0.0, 5.8, &mut log);
    assert_eq!(flow.session().lives().remaining(), 5);
    assert_eq!(log.count("activated"), 1);

    run(&mut flow, 5.81, 8.0, &mut log);
    assert_eq!(log.resolution_count(ResolutionKind::Expired), 1);
    assert_eq!(flow.session().lives().remaining(), 4);
    assert_eq!(flow.state(), FlowState::Playing);
}

#[test]
fn scenario_b_correct_press_keeps_lives() {
    let mut flow = begin(5, vec![Cue::new(5.0, lane(2))]);
    let mut log = EventLog::new();
    run(&mut flow, 0.0, 4.49, &mut log);

    let events = flow.tick(&FrameInput::at(4.5).press(lane(2)));
    assert_eq!(
        events,
        vec![GameEvent::Resolved {
            lane: lane(2),
            kind: ResolutionKind::Hit
        }]
    );

    run(&mut flow, 4.51, 8.0, &mut log);
    assert_eq!(flow.session().lives().remaining(), 5);
    assert_eq!(log.resolution_count(ResolutionKind::Expired), 0);
}

#[test]
fn scenario_c_last_life_ends_in_loss() {
    let mut flow = begin(1, vec![Cue::new(1.0, lane(0)), Cue::new(3.0, lane(1))]);
    flow.tick(&FrameInput::at(0.5));

    let events = flow.tick(&FrameInput::at(0.6).press(lane(3)));
    assert_eq!(
        events,
        vec![
            GameEvent::Resolved {
                lane: lane(0),
                kind: ResolutionKind::Missed
            },
            GameEvent::LifeLost { remaining: 0 },
            GameEvent::GameOver,
            GameEvent::Feedback(lane_rhythm_core::FeedbackCue::Defeat),
        ]
    );
    assert_eq!(flow.state(), FlowState::Lost);

    let mut log = EventLog::new();
    let mut reset = ResetCounter::default();
    let mut t = 0.7;
    while t < 10.0 {
        let events = flow.tick(&FrameInput::at(t).press(lane(1)).finished(true));
        dispatch(&events, &mut log, &mut reset);
        t += 0.1;
    }

    assert_eq!(log.count("game_over"), 0);
    assert_eq!(log.count("activated"), 0);
    assert_eq!(log.count("won"), 0);
    assert_eq!(log.count("reset_requested"), 1);
    assert_eq!(reset.0, 1);
    assert_eq!(flow.session().lives().remaining(), 0);
}

#[test]
fn scenario_d_exhausted_chart_wins_once() {
    let mut flow = begin(5, vec![Cue::new(1.0, lane(1))]);
    let mut log = EventLog::new();
    run(&mut flow, 0.0, 1.0, &mut log);
    assert_eq!(flow.session().prompt_index(), 1);

    let mut reset = ResetCounter::default();
    for step in 0..500 {
        let now = 1.01 + step as f64 * 0.01;
        let events = flow.tick(&FrameInput::at(now).finished(true));
        dispatch(&events, &mut log, &mut reset);
    }

    assert_eq!(log.count("won"), 1);
    assert_eq!(log.count("reset_requested"), 1);
    assert_eq!(reset.0, 1);
    assert_eq!(flow.state(), FlowState::Won);
}

#[test]
fn no_win_while_cues_remain() {
    let mut flow = begin(5, vec![Cue::new(1.0, lane(1)), Cue::new(30.0, lane(2))]);
    let mut log = EventLog::new();
    for step in 0..300 {
        let events = flow.tick(&FrameInput::at(step as f64 * 0.01).finished(true));
        dispatch(&events, &mut log, &mut ResetCounter::default());
    }
    assert_eq!(log.count("won"), 0);
    assert_eq!(flow.state(), FlowState::Playing);
}

#[test]
fn idle_presses_never_cost_lives() {
    let mut flow = begin(5, vec![Cue::new(10.0, lane(0))]);
    for step in 0..100 {
        let input = FrameInput::at(step as f64 * 0.05)
            .press(lane(1))
            .press(lane(3));
        assert!(flow.tick(&input).is_empty());
    }
    assert_eq!(flow.session().lives().remaining(), 5);
}

#[test]
fn unresolved_cue_is_replaced_without_penalty() {
    let mut flow = begin(5, vec![Cue::new(1.0, lane(0)), Cue::new(1.5, lane(3))]);

    assert_eq!(flow.tick(&FrameInput::at(0.3)).len(), 1);
    assert_eq!(flow.tick(&FrameInput::at(0.75)).len(), 1);
    assert_eq!(flow.session().judge().active().unwrap().cue.lane, lane(3));

    let events = flow.tick(&FrameInput::at(0.8).press(lane(3)));
    assert_eq!(
        events,
        vec![GameEvent::Resolved {
            lane: lane(3),
            kind: ResolutionKind::Hit
        }]
    );
    assert_eq!(flow.session().lives().remaining(), 5);
}

#[test]
fn prompt_index_is_monotonic_and_bounded() {
    let cues: Vec<Cue> = (0..40)
        .map(|i| Cue::new(0.25 * i as f64, lane((i % 4) as u8)))
        .collect();
    let total = cues.len();
    let mut flow = begin(100, cues);

    let mut previous = 0;
    for step in 0..1_500 {
        let now = step as f64 / 60.0;
        let mut input = FrameInput::at(now);
        if step % 7 == 0 {
            input = input.press(lane((step % 4) as u8));
        }
        flow.tick(&input);

        let index = flow.session().prompt_index();
        assert!(index >= previous);
        assert!(index <= total);
        previous = index;
    }
    assert_eq!(previous, total);
}

#[test]
fn misses_cost_exactly_one_life_each() {
    let cues: Vec<Cue> = (0..4).map(|i| Cue::new(1.0 + 2.0 * i as f64, lane(0))).collect();
    let mut flow = begin(5, cues);

    // Wrong lane on the first two cues, ignore the last two.
    let mut log = EventLog::new();
    let mut reset = ResetCounter::default();
    for step in 0..1_000 {
        let now = step as f64 * 0.01;
        let mut input = FrameInput::at(now);
        if step == 50 || step == 250 {
            input = input.press(lane(1));
        }
        let events = flow.tick(&input);
        dispatch(&events, &mut log, &mut reset);
    }

    assert_eq!(log.resolution_count(ResolutionKind::Missed), 2);
    assert_eq!(log.resolution_count(ResolutionKind::Expired), 2);
    assert_eq!(flow.session().lives().remaining(), 1);
    assert_eq!(flow.state(), FlowState::Playing);
}

#[test]
fn session_without_lives_is_refused() {
    let cues = CueSequence::new(vec![Cue::new(1.0, lane(0)), Cue::new(3.0, lane(1))]);
    let err = GameFlowController::new(config(0), cues).unwrap_err();
    assert!(matches!(err, RhythmError::InvalidConfig(_)));
    assert!(format!("{err}").contains("num_lives"));
}

#[test]
fn single_life_is_lost_to_the_first_expiry() {
    let mut flow = begin(1, vec![Cue::new(1.0, lane(0)), Cue::new(3.0, lane(1))]);
    let mut log = EventLog::new();

    run(&mut flow, 0.0, 6.0, &mut log);

    assert_eq!(log.resolution_count(ResolutionKind::Expired), 1);
    assert_eq!(log.count("game_over"), 1);
    assert_eq!(log.count("activated"), 1);
    assert_eq!(flow.state(), FlowState::Lost);
}
