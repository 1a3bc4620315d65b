#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use shardcrypt_core::pipeline::state::{PipelineState, StateTracker};
    use shardcrypt_core::prelude::*;
    use shardcrypt_core::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        let mut c = TelemetryCounters::default();
        c.add_shard(40, 4);
        c.add_shard(23, 2);
        c.add_padding(8);
        c.set_io(1000, 1008);
        c
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20)); // ensure elapsed > stage times
        timer.add_stage_time(Stage::Read, Duration::from_millis(5));
        timer.add_stage_time(Stage::Write, Duration::from_millis(10));
        timer.finish();
        timer
    }

    #[test]
    fn counters_merge_without_sharing() {
        let mut a = TelemetryCounters::default();
        a.add_shard(3, 1);
        let mut b = TelemetryCounters::default();
        b.add_shard(0, 0);
        b.set_io(10, 16);
        a += b;

        assert_eq!(a.workers, 2);
        assert_eq!(a.blocks_processed, 3);
        assert_eq!(a.cipher_units, 1);
        assert_eq!(a.bytes_output, 16);
    }

    #[test]
    fn snapshot_passes_sanity_check() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        assert_eq!(snapshot.workers, 2);
        assert_eq!(snapshot.blocks_processed, 63);
        assert!(snapshot.throughput_bytes_per_sec > 0.0);
        assert!(snapshot.has_all_stages(&[Stage::Read, Stage::Write]));
        assert!(!snapshot.has_all_stages(&[Stage::Cipher]));
        assert!(snapshot.sanity_check());
    }

    #[test]
    fn sanity_check_catches_missing_blocks() {
        let mut counters = make_counters();
        counters.blocks_processed -= 1;
        let snapshot = TelemetrySnapshot::from(&counters, &make_timer());
        assert!(!snapshot.sanity_check());
    }

    #[test]
    fn timer_accumulates_repeated_stages() {
        let mut timer = TelemetryTimer::new();
        let v = timer.time(Stage::Cipher, || 7);
        assert_eq!(v, 7);
        timer.add_stage_time(Stage::Cipher, Duration::from_millis(3));
        assert!(timer.stage_times.get(Stage::Cipher) >= Duration::from_millis(3));
        assert_eq!(timer.stage_times.get(Stage::Unpad), Duration::ZERO);
    }

    #[test]
    fn snapshot_json_round_trip() {
        let snapshot = TelemetrySnapshot::from(&make_counters(), &make_timer());
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"bytes_padding\": 8"));
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.blocks_processed, snapshot.blocks_processed);
        assert_eq!(back.stage_times, snapshot.stage_times);
    }

    #[test]
    fn pipeline_run_reports_every_stage() {
        let params = CipherParams::new(CipherMode::Ecb, KeyStrength::Aes256, &[7u8; 32], None, Operation::Encrypt).unwrap();
        let report = run_pipeline(
            InputSource::Memory(vec![1u8; 1000]),
            OutputSink::Memory,
            &params,
            &ParallelismProfile::new(3, 2),
        )
        .unwrap();

        let t = &report.telemetry;
        assert_eq!(t.workers, 3);
        assert_eq!(t.bytes_input, 1000);
        assert_eq!(t.bytes_output, 1008);
        assert_eq!(t.bytes_padding, 8);
        assert_eq!(t.blocks_processed, 63);
        assert!(t.cipher_units >= 3);
        assert!(t.has_all_stages(&[
            Stage::Read,
            Stage::Validate,
            Stage::Pad,
            Stage::Broadcast,
            Stage::Partition,
            Stage::Distribute,
            Stage::Cipher,
            Stage::Collect,
        ]));
        assert!(!t.has_all_stages(&[Stage::Unpad]));
        assert!(t.sanity_check());
    }

    #[test]
    fn state_tracker_is_sticky_once_terminal() {
        let mut state = StateTracker::new(0);
        assert_eq!(state.current(), PipelineState::Init);
        state.advance(PipelineState::Cipher);
        assert_eq!(state.current().stage(), Some(Stage::Cipher));
        state.abort(&"boom");
        assert_eq!(state.current(), PipelineState::Aborted);
        state.advance(PipelineState::Done);
        assert_eq!(state.current(), PipelineState::Aborted);
    }

    #[test]
    fn state_run_charges_the_state_stage() {
        let mut state = StateTracker::new(0);
        let mut timer = TelemetryTimer::new();

        let v = state.run(PipelineState::Collect, &mut timer, || {
            std::thread::sleep(Duration::from_millis(5));
            11
        });
        assert_eq!(v, 11);
        assert_eq!(state.current(), PipelineState::Collect);
        assert!(timer.stage_times.get(Stage::Collect) >= Duration::from_millis(5));
        assert!(!timer.stage_times.contains(Stage::Cipher));

        // Terminal states carry no stage; the closure still runs.
        let before = timer.stage_times.total();
        state.abort(&"stop");
        let v = state.run(PipelineState::Done, &mut timer, || 3);
        assert_eq!(v, 3);
        assert_eq!(state.current(), PipelineState::Aborted);
        assert_eq!(timer.stage_times.total(), before);
    }
}
