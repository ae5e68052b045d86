#[cfg(test)]
mod tests {

    use std::path::PathBuf;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};
    use crate::core::{PlaybackState, PlayerError};
    use crate::player::fake_mixer::{FakeMixer, MixerCall};
    use crate::player::PlayerController;
    use crate::audio::Mixer;
    use crate::status::{Led, StatusIndicator};
    use crate::test_support::{temp_path, write_test_tone, RecordingLedDriver};

    fn controller() -> (PlayerController, FakeMixer) {
        let mixer = FakeMixer::default();
        let controller = PlayerController::new(Box::new(mixer.clone()), None);
        (controller, mixer)
    }

    fn controller_with_leds() -> (PlayerController, FakeMixer, RecordingLedDriver) {
        let mixer = FakeMixer::default();
        let leds = RecordingLedDriver::default();
        let indicator = StatusIndicator::new(Box::new(leds.clone()), Duration::from_millis(10));
        let controller = PlayerController::new(Box::new(mixer.clone()), Some(indicator));
        (controller, mixer, leds)
    }

    fn tone_file() -> PathBuf {
        let path = temp_path("tone.wav");
        write_test_tone(&path, 440.0, 2000);
        path
    }

    #[test]
    fn test_play_after_load_calls_mixer_play() {
        let (mut controller, mixer) = controller();
        let path = tone_file();

        controller.load(&path).expect("load should succeed");
        controller.play(Instant::now()).expect("play should succeed");

        assert_eq!(mixer.calls(), vec![MixerCall::Load(path), MixerCall::Play]);
        assert_eq!(controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_play_without_file_is_rejected() {
        let (mut controller, mixer) = controller();

        match controller.play(Instant::now()) {
            Err(PlayerError::NoTrackLoaded) => {}
            other => panic!("Expected NoTrackLoaded, got {:?}", other),
        }
        assert!(mixer.calls().is_empty());
        assert_eq!(controller.state(), PlaybackState::Empty);
    }

    #[test]
    fn test_load_rejects_unsupported_extension() {
        let (mut controller, mixer) = controller();
        let path = temp_path("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert!(matches!(controller.load(&path), Err(PlayerError::UnsupportedFormat(_))));
        assert!(mixer.calls().is_empty());
        assert!(controller.track().is_none());
    }

    #[test]
    fn test_load_missing_file_keeps_previous_track() {
        let (mut controller, _mixer) = controller();
        let path = tone_file();
        controller.load(&path).unwrap();

        let missing = temp_path("gone.mp3");
        assert!(matches!(controller.load(&missing), Err(PlayerError::Open { .. })));
        assert_eq!(controller.track().map(|t| t.path.clone()), Some(path));
    }

    #[test]
    fn test_load_caches_duration() {
        let (mut controller, _mixer) = controller();
        let track = controller.load(&tone_file()).unwrap();

        let duration = track.metadata.duration.expect("duration should be known");
        assert!(duration >= Duration::from_millis(1900) && duration <= Duration::from_millis(2100));
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_duration_falls_back_to_decoder() {
        let mut mixer = FakeMixer::default();
        mixer.duration = Some(Duration::from_secs(95));
        let mut controller = PlayerController::new(Box::new(mixer), None);

        let path = temp_path("stream.ogg");
        std::fs::write(&path, b"no ogg pages here").unwrap();
        let track = controller.load(&path).unwrap();
        assert_eq!(track.metadata.duration, Some(Duration::from_secs(95)));
    }

    #[test]
    fn test_toggle_pause_alternates() {
        let (mut controller, mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();

        controller.toggle_pause(t0 + Duration::from_secs(1));
        assert_eq!(controller.state(), PlaybackState::Paused);
        assert_eq!(controller.state().pause_button_label(), "Resume");

        controller.toggle_pause(t0 + Duration::from_secs(2));
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.state().pause_button_label(), "Pause");

        let calls = mixer.calls();
        assert_eq!(&calls[2..], &[MixerCall::Pause, MixerCall::Unpause]);
    }

    #[test]
    fn test_toggle_pause_ignored_when_stopped() {
        let (mut controller, mixer) = controller();
        controller.toggle_pause(Instant::now());
        controller.load(&tone_file()).unwrap();
        controller.toggle_pause(Instant::now());

        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert!(!mixer.calls().contains(&MixerCall::Pause));
    }

    #[test]
    fn test_play_while_paused_restarts_and_clears_pause() {
        let (mut controller, _mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();
        controller.toggle_pause(t0 + Duration::from_secs(1));

        let t1 = t0 + Duration::from_secs(5);
        controller.play(t1).unwrap();
        assert_eq!(controller.state(), PlaybackState::Playing);
        assert_eq!(controller.poll(t1).elapsed, Duration::ZERO);
    }

    #[test]
    fn test_failed_play_from_stopped_stays_stopped() {
        let (mut controller, mixer) = controller();
        controller.load(&tone_file()).unwrap();
        mixer.fail_play.store(true, Ordering::SeqCst);

        assert!(matches!(controller.play(Instant::now()), Err(PlayerError::Playback(_))));
        assert_eq!(controller.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_failed_play_while_paused_falls_back_to_stopped() {
        let (mut controller, mixer, leds) = controller_with_leds();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();
        controller.toggle_pause(t0 + Duration::from_secs(1));
        mixer.fail_play.store(true, Ordering::SeqCst);

        assert!(controller.play(t0 + Duration::from_secs(2)).is_err());
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.state().pause_button_label(), "Pause");
        assert_eq!(mixer.calls().last(), Some(&MixerCall::Stop));
        assert!(!mixer.is_busy());

        let snapshot = controller.poll(t0 + Duration::from_secs(3));
        assert_eq!(snapshot.elapsed, Duration::ZERO);
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(leds.lit(), (true, false, false));
    }

    #[test]
    fn test_transitions_drive_leds() {
        let (mut controller, mixer, leds) = controller_with_leds();
        assert_eq!(leds.lit(), (true, false, false), "nothing loaded shows red");

        controller.load(&tone_file()).unwrap();
        assert_eq!(leds.lit(), (true, false, false), "loaded shows red");

        let t0 = Instant::now();
        controller.play(t0).unwrap();
        std::thread::sleep(Duration::from_millis(50));
        assert!(leds.green_toggles() >= 2, "green should blink while playing");
        assert!(!leds.level(Led::Red));
        assert!(!leds.level(Led::Yellow));

        controller.toggle_pause(t0 + Duration::from_secs(1));
        assert_eq!(leds.lit(), (false, true, false), "paused shows yellow");

        controller.toggle_pause(t0 + Duration::from_secs(2));
        assert!(!leds.level(Led::Yellow));

        mixer.finish_track();
        controller.poll(t0 + Duration::from_secs(3));
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(leds.lit(), (true, false, false), "end of track shows red");
    }

    #[test]
    fn test_stop_resets_clock() {
        let (mut controller, mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();

        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(controller.poll(t0 + Duration::from_secs(3)).elapsed, Duration::ZERO);
        assert_eq!(mixer.calls().last(), Some(&MixerCall::Stop));
    }

    #[test]
    fn test_stop_without_file_stays_empty() {
        let (mut controller, _mixer) = controller();
        controller.stop();
        assert_eq!(controller.state(), PlaybackState::Empty);
    }

    #[test]
    fn test_poll_reports_countdown() {
        let (mut controller, _mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();

        let snapshot = controller.poll(t0 + Duration::from_secs(1));
        assert_eq!(snapshot.elapsed, Duration::from_secs(1));
        let remaining = snapshot.remaining().expect("duration known");
        assert!(remaining <= Duration::from_millis(1100));
        assert_eq!(controller.state(), PlaybackState::Playing);
    }

    #[test]
    fn test_poll_detects_end_of_track() {
        let (mut controller, mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();

        mixer.finish_track();
        let snapshot = controller.poll(t0 + Duration::from_secs(3));
        assert_eq!(controller.state(), PlaybackState::Stopped);
        assert_eq!(snapshot.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_poll_does_not_stop_paused_track() {
        let (mut controller, mixer) = controller();
        let t0 = Instant::now();
        controller.load(&tone_file()).unwrap();
        controller.play(t0).unwrap();
        controller.toggle_pause(t0 + Duration::from_secs(1));

        mixer.finish_track();
        controller.poll(t0 + Duration::from_secs(2));
        assert_eq!(controller.state(), PlaybackState::Paused);
    }

    #[test]
    fn test_set_volume_clamps() {
        let (mut controller, mixer) = controller();
        controller.set_volume(1.5);
        controller.set_volume(0.4);
        assert_eq!(mixer.calls(), vec![MixerCall::SetVolume(1.0), MixerCall::SetVolume(0.4)]);
    }
}
