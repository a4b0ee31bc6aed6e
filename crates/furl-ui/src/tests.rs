#[cfg(test)]
mod tests {
    use furl_core::ManualTime;
    use web_time::Duration;

    use crate::*;

    #[derive(Default)]
    struct Field {
        blurs: usize,
    }

    impl TextFieldHost for Field {
        fn blur(&mut self) {
            self.blurs += 1;
        }
    }

    #[derive(Default)]
    struct List {
        requests: Vec<f32>,
    }

    impl ScrollHost for List {
        fn scroll_to(&mut self, offset: f32) {
            self.requests.push(offset);
        }
    }

    fn header() -> (SearchHeader, ManualTime) {
        let time = ManualTime::new();
        let header = SearchHeader::new(HeaderConfig::default(), time.clone()).unwrap();
        (header, time)
    }

    fn step(header: &mut SearchHeader, time: &ManualTime, ms: u64) {
        time.advance_ms(ms);
        header.frame().unwrap();
    }

    fn settle(header: &mut SearchHeader, time: &ManualTime) {
        for _ in 0..100 {
            if !header.needs_frame() {
                return;
            }
            step(header, time, 16);
        }
        panic!("header never settled");
    }

    fn line(label: &str, header: &SearchHeader) -> String {
        let o = header.outputs().unwrap();
        format!(
            "{label:<8} h={:.1} pad={:.1} margin={:.1} cancel={:.1} phase={:?}",
            o.header_height,
            o.content_padding_top,
            o.input_margin_right,
            o.cancel_translate_x,
            header.phase()
        )
    }

    #[test]
    fn test_initial_outputs() {
        let (header, _t) = header();
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 140.0);
        assert_eq!(o.content_padding_top, 140.0);
        assert_eq!(o.input_margin_right, 8.0);
        assert_eq!(o.cancel_translate_x, 100.0);
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
        assert_eq!(header.phase(), HeaderPhase::Tracking);
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_focus_collapses_header() {
        let (mut header, t) = header();
        header.on_focus().unwrap();
        assert_eq!(header.phase(), HeaderPhase::Collapsing);
        assert!(header.is_animating().unwrap());

        step(&mut header, &t, 225);
        assert_eq!(header.outputs().unwrap().header_height, 106.0);

        step(&mut header, &t, 225);
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 72.0);
        assert_eq!(o.content_padding_top, 72.0);
        assert_eq!(header.last_scroll().unwrap(), 72.0);
        assert!(header.should_animate_back().unwrap());
        assert!(!header.should_animate_forward().unwrap());
        assert_eq!(header.phase(), HeaderPhase::Collapsed);
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_scroll_during_collapse_keeps_target() {
        let (mut header, t) = header();
        header.on_focus().unwrap();
        step(&mut header, &t, 225);

        header.on_scroll(30.0).unwrap();
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 106.0);
        assert_eq!(o.content_padding_top, 136.0);
        assert_eq!(header.phase(), HeaderPhase::Collapsing);

        step(&mut header, &t, 225);
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 72.0);
        assert_eq!(header.last_scroll().unwrap(), 102.0);
        assert_eq!(o.content_padding_top, 102.0);

        // Pinned: scrolling moves neither the header nor the padding.
        header.on_scroll(10.0).unwrap();
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 72.0);
        assert_eq!(o.content_padding_top, 102.0);
    }

    #[test]
    fn test_blur_expands_to_scroll_height() {
        let (mut header, t) = header();
        header.on_scroll(20.0).unwrap();
        assert_eq!(header.outputs().unwrap().header_height, 120.0);

        header.on_focus().unwrap();
        step(&mut header, &t, 225);
        assert_eq!(header.outputs().unwrap().header_height, 96.0);
        step(&mut header, &t, 225);
        assert_eq!(header.last_scroll().unwrap(), 92.0);

        header.on_blur().unwrap();
        assert_eq!(header.phase(), HeaderPhase::Expanding);
        assert_eq!(header.outputs().unwrap().header_height, 72.0);

        step(&mut header, &t, 225);
        assert_eq!(header.outputs().unwrap().header_height, 96.0);
        step(&mut header, &t, 225);

        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 120.0);
        assert_eq!(o.content_padding_top, 140.0);
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
        assert!(header.should_animate_forward().unwrap());
        assert_eq!(header.phase(), HeaderPhase::Tracking);
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_cancel_blurs_field_then_expands() {
        let (mut header, t) = header();
        let mut field = Field::default();
        header.on_focus().unwrap();
        settle(&mut header, &t);

        header.on_cancel(&mut field).unwrap();
        assert_eq!(field.blurs, 1);
        assert_eq!(header.focus().unwrap(), FocusState::Blurred);
        assert_eq!(header.phase(), HeaderPhase::Expanding);

        step(&mut header, &t, 225);
        let before = header.outputs().unwrap();
        // The field echoes the forced blur back.
        header.on_blur().unwrap();
        assert_eq!(header.outputs().unwrap(), before);
        assert_eq!(header.phase(), HeaderPhase::Expanding);

        settle(&mut header, &t);
        assert_eq!(header.outputs().unwrap().header_height, 140.0);
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
    }

    #[test]
    fn test_blur_without_focus_is_ignored() {
        let (mut header, _t) = header();
        let mut field = Field::default();
        header.on_cancel(&mut field).unwrap();
        assert_eq!(field.blurs, 1);
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_height_never_below_floor() {
        let (mut header, t) = header();
        for s in (-500..=1000).step_by(25) {
            header.on_scroll(s as f32).unwrap();
            let h = header.outputs().unwrap().header_height;
            assert!(h >= 72.0, "height {h} at scroll {s}");
        }

        header.on_scroll(0.0).unwrap();
        header.on_focus().unwrap();
        for s in (-500..=1000).step_by(50) {
            header.on_scroll(s as f32).unwrap();
            step(&mut header, &t, 16);
            let h = header.outputs().unwrap().header_height;
            assert!(h >= 72.0, "height {h} at scroll {s}");
        }
    }

    #[test]
    fn test_idle_tracks_scroll() {
        let (mut header, _t) = header();
        for s in [-40.0, 0.0, 12.5, 68.0, 69.0, 300.0, 5.0] {
            header.on_scroll(s).unwrap();
            let o = header.outputs().unwrap();
            assert_eq!(o.header_height, f32::max(140.0 - s, 72.0));
            assert_eq!(o.content_padding_top, 140.0);
            assert_eq!(header.scroll_position(), s);
        }
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_random_events_keep_machine_consistent() {
        let (mut header, t) = header();
        let mut field = Field::default();
        let mut seed = 0x2545_f491u32;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed
        };

        for _ in 0..400 {
            match next() % 6 {
                0 => header.on_focus().unwrap(),
                1 => header.on_blur().unwrap(),
                2 => header.on_cancel(&mut field).unwrap(),
                3 => header.on_scroll((next() % 200) as f32 - 40.0).unwrap(),
                _ => step(&mut header, &t, (next() % 120) as u64),
            }
            let h = header.outputs().unwrap().header_height;
            assert!((72.0..=180.0).contains(&h), "height {h}");
            assert_ne!(
                header.should_animate_forward().unwrap(),
                header.should_animate_back().unwrap()
            );
        }

        settle(&mut header, &t);
        assert!(matches!(
            header.phase(),
            HeaderPhase::Collapsed | HeaderPhase::Tracking
        ));
    }

    #[test]
    fn test_blur_mid_collapse_restarts_cleanly() {
        let (mut header, t) = header();
        header.on_focus().unwrap();
        step(&mut header, &t, 225);
        assert_eq!(header.outputs().unwrap().header_height, 106.0);

        // Collapse never finished, so nothing is armed for the way back.
        header.on_blur().unwrap();
        assert_eq!(header.phase(), HeaderPhase::Tracking);
        assert_eq!(header.outputs().unwrap().header_height, 140.0);
        assert!(!header.is_animating().unwrap());
        assert_eq!(header.focus().unwrap(), FocusState::Unset);

        step(&mut header, &t, 1000);
        header.on_focus().unwrap();
        assert_eq!(header.outputs().unwrap().header_height, 140.0);
        step(&mut header, &t, 225);
        assert_eq!(header.outputs().unwrap().header_height, 106.0);
    }

    #[test]
    fn test_focus_below_floor_counts_as_collapsed() {
        let (mut header, t) = header();
        header.on_scroll(100.0).unwrap();
        assert_eq!(header.outputs().unwrap().header_height, 72.0);

        header.on_focus().unwrap();
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 72.0);
        assert_eq!(o.content_padding_top, 172.0);
        assert!(header.should_animate_back().unwrap());
        assert!(!header.is_animating().unwrap());

        // Scrolling while pinned keeps the snapshot.
        header.on_scroll(120.0).unwrap();
        assert_eq!(header.outputs().unwrap().content_padding_top, 172.0);

        header.on_blur().unwrap();
        assert_eq!(header.phase(), HeaderPhase::Expanding);
        settle(&mut header, &t);
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
        assert!(header.should_animate_forward().unwrap());

        header.on_scroll(0.0).unwrap();
        let o = header.outputs().unwrap();
        assert_eq!(o.header_height, 140.0);
        assert_eq!(o.content_padding_top, 140.0);
    }

    #[test]
    fn test_blur_at_floor_returns_to_idle() {
        let (mut header, t) = header();
        header.on_focus().unwrap();
        step(&mut header, &t, 100);

        // Scrolled past the floor mid-collapse, then blurred right away.
        header.on_scroll(100.0).unwrap();
        assert!(!header.is_animating().unwrap());
        header.on_blur().unwrap();
        settle(&mut header, &t);

        header.on_scroll(0.0).unwrap();
        let o = header.outputs().unwrap();
        assert_eq!(header.focus().unwrap(), FocusState::Unset);
        assert_eq!(o.header_height, 140.0);
        assert_eq!(o.content_padding_top, 140.0);
    }

    #[test]
    fn test_collapse_is_smooth_after_long_uptime() {
        let run = |uptime: Duration| {
            let time = ManualTime::new();
            let mut header = SearchHeader::new(HeaderConfig::default(), time.clone()).unwrap();
            time.advance(uptime);
            header.on_focus().unwrap();
            let mut heights = Vec::new();
            for _ in 0..12 {
                step(&mut header, &time, 16);
                heights.push(header.outputs().unwrap().header_height);
            }
            heights
        };

        let fresh = run(Duration::ZERO);
        let aged = run(Duration::from_secs(80 * 3600));
        assert_eq!(aged, fresh);
        assert!(fresh.windows(2).all(|w| w[1] < w[0]), "{fresh:?}");
    }

    #[test]
    fn test_input_retargets_on_quick_blur() {
        let (mut header, t) = header();
        header.on_focus().unwrap();
        step(&mut header, &t, 225);
        let o = header.outputs().unwrap();
        assert_eq!((o.input_margin_right, o.cancel_translate_x), (46.0, 38.0));

        header.on_blur().unwrap();
        let o = header.outputs().unwrap();
        assert_eq!((o.input_margin_right, o.cancel_translate_x), (46.0, 38.0));

        step(&mut header, &t, 225);
        let o = header.outputs().unwrap();
        assert_eq!((o.input_margin_right, o.cancel_translate_x), (8.0, 100.0));
    }

    #[test]
    fn test_scroll_to_waits_for_flush() {
        let (mut header, _t) = header();
        let mut list = List::default();
        header.scroll_to(10.0);
        header.scroll_to(50.0);
        assert!(header.needs_frame());

        assert!(header.flush_scroll(&mut list));
        assert!(!header.flush_scroll(&mut list));
        assert_eq!(list.requests, vec![50.0]);
        assert!(!header.needs_frame());
    }

    #[test]
    fn test_scroll_position_is_exported() {
        let (mut header, _t) = header();
        let handle = header.scroll_position_handle();
        header.on_scroll(42.0).unwrap();
        assert_eq!(handle.get(), 42.0);

        header.on_scroll_end_drag();
        assert_eq!(header.outputs().unwrap().header_height, 98.0);
    }

    #[test]
    fn test_scroll_event_ignores_other_paths() {
        let (mut header, _t) = header();
        let event = furl_core::NativeEvent::new()
            .with("contentOffset.x", 300.0)
            .with(CONTENT_OFFSET_Y, 50.0);
        header.on_scroll_event(&event).unwrap();
        assert_eq!(header.outputs().unwrap().header_height, 90.0);
    }

    #[test]
    fn test_config_validation() {
        let bad = [
            (HeaderConfig::heights(140.0, 0.0), ConfigError::NonPositiveCollapsedHeight(0.0)),
            (
                HeaderConfig::heights(100.0, 120.0),
                ConfigError::CollapsedNotBelowBig {
                    collapsed: 120.0,
                    big: 100.0,
                },
            ),
            (
                HeaderConfig::default()
                    .with_timing(furl_core::TimingConfig::linear(Duration::ZERO)),
                ConfigError::ZeroDuration,
            ),
        ];
        for (config, expected) in bad {
            assert_eq!(config.validate(), Err(expected.clone()));
            let err = SearchHeader::new(config, ManualTime::new()).err();
            assert_eq!(err, Some(HeaderError::Config(expected)));
        }
        assert!(HeaderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_classify() {
        use FocusState::*;
        let cases = [
            (Focused, 140.0, Armed::Forward, HeaderPhase::Collapsing),
            (Focused, 140.0, Armed::Back, HeaderPhase::Collapsed),
            (Focused, 72.0, Armed::Forward, HeaderPhase::Tracking),
            (Blurred, 140.0, Armed::Back, HeaderPhase::Expanding),
            (Blurred, 10.0, Armed::Back, HeaderPhase::Expanding),
            (Blurred, 140.0, Armed::Forward, HeaderPhase::Tracking),
            (Unset, 140.0, Armed::Back, HeaderPhase::Tracking),
        ];
        for (focus, current, armed, expected) in cases {
            assert_eq!(HeaderPhase::classify(focus, current, armed, 72.0), expected);
        }
        for focus in [Unset, Blurred, Focused] {
            assert_eq!(FocusState::from_code(focus.code()), focus);
        }
    }

    #[test]
    fn test_focus_blur_trace() {
        let (mut header, t) = header();
        let mut trace = vec![line("initial", &header)];

        header.on_focus().unwrap();
        trace.push(line("focus", &header));
        step(&mut header, &t, 225);
        trace.push(line("+225ms", &header));
        step(&mut header, &t, 225);
        trace.push(line("+225ms", &header));

        header.on_blur().unwrap();
        trace.push(line("blur", &header));
        step(&mut header, &t, 225);
        trace.push(line("+225ms", &header));
        step(&mut header, &t, 225);
        trace.push(line("+225ms", &header));

        insta::assert_snapshot!(trace.join("\n"), @r"
        initial  h=140.0 pad=140.0 margin=8.0 cancel=100.0 phase=Tracking
        focus    h=140.0 pad=140.0 margin=8.0 cancel=100.0 phase=Collapsing
        +225ms   h=106.0 pad=106.0 margin=46.0 cancel=38.0 phase=Collapsing
        +225ms   h=72.0 pad=72.0 margin=84.0 cancel=-24.0 phase=Collapsed
        blur     h=72.0 pad=72.0 margin=84.0 cancel=-24.0 phase=Expanding
        +225ms   h=106.0 pad=106.0 margin=46.0 cancel=38.0 phase=Expanding
        +225ms   h=140.0 pad=140.0 margin=8.0 cancel=100.0 phase=Tracking
        ");
    }
}
