mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use stairlight::rail::LightRail;
    use stairlight::LightLine;

    /// Chronological record of hardware calls, shared between fake lines.
    type Journal = Rc<RefCell<Vec<(u8, &'static str)>>>;

    struct FakeLine {
        id: u8,
        fail_writes: bool,
        journal: Journal,
    }

    impl LightLine for FakeLine {
        type Error = &'static str;

        fn set(&mut self, on: bool) -> Result<(), Self::Error> {
            if self.fail_writes {
                return Err("write failed");
            }
            self.journal
                .borrow_mut()
                .push((self.id, if on { "on" } else { "off" }));
            Ok(())
        }

        fn release(&mut self) {
            self.journal.borrow_mut().push((self.id, "release"));
        }
    }

    fn rail_of(ids: &[u8], journal: &Journal) -> LightRail<FakeLine, 8> {
        LightRail::acquire(ids, |id| {
            Ok(FakeLine {
                id,
                fail_writes: false,
                journal: Rc::clone(journal),
            })
        })
        .unwrap()
    }

    #[test]
    fn test_acquire_preserves_order_and_starts_dark() {
        let journal: Journal = Journal::default();
        let rail = rail_of(&[4, 5, 6], &journal);
        assert_eq!(rail.len(), 3);
        assert_eq!(rail.states(), &[false, false, false]);
    }

    #[test]
    fn test_partial_acquire_rolls_back() {
        let journal: Journal = Journal::default();
        let result: Result<LightRail<FakeLine, 8>, _> = LightRail::acquire(&[4, 5, 6], |id| {
            if id == 6 {
                Err("line busy")
            } else {
                Ok(FakeLine {
                    id,
                    fail_writes: false,
                    journal: Rc::clone(&journal),
                })
            }
        });

        let err = result.err().unwrap();
        assert_eq!(err.line, 2);
        assert_eq!(err.source, "line busy");
        // Both already-acquired lines were released, in order.
        assert_eq!(&*journal.borrow(), &[(4, "release"), (5, "release")]);
    }

    #[test]
    fn test_apply_only_touches_changed_lines() {
        let journal: Journal = Journal::default();
        let mut rail = rail_of(&[4, 5, 6], &journal);

        rail.apply(&[true, false, true]).unwrap();
        assert_eq!(&*journal.borrow(), &[(4, "on"), (6, "on")]);
        assert_eq!(rail.states(), &[true, false, true]);

        // Same frame again: no hardware traffic.
        rail.apply(&[true, false, true]).unwrap();
        assert_eq!(journal.borrow().len(), 2);

        rail.apply(&[false, false, true]).unwrap();
        assert_eq!(journal.borrow().last(), Some(&(4, "off")));
    }

    #[test]
    fn test_short_frame_means_off() {
        let journal: Journal = Journal::default();
        let mut rail = rail_of(&[4, 5], &journal);
        rail.apply(&[true, true]).unwrap();
        rail.apply(&[true]).unwrap();
        assert_eq!(rail.states(), &[true, false]);
    }

    #[test]
    fn test_write_failure_carries_line_index() {
        let journal: Journal = Journal::default();
        let mut rail: LightRail<FakeLine, 8> = LightRail::acquire(&[4, 5, 6], |id| {
            Ok(FakeLine {
                id,
                fail_writes: id == 5,
                journal: Rc::clone(&journal),
            })
        })
        .unwrap();

        let err = rail.apply(&[true, true, true]).err().unwrap();
        assert_eq!(err.line, 1);
        // The line before the failure was written and keeps its new state;
        // the failing line's shadow stays off.
        assert_eq!(rail.states(), &[true, false, false]);
        assert_eq!(&*journal.borrow(), &[(4, "on")]);
    }

    #[test]
    fn test_release_is_idempotent() {
        let journal: Journal = Journal::default();
        let mut rail = rail_of(&[4, 5], &journal);
        rail.release();
        rail.release();
        let releases = journal
            .borrow()
            .iter()
            .filter(|(_, op)| *op == "release")
            .count();
        assert_eq!(releases, 2);
    }

    #[test]
    fn test_apply_after_release_is_noop() {
        let journal: Journal = Journal::default();
        let mut rail = rail_of(&[4], &journal);
        rail.release();
        rail.apply(&[true]).unwrap();
        assert_eq!(&*journal.borrow(), &[(4, "release")]);
    }
}
