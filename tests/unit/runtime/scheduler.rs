use super::*;
use std::cell::RefCell;

fn recorder() -> (Rc<RefCell<Vec<u64>>>, impl FnMut(FrameIndex) + 'static) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    (seen, move |t: FrameIndex| sink.borrow_mut().push(t.0))
}

#[test]
fn counter_starts_at_one_and_increments_by_one() {
    let mut s = FrameScheduler::new();
    let (seen, cb) = recorder();
    let token = s.start(cb);
    assert!(token.is_live());
    for _ in 0..4 {
        s.tick();
    }
    assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
}

#[test]
fn stop_prevents_any_further_invocation() {
    let mut s = FrameScheduler::new();
    let (seen, cb) = recorder();
    let token = s.start(cb);
    s.tick();
    assert!(s.stop(&token));
    assert!(!token.is_live());
    assert_eq!(s.tick(), 0);
    assert_eq!(s.active(), 0);
    assert_eq!(*seen.borrow(), vec![1]);
    assert!(!s.stop(&token));
}

#[test]
fn registrations_keep_independent_counters() {
    let mut s = FrameScheduler::new();
    let (a_seen, a) = recorder();
    let a_token = s.start(a);
    s.tick();
    s.tick();
    let (b_seen, b) = recorder();
    let b_token = s.start(b);
    assert_eq!(s.tick(), 2);
    assert_eq!(*a_seen.borrow(), vec![1, 2, 3]);
    assert_eq!(*b_seen.borrow(), vec![1]);
    assert_ne!(a_token.id(), b_token.id());
}

#[test]
fn cancel_inside_a_tick_skips_later_callbacks() {
    let mut s = FrameScheduler::new();
    let (seen, cb) = recorder();
    let victim: Rc<RefCell<Option<FrameToken>>> = Rc::new(RefCell::new(None));
    let v = Rc::clone(&victim);
    s.start(move |_| {
        if let Some(tok) = v.borrow().as_ref() {
            tok.cancel();
        }
    });
    let token = s.start(cb);
    *victim.borrow_mut() = Some(token.clone());

    assert_eq!(s.tick(), 1);
    assert!(seen.borrow().is_empty());
    assert!(!token.is_live());
    assert_eq!(s.active(), 1);
}

#[test]
fn self_cancel_stops_after_current_call() {
    let mut s = FrameScheduler::new();
    let count = Rc::new(Cell::new(0u32));
    let slot: Rc<RefCell<Option<FrameToken>>> = Rc::new(RefCell::new(None));
    let (c, sl) = (Rc::clone(&count), Rc::clone(&slot));
    let token = s.start(move |t| {
        c.set(c.get() + 1);
        if t.0 == 2
            && let Some(tok) = sl.borrow().as_ref()
        {
            tok.cancel();
        }
    });
    *slot.borrow_mut() = Some(token);
    for _ in 0..5 {
        s.tick();
    }
    assert_eq!(count.get(), 2);
}

#[test]
fn pacer_spaces_ticks_by_the_frame_period() {
    let mut p = FramePacer::new(Fps::new(200, 1).unwrap());
    assert_eq!(p.period(), Duration::from_millis(5));
    let start = Instant::now();
    for _ in 0..4 {
        p.wait();
    }
    // The first wait returns immediately; three full periods follow.
    assert!(start.elapsed() >= Duration::from_millis(15));
}

#[test]
fn stop_ignores_tokens_from_another_scheduler() {
    let mut a = FrameScheduler::new();
    let mut b = FrameScheduler::new();
    let (a_seen, a_cb) = recorder();
    let (b_seen, b_cb) = recorder();
    let a_token = a.start(a_cb);
    let b_token = b.start(b_cb);
    assert_eq!(a_token.id(), b_token.id());

    assert!(!a.stop(&b_token));
    assert!(a_token.is_live());
    assert!(b_token.is_live());
    a.tick();
    b.tick();
    assert_eq!(*a_seen.borrow(), vec![1]);
    assert_eq!(*b_seen.borrow(), vec![1]);

    assert!(b.stop(&b_token));
    assert_eq!(a.active(), 1);
}
