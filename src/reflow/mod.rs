//! Constraint propagation used to keep the monitors tiled.
//!
//! Every function here works on the *working* rectangle of each monitor's
//! [`Transaction`](crate::monitor::transaction::Transaction), identified by its
//! index into the slice of monitors. Nothing is committed; the caller decides
//! whether the result is kept.
//!
//! Direction is a type parameter, so each algorithm is written once in terms
//! of the head (leading edge) and tail (trailing edge) of the movement.

pub(crate) mod strategy;

use crate::{geometry::Rectangle, monitor::Monitor, types::MonitorId};
use itertools::Itertools;
use strategy::Strategy;

/// The current working rectangle of a monitor
fn area(monitors: &[Monitor], id: MonitorId) -> Rectangle {
    *monitors[id].transaction().area()
}

/// Every monitor except `exclude`, nearest to the start of the movement first.
/// Monitors at the same distance keep their enumeration order
fn ordered<S: Strategy>(monitors: &[Monitor], exclude: MonitorId) -> Vec<MonitorId> {
    (0..monitors.len())
        .filter(|&id| id != exclude)
        .sorted_by_key(|&id| S::proximity(monitors[id].transaction().area()))
        .collect()
}

/// Pin every monitor that has to stay where it is while `id` shrinks: the ones
/// touching it from the front, and the ones touching its sides, transitively
pub(crate) fn pin<S: Strategy>(monitors: &mut [Monitor], id: MonitorId) {
    let area = area(monitors, id);

    for other in 0..monitors.len() {
        if monitors[other].transaction().is_pinned() {
            continue;
        }

        let other_area = *monitors[other].transaction().area();
        if S::is_tail_adjacent(&other_area, &area) || S::is_side_adjacent(&area, &other_area) {
            log::trace!("pinning monitor {} next to monitor {}", other, id);
            monitors[other].transaction_mut().pin();
            pin::<S>(monitors, other);
        }
    }
}

/// Pull back everything `id` pushed up to `head`, by `distance`, because the
/// push could not be completed
pub(crate) fn bounce_back<S: Strategy>(
    monitors: &mut [Monitor],
    id: MonitorId,
    head: i32,
    distance: i32,
) {
    debug_assert!(distance > 0);

    for other in 0..monitors.len() {
        let trans = monitors[other].transaction();
        if S::tail(trans.area()) != head || trans.pusher() != Some(id) {
            continue;
        }

        let old_head = S::head(trans.area());
        log::trace!(
            "bouncing monitor {} back by {} ({})",
            other,
            distance,
            S::NAME
        );
        S::offset(monitors[other].transaction_mut().area_mut(), -distance);
        bounce_back::<S>(monitors, other, old_head, distance);
    }
}

/// Move monitor `id` forward by `delta` to make room for `pusher`, moving
/// whatever is in its way and dragging along whatever would be left behind.
///
/// Returns the distance actually moved, which is less than `delta` when a
/// pinned monitor blocks the way.
pub(crate) fn push<S: Strategy>(
    monitors: &mut [Monitor],
    pusher: MonitorId,
    id: MonitorId,
    mut delta: i32,
) -> i32 {
    {
        let trans = monitors[id].transaction_mut();
        trans.pin();
        trans.set_pusher(pusher);
    }

    let mut area_to_clear = S::area_in_front(&area(monitors, id), delta);

    for other in ordered::<S>(monitors, id) {
        let other_area = area(monitors, other);
        if !area_to_clear.intersects(&other_area) {
            continue;
        }

        let mut distance = S::push_distance(&area_to_clear, &other_area);
        debug_assert!(distance > 0);

        if !monitors[other].transaction().is_pinned() {
            distance -= push::<S>(monitors, id, other, distance);
        }

        if distance != 0 {
            log::trace!(
                "monitor {} is blocked {} short ({})",
                id,
                distance,
                S::NAME
            );
            delta -= distance;
            bounce_back::<S>(monitors, id, S::head(&area_to_clear), distance);
            S::move_head(&mut area_to_clear, -distance);
        }
    }

    S::offset(monitors[id].transaction_mut().area_mut(), delta);
    log::trace!(
        "pushed monitor {} by {} ({}) to {}",
        id,
        delta,
        S::NAME,
        area(monitors, id)
    );

    let prev = *monitors[id].transaction().prev_area();
    for other in 0..monitors.len() {
        if monitors[other].transaction().is_pinned() {
            continue;
        }

        let other_prev = *monitors[other].transaction().prev_area();
        if S::is_side_adjacent(&prev, &other_prev) {
            // Keep the same offset to the neighbors sharing a side
            let current = S::pull_distance(&area(monitors, id), &area(monitors, other));
            let base = S::pull_distance(&prev, &other_prev);
            let distance = current - base;
            if distance > 0 {
                push::<S>(monitors, id, other, distance);
            }
        } else if S::is_tail_adjacent(&prev, &other_prev) {
            let distance = S::pull_distance(&area(monitors, id), &area(monitors, other));
            debug_assert!(distance >= 0);
            push::<S>(monitors, id, other, distance);
        }
    }

    delta
}

/// Grow monitor `id` by `delta` at its head, pushing everything in the way
pub(crate) fn expand<S: Strategy>(monitors: &mut [Monitor], id: MonitorId, delta: i32) {
    debug_assert!(delta > 0);
    log::debug!("expanding monitor {} by {} ({})", id, delta, S::NAME);

    monitors[id].transaction_mut().pin();
    let area_to_clear = S::area_in_front(&area(monitors, id), delta);

    for other in ordered::<S>(monitors, id) {
        let other_area = area(monitors, other);
        if !area_to_clear.intersects(&other_area) {
            continue;
        }

        let distance = S::push_distance(&area_to_clear, &other_area);
        debug_assert!(distance > 0);
        assert!(
            !monitors[other].transaction().is_pinned(),
            "monitor {} is pinned in front of expanding monitor {}",
            other,
            id
        );

        let actual = push::<S>(monitors, id, other, distance);
        debug_assert_eq!(actual, distance);
    }

    S::move_head(monitors[id].transaction_mut().area_mut(), delta);
}

/// Shrink monitor `id` by `delta` at its tail, pulling its neighbors in so
/// that no gap opens up
pub(crate) fn shrink<S: Strategy>(monitors: &mut [Monitor], id: MonitorId, delta: i32) {
    debug_assert!(delta > 0);
    log::debug!("shrinking monitor {} by {} ({})", id, delta, S::NAME);

    monitors[id].transaction_mut().pin();
    pin::<S>(monitors, id);

    let order = ordered::<S>(monitors, id);
    let area = area(monitors, id);
    S::shrink(monitors[id].transaction_mut().area_mut(), delta);

    for other in order {
        let other_area = *monitors[other].transaction().area();
        if S::is_side_adjacent(&area, &other_area) {
            let distance = S::distance(&area, &other_area);
            if distance > 0 {
                push::<S>(monitors, id, other, distance.min(delta));
            }
        } else if S::is_tail_adjacent(&area, &other_area) {
            push::<S>(monitors, id, other, delta);
        }
    }
}

// ============================== Tests ===============================
// ====================================================================
