//! Swiss pod builder: pod sizes, byes and the round-number seat stride.

use crate::models::Pod;
use std::collections::HashSet;

/// Size of one pod to fill, and whether it is a bye pod.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PodSlot {
    pub size: usize,
    pub bye: bool,
}

/// Pod sizes for `n` players: as many 4s as possible, then a 3, or a bye pod of 1 or 2.
/// Bye pods come first.
pub fn pod_slots(n: usize) -> Vec<PodSlot> {
    let fours = n / 4;
    let mut slots = Vec::with_capacity(fours + 1);
    match n % 4 {
        1 => slots.push(PodSlot { size: 1, bye: true }),
        2 => slots.push(PodSlot { size: 2, bye: true }),
        _ => {}
    }
    slots.extend((0..fours).map(|_| PodSlot { size: 4, bye: false }));
    if n % 4 == 3 {
        slots.push(PodSlot { size: 3, bye: false });
    }
    slots
}

/// Seat `names` into pods for `round_number` (1-based).
///
/// One index walks the seating order for the whole round. A seat takes the name under the
/// index if it is acceptable and then moves the index forward by `round_number`; otherwise
/// the index moves forward by one. Bye seats skip players already in the bye history.
///
/// Returns the pods and the bye history to store after this round.
pub fn build_pods(
    round_number: u32,
    names: &[String],
    has_had_bye: &[String],
) -> (Vec<Pod>, Vec<String>) {
    let n = names.len();
    if n == 0 {
        return (Vec::new(), has_had_bye.to_vec());
    }

    let mut history: Vec<String> = if names.iter().all(|name| has_had_bye.contains(name)) {
        Vec::new()
    } else {
        has_had_bye.to_vec()
    };

    let stride = round_number.max(1) as usize;
    let mut selected: HashSet<&str> = HashSet::with_capacity(n);
    let mut byes_this_round: Vec<String> = Vec::new();
    let mut idx = 0;
    let mut pods = Vec::new();
    let mut pod_number = 1;

    for slot in pod_slots(n) {
        let mut members = Vec::with_capacity(slot.size);
        for _ in 0..slot.size {
            let mut misses = 0;
            loop {
                let name = names[idx].as_str();
                let eligible = !selected.contains(name)
                    && !(slot.bye && history.iter().any(|h| h == name));
                if eligible {
                    selected.insert(name);
                    members.push(name.to_string());
                    if slot.bye {
                        history.push(name.to_string());
                        byes_this_round.push(name.to_string());
                    }
                    idx = (idx + stride) % n;
                    break;
                }
                idx = (idx + 1) % n;
                misses += 1;
                if misses == n {
                    // Everyone still unseated already had a bye: the cycle is over.
                    log::debug!("bye cycle completed mid-round {}", round_number);
                    history.retain(|h| byes_this_round.contains(h));
                    misses = 0;
                }
            }
        }
        if slot.bye {
            pods.push(Pod::bye(members));
        } else {
            pods.push(Pod::new(format!("Pod {}", pod_number), members));
            pod_number += 1;
        }
    }

    (pods, history)
}
