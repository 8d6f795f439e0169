//! Visibility
//!
//! Decides which period-tagged entities are shown and collidable. Runs after
//! every period switch and every level load, before the next physics tick.

use crate::world::WorldState;

/// Show every block whose period set is empty or contains the current period,
/// hide the rest. Returns how many blocks are active.
pub fn apply_visibility(world: &mut WorldState) -> usize {
    let period = world.period();
    let mut active = 0;

    for entity in world.entities_mut() {
        let Some(periods) = entity.periods() else {
            continue;
        };

        let visible = periods.is_active_in(period);
        entity.set_visible(visible);
        if visible {
            active += 1;
        }
    }

    log::trace!("Visibility applied for {}: {} active blocks", period, active);
    active
}
