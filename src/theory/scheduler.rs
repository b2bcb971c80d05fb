/*!
The order in which theories are invoked.

Each theory registered with a context has a record in the [Scheduler], keyed by the index of the theory, holding:
- A priority, which is a static preference, where a smaller priority is scheduled earlier.
- An activity, which is a dynamic score, bumped whenever the theory is the source of a conflict or a reason used during analysis.

The [order](Scheduler::order) of theories is by:
1. Ascending priority.
2. Descending activity.
3. Ascending index.

So, among theories of equal priority the most active theory is scheduled first, and ties are broken by order of registration.

```rust
# use otter_smt::config::SchedulerConfig;
# use otter_smt::theory::scheduler::Scheduler;
let mut scheduler = Scheduler::new(&SchedulerConfig::default());
let a = scheduler.register();
let b = scheduler.register();
let c = scheduler.register();

scheduler.set_priority(a, 1).unwrap();
scheduler.bump(c);

assert_eq!(scheduler.order(), vec![c, b, a]);
```

# Activity

Bumps follow the scheme of VSIDS.
After each bump the size of a bump grows by a factor of `1 / (1 - decay)`, and if the activity of a theory would exceed the configured maximum every activity (and the bump) is rescaled.
*/

use crate::{
    config::{Activity, SchedulerConfig},
    misc::log::targets::{self},
    types::err::TheoryError,
};

use super::TheoryIndex;

/// The priority of a theory, where a smaller priority is scheduled earlier.
pub type Priority = i32;

/// The schedule of a single theory.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScheduleRecord {
    pub priority: Priority,
    pub activity: Activity,
}

/// Records of priority and activity, indexed by theory.
pub struct Scheduler {
    records: Vec<ScheduleRecord>,

    /// The current amount to bump activity by.
    bump: Activity,

    config: SchedulerConfig,
}

impl Scheduler {
    /// A scheduler without any theories, with a local copy of the given configuration.
    pub fn new(config: &SchedulerConfig) -> Self {
        Scheduler {
            records: Vec::default(),
            bump: config.activity_bump.value,
            config: config.clone(),
        }
    }

    /// Adds a record with zero priority and zero activity, and returns the index of the record.
    pub fn register(&mut self) -> TheoryIndex {
        let index = self.records.len() as TheoryIndex;
        self.records.push(ScheduleRecord::default());
        index
    }

    /// A count of scheduled theories.
    pub fn count(&self) -> usize {
        self.records.len()
    }

    fn record_mut(&mut self, index: TheoryIndex) -> Result<&mut ScheduleRecord, TheoryError> {
        self.records
            .get_mut(index as usize)
            .ok_or(TheoryError::UnknownTheory(index))
    }

    /// The priority of the theory, if the theory is scheduled.
    pub fn priority(&self, index: TheoryIndex) -> Option<Priority> {
        self.records.get(index as usize).map(|record| record.priority)
    }

    pub fn set_priority(&mut self, index: TheoryIndex, priority: Priority) -> Result<(), TheoryError> {
        self.record_mut(index)?.priority = priority;
        Ok(())
    }

    /// The activity of the theory, if the theory is scheduled.
    pub fn activity(&self, index: TheoryIndex) -> Option<Activity> {
        self.records.get(index as usize).map(|record| record.activity)
    }

    pub fn set_activity(&mut self, index: TheoryIndex, activity: Activity) -> Result<(), TheoryError> {
        self.record_mut(index)?.activity = activity;
        Ok(())
    }

    /// The indicies of every scheduled theory, in order.
    pub fn order(&self) -> Vec<TheoryIndex> {
        let mut order = (0..self.records.len() as TheoryIndex).collect::<Vec<_>>();
        order.sort_by(|&a, &b| {
            let record_a = &self.records[a as usize];
            let record_b = &self.records[b as usize];
            record_a
                .priority
                .cmp(&record_b.priority)
                .then(record_b.activity.total_cmp(&record_a.activity))
                .then(a.cmp(&b))
        });
        log::trace!(target: targets::SCHEDULER, "Order: {order:?}");
        order
    }

    /// Bumps the activity of the theory, and increases the bump for next time.
    ///
    /// If the bumped activity would be greater than the maximum allowed activity, the activity of every theory is rescaled.
    pub fn bump(&mut self, index: TheoryIndex) {
        let Some(activity) = self.activity(index) else {
            return;
        };

        if activity + self.bump > self.config.activity_max.value {
            let record_max = self
                .records
                .iter()
                .map(|record| record.activity)
                .fold(Activity::MIN, Activity::max);
            let factor = 1.0 / Activity::max(record_max, self.bump);
            for record in self.records.iter_mut() {
                record.activity *= factor;
            }
            self.bump *= factor;
            log::trace!(target: targets::SCHEDULER, "Rescaled activity by {factor}");
        }

        self.records[index as usize].activity += self.bump;
        self.bump *= 1.0 / (1.0 - self.config.activity_decay.value);
    }
}

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    fn scheduler(count: usize) -> Scheduler {
        let mut scheduler = Scheduler::new(&SchedulerConfig::default());
        for _ in 0..count {
            scheduler.register();
        }
        scheduler
    }

    #[test]
    fn registration_order() {
        let scheduler = scheduler(4);
        assert_eq!(scheduler.order(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn priority_before_activity() {
        let mut scheduler = scheduler(3);
        scheduler.set_priority(0, 2).unwrap();
        scheduler.set_priority(1, -1).unwrap();
        scheduler.set_activity(2, 100.0).unwrap();
        scheduler.set_activity(0, 1000.0).unwrap();

        assert_eq!(scheduler.order(), vec![1, 2, 0]);
        assert_eq!(scheduler.set_priority(3, 0), Err(TheoryError::UnknownTheory(3)));
    }

    #[test]
    fn later_bumps_count_more() {
        let mut scheduler = scheduler(2);
        scheduler.bump(0);
        scheduler.bump(1);

        assert!(scheduler.activity(1) > scheduler.activity(0));
        assert_eq!(scheduler.order(), vec![1, 0]);
    }

    #[test]
    fn rescale() {
        let mut config = SchedulerConfig::default();
        config.activity_max.value = 4.0;
        let mut scheduler = Scheduler::new(&config);
        let a = scheduler.register();
        let b = scheduler.register();

        for _ in 0..32 {
            scheduler.bump(a);
        }
        scheduler.bump(b);

        assert!(scheduler.activity(a).is_some_and(|activity| activity <= 4.0));
        assert!(scheduler.activity(b).is_some_and(|activity| activity <= 4.0));
        assert!(scheduler.activity(b) > Some(0.0));
    }
}
