//! Typed override chains for the host's extension points.
//!
//! Every extension point is a [`FilterChain`]: callbacks run in registration
//! order, each receiving the value produced so far and a read-only context.

use std::fmt;

use crate::assets::{AdminScreen, Post};
use crate::disabled_days::DisabledDays;
use crate::payload::ClientWindow;

type Filter<T, C> = Box<dyn Fn(T, &C) -> T + Send + Sync>;

pub struct FilterChain<T, C = ()> {
    filters: Vec<Filter<T, C>>,
}

impl<T, C> Default for FilterChain<T, C> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
        }
    }
}

impl<T, C> fmt::Debug for FilterChain<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl<T, C> FilterChain<T, C> {
    pub fn add<F>(&mut self, filter: F) -> &mut Self
    where
        F: Fn(T, &C) -> T + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn apply(&self, value: T, ctx: &C) -> T {
        self.filters.iter().fold(value, |acc, f| f(acc, ctx))
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Context handed to the `min_start_timestamp` chain.
#[derive(Clone, Debug)]
pub struct MinStartContext {
    pub post_id: u64,
    /// Midnight timestamp of the event's persisted start, if editing.
    pub existing_start: Option<i64>,
}

/// Context handed to the wp-admin load chain.
#[derive(Clone, Debug)]
pub struct AdminLoadContext {
    pub screen: AdminScreen,
    pub post: Post,
}

/// Context handed to the community form load chain.
#[derive(Clone, Debug)]
pub struct CommunityLoadContext {
    pub post_id: u64,
}

/// All extension points, each with its own typed chain.
#[derive(Debug, Default)]
pub struct Hooks {
    /// Capability that lets a user pick any start date.
    pub cap_allowed_any_start_date: FilterChain<String>,
    /// Forward offset string for the maximum date, keyed by post id.
    pub max_date: FilterChain<String, u64>,
    /// Backward offset string for the minimum date, keyed by post id.
    pub min_date_offset: FilterChain<String, u64>,
    /// Zone name used for date calculations, keyed by post id.
    pub time_zone: FilterChain<String, u64>,
    /// Final say on the minimum start timestamp (midnight, epoch seconds).
    pub min_start_timestamp: FilterChain<i64, MinStartContext>,
    pub load_script_wp_admin: FilterChain<bool, AdminLoadContext>,
    pub load_script_ce_form: FilterChain<bool, CommunityLoadContext>,
    /// Block editor calendar's disabled range; `None` means nothing decided yet.
    pub disabled_days: FilterChain<Option<DisabledDays>, ClientWindow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chain_passes_value_through() {
        let chain: FilterChain<String> = FilterChain::default();
        assert_eq!(chain.apply("manage_options".into(), &()), "manage_options");
        assert!(chain.is_empty());
    }

    #[test]
    fn filters_run_in_registration_order() {
        let mut chain: FilterChain<String, u64> = FilterChain::default();
        chain
            .add(|v, _| format!("{v}a"))
            .add(|v, id| format!("{v}b{id}"));
        assert_eq!(chain.apply(String::new(), &7), "ab7");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn filter_sees_context() {
        let mut chain: FilterChain<bool, CommunityLoadContext> = FilterChain::default();
        chain.add(|load, ctx| load && ctx.post_id != 42);
        assert!(chain.apply(true, &CommunityLoadContext { post_id: 1 }));
        assert!(!chain.apply(true, &CommunityLoadContext { post_id: 42 }));
    }
}
