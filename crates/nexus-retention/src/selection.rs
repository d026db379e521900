//! Grouping of an inventory by component name and selection of the versions
//! that fall outside the retention policy

use crate::types::{Component, ComponentVersion, RepositoryFormat, RetentionPolicy};
use std::collections::{BTreeMap, BTreeSet};

/// Component groups keyed by name
pub type ComponentGroups = BTreeMap<String, Vec<ComponentVersion>>;

/// What a run will act on, per repository format
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Image names to hand to the un-tag tool; it counts versions itself
    Image(BTreeSet<String>),
    /// Per component name, the versions to delete
    Maven(ComponentGroups),
}

impl Selection {
    /// Number of names (image) or component versions (maven) selected
    pub fn len(&self) -> usize {
        match self {
            Selection::Image(names) => names.len(),
            Selection::Maven(groups) => groups.values().map(Vec::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group components by name, optionally restricted to one name
///
/// Entries keep their inventory order inside a group.
pub fn group_by_name(components: &[Component], filter: Option<&str>) -> ComponentGroups {
    let mut groups = ComponentGroups::new();
    for component in components
        .iter()
        .filter(|c| filter.is_none_or(|name| c.name == name))
    {
        groups
            .entry(component.name.clone())
            .or_default()
            .push(component.to_version());
    }
    groups
}

/// Versions of a group that fall outside the policy
///
/// Sorts ascending by plain string comparison (so `"10"` sorts before `"9"`),
/// stable on ties, and drops the trailing `keep` entries.
pub fn select_extra(group: &[ComponentVersion], policy: RetentionPolicy) -> Vec<ComponentVersion> {
    let mut sorted = group.to_vec();
    sorted.sort_by(|a, b| a.version.cmp(&b.version));

    let excess = sorted.len().saturating_sub(policy.keep_usize());
    sorted.truncate(excess);
    sorted
}

/// Distinct image names, optionally restricted to one name
pub fn select_image_names(components: &[Component], filter: Option<&str>) -> BTreeSet<String> {
    components
        .iter()
        .filter(|c| filter.is_none_or(|name| c.name == name))
        .map(|c| c.name.clone())
        .collect()
}

/// Group an inventory and select what to remove for the given format
///
/// Returns `None` for formats that have no cleanup strategy.
pub fn group_and_select(
    components: &[Component],
    filter: Option<&str>,
    format: &RepositoryFormat,
    policy: RetentionPolicy,
) -> Option<Selection> {
    match format {
        RepositoryFormat::Image => Some(Selection::Image(select_image_names(components, filter))),
        RepositoryFormat::Maven => {
            let extras = group_by_name(components, filter)
                .into_iter()
                .map(|(name, group)| {
                    let extra = select_extra(&group, policy);
                    (name, extra)
                })
                .collect();
            Some(Selection::Maven(extras))
        }
        RepositoryFormat::Unsupported(_) => None,
    }
}
