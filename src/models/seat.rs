//! Seat records supplied by the host
//!
//! `SeatDisplay` is what the raw seatmap paints. `GroupedSeat` carries the
//! grouping metadata the grouping layer resolves into a `SeatDisplay`.
//! `Seat` is the loose shape the form/accordion wrappers accept.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Host-assigned, stable seat identifier
pub type SeatId = u32;

/// A record that can be located on the diagram
pub trait Locatable {
    fn seat_id(&self) -> SeatId;
    fn lookup(&self) -> &str;
}

/// Display projection of a seat: everything the binder needs to paint it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatDisplay {
    pub id: SeatId,

    /// Selector locating the seat's shape inside the diagram
    #[serde(rename = "cssSelector", alias = "lookupExpression")]
    pub lookup: String,

    /// Custom colour, applied as an inline style override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Opaque presentational payload, never interpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_content: Option<serde_json::Value>,
}

impl SeatDisplay {
    pub fn new(id: SeatId, lookup: impl Into<String>) -> Self {
        Self {
            id,
            lookup: lookup.into(),
            color: None,
            icon: None,
            tooltip_content: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl Locatable for SeatDisplay {
    fn seat_id(&self) -> SeatId {
        self.id
    }

    fn lookup(&self) -> &str {
        &self.lookup
    }
}

/// Value of one selection group on a seat
///
/// On the wire this is either a bare string or `{ "value", "parent" }`
/// (`parentGroupName` is accepted for `parent`).
/// A scoped value only matches seats that also share the parent group.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum GroupValue {
    Plain(String),
    Scoped {
        value: String,
        #[serde(alias = "parentGroupName")]
        parent: String,
    },
}

impl GroupValue {
    pub fn value(&self) -> &str {
        match self {
            GroupValue::Plain(value) => value,
            GroupValue::Scoped { value, .. } => value,
        }
    }

    pub fn parent(&self) -> Option<&str> {
        match self {
            GroupValue::Plain(_) => None,
            GroupValue::Scoped { parent, .. } => Some(parent),
        }
    }
}

/// Group name → value, kept in the order the host listed them
///
/// Group toggles are offered in this order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SelectionGroups(IndexMap<String, GroupValue>);

impl SelectionGroups {
    /// Insert or replace the value for `name`
    pub fn insert(&mut self, name: String, value: GroupValue) {
        self.0.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<&GroupValue> {
        self.0.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GroupValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, GroupValue)> for SelectionGroups {
    fn from_iter<T: IntoIterator<Item = (N, GroupValue)>>(iter: T) -> Self {
        SelectionGroups(iter.into_iter().map(|(name, value)| (name.into(), value)).collect())
    }
}

/// How a display group is rendered: a colour string or an opaque payload
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum DisplayTreatment {
    Color(String),
    Payload(serde_json::Value),
}

/// Display group key → visual treatment
pub type DisplayGroupMapping = BTreeMap<String, DisplayTreatment>;

/// Seat with grouping metadata, consumed by the grouping layer
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupedSeat {
    pub id: SeatId,

    #[serde(rename = "cssSelector", alias = "lookupExpression")]
    pub lookup: String,

    /// Key into the host's display-group mapping
    #[serde(default, alias = "displayGroupKey", skip_serializing_if = "Option::is_none")]
    pub display_group: Option<String>,

    #[serde(default)]
    pub selection_groups: SelectionGroups,
}

impl GroupedSeat {
    pub fn new(id: SeatId, lookup: impl Into<String>) -> Self {
        Self {
            id,
            lookup: lookup.into(),
            display_group: None,
            selection_groups: SelectionGroups::default(),
        }
    }

    pub fn with_group(mut self, name: impl Into<String>, value: GroupValue) -> Self {
        self.selection_groups.insert(name.into(), value);
        self
    }

    pub fn with_display_group(mut self, key: impl Into<String>) -> Self {
        self.display_group = Some(key.into());
        self
    }

    /// Project onto the raw display record, resolving the display group
    pub fn to_display(&self, mapping: &DisplayGroupMapping) -> SeatDisplay {
        let treatment = self
            .display_group
            .as_ref()
            .and_then(|key| mapping.get(key));

        let (color, icon) = match treatment {
            Some(DisplayTreatment::Color(color)) => (Some(color.clone()), None),
            Some(DisplayTreatment::Payload(payload)) => (None, Some(payload.clone())),
            None => (None, None),
        };

        SeatDisplay {
            id: self.id,
            lookup: self.lookup.clone(),
            color,
            icon,
            tooltip_content: None,
        }
    }
}

impl Locatable for GroupedSeat {
    fn seat_id(&self) -> SeatId {
        self.id
    }

    fn lookup(&self) -> &str {
        &self.lookup
    }
}

/// Loose seat shape accepted by the form and accordion wrappers
///
/// The lookup expression is optional here; seats without one are not
/// placed on the diagram.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: SeatId,

    #[serde(default, rename = "cssSelector", alias = "lookupExpression")]
    pub lookup: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_group: Option<String>,

    #[serde(default)]
    pub selection_groups: SelectionGroups,
}

impl Seat {
    pub fn to_grouped(&self) -> Option<GroupedSeat> {
        let lookup = self.lookup.as_ref()?;
        Some(GroupedSeat {
            id: self.id,
            lookup: lookup.clone(),
            display_group: self.display_group.clone(),
            selection_groups: self.selection_groups.clone(),
        })
    }
}
