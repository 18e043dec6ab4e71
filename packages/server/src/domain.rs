//! Domain types shared by the managers and the HTTP boundary.

use std::str::FromStr;

use chrono::NaiveDate;
use sea_orm::Order;
use serde::Serialize;

use crate::entity::{game, studio};

/// Identity of a record. `Unassigned` until the database hands out a key on
/// first save; the key never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "Option<i32>")]
pub enum RecordId {
    #[default]
    Unassigned,
    Assigned(i32),
}

impl RecordId {
    pub fn value(self) -> Option<i32> {
        match self {
            RecordId::Unassigned => None,
            RecordId::Assigned(id) => Some(id),
        }
    }

    pub fn is_assigned(self) -> bool {
        matches!(self, RecordId::Assigned(_))
    }
}

impl From<Option<i32>> for RecordId {
    fn from(value: Option<i32>) -> Self {
        value.map_or(RecordId::Unassigned, RecordId::Assigned)
    }
}

impl From<RecordId> for Option<i32> {
    fn from(id: RecordId) -> Self {
        id.value()
    }
}

/// Listing order. Records are only ever sorted by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid SORT parameter (must be ASC or DESC)")]
pub struct InvalidSortDir;

impl SortDir {
    /// Parse an optional `sortDir` query value. Absent means ascending.
    pub fn parse(value: Option<&str>) -> Result<Self, InvalidSortDir> {
        match value {
            None => Ok(SortDir::Asc),
            Some(raw) => raw.parse(),
        }
    }

    pub fn order(self) -> Order {
        match self {
            SortDir::Asc => Order::Asc,
            SortDir::Desc => Order::Desc,
        }
    }
}

impl FromStr for SortDir {
    type Err = InvalidSortDir;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ASC") {
            Ok(SortDir::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(SortDir::Desc)
        } else {
            Err(InvalidSortDir)
        }
    }
}

/// A game as seen by the managers. Only exists inside a studio's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: RecordId,
    pub name: String,
    pub overview: String,
    pub launch_date: NaiveDate,
    /// Name of the owning studio, copied when the game is created.
    pub studio: String,
}

impl Game {
    pub fn new(name: String, overview: String, launch_date: NaiveDate) -> Self {
        Self {
            id: RecordId::Unassigned,
            name,
            overview,
            launch_date,
            studio: String::new(),
        }
    }
}

impl From<game::Model> for Game {
    fn from(m: game::Model) -> Self {
        Self {
            id: RecordId::Assigned(m.id),
            name: m.name,
            overview: m.overview,
            launch_date: m.launch_date,
            studio: m.studio_name,
        }
    }
}

/// A studio aggregate: the studio row plus the games it owns, in id order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Studio {
    pub id: RecordId,
    pub name: String,
    pub location: String,
    pub creation_date: NaiveDate,
    pub games: Vec<Game>,
}

impl Studio {
    pub fn new(name: String, location: String, creation_date: NaiveDate) -> Self {
        Self {
            id: RecordId::Unassigned,
            name,
            location,
            creation_date,
            games: Vec::new(),
        }
    }

    pub(crate) fn from_parts(m: studio::Model, games: Vec<Game>) -> Self {
        Self {
            id: RecordId::Assigned(m.id),
            name: m.name,
            location: m.location,
            creation_date: m.creation_date,
            games,
        }
    }
}

/// Full replacement of a studio's scalar fields. The games collection is
/// never touched by an update.
#[derive(Debug, Clone)]
pub struct StudioChanges {
    pub name: String,
    pub location: String,
    pub creation_date: NaiveDate,
}

/// Full replacement of a game's editable fields. The owning studio cannot be
/// changed.
#[derive(Debug, Clone)]
pub struct GameChanges {
    pub name: String,
    pub overview: String,
    pub launch_date: NaiveDate,
}
