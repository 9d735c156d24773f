//! One round's participant → room assignment.

use std::collections::{BTreeMap, HashMap};

use crate::capacity::CapacityPlan;
use crate::error::{Error, Result};
use crate::ids::{ParticipantId, RoomId};

/// A validated, immutable assignment of every participant to one room.
///
/// Only constructible through [`Assignment::new`], which checks that every
/// participant is placed exactly once and every room size is within the
/// plan's bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    rooms: Vec<Vec<ParticipantId>>,
    room_of: HashMap<ParticipantId, RoomId>,
}

impl Assignment {
    /// Validate `rooms` (occupants per room index) against `plan` and the
    /// request's `participants`.
    pub fn new(
        plan: &CapacityPlan,
        participants: &[ParticipantId],
        mut rooms: Vec<Vec<ParticipantId>>,
    ) -> Result<Self> {
        if participants.len() != plan.participants() {
            return Err(Error::InfeasibleAssignment(format!(
                "plan is for {} participants but {} were supplied",
                plan.participants(),
                participants.len()
            )));
        }
        if rooms.len() != plan.rooms() {
            return Err(Error::InfeasibleAssignment(format!(
                "expected {} rooms, got {}",
                plan.rooms(),
                rooms.len()
            )));
        }

        for (index, occupants) in rooms.iter().enumerate() {
            if !plan.admits(occupants.len()) {
                return Err(Error::InfeasibleAssignment(format!(
                    "{} holds {} occupants, outside [{}, {}]",
                    RoomId(index),
                    occupants.len(),
                    plan.min_size(),
                    plan.max_size()
                )));
            }
        }

        let mut room_of = HashMap::with_capacity(participants.len());
        for (index, occupants) in rooms.iter().enumerate() {
            for &p in occupants {
                if let Some(previous) = room_of.insert(p, RoomId(index)) {
                    return Err(Error::InfeasibleAssignment(format!(
                        "participant {} placed in both {} and {}",
                        p,
                        previous,
                        RoomId(index)
                    )));
                }
            }
        }

        if let Some(missing) = participants.iter().find(|p| !room_of.contains_key(*p)) {
            return Err(Error::InfeasibleAssignment(format!(
                "participant {} was not placed",
                missing
            )));
        }
        if room_of.len() != participants.len() {
            return Err(Error::InfeasibleAssignment(
                "assignment contains participants outside the request".into(),
            ));
        }

        for occupants in &mut rooms {
            occupants.sort_unstable();
        }

        Ok(Self { rooms, room_of })
    }

    /// Room holding `participant`, if they belong to this request.
    pub fn room_of(&self, participant: ParticipantId) -> Option<RoomId> {
        self.room_of.get(&participant).copied()
    }

    /// Occupants of `room`, in ascending id order.
    pub fn occupants(&self, room: RoomId) -> &[ParticipantId] {
        self.rooms.get(room.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate `(room, occupants)` in room order.
    pub fn rooms(&self) -> impl Iterator<Item = (RoomId, &[ParticipantId])> + '_ {
        self.rooms
            .iter()
            .enumerate()
            .map(|(index, occupants)| (RoomId(index), occupants.as_slice()))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn participant_count(&self) -> usize {
        self.room_of.len()
    }

    pub fn room_sizes(&self) -> Vec<usize> {
        self.rooms.iter().map(Vec::len).collect()
    }

    /// Every unordered co-located pair `(low, high)`, room by room.
    pub fn pairs(&self) -> impl Iterator<Item = (ParticipantId, ParticipantId)> + '_ {
        self.rooms.iter().flat_map(|occupants| {
            occupants.iter().enumerate().flat_map(move |(i, &a)| {
                occupants[i + 1..].iter().map(move |&b| (a, b))
            })
        })
    }

    /// Room number → participant ids, the shape callers receive.
    pub fn to_room_map(&self) -> BTreeMap<usize, Vec<u32>> {
        self.rooms()
            .map(|(room, occupants)| {
                (room.number(), occupants.iter().map(ParticipantId::value).collect())
            })
            .collect()
    }
}
