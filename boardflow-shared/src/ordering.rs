/// Position-ordering engine for sibling sets
///
/// Boards own ordered columns and columns own ordered tasks. Both sibling
/// sets carry an integer `position` sort key, and this module owns the rules
/// for assigning and maintaining those keys:
///
/// - **Append**: a new child lands at `max(position) + 1`, or `0` for an
///   empty sibling set.
/// - **Display order**: siblings sort by `(position, id)`. The id tie-break
///   keeps output deterministic when positions collide (direct position
///   overwrites never renumber, so collisions are reachable).
/// - **Resequence**: after a child leaves its parent, the survivors are
///   renumbered to a dense `0..N-1` in their existing display order.
/// - **Adjacent lookup**: moving a task left/right resolves the neighboring
///   column in the board's display order, failing at an edge.
///
/// Everything here is pure and synchronous. The model layer
/// ([`crate::models`]) reads sibling state inside a request's transaction,
/// calls into this module, and writes the assignments back. Callers are
/// expected to have resolved ownership and existence before invoking the
/// engine; nothing in this module can fail.
///
/// # Example
///
/// ```
/// use boardflow_shared::ordering::{append_position, resequence, Slot};
/// use uuid::Uuid;
///
/// // First child of an empty parent sits at 0, the next at max + 1.
/// assert_eq!(append_position(&[]), 0);
/// assert_eq!(append_position(&[0, 1, 2]), 3);
///
/// // Survivors of a removal are renumbered densely, order preserved.
/// let a = Uuid::new_v4();
/// let b = Uuid::new_v4();
/// let slots = vec![Slot { id: a, position: 2 }, Slot { id: b, position: 5 }];
/// let assignments = resequence(&slots);
/// assert_eq!(assignments, vec![(a, 0), (b, 1)]);
/// ```
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of an adjacent-column move, as sent over the wire
/// (`{"direction": "left"}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Toward the column with the next-lower display index
    Left,

    /// Toward the column with the next-higher display index
    Right,
}

impl MoveDirection {
    /// Gets the direction as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveDirection::Left => "left",
            MoveDirection::Right => "right",
        }
    }
}

/// A sibling's identity and current position, the minimal state the engine
/// needs about a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Row id of the sibling
    pub id: Uuid,

    /// Current position sort key
    pub position: i32,
}

/// Computes the position for a child appended to a sibling set
///
/// Returns `max(position) + 1`, or `0` when the set is empty. The new child
/// sorts last among the siblings that existed at the moment of the read; two
/// concurrent appends against the same parent can race on the max and
/// produce duplicate positions, which is accepted (there is no cross-request
/// locking, and display order stays deterministic via the id tie-break).
pub fn append_position(existing: &[i32]) -> i32 {
    existing.iter().max().map(|max| max + 1).unwrap_or(0)
}

/// Sorts siblings into display order: `(position ascending, id ascending)`
///
/// Position alone is not a total order because direct position overwrites
/// never renumber siblings. The id tie-break makes list output and
/// resequencing deterministic regardless.
pub fn display_order(slots: &[Slot]) -> Vec<Slot> {
    let mut ordered = slots.to_vec();
    ordered.sort_by_key(|slot| (slot.position, slot.id));
    ordered
}

/// Produces dense `0..N-1` position assignments for a sibling set
///
/// Siblings are taken in display order and renumbered contiguously, so their
/// relative order is preserved while gaps and duplicates disappear. Used on
/// the source column after a task moves out of it.
///
/// Returns `(id, new_position)` pairs; assignments are emitted for every
/// sibling, including those whose position is already correct, so callers
/// can apply them unconditionally.
pub fn resequence(slots: &[Slot]) -> Vec<(Uuid, i32)> {
    display_order(slots)
        .iter()
        .enumerate()
        .map(|(index, slot)| (slot.id, index as i32))
        .collect()
}

/// Finds the sibling adjacent to `current` in the given direction
///
/// `ordered` must already be in display order (callers pass ids from a
/// `(position, id)`-ordered query). Returns `None` when `current` sits at
/// the relevant edge, or is not present at all; the caller surfaces that as
/// an illegal move without touching any state.
pub fn adjacent(ordered: &[Uuid], current: Uuid, direction: MoveDirection) -> Option<Uuid> {
    let index = ordered.iter().position(|id| *id == current)?;

    match direction {
        MoveDirection::Left => index.checked_sub(1).map(|i| ordered[i]),
        MoveDirection::Right => ordered.get(index + 1).copied(),
    }
}
