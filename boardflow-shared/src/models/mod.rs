/// Database models
///
/// All database rows and their CRUD operations. Every mutation on boards,
/// columns, and tasks is scoped to the owning user via explicit join
/// chains; see the individual modules.
///
/// # Models
///
/// - `user`: accounts and credential storage
/// - `board`: top-level, user-owned containers
/// - `column`: ordered children of a board
/// - `task`: ordered children of a column, movable between adjacent columns

pub mod board;
pub mod column;
pub mod task;
pub mod user;
