/// Score assigned to a way before the user has rated it.
///
/// Anything below zero counts as "not yet scored" and gets asked again;
/// an unparseable reply is mapped back to this value.
pub const UNSCORED: i64 = -1;

/// Minimum number of ways before a session can move past the adding stage.
/// Every problem has at least two solutions, even if neither is pleasant.
pub const MIN_WAYS: usize = 2;

/// Floor applied to every score when building the ticket pool.
///
/// A zero, negative or missing score must never remove a way from the draw,
/// so each way holds at least this many tickets.
pub const MIN_TICKETS: usize = 1;
