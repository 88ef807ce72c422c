//! The container aggregate: entity arenas, offset bookkeeping and the pending-change set.

pub(crate) mod describe;
pub(crate) mod edit;
pub(crate) mod layout;
pub(crate) mod model;
