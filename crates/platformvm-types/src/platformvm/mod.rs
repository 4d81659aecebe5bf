//! Platform chain types.
pub mod txs;

use crate::ids;
use lazy_static::lazy_static;

lazy_static! {
    /// The primary network is the implicit subnet every node validates;
    /// its id is the empty id.
    pub static ref PRIMARY_NETWORK_ID: ids::Id = ids::Id::empty();
}
