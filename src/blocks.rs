//! Sequential historical block retrieval.

use alloy::rpc::types::Block;

use crate::lifecycle::StopSignal;
use crate::types::{GatewayError, GatewayResult};
use crate::EthGateway;

impl EthGateway {
    /// Fetch full blocks `[begin, end)`, strictly increasing by number.
    ///
    /// The first failed fetch aborts the whole call with the failing height;
    /// no partial sequence is returned. An empty range (`begin >= end`)
    /// performs no node calls.
    pub async fn blocks_in_range(
        &self,
        cancel: &StopSignal,
        begin: u64,
        end: u64,
    ) -> GatewayResult<Vec<Block>> {
        let mut blocks = Vec::new();
        for number in begin..end {
            let block = cancel
                .guard(self.node.block_by_number(number))
                .await?
                .map_err(|e| GatewayError::BlockFetch { number, source: e })?;
            blocks.push(block);
        }
        Ok(blocks)
    }
}
