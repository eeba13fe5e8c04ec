//! NULL procedure (procedure 0): do nothing. Useful as a ping and for
//! measuring round-trip overhead.

use crate::error::Result;
use crate::protocol::nfs::v3;
use crate::protocol::rpc::RpcTransport;

const NFSPROC3_NULL: u32 = 0;

pub async fn null(transport: &mut RpcTransport) -> Result<()> {
    transport.call(v3::PROGRAM, v3::VERSION, NFSPROC3_NULL, &[]).await?;
    Ok(())
}
