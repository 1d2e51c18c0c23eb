// Client module
pub mod ens;
pub mod rpc_client;

pub use ens::EnsRpcClient;
pub use rpc_client::RpcClient;
