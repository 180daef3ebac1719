pub mod request;
pub mod response;

pub use request::{JsonRpcRequest, PingRequest, RpcId, SolveRequest};
pub use response::{
    JsonRpcError, JsonRpcResponse, PingResponse, RpcStatus, SolveResponse, StatusCode,
};
